pub mod rmt_channel;

pub use rmt_channel::{RmtProvider, RmtTxChannel};
