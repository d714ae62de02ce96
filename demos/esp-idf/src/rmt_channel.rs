use esp_idf_svc::hal::gpio::AnyOutputPin;
use esp_idf_svc::hal::rmt::config::TransmitConfig as RmtConfig;
use esp_idf_svc::hal::rmt::{
    CHANNEL0, PinState, Pulse, PulseTicks, TxRmtDriver, VariableLengthSignal,
};
use esp_idf_svc::sys::{ESP_ERR_NOT_FOUND, EspError};
use gled_strip::{
    ChannelOp, Encoder, Level, PinRegistry, StripError, Symbol, Timeout, TransmitConfig,
    TxChannel, TxChannelConfig, TxChannelProvider, drive_encoder,
};

/// RMT source clock on the legacy driver.
const APB_CLOCK_HZ: u32 = 80_000_000;

fn device_error(op: ChannelOp) -> impl Fn(EspError) -> StripError {
    move |err| StripError::device(op, err.code())
}

fn pin_state(level: Level) -> PinState {
    match level {
        Level::High => PinState::High,
        Level::Low => PinState::Low,
    }
}

fn pulses(symbol: &Symbol) -> Result<[Pulse; 2], EspError> {
    Ok([
        Pulse::new(pin_state(symbol.level0), PulseTicks::new(symbol.duration0)?),
        Pulse::new(pin_state(symbol.level1), PulseTicks::new(symbol.duration1)?),
    ])
}

/// Clock divider that turns the APB clock into `resolution_hz` ticks.
fn clock_divider(resolution_hz: u32) -> Result<u8, StripError> {
    if APB_CLOCK_HZ % resolution_hz != 0 {
        return Err(StripError::InvalidArgument(
            "resolution must divide the 80 MHz RMT clock",
        ));
    }
    u8::try_from(APB_CLOCK_HZ / resolution_hz)
        .map_err(|_| StripError::InvalidArgument("resolution below the RMT divider range"))
}

/// WS2812 channel on the ESP-IDF RMT driver.
///
/// Encoder chunks are collected into one signal and sent with a blocking
/// start, so the line is already idle when `transmit` returns.
pub struct RmtTxChannel {
    tx: TxRmtDriver<'static>,
    config: TxChannelConfig,
    enabled: bool,
}

impl TxChannel for RmtTxChannel {
    fn enable(&mut self) -> Result<(), StripError> {
        if self.enabled {
            return Err(StripError::InvalidArgument("channel already enabled"));
        }
        self.enabled = true;
        Ok(())
    }

    fn transmit<E: Encoder>(
        &mut self,
        encoder: &mut E,
        input: &[E::Item],
        config: &TransmitConfig,
    ) -> Result<(), StripError> {
        if !self.enabled {
            return Err(StripError::InvalidArgument("channel not enabled"));
        }
        if config.loop_count != 0 {
            return Err(StripError::InvalidArgument("loop transmission not supported"));
        }

        let mut block = vec![Symbol::default(); self.config.effective_mem_block_symbols()];
        let mut signal = VariableLengthSignal::new();
        let stats = drive_encoder(encoder, input, &mut block, |chunk| {
            for symbol in chunk {
                let pair = pulses(symbol).map_err(device_error(ChannelOp::Transmit))?;
                signal.push(&pair).map_err(device_error(ChannelOp::Transmit))?;
            }
            Ok(())
        })?;

        log::debug!("rmt: {} symbols in {} blocks", stats.symbols, stats.chunks);

        self.tx
            .start_blocking(&signal)
            .map_err(device_error(ChannelOp::Transmit))
    }

    fn wait_all_done(&mut self, _timeout: Timeout) -> Result<(), StripError> {
        if !self.enabled {
            return Err(StripError::InvalidArgument("channel not enabled"));
        }
        Ok(())
    }

    fn disable(&mut self) -> Result<(), StripError> {
        if !self.enabled {
            return Err(StripError::InvalidArgument("channel not enabled"));
        }
        self.enabled = false;
        Ok(())
    }
}

/// Hands out RMT channel 0, bound to one pin at a time.
pub struct RmtProvider {
    channel: Option<CHANNEL0>,
    pins: PinRegistry<1>,
}

impl RmtProvider {
    pub fn new(channel: CHANNEL0) -> Self {
        Self {
            channel: Some(channel),
            pins: PinRegistry::new(),
        }
    }
}

impl TxChannelProvider for RmtProvider {
    type Channel = RmtTxChannel;

    fn new_tx_channel(&mut self, config: &TxChannelConfig) -> Result<RmtTxChannel, StripError> {
        if config.with_dma || config.invert_out {
            return Err(StripError::InvalidArgument(
                "DMA and output inversion need the new RMT driver",
            ));
        }
        let divider = clock_divider(config.effective_resolution_hz())?;

        if self.pins.is_bound(config.gpio) {
            return Err(StripError::InvalidArgument("gpio already bound to a channel"));
        }
        let channel = self
            .channel
            .take()
            .ok_or(StripError::device(ChannelOp::Create, ESP_ERR_NOT_FOUND as i32))?;

        // Safety: the registry guarantees no other channel drives this pin.
        let pin = unsafe { AnyOutputPin::new(i32::from(config.gpio)) };
        let rmt_config = RmtConfig::new().clock_divider(divider);
        let tx = match TxRmtDriver::new(channel, pin, &rmt_config) {
            Ok(tx) => tx,
            Err(err) => {
                // Safety: the failed driver has already dropped the channel.
                self.channel = Some(unsafe { CHANNEL0::new() });
                return Err(device_error(ChannelOp::Create)(err));
            }
        };
        self.pins.claim(config.gpio)?;

        log::info!("rmt: channel 0 on gpio {}, divider {}", config.gpio, divider);

        Ok(RmtTxChannel {
            tx,
            config: *config,
            enabled: false,
        })
    }

    fn delete_tx_channel(&mut self, channel: RmtTxChannel) -> Result<(), StripError> {
        let gpio = channel.config.gpio;
        drop(channel);

        if !self.pins.release(gpio) {
            return Err(StripError::device(ChannelOp::Delete, ESP_ERR_NOT_FOUND as i32));
        }
        // Safety: the driver that owned channel 0 was dropped above.
        self.channel = Some(unsafe { CHANNEL0::new() });
        Ok(())
    }
}
