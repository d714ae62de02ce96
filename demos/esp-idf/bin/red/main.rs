use esp_idf_demos::RmtProvider;
use esp_idf_svc::hal::peripherals::Peripherals;
use gled_strip::{Colour, LedStrip, StripInterface};

const NUM_LEDS: u16 = 2;
const LED_STRIP_PIN: u8 = 42;

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let mut rmt = RmtProvider::new(peripherals.rmt.channel0);

    let mut strip = LedStrip::<_, { 3 * NUM_LEDS as usize }>::create(
        &mut rmt,
        LED_STRIP_PIN,
        NUM_LEDS,
    )?;
    strip.set_colour(Colour::Red)?;

    log::info!("strip set to red");
    Ok(())
}
