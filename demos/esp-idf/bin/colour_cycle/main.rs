use esp_idf_demos::RmtProvider;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use gled_strip::{Colour, LedStrip, StripInterface};

const NUM_LEDS: u16 = 8;
const LED_STRIP_PIN: u8 = 48;
const STEP_MS: u32 = 500;

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

    // Whole-strip fills, then a single lit pixel walking along the strip
    loop {
        for colour in Colour::ALL {
            log::info!("fill {:?}", colour);
            strip.set_colour(colour)?;
            FreeRtos::delay_ms(STEP_MS);
        }

        for index in 0..NUM_LEDS {
            strip.clear()?;
            strip.set_pixel_colour(index, Colour::ALL[usize::from(index) % Colour::ALL.len()])?;
            strip.refresh()?;
            FreeRtos::delay_ms(STEP_MS / 4);
        }
    }
}
