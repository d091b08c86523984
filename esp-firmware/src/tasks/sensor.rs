// Sensor Task - Liest den DHT alle 2 Sekunden
use defmt::info;
use esp_hal::delay::Delay;
use esp_hal::gpio::{DriveMode, Flex, OutputConfig, Pull};
use esp_core::sensor_sampling_logic;

use crate::config::{DHT_GPIO_PIN, SENSOR_KIND};
use crate::hal::{DhtSensor, EmbassyTimer};
use crate::{LoopStop, SharedDisplayState};

/// Wird in der Firmware nie ausgelöst
static STOP: LoopStop = LoopStop::new();

/// Sensor Task - Embassy Task für parallele Ausführung
///
/// Konfiguriert den Datenpin als Open-Drain mit Pull-Up und ruft dann
/// die testbare `sensor_sampling_logic()` auf.
///
/// # Parameter
/// - `pin`: GPIO19 Peripheral für die DHT-Datenleitung
/// - `display`: geteilter Display-State
#[embassy_executor::task]
pub async fn sensor_task(
    pin: esp_hal::peripherals::GPIO19<'static>,
    display: &'static SharedDisplayState,
) {
    let mut flex = Flex::new(pin);
    flex.apply_output_config(
        &OutputConfig::default()
            .with_drive_mode(DriveMode::OpenDrain)
            .with_pull(Pull::Up),
    );
    flex.set_input_enable(true);
    flex.set_output_enable(true);

    info!("DHT: {} on GPIO{}", SENSOR_KIND, DHT_GPIO_PIN);

    let mut sensor = DhtSensor::new(SENSOR_KIND, flex, Delay::new());
    sensor_sampling_logic(&mut sensor, display, &mut EmbassyTimer, &STOP).await;
}
