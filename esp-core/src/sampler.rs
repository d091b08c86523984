//! Sensor Sampler
//!
//! Liest alle `SENSOR_PERIOD` den Sensor und schreibt die Werte in den
//! Display-State. Der Lock wird nur für das Schreiben gehalten, nie während
//! des Lesens.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::{LOCK_TIMEOUT, SENSOR_PERIOD};
use crate::display::SharedDisplay;
use crate::pace::{Pace, StopSignal, pause};
use crate::traits::{HumiditySensor, SensorError, TaskTimer};
use crate::types::Reading;

/// Eine Messung: lesen, bei Erfolg ins Display übernehmen
///
/// Bei einem Lesefehler bleibt der Display-State unverändert
/// (alte Werte bleiben stehen, kein Retry, kein Fehlerzähler).
pub async fn sample_once<S, T, M>(
    sensor: &mut S,
    display: &SharedDisplay<M>,
    timer: &mut T,
) -> Result<Reading, SensorError>
where
    S: HumiditySensor,
    T: TaskTimer,
    M: RawMutex,
{
    let reading = match sensor.read().await {
        Ok(reading) => reading,
        Err(e) => {
            error!("DHT: ERROR READING SENSOR: {}", e);
            return Err(e);
        }
    };

    info!(
        "DHT: HUM: {} TEMP: {}",
        reading.humidity,
        reading.temperature
    );

    if let Err(e) = display
        .update_within(timer, LOCK_TIMEOUT, |state| state.apply_reading(&reading))
        .await
    {
        warn!("DHT: Display update skipped: {}", e);
    }

    Ok(reading)
}

/// Sensor Sampling Logic - Testbare Business Logic ohne Hardware-Abhängigkeit
///
/// # Trait-basierte Abstraktion
/// - `S: HumiditySensor`: DHT am GPIO (Production) oder Mock (Tests)
/// - `T: TaskTimer`: Embassy Timer oder manueller Timer
///
/// Läuft bis `stop` ausgelöst wird (in der Firmware: nie).
pub async fn sensor_sampling_logic<S, T, M>(
    sensor: &mut S,
    display: &SharedDisplay<M>,
    timer: &mut T,
    stop: &StopSignal<M>,
) where
    S: HumiditySensor,
    T: TaskTimer,
    M: RawMutex,
{
    info!(
        "DHT: Sampling {} every {} ms",
        sensor.kind(),
        SENSOR_PERIOD.as_millis()
    );

    loop {
        // Fehler sind schon geloggt, die Loop läuft einfach weiter
        let _ = sample_once(sensor, display, timer).await;

        if pause(timer, stop, SENSOR_PERIOD).await == Pace::Stop {
            info!("DHT: Sampling stopped");
            break;
        }
    }
}
