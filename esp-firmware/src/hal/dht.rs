// DHT11/DHT22 Treiber (Bit-Bang auf einem Open-Drain GPIO)
//
// Protokoll:
// 1. Host zieht die Leitung low (Start-Signal), gibt sie dann frei
// 2. Sensor antwortet mit 80 µs low + 80 µs high
// 3. 40 Bits: je ~50 µs low, dann high (~26 µs = 0, ~70 µs = 1)

use embassy_time::Timer;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use esp_core::logic::{decode_frame, pulses_to_frame};
use esp_core::{DhtKind, HumiditySensor, Reading, SensorError};

/// Maximale Wartezeit auf einen Pegelwechsel in µs
const EDGE_TIMEOUT_US: u32 = 100;

/// Start-Signal: DHT11 braucht mindestens 18 ms, DHT22 mindestens 1 ms
fn start_pulse_ms(kind: DhtKind) -> u64 {
    match kind {
        DhtKind::Dht11 => 20,
        DhtKind::Dht22 => 2,
    }
}

/// DHT Sensor am GPIO
///
/// `P` muss Open-Drain mit Pull-Up konfiguriert sein (z.B. `esp_hal::gpio::Flex`),
/// damit Lesen und Schreiben über denselben Pin funktioniert.
pub struct DhtSensor<P, D> {
    kind: DhtKind,
    pin: P,
    delay: D,
}

impl<P, D> DhtSensor<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(kind: DhtKind, mut pin: P, delay: D) -> Self {
        // Leitung im Ruhezustand high
        let _ = pin.set_high();
        Self { kind, pin, delay }
    }

    /// Wartet bis der Pin `level` erreicht, gibt die Wartezeit in µs zurück
    fn wait_for(&mut self, level: bool) -> Result<u32, SensorError> {
        let mut elapsed = 0;
        loop {
            let high = self.pin.is_high().map_err(|_| SensorError::Pin)?;
            if high == level {
                return Ok(elapsed);
            }
            if elapsed >= EDGE_TIMEOUT_US {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
            elapsed += 1;
        }
    }

    fn read_pulses(&mut self) -> Result<[u32; 40], SensorError> {
        // Antwort des Sensors
        self.wait_for(false)?;
        self.wait_for(true)?;
        self.wait_for(false)?;

        let mut pulses = [0u32; 40];
        for pulse in pulses.iter_mut() {
            self.wait_for(true)?;
            *pulse = self.wait_for(false)?;
        }
        Ok(pulses)
    }
}

impl<P, D> HumiditySensor for DhtSensor<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn kind(&self) -> DhtKind {
        self.kind
    }

    async fn read(&mut self) -> Result<Reading, SensorError> {
        // Start-Signal asynchron, blockiert den Executor nicht
        self.pin.set_low().map_err(|_| SensorError::Pin)?;
        Timer::after_millis(start_pulse_ms(self.kind)).await;
        self.pin.set_high().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(30);

        // Bit-Timing verträgt keine Unterbrechung (~5 ms)
        let pulses = critical_section::with(|_| self.read_pulses())?;

        let frame = pulses_to_frame(&pulses);
        decode_frame(self.kind, &frame)
    }
}
