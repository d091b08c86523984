//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use core::fmt::Write;

use crate::config::{DEGREE_CELSIUS, MIN_VALID_UNIX_TIME};
use crate::traits::SensorError;
use crate::types::{DhtKind, Label, Reading};

/// Länge eines "1"-Bits liegt bei ~70 µs, eines "0"-Bits bei ~26 µs
pub const BIT_ONE_THRESHOLD_US: u32 = 40;

const SECS_PER_DAY: i64 = 86_400;

/// Wandelt einen Messwert in den Gauge-Wert um
///
/// Nachkommastellen werden abgeschnitten, danach wird auf den
/// Bereich `(min, max)` begrenzt. `NaN` landet auf dem Minimum.
///
/// # Beispiele
///
/// ```
/// # use esp_core::gauge_value;
/// assert_eq!(gauge_value(23.45, (0, 50)), 23);
/// assert_eq!(gauge_value(71.0, (0, 50)), 50);
/// ```
pub fn gauge_value(value: f32, range: (i16, i16)) -> i16 {
    let (min, max) = range;
    if value.is_nan() {
        return min;
    }
    (value as i16).clamp(min, max)
}

/// Temperatur-Label, z.B. `23.45°C`
pub fn format_temperature(temperature: f32) -> Label {
    let mut label = Label::new();
    // 16 Bytes reichen für "-40.00°C" bis "125.00°C"
    let _ = write!(label, "{:.2}{}", temperature, DEGREE_CELSIUS);
    label
}

/// Feuchte-Label, z.B. `60.10%`
pub fn format_humidity(humidity: f32) -> Label {
    let mut label = Label::new();
    let _ = write!(label, "{:.2}%", humidity);
    label
}

/// Formatiert eine Unix-Zeit als `HH:MM:SS` in lokaler Zeit
///
/// `offset_secs` ist der feste Zeitzonen-Offset zu UTC (z.B. -3 h).
///
/// ```
/// # use esp_core::format_clock;
/// assert_eq!(format_clock(3_723, 0).as_str(), "01:02:03");
/// ```
pub fn format_clock(unix_secs: u64, offset_secs: i32) -> Label {
    let local = unix_secs as i64 + offset_secs as i64;
    let secs_of_day = local.rem_euclid(SECS_PER_DAY);

    let mut label = Label::new();
    let _ = write!(
        label,
        "{:02}:{:02}:{:02}",
        secs_of_day / 3600,
        (secs_of_day / 60) % 60,
        secs_of_day % 60
    );
    label
}

/// Liegt die Zeit nach 2016? Sonst ist die Uhr nicht gestellt.
pub fn is_time_set(unix_secs: u64) -> bool {
    unix_secs >= MIN_VALID_UNIX_TIME
}

/// Setzt die 40 gemessenen High-Pulsdauern zu 5 Bytes zusammen (MSB first)
pub fn pulses_to_frame(high_us: &[u32; 40]) -> [u8; 5] {
    let mut frame = [0u8; 5];
    for (i, &width) in high_us.iter().enumerate() {
        if width > BIT_ONE_THRESHOLD_US {
            frame[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    frame
}

/// Dekodiert einen 40-Bit DHT-Frame
///
/// Byte 4 ist die Prüfsumme: Summe der Bytes 0..4, auf 8 Bit abgeschnitten.
///
/// # Fehlerbehandlung
/// Gibt `SensorError::Checksum` zurück wenn die Prüfsumme nicht passt
pub fn decode_frame(kind: DhtKind, frame: &[u8; 5]) -> Result<Reading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let reading = match kind {
        // Nur die Ganzzahl-Bytes, Byte 1 und 3 werden ignoriert
        DhtKind::Dht11 => Reading {
            temperature: frame[2] as f32,
            humidity: frame[0] as f32,
        },
        DhtKind::Dht22 => {
            let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;
            let mut temperature = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as f32 / 10.0;
            if frame[2] & 0x80 != 0 {
                temperature = -temperature;
            }
            Reading {
                temperature,
                humidity,
            }
        }
    };

    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_value_truncates() {
        assert_eq!(gauge_value(23.99, (0, 50)), 23);
        assert_eq!(gauge_value(60.10, (0, 100)), 60);
    }

    #[test]
    fn test_gauge_value_clamps() {
        assert_eq!(gauge_value(-12.5, (0, 50)), 0);
        assert_eq!(gauge_value(120.0, (0, 100)), 100);
        assert_eq!(gauge_value(f32::NAN, (0, 50)), 0);
    }

    #[test]
    fn test_format_temperature_two_decimals() {
        assert_eq!(format_temperature(23.45).as_str(), "23.45°C");
        assert_eq!(format_temperature(-5.0).as_str(), "-5.00°C");
    }

    #[test]
    fn test_format_humidity_two_decimals() {
        assert_eq!(format_humidity(60.10).as_str(), "60.10%");
        assert_eq!(format_humidity(100.0).as_str(), "100.00%");
    }

    #[test]
    fn test_format_clock_with_negative_offset() {
        // 1970-01-01 02:00:00 UTC → 23:00:00 am Vortag bei UTC-3
        assert_eq!(format_clock(7_200, -3 * 3600).as_str(), "23:00:00");
    }

    #[test]
    fn test_format_clock_wraps_day() {
        // 2024-01-01 00:00:05 UTC
        assert_eq!(format_clock(1_704_067_205, 0).as_str(), "00:00:05");
    }

    #[test]
    fn test_is_time_set() {
        assert!(!is_time_set(42));
        assert!(is_time_set(1_704_067_200));
    }

    #[test]
    fn test_pulses_to_frame_msb_first() {
        let mut pulses = [26u32; 40];
        pulses[0] = 70; // Byte 0, Bit 7
        pulses[15] = 70; // Byte 1, Bit 0
        let frame = pulses_to_frame(&pulses);
        assert_eq!(frame, [0x80, 0x01, 0, 0, 0]);
    }

    #[test]
    fn test_decode_dht11() {
        let frame = [60, 1, 23, 4, 88];
        let reading = decode_frame(DhtKind::Dht11, &frame).unwrap();
        assert_eq!(reading.humidity, 60.0);
        assert_eq!(reading.temperature, 23.0);
    }

    #[test]
    fn test_decode_dht11_ignores_decimal_bytes() {
        // Bit 7 in Byte 3 ist kein Vorzeichen
        let frame = [45, 0, 21, 0x85, 199];
        let reading = decode_frame(DhtKind::Dht11, &frame).unwrap();
        assert_eq!(reading.humidity, 45.0);
        assert_eq!(reading.temperature, 21.0);
    }

    #[test]
    fn test_decode_dht22_negative() {
        // 65.2 % / -10.1 °C
        let frame = [0x02, 0x8C, 0x80, 0x65, 0x73];
        let reading = decode_frame(DhtKind::Dht22, &frame).unwrap();
        assert!((reading.humidity - 65.2).abs() < 0.01);
        assert!((reading.temperature + 10.1).abs() < 0.01);
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        let frame = [60, 1, 23, 4, 0];
        assert_eq!(
            decode_frame(DhtKind::Dht11, &frame),
            Err(SensorError::Checksum)
        );
    }
}
