//! Core Types für die Klima-Anzeige
//!
//! Datenstrukturen ohne Hardware-Dependencies

use heapless::String;

use crate::config::{CLOCK_PLACEHOLDER, HUMIDITY_RANGE, TEMPERATURE_RANGE, VALUE_PLACEHOLDER};
use crate::logic::{format_humidity, format_temperature, gauge_value};

/// Text eines Labels auf dem Display
pub type Label = String<16>;

/// Erstellt ein Label aus einem &str (schneidet bei Überlänge ab)
pub fn label(text: &str) -> Label {
    let mut out = Label::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Sensor-Typ am Daten-Pin
///
/// Bestimmt wie der 40-Bit-Frame dekodiert wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhtKind {
    /// DHT11: ganze Grad/Prozent in Byte 0/2, Zehntel in Byte 1/3
    Dht11,
    /// DHT22 / AM2302: 16-Bit-Werte in Zehnteln, Vorzeichen-Bit für Temperatur
    Dht22,
}

/// Eine erfolgreiche Messung
///
/// Wird nicht gespeichert, sondern sofort in den `DisplayState` übernommen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Temperatur in °C
    pub temperature: f32,
    /// Relative Luftfeuchte in %
    pub humidity: f32,
}

/// Aktueller Inhalt aller Widgets
///
/// Felder sind privat: Änderungen laufen über die Methoden, die
/// gleichzeitig die `revision` erhöhen. Erreichbar ist der State nur
/// über den Guard von [`crate::SharedDisplay`].
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    temp_value: i16,
    temp_label: Label,
    humidity_value: i16,
    humidity_label: Label,
    clock_label: Label,
    revision: u32,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    /// Startzustand: Gauges auf Minimum, Labels mit Platzhaltern
    pub fn new() -> Self {
        Self {
            temp_value: TEMPERATURE_RANGE.0,
            temp_label: label(VALUE_PLACEHOLDER),
            humidity_value: HUMIDITY_RANGE.0,
            humidity_label: label(VALUE_PLACEHOLDER),
            clock_label: label(CLOCK_PLACEHOLDER),
            revision: 0,
        }
    }

    /// Übernimmt eine Messung in beide Gauges und beide Labels
    pub fn apply_reading(&mut self, reading: &Reading) {
        self.temp_value = gauge_value(reading.temperature, TEMPERATURE_RANGE);
        self.temp_label = format_temperature(reading.temperature);
        self.humidity_value = gauge_value(reading.humidity, HUMIDITY_RANGE);
        self.humidity_label = format_humidity(reading.humidity);
        self.bump();
    }

    /// Setzt das Uhr-Label (nur bei Änderung neue Revision)
    pub fn set_clock_label(&mut self, text: &str) {
        if self.clock_label.as_str() != text {
            self.clock_label = label(text);
            self.bump();
        }
    }

    pub fn temp_value(&self) -> i16 {
        self.temp_value
    }

    pub fn temp_label(&self) -> &str {
        &self.temp_label
    }

    pub fn humidity_value(&self) -> i16 {
        self.humidity_value
    }

    pub fn humidity_label(&self) -> &str {
        &self.humidity_label
    }

    pub fn clock_label(&self) -> &str {
        &self.clock_label
    }

    /// Änderungszähler - die Render Loop zeichnet nur bei neuer Revision
    pub fn revision(&self) -> u32 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Reading {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Reading {{ temp: {}, hum: {} }}",
            self.temperature,
            self.humidity
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DhtKind {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DhtKind::Dht11 => defmt::write!(fmt, "DHT11"),
            DhtKind::Dht22 => defmt::write!(fmt, "DHT22"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "DisplayState {{ temp: {} ({}), hum: {} ({}), clock: {}, rev: {} }}",
            self.temp_label.as_str(),
            self.temp_value,
            self.humidity_label.as_str(),
            self.humidity_value,
            self.clock_label.as_str(),
            self.revision
        )
    }
}
