//! Timing- und Layout-Konstanten der Task-Logik
//!
//! Liegen im Core, damit Firmware und Host-Tests dieselben Werte nutzen.

use embassy_time::Duration;

// ============================================================================
// Sensor
// ============================================================================

/// Abtastintervall des DHT-Sensors
pub const SENSOR_PERIOD: Duration = Duration::from_millis(2000);

/// Messbereich der Temperatur-Anzeige (°C)
pub const TEMPERATURE_RANGE: (i16, i16) = (0, 50);

/// Messbereich der Feuchte-Anzeige (%)
pub const HUMIDITY_RANGE: (i16, i16) = (0, 100);

/// Einheit hinter dem Temperatur-Wert
pub const DEGREE_CELSIUS: &str = "\u{00B0}C";

// ============================================================================
// GUI / Render Loop
// ============================================================================

/// Tick der Render Loop
pub const RENDER_TICK: Duration = Duration::from_millis(10);

/// Minimaler Abstand zwischen zwei Redraws in Millisekunden
/// (entspricht der Default-Refresh-Periode klassischer Widget-Libraries)
pub const GUI_REFRESH_PERIOD_MS: u64 = 30;

/// Maximale Wartezeit auf den Display-Lock
///
/// Läuft sie ab, meldet der Aufrufer `DisplayError::LockTimeout`
/// statt das ganze System still zu blockieren.
pub const LOCK_TIMEOUT: Duration = Duration::from_millis(500);

/// Platzhalter bis zur ersten gültigen Messung
pub const VALUE_PLACEHOLDER: &str = "--,--";

/// Platzhalter bis zur ersten Uhrzeit
pub const CLOCK_PLACEHOLDER: &str = "HH:MM:SS";

// ============================================================================
// Uhr / SNTP
// ============================================================================

/// Aktualisierungsintervall des Uhr-Labels
pub const CLOCK_PERIOD: Duration = Duration::from_millis(1000);

/// Anzahl der SNTP-Versuche nach dem Verbindungsaufbau
pub const SYNC_ATTEMPTS: u32 = 10;

/// Pause zwischen zwei SNTP-Versuchen
pub const SYNC_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Unix-Zeit 2016-01-01T00:00:00Z
/// Alles davor gilt als "Uhr nicht gestellt"
pub const MIN_VALID_UNIX_TIME: u64 = 1_451_606_400;
