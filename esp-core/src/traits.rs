//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware- und Zeit-Zugriff
//! ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** `esp-firmware::hal` (GPIO, Embassy Timer, UDP)
//! - **Testing:** Mocks in `esp-tests`

use core::future::Future;

use embassy_time::Duration;

use crate::sntp::SntpError;
use crate::types::{DhtKind, Reading};

/// Fehler-Typ für Sensor-Lesevorgänge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor hat nicht rechtzeitig geantwortet
    Timeout,
    /// Prüfsumme des Frames stimmt nicht
    Checksum,
    /// GPIO konnte nicht umgeschaltet werden
    Pin,
}

/// Fehler-Typ für Zugriffe auf den geteilten Display-State
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Lock wurde innerhalb von `LOCK_TIMEOUT` nicht frei
    LockTimeout,
    /// Lock ist gerade belegt (nur bei `try_*`)
    LockBusy,
}

/// Fehler-Typ für die Zeit-Synchronisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// Keine IP-Adresse innerhalb des Timeouts
    Offline,
    Dns,
    Socket,
    Timeout,
    Protocol(SntpError),
}

impl From<SntpError> for SyncError {
    fn from(e: SntpError) -> Self {
        SyncError::Protocol(e)
    }
}

/// Trait für Feuchte-/Temperatur-Sensoren
///
/// Das Start-Signal wartet asynchron, nur die Bit-Übertragung (~5 ms)
/// blockiert. Gelesen wird NIE unter dem Display-Lock.
#[allow(async_fn_in_trait)]
pub trait HumiditySensor {
    /// Welcher Sensor-Typ hängt am Pin
    fn kind(&self) -> DhtKind;

    /// Liest eine Messung
    ///
    /// # Fehlerbehandlung
    /// Gibt `SensorError` zurück, der Aufrufer behält dann die alten Werte
    async fn read(&mut self) -> Result<Reading, SensorError>;
}

/// Trait für Wartezeiten der Tasks
///
/// Production: Embassy `Timer` / `with_timeout`.
/// Tests: ein manueller Timer, der sofort zurückkehrt.
#[allow(async_fn_in_trait)]
pub trait TaskTimer {
    /// Wartet `duration` (gibt die CPU an andere Tasks ab)
    async fn delay(&mut self, duration: Duration);

    /// Wartet höchstens `limit` auf `fut`
    ///
    /// Gibt `None` zurück wenn das Limit abgelaufen ist.
    async fn within<F: Future>(&mut self, limit: Duration, fut: F) -> Option<F::Output>;
}

/// Monotone Millisekunden-Quelle für die GUI
///
/// Ersetzt den Hardware-Timer-Callback, der sonst einen globalen
/// Tick-Zähler hochzählt.
pub trait TickSource {
    fn now_ms(&self) -> u64;
}

/// Trait für die Netzwerk-Zeit (SNTP)
#[allow(async_fn_in_trait)]
pub trait TimeSync {
    /// Fragt die aktuelle Unix-Zeit (Sekunden) beim Server ab
    async fn fetch_unix_time(&mut self) -> Result<u64, SyncError>;
}
