//! Clock Source: Wanduhr, SNTP-Abgleich und Uhr-Label
//!
//! Ablauf:
//! 1. Warten auf das einmalige Readiness-Signal des Network Connectors
//! 2. Bis zu `SYNC_ATTEMPTS` SNTP-Versuche im Abstand von `SYNC_RETRY_DELAY`
//! 3. Danach endlos: einmal pro Sekunde `HH:MM:SS` ins Display schreiben

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::{CLOCK_PERIOD, LOCK_TIMEOUT, SYNC_ATTEMPTS, SYNC_RETRY_DELAY};
use crate::display::SharedDisplay;
use crate::logic::{format_clock, is_time_set};
use crate::network::Connectivity;
use crate::pace::{Pace, StopSignal, pause, unless_stopped};
use crate::traits::{TaskTimer, TickSource, TimeSync};

/// Wanduhr auf Basis einer monotonen Millisekunden-Quelle
///
/// Ohne Abgleich zählt sie ab Unix-Epoche 0 seit Boot (Uhr "nicht gestellt").
/// Zwischen zwei `set()` läuft sie monoton.
pub struct WallClock<K: TickSource> {
    ticks: K,
    base_unix: u64,
    base_ms: u64,
}

impl<K: TickSource> WallClock<K> {
    pub fn new(ticks: K) -> Self {
        let base_ms = ticks.now_ms();
        Self {
            ticks,
            base_unix: 0,
            base_ms,
        }
    }

    /// Stellt die Uhr (expliziter Re-Sync, darf rückwärts springen)
    pub fn set(&mut self, unix_secs: u64) {
        self.base_unix = unix_secs;
        self.base_ms = self.ticks.now_ms();
    }

    /// Aktuelle Unix-Zeit in Sekunden
    pub fn now(&self) -> u64 {
        let elapsed_ms = self.ticks.now_ms().saturating_sub(self.base_ms);
        self.base_unix + elapsed_ms / 1000
    }

    pub fn is_set(&self) -> bool {
        is_time_set(self.now())
    }
}

/// Ergebnis des initialen Zeit-Abgleichs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// Uhr war schon gestellt, kein SNTP nötig
    AlreadySet,
    /// Abgleich erfolgreich (Unix-Zeit)
    Synced(u64),
    /// Alle Versuche fehlgeschlagen, lokale Uhr wird weiterverwendet
    TimedOut,
    /// Loop wurde während des Wartens gestoppt
    Cancelled,
}

/// Stellt die Uhr per SNTP, falls sie noch nicht gestellt ist
///
/// Höchstens `SYNC_ATTEMPTS` Versuche, dazwischen `SYNC_RETRY_DELAY`.
/// Kein weiterer Versuch im selben Boot-Zyklus nach `TimedOut`.
pub async fn obtain_time<S, K, T, M>(
    sync: &mut S,
    clock: &mut WallClock<K>,
    timer: &mut T,
    stop: &StopSignal<M>,
) -> SyncOutcome
where
    S: TimeSync,
    K: TickSource,
    T: TaskTimer,
    M: RawMutex,
{
    if clock.is_set() {
        return SyncOutcome::AlreadySet;
    }

    info!("Clock: Time is not set yet. Getting time over NTP.");

    for attempt in 1..=SYNC_ATTEMPTS {
        match sync.fetch_unix_time().await {
            Ok(unix) if is_time_set(unix) => {
                clock.set(unix);
                info!("Clock: Time synchronized ({})", unix);
                return SyncOutcome::Synced(unix);
            }
            Ok(unix) => {
                warn!("Clock: Server returned implausible time {}", unix);
            }
            Err(e) => {
                warn!("Clock: SNTP request failed: {}", e);
            }
        }

        if attempt < SYNC_ATTEMPTS {
            info!(
                "Clock: Waiting for system time to be set... ({}/{})",
                attempt,
                SYNC_ATTEMPTS
            );
            if pause(timer, stop, SYNC_RETRY_DELAY).await == Pace::Stop {
                return SyncOutcome::Cancelled;
            }
        }
    }

    SyncOutcome::TimedOut
}

/// Clock Source Logic - Testbare Logik ohne Hardware-Abhängigkeit
///
/// # Parameter
/// - `connectivity`: Flags des Network Connectors (Readiness-Signal)
/// - `sync`: SNTP-Client (Hardware oder Mock)
/// - `clock`: Wanduhr
/// - `display`: geteilter Display-State
/// - `timer`: Wartezeiten (Embassy oder manuell)
/// - `stop`: beendet die Loop
/// - `offset_secs`: fester Zeitzonen-Offset zu UTC
pub async fn clock_logic<S, K, T, M>(
    connectivity: &Connectivity<M>,
    sync: &mut S,
    clock: &mut WallClock<K>,
    display: &SharedDisplay<M>,
    timer: &mut T,
    stop: &StopSignal<M>,
    offset_secs: i32,
) where
    S: TimeSync,
    K: TickSource,
    T: TaskTimer,
    M: RawMutex,
{
    info!("Clock: Waiting for network...");
    if unless_stopped(stop, connectivity.wait_time_sync_ready())
        .await
        .is_none()
    {
        return;
    }
    info!("Clock: Wi-Fi connected. Starting SNTP initialization.");

    match obtain_time(sync, clock, timer, stop).await {
        SyncOutcome::AlreadySet => info!("Clock: Time already set"),
        SyncOutcome::Synced(_) => {}
        SyncOutcome::TimedOut => warn!("Clock: No time from SNTP, continuing with local clock"),
        SyncOutcome::Cancelled => return,
    }

    loop {
        let label = format_clock(clock.now(), offset_secs);
        debug!("Clock: {}", label.as_str());

        if let Err(e) = display
            .update_within(timer, LOCK_TIMEOUT, |state| state.set_clock_label(&label))
            .await
        {
            warn!("Clock: Display update skipped: {}", e);
        }

        if pause(timer, stop, CLOCK_PERIOD).await == Pace::Stop {
            break;
        }
    }
}
