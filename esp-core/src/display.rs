//! Geteilter Display-State
//!
//! Der einzige geteilte, veränderliche Zustand der Firmware. Die Felder von
//! [`DisplayState`] sind nur über einen Lock-Guard oder eine Closure
//! erreichbar - ein Zugriff ohne Lock kompiliert nicht.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::Duration;

use crate::traits::{DisplayError, TaskTimer};
use crate::types::DisplayState;

/// Guard für exklusiven Zugriff, gibt den Lock beim Drop frei
pub type DisplayGuard<'a, M> = MutexGuard<'a, M, DisplayState>;

/// Display-State hinter genau einem Mutex
///
/// `M` ist der Raw-Mutex: `CriticalSectionRawMutex` in der Firmware
/// (Zugriff von beiden Kernen), `NoopRawMutex` in Host-Tests.
pub struct SharedDisplay<M: RawMutex> {
    state: Mutex<M, DisplayState>,
}

impl<M: RawMutex> SharedDisplay<M> {
    pub fn new(state: DisplayState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Wartet unbegrenzt auf den Lock
    ///
    /// Nur für Stellen ohne Zeitbudget (Start, Tests). Die Loops nutzen
    /// [`Self::update_within`] und [`Self::snapshot_since`].
    pub async fn lock(&self) -> DisplayGuard<'_, M> {
        self.state.lock().await
    }

    /// Führt `f` unter dem Lock aus, wartet höchstens `limit` auf den Lock
    ///
    /// # Fehlerbehandlung
    /// `DisplayError::LockTimeout` wenn der Lock nicht rechtzeitig frei wird
    pub async fn update_within<T, R>(
        &self,
        timer: &mut T,
        limit: Duration,
        f: impl FnOnce(&mut DisplayState) -> R,
    ) -> Result<R, DisplayError>
    where
        T: TaskTimer,
    {
        let mut guard = timer
            .within(limit, self.state.lock())
            .await
            .ok_or(DisplayError::LockTimeout)?;
        Ok(f(&mut *guard))
    }

    /// Kopie des States, aber nur wenn sich die Revision seit `seen` geändert hat
    ///
    /// Der Lock wird nur für das Klonen gehalten, gezeichnet wird danach.
    pub async fn snapshot_since<T>(
        &self,
        timer: &mut T,
        limit: Duration,
        seen: Option<u32>,
    ) -> Result<Option<DisplayState>, DisplayError>
    where
        T: TaskTimer,
    {
        self.update_within(timer, limit, |state| {
            if seen == Some(state.revision()) {
                None
            } else {
                Some(state.clone())
            }
        })
        .await
    }

    /// Wie `update_within`, aber ohne zu warten
    pub fn try_update<R>(&self, f: impl FnOnce(&mut DisplayState) -> R) -> Result<R, DisplayError> {
        let mut guard = self.state.try_lock().map_err(|_| DisplayError::LockBusy)?;
        Ok(f(&mut *guard))
    }

    /// Konsistente Kopie des States, ohne zu warten
    pub fn try_snapshot(&self) -> Result<DisplayState, DisplayError> {
        self.try_update(|state| state.clone())
    }
}
