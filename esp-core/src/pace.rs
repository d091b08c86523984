// Stop-fähige Wartezeiten für alle Task-Loops
//
// Jede Loop bekommt ihr eigenes StopSignal. In der Firmware wird es nie
// ausgelöst, in Tests beendet es die Loop deterministisch.

use core::future::Future;

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;

use crate::traits::TaskTimer;

/// Stop-Signal einer Loop
pub type StopSignal<M> = Signal<M, ()>;

/// Ergebnis einer Pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Continue,
    Stop,
}

/// Wartet `period` oder bis `stop` ausgelöst wird
pub async fn pause<M: RawMutex, T: TaskTimer>(
    timer: &mut T,
    stop: &StopSignal<M>,
    period: Duration,
) -> Pace {
    match select(stop.wait(), timer.delay(period)).await {
        Either::First(()) => Pace::Stop,
        Either::Second(()) => Pace::Continue,
    }
}

/// Wartet auf `fut`, außer die Loop wird vorher gestoppt
pub async fn unless_stopped<M: RawMutex, F: Future>(
    stop: &StopSignal<M>,
    fut: F,
) -> Option<F::Output> {
    match select(stop.wait(), fut).await {
        Either::First(()) => None,
        Either::Second(out) => Some(out),
    }
}
