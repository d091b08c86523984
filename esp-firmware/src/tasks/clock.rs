// Clock Task - SNTP-Abgleich und Uhr-Label
use embassy_net::Stack;
use esp_core::{WallClock, clock_logic};

use crate::config::TIMEZONE_OFFSET_SECS;
use crate::hal::{EmbassyTicks, EmbassyTimer, SntpClient};
use crate::{ConnectivityFlags, LoopStop, SharedDisplayState};

static STOP: LoopStop = LoopStop::new();

/// Clock Task
///
/// Wartet auf die erste IP-Adresse, stellt die Uhr per SNTP und schreibt
/// danach jede Sekunde `HH:MM:SS` (UTC-3) ins Display.
#[embassy_executor::task]
pub async fn clock_task(
    stack: Stack<'static>,
    flags: &'static ConnectivityFlags,
    display: &'static SharedDisplayState,
) {
    let mut sync = SntpClient::new(stack, flags);
    let mut clock = WallClock::new(EmbassyTicks);

    clock_logic(
        flags,
        &mut sync,
        &mut clock,
        display,
        &mut EmbassyTimer,
        &STOP,
        TIMEZONE_OFFSET_SECS,
    )
    .await;
}
