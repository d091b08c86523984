//! Render Loop
//!
//! Holt alle `RENDER_TICK` einen Snapshot des Display-States, lässt die GUI
//! in den Framebuffer zeichnen und schiebt geänderte Pixel zum Panel.
//! Der Lock wird nur für den Snapshot gehalten, Zeichnen und SPI-Transfer
//! laufen ohne Lock.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;

use crate::config::{LOCK_TIMEOUT, RENDER_TICK};
use crate::display::SharedDisplay;
use crate::framebuffer::FrameBuffer;
use crate::gui::Gui;
use crate::pace::{Pace, StopSignal, pause};
use crate::traits::{TaskTimer, TickSource};

/// Ein Durchlauf der Render Loop, `true` wenn das Panel aktualisiert wurde
pub async fn render_tick<M, K, T, P>(
    display: &SharedDisplay<M>,
    gui: &mut Gui<K>,
    frame: &mut FrameBuffer,
    panel: &mut P,
    timer: &mut T,
) -> bool
where
    M: RawMutex,
    K: TickSource,
    T: TaskTimer,
    P: DrawTarget<Color = Rgb565>,
{
    match display
        .snapshot_since(timer, LOCK_TIMEOUT, gui.seen_revision())
        .await
    {
        Ok(Some(state)) => gui.submit(state),
        Ok(None) => {}
        Err(e) => warn!("GUI: Snapshot skipped: {}", e),
    }

    let Ok(_) = gui.process(frame);

    // Auch nach einem fehlgeschlagenen Flush bleibt der Bereich dirty
    if !frame.is_dirty() {
        return false;
    }

    if frame.flush(panel).is_err() {
        error!("GUI: Panel flush failed");
        return false;
    }
    true
}

/// Render Logic - läuft bis `stop` ausgelöst wird
pub async fn render_logic<M, K, T, P>(
    display: &SharedDisplay<M>,
    gui: &mut Gui<K>,
    frame: &mut FrameBuffer,
    panel: &mut P,
    timer: &mut T,
    stop: &StopSignal<M>,
) where
    M: RawMutex,
    K: TickSource,
    T: TaskTimer,
    P: DrawTarget<Color = Rgb565>,
{
    info!("GUI: Render loop every {} ms", RENDER_TICK.as_millis());

    loop {
        render_tick(display, gui, frame, panel, timer).await;

        if pause(timer, stop, RENDER_TICK).await == Pace::Stop {
            info!("GUI: Render loop stopped");
            break;
        }
    }
}
