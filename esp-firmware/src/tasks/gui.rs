// GUI Task - Render Loop auf dem zweiten Kern
use defmt::{error, info};
use esp_core::{FrameBuffer, Gui, render_logic};
use static_cell::ConstStaticCell;

use crate::config::LCD_SPI_BUFFER_SIZE;
use crate::hal::{EmbassyTicks, EmbassyTimer, PanelPins, init_panel};
use crate::{LoopStop, SharedDisplayState};

static STOP: LoopStop = LoopStop::new();

// Framebuffer (25 KB) und SPI-Puffer liegen statisch, nicht auf dem Task-Stack
static FRAME: ConstStaticCell<FrameBuffer> = ConstStaticCell::new(FrameBuffer::new());
static SPI_BUFFER: ConstStaticCell<[u8; LCD_SPI_BUFFER_SIZE]> =
    ConstStaticCell::new([0; LCD_SPI_BUFFER_SIZE]);

/// GUI Task
///
/// Initialisiert das Panel und startet die Render Loop (Tick 10 ms).
/// Schlägt die Panel-Initialisierung fehl, bleibt das Display dunkel,
/// Sensor und Uhr laufen weiter.
#[embassy_executor::task]
pub async fn gui_task(
    spi: esp_hal::peripherals::SPI2<'static>,
    pins: PanelPins,
    display: &'static SharedDisplayState,
) {
    let mut panel = match init_panel(spi, pins, SPI_BUFFER.take()) {
        Ok(panel) => panel,
        Err(e) => {
            error!("GUI: Panel init failed: {}", e);
            return;
        }
    };
    info!("GUI: Panel initialized");

    let frame = FRAME.take();
    let mut gui = Gui::new(EmbassyTicks);
    render_logic(display, &mut gui, frame, &mut panel, &mut EmbassyTimer, &STOP).await;
}
