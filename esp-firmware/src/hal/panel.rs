// ST7735S Panel (160x80) am SPI-Bus
//
// Das Panel ist ein reines DrawTarget: die GUI zeichnet in den Framebuffer
// und die Render Loop schiebt nur den geänderten Bereich hierher.

use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::Blocking;
use esp_hal::delay::Delay;
use esp_hal::gpio::{AnyPin, Level, Output, OutputConfig};
use esp_hal::peripherals::SPI2;
use esp_hal::spi::Mode;
use esp_hal::spi::master::{Config, Spi};
use esp_hal::time::Rate;
use mipidsi::Builder;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7735s;
use mipidsi::options::{ColorInversion, ColorOrder, Orientation, Rotation};

use crate::config::{LCD_NATIVE_SIZE, LCD_OFFSET, LCD_SPI_FREQ_MHZ};

type PanelSpi = ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, NoDelay>;

/// Treiber-Typ des Panels
pub type Panel =
    mipidsi::Display<SpiInterface<'static, PanelSpi, Output<'static>>, ST7735s, Output<'static>>;

/// Panel konnte nicht initialisiert werden
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct PanelInitError;

/// Pins des Panels (MOSI 23, SCK 18, CS 15, DC 5, RST 4)
pub struct PanelPins {
    pub mosi: AnyPin<'static>,
    pub sck: AnyPin<'static>,
    pub cs: AnyPin<'static>,
    pub dc: AnyPin<'static>,
    pub rst: AnyPin<'static>,
}

/// Initialisiert SPI-Bus und Panel (Querformat, 160x80)
///
/// # Fehlerbehandlung
/// `PanelInitError` bei ungültiger SPI-Konfiguration oder fehlgeschlagener
/// Init-Sequenz
pub fn init_panel(
    spi: SPI2<'static>,
    pins: PanelPins,
    buffer: &'static mut [u8],
) -> Result<Panel, PanelInitError> {
    let config = Config::default()
        .with_frequency(Rate::from_mhz(LCD_SPI_FREQ_MHZ))
        .with_mode(Mode::_0);

    let bus = Spi::new(spi, config)
        .map_err(|_| PanelInitError)?
        .with_sck(pins.sck)
        .with_mosi(pins.mosi);

    let cs = Output::new(pins.cs, Level::High, OutputConfig::default());
    let dc = Output::new(pins.dc, Level::Low, OutputConfig::default());
    let rst = Output::new(pins.rst, Level::High, OutputConfig::default());

    let device = ExclusiveDevice::new_no_delay(bus, cs).map_err(|_| PanelInitError)?;
    let interface = SpiInterface::new(device, dc, buffer);

    let (width, height) = LCD_NATIVE_SIZE;
    let (offset_x, offset_y) = LCD_OFFSET;

    Builder::new(ST7735s, interface)
        .display_size(width, height)
        .display_offset(offset_x, offset_y)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .invert_colors(ColorInversion::Inverted)
        .color_order(ColorOrder::Bgr)
        .reset_pin(rst)
        .init(&mut Delay::new())
        .map_err(|_| PanelInitError)
}
