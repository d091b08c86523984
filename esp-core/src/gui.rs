//! GUI: statisches Widget-Layout und Refresh-Logik
//!
//! Layout (160 x 80):
//!
//! ```text
//! +--------------------------------------------+
//! |                                  HH:MM:SS  |
//! | Temperature[°C]              Humidity[%]   |
//! |    .-----.                     .-----.     |
//! |   / 23.45°C\                 / 60.10% \    |
//! |   '        '                 '        '    |
//! +--------------------------------------------+
//! ```

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::mono_font::iso_8859_1::{FONT_4X6, FONT_5X8};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::config::{DEGREE_CELSIUS, GUI_REFRESH_PERIOD_MS, HUMIDITY_RANGE, TEMPERATURE_RANGE};
use crate::traits::TickSource;
use crate::types::DisplayState;

pub const DISPLAY_WIDTH: u32 = 160;
pub const DISPLAY_HEIGHT: u32 = 80;

/// Linienbreite der Gauges
pub const ARC_WIDTH: u32 = 5;

const ARC_DIAMETER: u32 = 50;
/// Bogen beginnt unten links und endet unten rechts (270°)
const ARC_START_DEG: f32 = 135.0;
const ARC_SWEEP_DEG: f32 = 270.0;

pub const BACKGROUND: Rgb565 = Rgb565::WHITE;
pub const TEXT_COLOR: Rgb565 = Rgb565::BLACK;
pub const ARC_TRACK_COLOR: Rgb565 = Rgb565::new(28, 57, 28);
/// #a9b7be
pub const ARC_INDICATOR_COLOR: Rgb565 = Rgb565::new(0xa9 >> 3, 0xb7 >> 2, 0xbe >> 3);

/// Bogenförmige Anzeige mit festem Wertebereich
#[derive(Debug, Clone, Copy)]
pub struct Gauge {
    center: Point,
    range: (i16, i16),
}

impl Gauge {
    pub const fn new(center: Point, range: (i16, i16)) -> Self {
        Self { center, range }
    }

    /// Bereich inklusive Linienbreite
    pub fn area(&self) -> Rectangle {
        let side = ARC_DIAMETER + ARC_WIDTH + 2;
        Rectangle::with_center(self.center, Size::new(side, side))
    }

    /// Winkel des Indikators in Grad für `value`
    pub fn indicator_sweep(&self, value: i16) -> f32 {
        let (min, max) = self.range;
        if max <= min {
            return 0.0;
        }
        let clamped = value.clamp(min, max);
        ARC_SWEEP_DEG * (clamped - min) as f32 / (max - min) as f32
    }

    pub fn draw<D>(&self, value: i16, label: &str, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        Arc::with_center(
            self.center,
            ARC_DIAMETER,
            ARC_START_DEG.deg(),
            ARC_SWEEP_DEG.deg(),
        )
        .into_styled(PrimitiveStyle::with_stroke(ARC_TRACK_COLOR, ARC_WIDTH))
        .draw(target)?;

        let sweep = self.indicator_sweep(value);
        if sweep > 0.0 {
            Arc::with_center(self.center, ARC_DIAMETER, ARC_START_DEG.deg(), sweep.deg())
                .into_styled(PrimitiveStyle::with_stroke(ARC_INDICATOR_COLOR, ARC_WIDTH))
                .draw(target)?;
        }

        draw_text(label, self.center, Alignment::Center, Baseline::Middle, &FONT_5X8, target)
    }
}

fn draw_text<D>(
    text: &str,
    position: Point,
    alignment: Alignment,
    baseline: Baseline,
    font: &'static MonoFont<'static>,
    target: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(font, TEXT_COLOR);
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(baseline)
        .build();
    Text::with_text_style(text, position, style, text_style).draw(target)?;
    Ok(())
}

/// Bereich des Uhr-Labels oben rechts
const CLOCK_AREA: Rectangle = Rectangle::new(
    Point::new(DISPLAY_WIDTH as i32 - 52, 0),
    Size::new(52, 10),
);

/// Grafik-Subsystem: zeichnet den zuletzt übergebenen State
///
/// Die Zeitbasis kommt über eine injizierte [`TickSource`], damit Tests
/// die Refresh-Periode mit einer simulierten Uhr prüfen können. Nach dem
/// ersten vollständigen Bild werden nur geänderte Widgets neu gezeichnet.
pub struct Gui<K: TickSource> {
    ticks: K,
    temperature: Gauge,
    humidity: Gauge,
    pending: Option<DisplayState>,
    drawn: Option<DisplayState>,
    seen_revision: Option<u32>,
    last_refresh_ms: Option<u64>,
}

impl<K: TickSource> Gui<K> {
    pub fn new(ticks: K) -> Self {
        let mid_y = (DISPLAY_HEIGHT - ARC_DIAMETER / 2) as i32 - 5;
        Self {
            ticks,
            temperature: Gauge::new(Point::new(40, mid_y), TEMPERATURE_RANGE),
            humidity: Gauge::new(Point::new(120, mid_y), HUMIDITY_RANGE),
            pending: None,
            drawn: None,
            seen_revision: None,
            last_refresh_ms: None,
        }
    }

    /// Revision des zuletzt übernommenen States
    pub fn seen_revision(&self) -> Option<u32> {
        self.seen_revision
    }

    /// Übernimmt einen neuen State; gezeichnet wird im nächsten `process()`
    pub fn submit(&mut self, state: DisplayState) {
        self.seen_revision = Some(state.revision());
        self.pending = Some(state);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Verarbeitet anstehende Arbeit ("Task Handler")
    ///
    /// Zeichnet höchstens einmal pro `GUI_REFRESH_PERIOD_MS`. Gibt `true`
    /// zurück wenn neu gezeichnet wurde.
    pub fn process<D>(&mut self, target: &mut D) -> Result<bool, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let now = self.ticks.now_ms();
        if let Some(last) = self.last_refresh_ms {
            if now.saturating_sub(last) < GUI_REFRESH_PERIOD_MS {
                return Ok(false);
            }
        }

        let Some(state) = self.pending.take() else {
            return Ok(false);
        };

        match self.drawn.take() {
            Some(previous) => self.draw_changes(&previous, &state, target)?,
            None => self.draw(&state, target)?,
        }
        self.drawn = Some(state);
        self.last_refresh_ms = Some(now);
        Ok(true)
    }

    /// Vollständiges Bild: Hintergrund, Überschriften und alle Widgets
    pub fn draw<D>(&self, state: &DisplayState, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.clear(BACKGROUND)?;

        let mut header: heapless::String<24> = heapless::String::new();
        let _ = header.push_str("Temperature[");
        let _ = header.push_str(DEGREE_CELSIUS);
        let _ = header.push(']');

        draw_text(
            &header,
            Point::new(2, 12),
            Alignment::Left,
            Baseline::Top,
            &FONT_4X6,
            target,
        )?;
        draw_text(
            "Humidity[%]",
            Point::new(DISPLAY_WIDTH as i32 - 2, 12),
            Alignment::Right,
            Baseline::Top,
            &FONT_4X6,
            target,
        )?;

        self.draw_clock(state, target)?;
        self.temperature
            .draw(state.temp_value(), state.temp_label(), target)?;
        self.humidity
            .draw(state.humidity_value(), state.humidity_label(), target)
    }

    fn draw_changes<D>(
        &self,
        previous: &DisplayState,
        state: &DisplayState,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if previous.clock_label() != state.clock_label() {
            target.fill_solid(&CLOCK_AREA, BACKGROUND)?;
            self.draw_clock(state, target)?;
        }

        if previous.temp_value() != state.temp_value()
            || previous.temp_label() != state.temp_label()
        {
            target.fill_solid(&self.temperature.area(), BACKGROUND)?;
            self.temperature
                .draw(state.temp_value(), state.temp_label(), target)?;
        }

        if previous.humidity_value() != state.humidity_value()
            || previous.humidity_label() != state.humidity_label()
        {
            target.fill_solid(&self.humidity.area(), BACKGROUND)?;
            self.humidity
                .draw(state.humidity_value(), state.humidity_label(), target)?;
        }

        Ok(())
    }

    fn draw_clock<D>(&self, state: &DisplayState, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_text(
            state.clock_label(),
            Point::new(DISPLAY_WIDTH as i32 - 2, 1),
            Alignment::Right,
            Baseline::Top,
            &FONT_5X8,
            target,
        )
    }
}
