//! RAM-Framebuffer mit Dirty-Rect
//!
//! Die GUI zeichnet in diesen Puffer statt direkt auf das SPI-Display.
//! `flush()` überträgt danach nur das Rechteck mit geänderten Pixeln.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::gui::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

const WIDTH: usize = DISPLAY_WIDTH as usize;
const HEIGHT: usize = DISPLAY_HEIGHT as usize;
const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// Bounding Box der seit dem letzten Flush geänderten Pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    const fn full() -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: WIDTH - 1,
            max_y: HEIGHT - 1,
        }
    }
}

/// Puffer-Koordinaten eines Punkts, `None` außerhalb des Displays
fn coords(point: Point) -> Option<(usize, usize)> {
    let x = usize::try_from(point.x).ok()?;
    let y = usize::try_from(point.y).ok()?;
    (x < WIDTH && y < HEIGHT).then_some((x, y))
}

/// Framebuffer in voller Display-Größe (160 x 80 x 2 Bytes = 25 KB)
///
/// `new()` ist `const`, damit die Firmware den Puffer in einer
/// `ConstStaticCell` ablegen kann statt ihn über den Stack zu kopieren.
pub struct FrameBuffer {
    pixels: [Rgb565; PIXEL_COUNT],
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Weißer Puffer; komplett als geändert markiert, damit der erste
    /// Flush das Panel vollständig überschreibt
    pub const fn new() -> Self {
        Self {
            pixels: [Rgb565::WHITE; PIXEL_COUNT],
            dirty: Some(DirtyRect::full()),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        coords(point).map(|(x, y)| self.pixels[y * WIDTH + x])
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * WIDTH + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Überträgt das Dirty-Rect auf das Panel (Flush-Callback)
    ///
    /// Ohne Änderungen ist das ein No-op. Schlägt der Transfer fehl, bleibt
    /// der Bereich dirty.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let width = rect.max_x - rect.min_x + 1;
        let height = rect.max_y - rect.min_y + 1;

        debug!(
            "GUI: Flushing {}x{} at ({}, {})",
            width,
            height,
            rect.min_x,
            rect.min_y
        );

        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32),
            Size::new(width as u32, height as u32),
        );

        let pixels = &self.pixels;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * WIDTH + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        let result = display.fill_contiguous(&area, pixel_iter);
        if result.is_err() {
            self.dirty = Some(rect);
        }
        result
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some((x, y)) = coords(coord) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_fully_dirty() {
        let fb = FrameBuffer::new();
        assert_eq!(fb.dirty, Some(DirtyRect::full()));
    }

    #[test]
    fn test_same_color_does_not_dirty() {
        let mut fb = FrameBuffer::new();
        fb.dirty = None;
        Pixel(Point::new(3, 3), Rgb565::WHITE).draw(&mut fb).unwrap();
        assert!(!fb.is_dirty());
    }

    #[test]
    fn test_dirty_rect_expands() {
        let mut fb = FrameBuffer::new();
        fb.dirty = None;
        Pixel(Point::new(10, 5), Rgb565::BLACK).draw(&mut fb).unwrap();
        Pixel(Point::new(2, 20), Rgb565::BLACK).draw(&mut fb).unwrap();
        assert_eq!(
            fb.dirty,
            Some(DirtyRect {
                min_x: 2,
                min_y: 5,
                max_x: 10,
                max_y: 20
            })
        );
        assert_eq!(fb.pixel(Point::new(10, 5)), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut fb = FrameBuffer::new();
        fb.dirty = None;
        Pixel(Point::new(-1, 0), Rgb565::BLACK).draw(&mut fb).unwrap();
        Pixel(Point::new(0, 80), Rgb565::BLACK).draw(&mut fb).unwrap();
        assert!(!fb.is_dirty());
        assert_eq!(fb.pixel(Point::new(160, 0)), None);
    }
}
