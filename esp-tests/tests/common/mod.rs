//! Gemeinsame Mocks für die Host-Tests
#![allow(dead_code)]

use core::cell::Cell;
use core::future::Future;
use std::collections::VecDeque;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Duration;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use esp_core::{
    DhtKind, HumiditySensor, Reading, SensorError, StopSignal, SyncError, TaskTimer, TickSource,
    TimeSync,
};

pub type Stop = StopSignal<NoopRawMutex>;

// ============================================================================
// Mock Sensor
// ============================================================================

/// Liefert der Reihe nach die hinterlegten Ergebnisse, danach `Timeout`
#[derive(Default)]
pub struct MockSensor {
    pub results: VecDeque<Result<Reading, SensorError>>,
    pub read_count: usize,
}

impl MockSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_readings(results: impl IntoIterator<Item = Result<Reading, SensorError>>) -> Self {
        Self {
            results: results.into_iter().collect(),
            read_count: 0,
        }
    }
}

impl HumiditySensor for MockSensor {
    fn kind(&self) -> DhtKind {
        DhtKind::Dht11
    }

    async fn read(&mut self) -> Result<Reading, SensorError> {
        self.read_count += 1;
        self.results.pop_front().unwrap_or(Err(SensorError::Timeout))
    }
}

pub fn reading(temperature: f32, humidity: f32) -> Result<Reading, SensorError> {
    Ok(Reading {
        temperature,
        humidity,
    })
}

// ============================================================================
// Simulierte Uhr
// ============================================================================

/// Millisekunden-Zähler, den Tests und `ManualTimer` gemeinsam vorstellen
#[derive(Clone, Copy)]
pub struct SimulatedTicks<'a>(pub &'a Cell<u64>);

impl TickSource for SimulatedTicks<'_> {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

// ============================================================================
// Manueller Timer
// ============================================================================

/// Timer ohne echte Wartezeit
///
/// Zeichnet jede Pause auf und stellt optional die simulierte Uhr vor.
/// Nach `budget` Pausen wird das Stop-Signal ausgelöst, die Loop endet
/// dann beim nächsten Poll.
pub struct ManualTimer<'a> {
    pub delays: Vec<Duration>,
    pub fail_locks: bool,
    budget: usize,
    stop: Option<&'a Stop>,
    ticks: Option<&'a Cell<u64>>,
}

impl<'a> ManualTimer<'a> {
    /// Timer der nie stoppt
    pub fn unbounded() -> Self {
        Self {
            delays: Vec::new(),
            fail_locks: false,
            budget: usize::MAX,
            stop: None,
            ticks: None,
        }
    }

    /// Timer der nach `budget` Pausen `stop` auslöst
    pub fn stopping_after(budget: usize, stop: &'a Stop) -> Self {
        Self {
            budget,
            stop: Some(stop),
            ..Self::unbounded()
        }
    }

    pub fn advancing(mut self, ticks: &'a Cell<u64>) -> Self {
        self.ticks = Some(ticks);
        self
    }

    pub fn count(&self, period: Duration) -> usize {
        self.delays.iter().filter(|d| **d == period).count()
    }
}

impl TaskTimer for ManualTimer<'_> {
    async fn delay(&mut self, duration: Duration) {
        self.delays.push(duration);
        if let Some(ticks) = self.ticks {
            ticks.set(ticks.get() + duration.as_millis());
        }

        if self.delays.len() >= self.budget {
            if let Some(stop) = self.stop {
                stop.signal(());
            }
            core::future::pending::<()>().await;
        }
    }

    async fn within<F: Future>(&mut self, _limit: Duration, fut: F) -> Option<F::Output> {
        if self.fail_locks {
            return None;
        }
        Some(fut.await)
    }
}

// ============================================================================
// Mock SNTP
// ============================================================================

/// Liefert der Reihe nach die hinterlegten Antworten, danach `Timeout`
#[derive(Default)]
pub struct ScriptedSync {
    pub answers: VecDeque<Result<u64, SyncError>>,
    pub calls: usize,
}

impl ScriptedSync {
    pub fn new(answers: impl IntoIterator<Item = Result<u64, SyncError>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            calls: 0,
        }
    }

    /// `failures` Fehlversuche, danach `unix`
    pub fn succeeding_after(failures: usize, unix: u64) -> Self {
        let mut answers: Vec<_> = (0..failures).map(|_| Err(SyncError::Timeout)).collect();
        answers.push(Ok(unix));
        Self::new(answers)
    }
}

impl TimeSync for ScriptedSync {
    async fn fetch_unix_time(&mut self) -> Result<u64, SyncError> {
        self.calls += 1;
        self.answers.pop_front().unwrap_or(Err(SyncError::Timeout))
    }
}

// ============================================================================
// Aufzeichnendes Panel
// ============================================================================

/// 160x80 Panel, merkt sich jeden Bereichs-Transfer
pub struct RecordingPanel {
    pub transfers: Vec<Rectangle>,
    pub pixels_written: usize,
    pub fail_next: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PanelFault;

impl RecordingPanel {
    pub fn new() -> Self {
        Self {
            transfers: Vec::new(),
            pixels_written: 0,
            fail_next: false,
        }
    }
}

impl OriginDimensions for RecordingPanel {
    fn size(&self) -> Size {
        Size::new(160, 80)
    }
}

impl DrawTarget for RecordingPanel {
    type Color = Rgb565;
    type Error = PanelFault;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.pixels_written += pixels.into_iter().count();
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        if self.fail_next {
            self.fail_next = false;
            return Err(PanelFault);
        }
        self.transfers.push(*area);
        self.pixels_written += colors.into_iter().count();
        Ok(())
    }
}
