//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Pure Functions und die Task-Logik
//! (Sensor, Uhr, GUI), die auf dem Host getestet werden kann.

#![no_std]

// Muss vor allen anderen Modulen stehen (Logging-Makros)
#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod display;
pub mod framebuffer;
pub mod gui;
pub mod logic;
pub mod network;
pub mod pace;
pub mod render;
pub mod sampler;
pub mod sntp;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use clock::{SyncOutcome, WallClock, clock_logic, obtain_time};
pub use display::SharedDisplay;
pub use framebuffer::FrameBuffer;
pub use gui::Gui;
pub use logic::{format_clock, format_humidity, format_temperature, gauge_value};
pub use network::{ConnectionMachine, ConnectionState, Connectivity, WifiAction, WifiEvent};
pub use pace::{Pace, StopSignal, pause};
pub use render::render_logic;
pub use sampler::{sample_once, sensor_sampling_logic};
pub use traits::{
    DisplayError, HumiditySensor, SensorError, SyncError, TaskTimer, TickSource, TimeSync,
};
pub use types::{DhtKind, DisplayState, Reading};
