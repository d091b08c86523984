// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task initialisiert seine Hardware und ruft dann die testbare
// Logik aus esp-core auf. Geteilt wird nur der Display-State (ein Mutex)
// und die Verbindungs-Flags.

pub mod clock;
pub mod gui;
pub mod sensor;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use clock::clock_task;
pub use gui::gui_task;
pub use sensor::sensor_task;
pub use wifi::{connection_task, net_task};
