// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus esp-core für die echte Hardware.
// Die Logik selbst liegt in esp-core und wird auf dem Host getestet.

pub mod dht;
pub mod panel;
pub mod sntp;
pub mod timing;

pub use dht::DhtSensor;
pub use panel::{Panel, PanelInitError, PanelPins, init_panel};
pub use sntp::SntpClient;
pub use timing::{EmbassyTicks, EmbassyTimer};
