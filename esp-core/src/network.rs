//! Network Connector: Zustandsautomat und Connectivity-Flags
//!
//! Der Automat ist hardwarefrei; die Firmware übersetzt die Events von
//! `esp-radio` / `embassy-net` in [`WifiEvent`] und führt die zurückgegebene
//! [`WifiAction`] aus.
//!
//! ```text
//! Idle --StaStarted--> Connecting --GotIp--> Connected
//!                         ^                     |
//!                         +---StaDisconnected---+
//! ```
//!
//! Es gibt keinen Endzustand "Fehlgeschlagen": jeder Disconnect führt
//! zurück nach `Connecting` (unbegrenzte Wiederholungen, kein Backoff).

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
}

/// Events aus dem WLAN-Treiber bzw. DHCP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiEvent {
    StaStarted,
    StaDisconnected,
    GotIp,
}

/// Was der Treiber als Nächstes tun soll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiAction {
    None,
    /// (Erneut) mit dem Access Point verbinden
    Connect,
    /// IP erhalten; `first` nur beim allerersten Mal seit Boot
    Ready { first: bool },
}

/// Verbindungs-Flags, geteilt zwischen Network Connector und Clock Source
///
/// - `connected`: Pegel, folgt jedem Connect/Disconnect
/// - `online`: wird bei JEDEM erhaltenen IP-Lease ausgelöst (SNTP-Client)
/// - `time_sync_ready`: wird genau EINMAL ausgelöst (erstes IP-Lease)
pub struct Connectivity<M: RawMutex> {
    connected: BlockingMutex<M, Cell<bool>>,
    online: Signal<M, ()>,
    time_sync_ready: Signal<M, ()>,
}

impl<M: RawMutex> Default for Connectivity<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> Connectivity<M> {
    pub const fn new() -> Self {
        Self {
            connected: BlockingMutex::new(Cell::new(false)),
            online: Signal::new(),
            time_sync_ready: Signal::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.lock(|c| c.get())
    }

    /// Wartet bis eine IP-Adresse vorliegt
    pub async fn wait_online(&self) {
        self.online.wait().await
    }

    /// Wie `wait_online`, kehrt aber sofort zurück solange die Verbindung steht
    pub async fn wait_connected(&self) {
        if self.is_connected() {
            return;
        }
        self.online.wait().await
    }

    /// Wartet auf das einmalige Readiness-Signal (verbraucht es)
    pub async fn wait_time_sync_ready(&self) {
        self.time_sync_ready.wait().await
    }

    /// Liegt ein noch nicht verbrauchtes Readiness-Signal an?
    pub fn time_sync_pending(&self) -> bool {
        self.time_sync_ready.signaled()
    }

    fn set_connected(&self, connected: bool) {
        self.connected.lock(|c| c.set(connected));
        if connected {
            self.online.signal(());
        } else {
            self.online.reset();
        }
    }
}

/// Zustandsautomat des Network Connectors
pub struct ConnectionMachine {
    state: ConnectionState,
    leases: u32,
}

impl Default for ConnectionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionMachine {
    pub const fn new() -> Self {
        Self {
            state: ConnectionState::Idle,
            leases: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Wie oft seit Boot eine IP-Adresse erhalten wurde
    pub fn leases(&self) -> u32 {
        self.leases
    }

    /// Verarbeitet ein Event und aktualisiert die Flags
    pub fn handle<M: RawMutex>(&mut self, event: WifiEvent, flags: &Connectivity<M>) -> WifiAction {
        match (self.state, event) {
            (_, WifiEvent::StaStarted) => {
                self.state = ConnectionState::Connecting;
                WifiAction::Connect
            }
            // Disconnect vor dem Start ignorieren
            (ConnectionState::Idle, WifiEvent::StaDisconnected) => WifiAction::None,
            (_, WifiEvent::StaDisconnected) => {
                self.state = ConnectionState::Connecting;
                flags.set_connected(false);
                WifiAction::Connect
            }
            (ConnectionState::Idle, WifiEvent::GotIp) => WifiAction::None,
            (_, WifiEvent::GotIp) => {
                self.state = ConnectionState::Connected;
                let first = self.leases == 0;
                self.leases = self.leases.saturating_add(1);
                flags.set_connected(true);
                if first {
                    flags.time_sync_ready.signal(());
                }
                WifiAction::Ready { first }
            }
        }
    }
}
