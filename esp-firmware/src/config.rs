// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// Task-Perioden und Timeouts der Logik liegen in esp_core::config,
// damit die Host-Tests dieselben Werte prüfen.
#![allow(dead_code)]

use embassy_time::Duration;
use esp_core::DhtKind;

// ============================================================================
// Sensor Konfiguration
// ============================================================================

/// GPIO-Pin des DHT Datenpins
pub const DHT_GPIO_PIN: u8 = 19;

/// Angeschlossener Sensor-Typ
pub const SENSOR_KIND: DhtKind = DhtKind::Dht11;

// ============================================================================
// Display Konfiguration (ST7735S, 160x80, SPI)
// ============================================================================

// SPI Pins (MOSI 23, SCK 18, CS 15, DC 5, RST 4) werden in main.rs vergeben

/// SPI Taktfrequenz in MHz
pub const LCD_SPI_FREQ_MHZ: u32 = 26;

/// Controller-RAM ist 132x162, sichtbar sind 80x160 mit Versatz
pub const LCD_NATIVE_SIZE: (u16, u16) = (80, 160);
pub const LCD_OFFSET: (u16, u16) = (26, 1);

/// Batch-Puffer für SPI-Transfers (größer = schneller, mehr RAM)
pub const LCD_SPI_BUFFER_SIZE: usize = 512;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Kurze Pause vor jedem erneuten Verbindungsversuch (kein Backoff)
pub const RECONNECT_DELAY: Duration = Duration::from_millis(200);

/// Wartezeit nach Fehlern beim Starten des Controllers
pub const START_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Poll-Intervall für Link-Status und DHCP
pub const LINK_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Heap-Größe für WiFi (Bytes)
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 32768; // 32 KB

/// Sockets für embassy-net: DNS + SNTP
pub const NET_SOCKETS: usize = 3;

// ============================================================================
// SNTP Konfiguration
// ============================================================================

/// NTP Server (wird per DNS aufgelöst)
pub const SNTP_SERVER: &str = "pool.ntp.org";

/// NTP Server Port
pub const SNTP_PORT: u16 = 123;

/// Timeout pro Anfrage (DNS und Antwort jeweils)
pub const SNTP_TIMEOUT: Duration = Duration::from_secs(2);

/// UDP Puffer-Größe (NTP Paket sind 48 Bytes)
pub const SNTP_BUFFER_SIZE: usize = 128;

/// Fester Offset zu UTC: UTC-3 (POSIX "UTC+03:00")
pub const TIMEZONE_OFFSET_SECS: i32 = -3 * 3600;

// ============================================================================
// Multicore
// ============================================================================

/// Stack des zweiten Kerns (Render Loop)
pub const APP_CORE_STACK_SIZE: usize = 8192;
