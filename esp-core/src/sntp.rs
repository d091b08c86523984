//! SNTP Paket-Codec (RFC 4330)
//!
//! Nur das Nötigste für einen Client im Unicast-Modus:
//! Request bauen, Antwort prüfen, Transmit-Timestamp in Unix-Zeit umrechnen.

/// Größe eines SNTP-Pakets ohne Extensions
pub const PACKET_LEN: usize = 48;

/// Sekunden zwischen NTP-Epoche (1900) und Unix-Epoche (1970)
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

const MODE_CLIENT: u8 = 3;
const MODE_SERVER: u8 = 4;
const MODE_BROADCAST: u8 = 5;
const VERSION: u8 = 4;
const LEAP_ALARM: u8 = 3;

/// Fehler beim Prüfen einer SNTP-Antwort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SntpError {
    /// Antwort kürzer als 48 Bytes
    TooShort,
    /// Modus ist weder Server noch Broadcast
    NotServer,
    /// Stratum 0: Server will, dass wir es woanders versuchen
    KissOfDeath,
    /// Server ist selbst nicht synchronisiert
    Unsynchronized,
}

/// Baut einen Client-Request (LI=0, VN=4, Mode=3)
pub fn build_request() -> [u8; PACKET_LEN] {
    let mut packet = [0u8; PACKET_LEN];
    packet[0] = (VERSION << 3) | MODE_CLIENT;
    packet
}

/// Prüft eine Antwort und liefert die Unix-Zeit in Sekunden
pub fn parse_response(packet: &[u8]) -> Result<u64, SntpError> {
    if packet.len() < PACKET_LEN {
        return Err(SntpError::TooShort);
    }

    let leap = packet[0] >> 6;
    let mode = packet[0] & 0x07;
    let stratum = packet[1];

    if mode != MODE_SERVER && mode != MODE_BROADCAST {
        return Err(SntpError::NotServer);
    }
    if stratum == 0 {
        return Err(SntpError::KissOfDeath);
    }
    if leap == LEAP_ALARM {
        return Err(SntpError::Unsynchronized);
    }

    // Transmit Timestamp: Bytes 40..44 = Sekunden seit 1900
    let secs = u32::from_be_bytes([packet[40], packet[41], packet[42], packet[43]]) as u64;
    secs.checked_sub(NTP_UNIX_OFFSET)
        .ok_or(SntpError::Unsynchronized)
}
