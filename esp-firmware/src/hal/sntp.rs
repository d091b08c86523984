// SNTP Client über embassy-net (UDP)
//
// Paketformat und Prüfungen kommen aus esp_core::sntp, hier passiert nur
// DNS-Auflösung und der UDP-Austausch. Ohne IP-Lease wird nicht gesendet.

use defmt::{Debug2Format, debug, warn};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpEndpoint, Stack};
use embassy_time::with_timeout;

use esp_core::sntp::{build_request, parse_response};
use esp_core::{SyncError, TimeSync};

use crate::ConnectivityFlags;
use crate::config::{SNTP_BUFFER_SIZE, SNTP_PORT, SNTP_SERVER, SNTP_TIMEOUT};

pub struct SntpClient {
    stack: Stack<'static>,
    flags: &'static ConnectivityFlags,
}

impl SntpClient {
    pub fn new(stack: Stack<'static>, flags: &'static ConnectivityFlags) -> Self {
        Self { stack, flags }
    }
}

impl TimeSync for SntpClient {
    async fn fetch_unix_time(&mut self) -> Result<u64, SyncError> {
        // Nach einem Disconnect erst auf das nächste Lease warten
        with_timeout(SNTP_TIMEOUT, self.flags.wait_connected())
            .await
            .map_err(|_| SyncError::Offline)?;

        let addrs = with_timeout(
            SNTP_TIMEOUT,
            self.stack.dns_query(SNTP_SERVER, DnsQueryType::A),
        )
        .await
        .map_err(|_| SyncError::Timeout)?
        .map_err(|_| SyncError::Dns)?;
        let addr = *addrs.first().ok_or(SyncError::Dns)?;
        debug!("SNTP: {} resolved to {}", SNTP_SERVER, Debug2Format(&addr));

        let mut rx_meta = [PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0u8; SNTP_BUFFER_SIZE];
        let mut tx_meta = [PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0u8; SNTP_BUFFER_SIZE];

        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );

        // Beliebiger lokaler Port
        socket.bind(0).map_err(|_| SyncError::Socket)?;

        let server = IpEndpoint::new(addr, SNTP_PORT);
        socket
            .send_to(&build_request(), server)
            .await
            .map_err(|_| SyncError::Socket)?;

        let mut packet = [0u8; SNTP_BUFFER_SIZE];
        let (len, _) = with_timeout(SNTP_TIMEOUT, socket.recv_from(&mut packet))
            .await
            .map_err(|_| SyncError::Timeout)?
            .map_err(|_| SyncError::Socket)?;

        parse_response(&packet[..len]).map_err(|e| {
            warn!("SNTP: Invalid response: {}", e);
            SyncError::from(e)
        })
    }
}
