// WiFi Task - Verbindet mit WLAN und hält die Verbindung
//
// Der Verbindungszustand (Idle → Connecting → Connected) steckt in
// esp_core::ConnectionMachine. Der Task speist Treiber-Events ein und führt
// die zurückgegebene WifiAction aus.
use defmt::{Debug2Format, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::{Runner, Stack};
use embassy_time::Timer;
use esp_core::{ConnectionMachine, WifiAction, WifiEvent};
use esp_radio::wifi::{
    ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent as RadioEvent,
};

use crate::ConnectivityFlags;
use crate::config::{
    LINK_POLL_INTERVAL, RECONNECT_DELAY, START_RETRY_DELAY, WIFI_PASSWORD, WIFI_SSID,
};

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung:
/// - Startet den Controller im Station-Modus
/// - Verbindet mit dem Access Point, bei Fehlern endlos erneut (kein Backoff)
/// - Meldet die erste IP-Adresse einmalig an die Clock Source
#[embassy_executor::task]
pub async fn connection_task(
    mut controller: WifiController<'static>,
    stack: Stack<'static>,
    flags: &'static ConnectivityFlags,
) {
    info!("WiFi: Starting connection task");
    let mut machine = ConnectionMachine::new();
    let mut action = WifiAction::None;

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(WIFI_SSID.into())
                    .with_password(WIFI_PASSWORD.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(START_RETRY_DELAY).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(START_RETRY_DELAY).await;
                continue;
            }

            info!("WiFi: Started successfully");
            action = machine.handle(WifiEvent::StaStarted, flags);
        }

        action = match action {
            // Controller lief schon vor dem Task-Start
            WifiAction::None => machine.handle(WifiEvent::StaStarted, flags),
            WifiAction::Connect => {
                info!("WiFi: Connecting to '{}' ({})...", WIFI_SSID, machine.state());
                connect(&mut controller, stack, &mut machine, flags).await
            }
            WifiAction::Ready { first } => {
                info!("WiFi: connected to ap SSID:{} (lease {})", WIFI_SSID, machine.leases());
                if first {
                    info!("WiFi: Network ready, releasing time sync");
                }

                controller
                    .wait_for_event(RadioEvent::StaDisconnected)
                    .await;
                warn!("WiFi: Disconnected from AP, retry to connect to the AP");
                Timer::after(RECONNECT_DELAY).await;
                machine.handle(WifiEvent::StaDisconnected, flags)
            }
        };
    }
}

/// Ein Verbindungsversuch: liefert `Ready` mit IP-Adresse, sonst wieder `Connect`
async fn connect(
    controller: &mut WifiController<'static>,
    stack: Stack<'static>,
    machine: &mut ConnectionMachine,
    flags: &'static ConnectivityFlags,
) -> WifiAction {
    if let Err(e) = controller.connect_async().await {
        warn!("WiFi: Connection failed: {}", Debug2Format(&e));
        info!("WiFi: retry to connect to the AP");
        Timer::after(RECONNECT_DELAY).await;
        return machine.handle(WifiEvent::StaDisconnected, flags);
    }

    // IP-Adresse oder Disconnect, je nachdem was zuerst kommt
    match select(
        wait_for_ip(stack),
        controller.wait_for_event(RadioEvent::StaDisconnected),
    )
    .await
    {
        Either::First(()) => machine.handle(WifiEvent::GotIp, flags),
        Either::Second(()) => {
            warn!("WiFi: Disconnected before DHCP, retry to connect to the AP");
            Timer::after(RECONNECT_DELAY).await;
            machine.handle(WifiEvent::StaDisconnected, flags)
        }
    }
}

/// Wartet bis DHCP eine IPv4-Adresse geliefert hat und loggt die Konfiguration
async fn wait_for_ip(stack: Stack<'static>) {
    loop {
        if stack.is_link_up() {
            if let Some(config) = stack.config_v4() {
                info!("WiFi: got ip:{}", Debug2Format(&config.address.address()));
                info!("  Gateway: {}", Debug2Format(&config.gateway));
                info!("  DNS:     {}", Debug2Format(&config.dns_servers));
                return;
            }
        }
        Timer::after(LINK_POLL_INTERVAL).await;
    }
}

/// Network Task
///
/// Prozessiert Netzwerk-Pakete für den embassy-net Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}
