//! Integration Tests für den Network Connector

use embassy_futures::block_on;
use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use esp_core::{ConnectionMachine, ConnectionState, Connectivity, WifiAction, WifiEvent};

fn started() -> (ConnectionMachine, Connectivity<NoopRawMutex>) {
    let flags = Connectivity::new();
    let mut machine = ConnectionMachine::new();
    assert_eq!(machine.handle(WifiEvent::StaStarted, &flags), WifiAction::Connect);
    (machine, flags)
}

#[test]
fn test_first_lease_signals_readiness() {
    let (mut machine, flags) = started();

    assert_eq!(
        machine.handle(WifiEvent::GotIp, &flags),
        WifiAction::Ready { first: true }
    );
    assert_eq!(machine.state(), ConnectionState::Connected);
    assert!(flags.is_connected());
    assert!(flags.time_sync_pending());

    block_on(flags.wait_time_sync_ready());
    assert!(!flags.time_sync_pending());
}

#[test]
fn test_disconnect_reconnects_without_new_readiness() {
    let (mut machine, flags) = started();
    machine.handle(WifiEvent::GotIp, &flags);
    block_on(flags.wait_time_sync_ready());

    assert_eq!(
        machine.handle(WifiEvent::StaDisconnected, &flags),
        WifiAction::Connect
    );
    assert_eq!(machine.state(), ConnectionState::Connecting);
    assert!(!flags.is_connected());

    assert_eq!(
        machine.handle(WifiEvent::GotIp, &flags),
        WifiAction::Ready { first: false }
    );
    assert_eq!(machine.state(), ConnectionState::Connected);
    assert_eq!(machine.leases(), 2);
    assert!(flags.is_connected());
    assert!(!flags.time_sync_pending());
}

#[test]
fn test_online_is_signaled_on_every_lease() {
    let (mut machine, flags) = started();

    for _ in 0..3 {
        machine.handle(WifiEvent::GotIp, &flags);
        block_on(flags.wait_online());
        machine.handle(WifiEvent::StaDisconnected, &flags);
    }
    assert_eq!(machine.leases(), 3);
}

#[test]
fn test_online_cleared_after_disconnect() {
    let (mut machine, flags) = started();
    machine.handle(WifiEvent::GotIp, &flags);
    machine.handle(WifiEvent::StaDisconnected, &flags);

    // Ohne neue IP bleibt wait_online hängen
    let result = block_on(select(flags.wait_online(), core::future::ready(())));
    assert!(matches!(result, Either::Second(())));
}

#[test]
fn test_endless_retries_while_ap_is_missing() {
    let (mut machine, flags) = started();

    for _ in 0..1_000 {
        assert_eq!(
            machine.handle(WifiEvent::StaDisconnected, &flags),
            WifiAction::Connect
        );
    }
    assert_eq!(machine.state(), ConnectionState::Connecting);
    assert_eq!(machine.leases(), 0);
    assert!(!flags.time_sync_pending());
}

#[test]
fn test_wait_connected_follows_reconnect() {
    let (mut machine, flags) = started();

    // Noch keine IP: SNTP-Client muss warten
    let result = block_on(select(flags.wait_connected(), core::future::ready(())));
    assert!(matches!(result, Either::Second(())));

    machine.handle(WifiEvent::GotIp, &flags);
    block_on(flags.wait_online());
    // Signal verbraucht, Verbindung steht aber noch
    let result = block_on(select(flags.wait_connected(), core::future::ready(())));
    assert!(matches!(result, Either::First(())));

    machine.handle(WifiEvent::StaDisconnected, &flags);
    let result = block_on(select(flags.wait_connected(), core::future::ready(())));
    assert!(matches!(result, Either::Second(())));

    assert_eq!(
        machine.handle(WifiEvent::GotIp, &flags),
        WifiAction::Ready { first: false }
    );
    block_on(flags.wait_connected());
}
