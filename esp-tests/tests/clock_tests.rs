//! Integration Tests für die Clock Source
//!
//! SNTP wird durch ScriptedSync ersetzt, die Zeit läuft über SimulatedTicks

mod common;

use core::cell::Cell;
use core::pin::pin;

use common::{ManualTimer, ScriptedSync, SimulatedTicks, Stop};
use embassy_futures::block_on;
use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use esp_core::config::{CLOCK_PERIOD, SYNC_ATTEMPTS, SYNC_RETRY_DELAY};
use esp_core::{
    ConnectionMachine, Connectivity, DisplayState, SharedDisplay, SyncError, SyncOutcome,
    WallClock, WifiEvent, clock_logic, obtain_time,
};

/// 2023-11-14 22:13:20 UTC
const SERVER_TIME: u64 = 1_700_000_000;
/// UTC-3
const OFFSET: i32 = -3 * 3600;

fn connected() -> Connectivity<NoopRawMutex> {
    let flags = Connectivity::new();
    let mut machine = ConnectionMachine::new();
    machine.handle(WifiEvent::StaStarted, &flags);
    machine.handle(WifiEvent::GotIp, &flags);
    flags
}

// ============================================================================
// Tests: obtain_time()
// ============================================================================

#[test]
fn test_sync_on_first_attempt() {
    let ms = Cell::new(0);
    let mut clock = WallClock::new(SimulatedTicks(&ms));
    let mut sync = ScriptedSync::succeeding_after(0, SERVER_TIME);
    let mut timer = ManualTimer::unbounded();
    let stop = Stop::new();

    let outcome = block_on(obtain_time(&mut sync, &mut clock, &mut timer, &stop));

    assert_eq!(outcome, SyncOutcome::Synced(SERVER_TIME));
    assert_eq!(sync.calls, 1);
    assert!(timer.delays.is_empty());
    assert_eq!(clock.now(), SERVER_TIME);
}

#[test]
fn test_sync_after_failures() {
    let ms = Cell::new(0);
    let mut clock = WallClock::new(SimulatedTicks(&ms));
    let mut sync = ScriptedSync::succeeding_after(3, SERVER_TIME);
    let mut timer = ManualTimer::unbounded().advancing(&ms);
    let stop = Stop::new();

    let outcome = block_on(obtain_time(&mut sync, &mut clock, &mut timer, &stop));

    assert_eq!(outcome, SyncOutcome::Synced(SERVER_TIME));
    assert_eq!(sync.calls, 4);
    assert_eq!(timer.delays, vec![SYNC_RETRY_DELAY; 3]);
    assert!(clock.is_set());
}

#[test]
fn test_sync_gives_up_after_all_attempts() {
    let ms = Cell::new(0);
    let mut clock = WallClock::new(SimulatedTicks(&ms));
    let mut sync = ScriptedSync::new([Err(SyncError::Dns), Err(SyncError::Socket)]);
    let mut timer = ManualTimer::unbounded();
    let stop = Stop::new();

    let outcome = block_on(obtain_time(&mut sync, &mut clock, &mut timer, &stop));

    assert_eq!(outcome, SyncOutcome::TimedOut);
    assert_eq!(sync.calls, SYNC_ATTEMPTS as usize);
    // Keine Pause nach dem letzten Versuch
    assert_eq!(timer.delays.len(), SYNC_ATTEMPTS as usize - 1);
    assert_eq!(timer.count(SYNC_RETRY_DELAY), 9);
    assert!(!clock.is_set());
}

#[test]
fn test_implausible_server_time_is_retried() {
    let ms = Cell::new(0);
    let mut clock = WallClock::new(SimulatedTicks(&ms));
    let mut sync = ScriptedSync::new([Ok(0), Ok(1_000), Ok(SERVER_TIME)]);
    let mut timer = ManualTimer::unbounded();
    let stop = Stop::new();

    let outcome = block_on(obtain_time(&mut sync, &mut clock, &mut timer, &stop));

    assert_eq!(outcome, SyncOutcome::Synced(SERVER_TIME));
    assert_eq!(sync.calls, 3);
}

#[test]
fn test_already_set_skips_sync() {
    let ms = Cell::new(0);
    let mut clock = WallClock::new(SimulatedTicks(&ms));
    clock.set(SERVER_TIME);
    let mut sync = ScriptedSync::succeeding_after(0, SERVER_TIME + 100);
    let mut timer = ManualTimer::unbounded();
    let stop = Stop::new();

    let outcome = block_on(obtain_time(&mut sync, &mut clock, &mut timer, &stop));

    assert_eq!(outcome, SyncOutcome::AlreadySet);
    assert_eq!(sync.calls, 0);
    assert_eq!(clock.now(), SERVER_TIME);
}

#[test]
fn test_stop_cancels_retry_wait() {
    let ms = Cell::new(0);
    let mut clock = WallClock::new(SimulatedTicks(&ms));
    let mut sync = ScriptedSync::new([]);
    let stop = Stop::new();
    let mut timer = ManualTimer::stopping_after(2, &stop);

    let outcome = block_on(obtain_time(&mut sync, &mut clock, &mut timer, &stop));

    assert_eq!(outcome, SyncOutcome::Cancelled);
    assert_eq!(sync.calls, 2);
}

// ============================================================================
// Tests: clock_logic()
// ============================================================================

#[test]
fn test_waits_for_network_before_sync() {
    let flags: Connectivity<NoopRawMutex> = Connectivity::new();
    let mut machine = ConnectionMachine::new();
    machine.handle(WifiEvent::StaStarted, &flags);
    let display = SharedDisplay::new(DisplayState::new());
    let ms = Cell::new(0);
    let mut clock = WallClock::new(SimulatedTicks(&ms));
    let mut sync = ScriptedSync::succeeding_after(0, SERVER_TIME);
    let stop = Stop::new();
    let mut timer = ManualTimer::stopping_after(1, &stop);

    {
        let mut task = pin!(clock_logic(
            &flags, &mut sync, &mut clock, &display, &mut timer, &stop, OFFSET,
        ));

        // Ohne IP-Lease bleibt die Uhr beim Warten hängen
        let polled = block_on(select(task.as_mut(), core::future::ready(())));
        assert!(matches!(polled, Either::Second(())));
        assert_eq!(display.try_snapshot().unwrap().clock_label(), "HH:MM:SS");

        machine.handle(WifiEvent::GotIp, &flags);
        block_on(task);
    }

    assert_eq!(sync.calls, 1);
    assert_eq!(display.try_snapshot().unwrap().clock_label(), "19:13:20");
}

#[test]
fn test_label_ticks_every_second_after_sync() {
    let flags = connected();
    let display = SharedDisplay::new(DisplayState::new());
    let ms = Cell::new(0);
    let mut clock = WallClock::new(SimulatedTicks(&ms));
    let mut sync = ScriptedSync::succeeding_after(0, SERVER_TIME);
    let stop = Stop::new();
    let mut timer = ManualTimer::stopping_after(3, &stop).advancing(&ms);

    block_on(clock_logic(
        &flags, &mut sync, &mut clock, &display, &mut timer, &stop, OFFSET,
    ));

    assert!(!flags.time_sync_pending());
    assert_eq!(timer.delays, vec![CLOCK_PERIOD; 3]);

    // 19:13:20, 19:13:21, 19:13:22 - jedes Label eine neue Revision
    let state = display.try_snapshot().unwrap();
    assert_eq!(state.clock_label(), "19:13:22");
    assert_eq!(state.revision(), 3);
}

#[test]
fn test_label_uses_local_clock_after_timeout() {
    let flags = connected();
    let display = SharedDisplay::new(DisplayState::new());
    let ms = Cell::new(0);
    let mut clock = WallClock::new(SimulatedTicks(&ms));
    let mut sync = ScriptedSync::new([]);
    let stop = Stop::new();
    // 9 Retry-Pausen, dann die erste Sekunden-Pause
    let mut timer = ManualTimer::stopping_after(10, &stop).advancing(&ms);

    block_on(clock_logic(
        &flags, &mut sync, &mut clock, &display, &mut timer, &stop, OFFSET,
    ));

    assert_eq!(sync.calls, 10);
    assert_eq!(timer.count(SYNC_RETRY_DELAY), 9);
    assert_eq!(timer.count(CLOCK_PERIOD), 1);
    // 18 s seit Boot ab Epoche, UTC-3
    assert_eq!(display.try_snapshot().unwrap().clock_label(), "21:00:18");
}

#[test]
fn test_label_is_monotonic_across_restarts() {
    let display = SharedDisplay::new(DisplayState::new());
    let ms = Cell::new(0);
    let mut clock = WallClock::new(SimulatedTicks(&ms));
    let mut sync = ScriptedSync::succeeding_after(0, SERVER_TIME);

    let mut labels = Vec::new();
    for _ in 0..5 {
        // Jeder Lauf braucht ein frisches Readiness-Signal
        let fresh = connected();

        let stop = Stop::new();
        let mut timer = ManualTimer::stopping_after(1, &stop).advancing(&ms);
        block_on(clock_logic(
            &fresh, &mut sync, &mut clock, &display, &mut timer, &stop, OFFSET,
        ));
        labels.push(display.try_snapshot().unwrap().clock_label().to_string());
    }

    // Nur der erste Lauf fragt den Server, danach ist die Uhr gestellt
    assert_eq!(sync.calls, 1);
    assert_eq!(labels.first().map(String::as_str), Some("19:13:20"));
    assert_eq!(labels.last().map(String::as_str), Some("19:13:24"));
    assert!(labels.windows(2).all(|pair| pair[0] < pair[1]));
}
