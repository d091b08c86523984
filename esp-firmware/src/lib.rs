// Library-Root: Hardware-Anbindung der Klima-Anzeige
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

// ============================================================================
// Type-Aliase für geteilte Objekte
// ============================================================================
//
// CriticalSectionRawMutex statt NoopRawMutex: die Render Loop läuft auf dem
// zweiten Kern und greift von dort auf den Display-State zu.

/// Display-State hinter genau einem Mutex (Sensor, Uhr → Render Loop)
pub type SharedDisplayState = esp_core::SharedDisplay<CriticalSectionRawMutex>;

/// Verbindungs-Flags (WiFi Task → Clock Task)
pub type ConnectivityFlags = esp_core::Connectivity<CriticalSectionRawMutex>;

/// Stop-Signal einer Task-Loop
pub type LoopStop = esp_core::StopSignal<CriticalSectionRawMutex>;
