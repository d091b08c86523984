// Build-Script: Wird vor dem Kompilieren ausgeführt
// Konfiguriert den Linker für ESP32 (Xtensa) Embedded Rust

fn main() {
    // Lade .env file für WiFi-Credentials
    // Fehler ignorieren wenn .env nicht existiert (dann müssen ENV vars gesetzt sein)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  .env file nicht gefunden: {}", e);
        eprintln!("   Setze WIFI_SSID und WIFI_PASSWORD als Environment-Variablen");
    }

    // Gebe WiFi-Credentials an Rust-Compiler weiter
    // Die Werte werden zur Compile-Zeit in den Code eingebacken
    for key in ["WIFI_SSID", "WIFI_PASSWORD"] {
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={}={}", key, value);
        }
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=.env");

    // Registriere hilfsbereiten Error-Handler für Linker-Fehler
    linker_be_nice();

    // Füge Linker-Skripte hinzu:

    // 1. defmt.x - defmt Logging-Support
    //    Definiert Symbole für defmt's binäres Log-Format
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // 2. linkall.x - ESP32 Memory-Layout
    //    WICHTIG: Muss als LETZTES kommen (sonst Probleme mit flip-link)
    //    Definiert Flash/RAM-Layout und Startup-Code
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Tipp zu einem undefinierten Symbol, passend zum Setup dieser Firmware
fn undefined_symbol_hint(symbol: &str) -> Option<&'static str> {
    match symbol {
        s if s.starts_with("_defmt_") => Some(
            "defmt-Symbole fehlen: `-Tdefmt.x` muss gelinkt sein und main.rs braucht \
             `use esp_println as _;` (esp-println mit Feature `defmt-espflash`)",
        ),
        "_stack_start" => Some("Linker-Skript `linkall.x` fehlt"),
        s if s.starts_with("esp_rtos_") => Some(
            "esp-radio findet keinen Scheduler: `esp_rtos::start()` muss in main.rs \
             vor `esp_radio::init()` laufen",
        ),
        "free" | "malloc" | "calloc" | "realloc_internal" | "malloc_internal"
        | "calloc_internal" | "free_internal" | "get_free_internal_heap_size" => Some(
            "Heap fehlt: `esp-alloc` mit Feature `compat` und `heap_allocator!` in main.rs",
        ),
        _ => None,
    }
}

// Error-Handler für Linker-Fehler
// Der Linker ruft dieses Build-Script per "--error-handling-script" erneut auf
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();

    // Aufruf durch den Linker: <script> <fehler-typ> <symbol>
    if let [_, kind, symbol, ..] = args.as_slice() {
        if kind != "undefined-symbol" {
            std::process::exit(1);
        }
        if let Some(hint) = undefined_symbol_hint(symbol) {
            eprintln!();
            eprintln!("💡 {}", hint);
            eprintln!();
        }
        std::process::exit(0);
    }

    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}
