// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_time::{Duration, Timer};

// ESP32 HAL
use esp_hal::clock::CpuClock;
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::rng::Rng;
use esp_hal::system::Stack as CoreStack;
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_core::DisplayState;
use esp_klima_anzeige::config::{
    APP_CORE_STACK_SIZE, EXTRA_HEAP_SIZE, NET_SOCKETS, WIFI_HEAP_SIZE,
};
use esp_klima_anzeige::hal::PanelPins;
use esp_klima_anzeige::tasks::{clock_task, connection_task, gui_task, net_task, sensor_task};
use esp_klima_anzeige::{ConnectivityFlags, SharedDisplayState};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

// Geteilte Objekte
static DISPLAY_STATE: StaticCell<SharedDisplayState> = StaticCell::new();
static CONNECTIVITY: ConnectivityFlags = ConnectivityFlags::new();

// Stack und Executor des zweiten Kerns (Render Loop)
static APP_CORE_STACK: StaticCell<CoreStack<APP_CORE_STACK_SIZE>> = StaticCell::new();
static APP_CORE_EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

/// Main Entry Point
///
/// Initialisiert Hardware, WiFi und den geteilten Display-State,
/// startet die Render Loop auf Kern 1 und spawnt die übrigen Tasks auf Kern 0.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // CPU auf maximale Taktfrequenz (240 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Display-State vor allen Tasks anlegen (Platzhalter, Gauges auf Minimum)
    let display: &'static SharedDisplayState =
        DISPLAY_STATE.init(SharedDisplayState::new(DisplayState::new()));

    // Render Loop auf Kern 1 (einziges Affinity-Pinning)
    let sw_ints = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    let spi = peripherals.SPI2;
    let pins = PanelPins {
        mosi: peripherals.GPIO23.into(),
        sck: peripherals.GPIO18.into(),
        cs: peripherals.GPIO15.into(),
        dc: peripherals.GPIO5.into(),
        rst: peripherals.GPIO4.into(),
    };
    esp_rtos::start_second_core(
        peripherals.CPU_CTRL,
        sw_ints.software_interrupt0,
        sw_ints.software_interrupt1,
        APP_CORE_STACK.init(CoreStack::new()),
        move || {
            let executor = APP_CORE_EXECUTOR.init(esp_rtos::embassy::Executor::new());
            executor.run(|spawner| {
                spawner
                    .spawn(gui_task(spi, pins, display))
                    .expect("Failed to spawn GUI task");
            });
        },
    );

    // WiFi Hardware initialisieren
    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    static RESOURCES: StaticCell<StackResources<NET_SOCKETS>> = StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // Spawn Sensor Task
    spawner
        .spawn(sensor_task(peripherals.GPIO19, display))
        .unwrap();

    // Spawn WiFi Tasks
    spawner
        .spawn(connection_task(wifi_controller, stack, &CONNECTIVITY))
        .unwrap();
    spawner.spawn(net_task(runner)).unwrap();

    // Spawn Clock Task (wartet selbst auf die erste IP-Adresse)
    spawner
        .spawn(clock_task(stack, &CONNECTIVITY, display))
        .unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
