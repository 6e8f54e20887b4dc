//! nRF52840 demo: a small radio-style settings menu on an SSD1306 panel.
//!
//! Button and encoder edges are captured by dedicated tasks; the main task
//! owns the `MenuSystem` and polls it every few milliseconds.

#![no_std]
#![no_main]

use core::cell::{Cell, RefCell};

use defmt::info;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Pin};
use embassy_nrf::{bind_interrupts, peripherals, twim};
use embassy_time::{Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use rotary_menu::board::buttons::{button_task, encoder_task};
use rotary_menu::board::{display, EmbassyClock};
use rotary_menu::{
    ActionHook, Button, ButtonLevels, ChoiceItem, Clock, Error, MenuConfig, MenuSystem, NodeId,
    NumericItem, PinConfig, StatusSnapshot, Surface, TextBuffer, TextItem, INPUT,
};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Poll period of the menu loop.
const POLL_MS: u64 = 5;

/// Logical pin numbers, matching the P0 pins handed to the tasks below.
const PINS: PinConfig = PinConfig {
    encoder_a: 3,
    encoder_b: 4,
    encoder_button: Some(24),
    confirm: 11,
    back: 12,
};

const STATIONS: [&str; 4] = ["Jazz FM", "Classic 101", "News 24", "Lo-Fi Beats"];

/// Values the menu edits in place.
struct Settings {
    volume: Cell<i32>,
    station_name: RefCell<TextBuffer>,
    bluetooth: Cell<bool>,
    rescan: Cell<bool>,
}

/// Build the menu tree and return the station list submenu.
fn build_menu<'a, D, B, C>(
    system: &mut MenuSystem<'a, D, B, C>,
    settings: &'a Settings,
    volume_saved: ActionHook<'a>,
    request_rescan: ActionHook<'a>,
) -> Result<NodeId, Error>
where
    D: Surface,
    B: ButtonLevels,
    C: Clock,
{
    let root = system.create_menu("Radio")?;
    system.set_root_menu(root)?;
    let stations = system.add_submenu(root, "Stations")?;

    let volume = NumericItem::new(&settings.volume, 0, 100)
        .step(5)
        .unit("%")
        .on_save(volume_saved);
    system.add_numeric(root, "Volume", volume)?;
    system.add_string(root, "Name", TextItem::new(&settings.station_name, 16))?;
    system.add_either_or(root, "Bluetooth", ChoiceItem::new(&settings.bluetooth))?;
    system.add_action(root, "Rescan", Some(request_rescan))?;
    system.add_info(root, "v0.1.0")?;

    Ok(stations)
}

#[embassy_executor::task(pool_size = 3)]
async fn button(pin: AnyPin, which: Button) {
    button_task(pin, which).await
}

#[embassy_executor::task]
async fn encoder(a: AnyPin, b: AnyPin) {
    encoder_task(a, b).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("rotary-menu starting");

    spawner.spawn(button(p.P0_11.degrade(), Button::Confirm)).unwrap();
    spawner.spawn(button(p.P0_12.degrade(), Button::Back)).unwrap();
    spawner.spawn(button(p.P0_24.degrade(), Button::Encoder)).unwrap();
    spawner.spawn(encoder(p.P0_03.degrade(), p.P0_04.degrade())).unwrap();

    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let surface = display::surface(i2c);

    let settings = Settings {
        volume: Cell::new(40),
        station_name: RefCell::new(TextBuffer::new()),
        bluetooth: Cell::new(false),
        rescan: Cell::new(true),
    };
    let status = StatusSnapshot::new();
    status.set_connected(true);
    status.set_address("192.168.4.1");

    let volume_saved = || info!("volume saved: {}", settings.volume.get());
    let request_rescan = || settings.rescan.set(true);

    let config = MenuConfig::default()
        .with_screen_saver_ms(60_000)
        .with_menu_timeout_ms(15_000);
    let mut system = MenuSystem::new(surface, &INPUT, EmbassyClock, &INPUT, config);

    if let Err(e) = system.begin(&PINS) {
        defmt::panic!("menu init failed: {}", e);
    }
    system.set_status_data(&status);

    let stations = match build_menu(&mut system, &settings, &volume_saved, &request_rescan) {
        Ok(stations) => stations,
        Err(e) => defmt::panic!("menu build failed: {}", e),
    };

    let mut ticker = Ticker::every(Duration::from_millis(POLL_MS));
    loop {
        if settings.rescan.replace(false) {
            if let Ok(removed) = system.clear_children(stations) {
                info!("rescan: dropped {} stations", removed);
            }
            for name in STATIONS {
                if system.add_info(stations, name).is_err() {
                    break;
                }
            }
            system.show_flash_message("Stations updated", 0);
        }

        system.update();
        ticker.next().await;
    }
}
