//! Chime - Doorbell Solenoid Chime Firmware
//!
//! Host build of the doorbell firmware. Runs the Embassy std executor
//! against the simulated board: door buttons are driven from the console
//! and solenoid strikes show up in the log.
//!
//! A short press sounds ding on press and dong on release. Holding the
//! button plays a tune picked at random from the configured library.

use std::path::Path;

use embassy_executor::Spawner;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use static_cell::StaticCell;
use tracing::{info, trace};

use chime_core::selection::{seed_from_entropy, TuneSelector};
use chime_core::sequence::{pulse, ActionSequence};
use chime_timer::Timer;

mod board;
mod channels;
mod config;
mod controller;
mod logging;
mod player;
mod tasks;
mod tunes;

use crate::channels::{BUTTONS, PLAYBACK};
use crate::controller::{Doorbell, DoorbellParams};
use crate::player::Player;

// Static cells for tunes (must live forever for task references)
static TUNES: StaticCell<Vec<ActionSequence>> = StaticCell::new();
static DING: StaticCell<ActionSequence> = StaticCell::new();
static DONG: StaticCell<ActionSequence> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    logging::init();
    info!("Chime firmware starting...");

    // Load configuration (or use defaults)
    let path = config::config_path();
    let file = config::load_or_default(&path);
    let chime = file.chime;

    // Tune paths are relative to the config file
    let base = path.parent().unwrap_or(Path::new("."));
    let tunes: &'static [ActionSequence] = TUNES.init(tunes::load_all(&file.tunes, base, &chime));
    let ding: &'static ActionSequence = DING.init(pulse(chime.ding_channel, chime.pulse()));
    let dong: &'static ActionSequence = DONG.init(pulse(chime.dong_channel, chime.pulse()));
    info!(
        tunes = tunes.len(),
        ding = chime.ding_channel,
        dong = chime.dong_channel,
        "Tunes ready"
    );

    // Seed tune selection from the OS, falling back to the clock
    let seed = seed_from_entropy(&mut board::HostEntropy, board::clock_seed);
    let selector = TuneSelector::new(tunes, SmallRng::seed_from_u64(seed));

    let timer_config = config::timer_config(&chime.timer);

    // Player owns the solenoids; clears every line on creation
    let player = Player::new(
        board::solenoids(),
        Timer::with_config(timer_config),
        &PLAYBACK,
    );

    let doorbell = Doorbell::new(DoorbellParams {
        buttons: &BUTTONS,
        link: &PLAYBACK,
        selector,
        hold_timer: Timer::with_config(timer_config),
        hold: chime.hold(),
        ding,
        dong,
    });

    let poller = tasks::ButtonPoller::new(
        board::buttons(),
        chime.buttons(),
        chime.debounce_window(),
        &BUTTONS,
    );

    board::spawn_console();

    // Spawn tasks
    spawner.spawn(tasks::player_task(player)).unwrap();
    spawner.spawn(tasks::doorbell_task(doorbell)).unwrap();
    spawner
        .spawn(tasks::buttons_task(poller, chime.poll_interval()))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
