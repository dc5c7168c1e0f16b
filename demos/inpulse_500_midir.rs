// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Drive a connected device with an in-memory host engine.
//!
//! Set `RUST_LOG=debug` for details.

use std::{
    sync::mpsc,
    time::{Duration, Instant},
};

use inpulse::{
    engine::MemoryEngine,
    midi::{connect_midir_ports, MidirConnections},
    Config, Controller, Engine as _, DEVICE_NAME,
};

const CLIENT_NAME: &str = "inpulse";

/// Granularity of the virtual clock
const TICK: Duration = Duration::from_millis(5);

fn main() {
    pretty_env_logger::init();
    match run() {
        Ok(()) => (),
        Err(err) => println!("Error: {err}"),
    }
}

fn run() -> anyhow::Result<()> {
    let (event_tx, event_rx) = mpsc::channel();
    let MidirConnections { input, output } = connect_midir_ports(CLIENT_NAME, event_tx)
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    let mut engine = MemoryEngine::new();
    // Two decks with slightly different tempos
    for (group, bpm) in [("[Channel1]", 128.0), ("[Channel2]", 127.5)] {
        engine.preset(group, "bpm", bpm);
        engine.preset(group, "file_bpm", bpm);
        engine.preset(group, "duration", 300.0);
    }

    let mut controller = Controller::new(engine, output, Config::default())?;
    controller.init();
    controller.pump_notifications();

    println!("{DEVICE_NAME}: running, press CTRL-C to exit...");
    let mut last_tick = Instant::now();
    loop {
        match event_rx.recv_timeout(TICK) {
            Ok(event) => {
                controller.handle_input(event);
                controller.pump_notifications();
            }
            Err(mpsc::RecvTimeoutError::Timeout) => (),
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
        let now = Instant::now();
        let elapsed = now.duration_since(last_tick);
        if elapsed >= TICK {
            last_tick = now;
            controller.advance_time(elapsed);
            let play = controller.engine().get_value("[Channel1]", "play");
            log::trace!("[Channel1] play = {play}");
        }
    }

    controller.shutdown();
    input.close();
    Ok(())
}
