mod shell;
mod trigger;

use std::env;
use std::path::Path;
use std::process;

use log::{error, info};
use pixels::wgpu::PresentMode;

use reachpoint_core::SessionError;
use reachpoint_experiment::{Session, TaskConfig};
use reachpoint_timing::HighPrecisionTimer;
use shell::Shell;
use trigger::DeviceTrigger;

fn main() {
    env_logger::init();
    match run() {
        Ok(()) => {}
        Err(SessionError::Quit) => {
            info!("session quit before completion");
            process::exit(1);
        }
        Err(SessionError::Service(error)) => {
            error!("{error:#}");
            process::exit(1);
        }
    }
}

fn run() -> Result<(), SessionError> {
    let config = TaskConfig::load(Path::new("reachpoint.json"))?;
    let present_mode = if env::args().any(|arg| arg == "-hardware") {
        PresentMode::AutoVsync
    } else {
        PresentMode::AutoNoVsync
    };

    let timer = HighPrecisionTimer::new();
    let (display, input) = Shell::create(&config, timer.clone(), present_mode)?;
    let trigger = DeviceTrigger::new(config.trigger_device.clone());

    let mut session = Session::new(display, input, trigger, timer, rand::rng(), config);
    session.run()
}
