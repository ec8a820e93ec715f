use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::{debug, warn};

use reachpoint_core::{Trigger, TriggerCode};

const SHUTTER_OPEN: u8 = 0;
const SHUTTER_CLOSE: u8 = 3;

/// Trigger port on a character device, shared by the recording channel
/// and the occlusion goggles. Without a configured device the codes
/// only reach the log, which is how development machines run.
pub struct DeviceTrigger {
    device: Option<PathBuf>,
}

impl DeviceTrigger {
    pub fn new(device: Option<PathBuf>) -> Self {
        if let Some(path) = &device {
            debug!("trigger device {}", path.display());
        }
        Self { device }
    }

    fn write_code(&mut self, code: u8) {
        let Some(path) = &self.device else {
            debug!("trigger code {code}");
            return;
        };
        let result = OpenOptions::new()
            .write(true)
            .open(path)
            .and_then(|mut port| port.write_all(&[code]));
        if let Err(error) = result {
            warn!("trigger code {code} not sent: {error}");
        }
    }
}

impl Trigger for DeviceTrigger {
    fn send(&mut self, code: TriggerCode) {
        self.write_code(code.value());
    }

    fn open_shutter(&mut self) {
        self.write_code(SHUTTER_OPEN);
    }

    fn close_shutter(&mut self) {
        self.write_code(SHUTTER_CLOSE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn codes_reach_the_device() {
        let path = std::env::temp_dir().join(format!(
            "reachpoint-trigger-{}",
            std::process::id()
        ));
        fs::write(&path, []).unwrap();

        let mut trigger = DeviceTrigger::new(Some(path.clone()));
        trigger.send(TriggerCode::TrialStart);
        assert_eq!(fs::read(&path).unwrap(), vec![2]);
        trigger.close_shutter();
        assert_eq!(fs::read(&path).unwrap(), vec![3]);
        trigger.open_shutter();
        assert_eq!(fs::read(&path).unwrap(), vec![0]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unconfigured_port_is_silent() {
        let mut trigger = DeviceTrigger::new(None);
        trigger.send(TriggerCode::CircleOn);
        trigger.open_shutter();
    }

    #[test]
    fn missing_device_does_not_abort() {
        let mut trigger = DeviceTrigger::new(Some(PathBuf::from(
            "/definitely/not/a/real/device",
        )));
        trigger.send(TriggerCode::TrialEnd);
    }
}
