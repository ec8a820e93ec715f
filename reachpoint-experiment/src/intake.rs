use chrono::Local;
use log::info;
use rand::Rng;

use reachpoint_core::{Display, Group, Input, ParticipantInfo, SessionError, Trigger};
use reachpoint_data::existing_ids;
use reachpoint_timing::Timer;

use crate::session::Session;

impl<D, I, P, T, R> Session<D, I, P, T, R>
where
    D: Display,
    I: Input,
    P: Trigger,
    T: Timer,
    R: Rng,
{
    /// Collects and validates participant information. Each prompt
    /// loops until it gets a usable answer; the reserved id skips the
    /// demographics and runs the demo flow.
    pub fn collect_participant_info(&mut self) -> Result<ParticipantInfo, SessionError> {
        let created = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let id = loop {
            let id = self.get_input("ID ('test' to demo): ")?.to_uppercase();
            if !is_demo_id(&id) {
                let taken = existing_ids(&self.config.data_dir)?;
                if taken.iter().any(|existing| existing == &id) {
                    self.show_message(
                        "This file already exists\nPlease input new participant code\nPress Enter to continue",
                        true,
                    )?;
                    continue;
                }
            }
            break id;
        };

        let info = if is_demo_id(&id) {
            info!("demo session requested");
            ParticipantInfo {
                id,
                created,
                sex: "test".to_string(),
                age: "test".to_string(),
                handedness: "r".to_string(),
                group: Group::Demo,
            }
        } else {
            let sex = loop {
                let sex = self.get_input("Sex (m or f): ")?.to_lowercase();
                if sex == "m" || sex == "f" {
                    break sex;
                }
                self.show_message("Error\nPlease input m or f\nPress Enter to continue", true)?;
            };

            let age = loop {
                let age = self.get_input("Age (2-digit): ")?;
                match age.parse::<u32>() {
                    Ok(years) if (18..=99).contains(&years) => break years.to_string(),
                    _ => {
                        self.show_message(
                            "Error!\nPlease input a number between 18 and 99\nPress Enter to continue",
                            true,
                        )?;
                    }
                }
            };

            let handedness = loop {
                let handedness = self.get_input("Handedness (r or l): ")?.to_lowercase();
                if handedness == "r" || handedness == "l" {
                    break handedness;
                }
                self.show_message("Error!\nPlease input r or l\nPress Enter to continue", true)?;
            };

            let group = loop {
                let group = self.get_input("Group (PP50, PP-MI, PP-CTRL, PP-None): ")?;
                if let Some(group) = Group::parse(&group) {
                    break group;
                }
                self.show_message(
                    "Error!\nPlease input PP50, PP-MI, PP-CTRL, PP-None\nPress Enter to continue",
                    true,
                )?;
            };

            ParticipantInfo {
                id,
                created,
                sex,
                age,
                handedness,
                group,
            }
        };
        Ok(info)
    }
}

fn is_demo_id(id: &str) -> bool {
    id.eq_ignore_ascii_case("test")
}
