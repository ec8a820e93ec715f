use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use reachpoint_core::{
    check_quit, first_key_up, key_pressed, key_released, Block, Display, Event, Group, Input, Key,
    ParticipantInfo, SessionError, Trigger, TriggerCode, TrialResult,
};
use reachpoint_data::{participant_dir, DataFile, Row};
use reachpoint_timing::Timer;

use crate::config::TaskConfig;
use crate::instructions;

/// Column names and order for the trial file.
pub const DATA_COLUMNS: [&str; 17] = [
    "id",
    "created",
    "sex",
    "age",
    "handedness",
    "block",
    "group",
    "trial_num",
    "response_time",
    "reaction_time",
    "points_x",
    "points_y",
    "location_x",
    "location_y",
    "distance_x",
    "distance_y",
    "run_time",
];

/// Repetitions of the repeated exposure blocks.
pub const EXPOSURE_REPEATS: u32 = 10;

const BREAK_TEXT: &str = "Take a break!\nTo resume, press enter.";
const FALSE_START_TEXT: &str = "Too fast!\nPress Enter to try again";

/// One full run of the reach and point task, generic over the
/// presentation, input, trigger and timing services so the whole flow
/// also runs headless under test doubles.
pub struct Session<D, I, P, T, R> {
    pub display: D,
    pub input: I,
    pub trigger: P,
    pub timer: T,
    pub rng: R,
    pub config: TaskConfig,
}

impl<D, I, P, T, R> Session<D, I, P, T, R>
where
    D: Display,
    I: Input,
    P: Trigger,
    T: Timer,
    R: Rng,
{
    pub fn new(display: D, input: I, trigger: P, timer: T, rng: R, config: TaskConfig) -> Self {
        Self {
            display,
            input,
            trigger,
            timer,
            rng,
            config,
        }
    }

    /// Runs the task end to end: intake, the block sequence for the
    /// participant's group, and the closing message.
    pub fn run(&mut self) -> Result<(), SessionError> {
        let info = self.collect_participant_info()?;
        let file = self.init_data(&info)?;
        info!("session started: id={} group={}", info.id, info.group.label());

        self.show_message(instructions::FAMILIARIZATION, true)?;
        self.run_block(Block::Familiarization, &info, &file)?;
        self.show_message(instructions::GET_STUDY_INVESTIGATOR, true)?;

        self.show_message(instructions::BASELINE, true)?;
        self.run_block(Block::Baseline, &info, &file)?;
        self.show_message(instructions::GET_STUDY_INVESTIGATOR, true)?;

        self.show_message(instructions::EXPOSURE_PP, true)?;
        if info.group.long_prism_phase() {
            self.run_repeated(Block::Pp50Exposure, &info, &file)?;
        } else {
            self.run_block(Block::PpExposure, &info, &file)?;
        }
        self.show_message(instructions::GET_STUDY_INVESTIGATOR, true)?;

        if info.group.has_imagery_phase() {
            let text = match info.group {
                Group::PpCtrl => instructions::EXPOSURE_CTRL,
                _ => instructions::EXPOSURE_MI,
            };
            self.show_message(text, true)?;
            self.run_repeated(Block::Exposure, &info, &file)?;
            self.show_message(instructions::GET_STUDY_INVESTIGATOR, true)?;
        }

        self.show_message(instructions::POST_TEST, true)?;
        self.run_block(Block::PostTest, &info, &file)?;
        self.show_message(instructions::DONE, true)?;
        info!("session complete: id={}", info.id);
        Ok(())
    }

    /// Creates the participant folder, drops a copy of the running
    /// binary next to the output, and opens the trial file.
    fn init_data(&self, info: &ParticipantInfo) -> Result<DataFile, SessionError> {
        let dir = participant_dir(&self.config.data_dir, &info.id)?;
        let path = dir.join(format!("{}reach_and_point.csv", info.id));
        let file = DataFile::create(path, &DATA_COLUMNS, &[], b',')?;
        Ok(file)
    }

    /// Runs `block` the configured number of times, with a break screen
    /// between repetitions.
    fn run_repeated(
        &mut self,
        block: Block,
        info: &ParticipantInfo,
        file: &DataFile,
    ) -> Result<(), SessionError> {
        for repeat in 0..EXPOSURE_REPEATS {
            self.run_block(block, info, file)?;
            if repeat + 1 < EXPOSURE_REPEATS {
                self.show_message(BREAK_TEXT, true)?;
            }
        }
        Ok(())
    }

    /// Runs all trials of one block invocation and writes a row per
    /// completed trial.
    pub fn run_block(
        &mut self,
        block: Block,
        info: &ParticipantInfo,
        file: &DataFile,
    ) -> Result<(), SessionError> {
        info!(
            "block {} started ({} trials)",
            block.label(),
            block.trials_per_run()
        );
        let block_start = self.timer.now();
        for trial_num in 1..=block.trials_per_run() {
            let result = self.run_trial(block, info.group)?;
            let run_time = self.timer.elapsed_ms(block_start) / 1000.0;

            let mut row = Row::new();
            row.set("id", info.id.as_str());
            row.set("created", info.created.as_str());
            row.set("sex", info.sex.as_str());
            row.set("age", info.age.as_str());
            row.set("handedness", info.handedness.as_str());
            row.set("block", block.label());
            row.set("group", info.group.label());
            row.set("trial_num", trial_num);
            row.set("response_time", result.response_time_ms);
            row.set("reaction_time", result.reaction_time_ms);
            row.set("points_x", result.touch_mm.map(|p| p.0));
            row.set("points_y", result.touch_mm.map(|p| p.1));
            row.set("location_x", result.stimulus_mm.0);
            row.set("location_y", result.stimulus_mm.1);
            row.set("distance_x", result.distance_mm.map(|d| d.0));
            row.set("distance_y", result.distance_mm.map(|d| d.1));
            row.set("run_time", run_time);
            file.write_row(&row)?;
            debug!("trial {}/{} written", trial_num, block.trials_per_run());
        }
        info!("block {} complete", block.label());
        Ok(())
    }

    /// Runs a single trial.
    ///
    /// The participant arms the trial by pressing and holding the
    /// spacebar; after a randomised foreperiod the target appears. A
    /// release during the foreperiod is a false start and re-arms the
    /// trial after an error screen. On imagery trials the release ends
    /// the trial; on reach trials the touch does, with the goggles
    /// closing at release on the occluded blocks.
    pub fn run_trial(&mut self, block: Block, group: Group) -> Result<TrialResult, SessionError> {
        self.display.clear()?;
        self.trigger.send(TriggerCode::TrialStart);
        self.trigger.open_shutter();

        loop {
            let events = self.input.poll();
            check_quit(&events)?;
            let foreperiod = self
                .rng
                .random_range(self.config.foreperiod_min_ms..=self.config.foreperiod_max_ms);
            if key_pressed(&events, Key::Space) {
                self.timer.sleep(Duration::from_millis(foreperiod));
                let events = self.input.poll();
                check_quit(&events)?;
                if key_released(&events, Key::Space) {
                    self.show_message(FALSE_START_TEXT, true)?;
                    self.input.drain();
                    continue;
                }
                break;
            }
        }

        let geometry = self.display.geometry();
        let candidates = geometry.candidates();
        let location = candidates[self.rng.random_range(0..candidates.len())];
        self.display.show_stimulus(location)?;
        self.trigger.send(TriggerCode::CircleOn);
        let onset = self.timer.now();
        let location_mm = (
            geometry.to_mm(location.0 as f64),
            geometry.to_mm(location.1 as f64),
        );

        let result = if block == Block::Exposure && group.has_imagery_phase() {
            // Imagery: the release ends the trial and nothing is scored
            // against the screen.
            let release_at = loop {
                let events = self.input.poll();
                check_quit(&events)?;
                if let Some(at) = first_key_up(&events, Key::Space) {
                    break at;
                }
            };
            TrialResult {
                response_time_ms: ms_between(onset, release_at),
                reaction_time_ms: None,
                stimulus_px: location,
                stimulus_mm: location_mm,
                touch_mm: None,
                distance_mm: None,
            }
        } else {
            // Reach: the first release stamps the reaction time and the
            // touch ends the trial. Events run strictly in arrival
            // order, so a click with no prior release leaves the
            // reaction empty.
            let mut reaction_at = None;
            let (touch_px, touch_at) = 'measure: loop {
                let events = self.input.poll();
                check_quit(&events)?;
                for event in &events {
                    match event {
                        Event::KeyUp {
                            key: Key::Space,
                            at,
                        } if reaction_at.is_none() => {
                            reaction_at = Some(*at);
                            if block.occludes_reach() {
                                self.trigger.close_shutter();
                            }
                        }
                        Event::Click { x, y, at } => break 'measure ((*x, *y), *at),
                        _ => {}
                    }
                }
            };
            let touch_mm = (
                geometry.to_mm(touch_px.0 as f64),
                geometry.to_mm(touch_px.1 as f64),
            );
            TrialResult {
                response_time_ms: ms_between(onset, touch_at),
                reaction_time_ms: reaction_at.map(|at| ms_between(onset, at)),
                stimulus_px: location,
                stimulus_mm: location_mm,
                touch_mm: Some(touch_mm),
                distance_mm: Some((touch_mm.0 - location_mm.0, touch_mm.1 - location_mm.1)),
            }
        };

        self.input.drain();
        self.display.clear()?;
        self.trigger.send(TriggerCode::TrialEnd);
        self.timer
            .sleep(Duration::from_millis(self.config.post_trial_ms));
        self.trigger.open_shutter();
        Ok(result)
    }

    /// Shows a message and waits for a keypress. With `lock_wait` only
    /// Return dismisses the screen.
    pub fn show_message(&mut self, text: &str, lock_wait: bool) -> Result<Key, SessionError> {
        self.display.clear()?;
        self.display.show_text(text)?;
        self.timer
            .sleep(Duration::from_millis(self.config.settle_ms));
        let key = loop {
            let key = self.wait_for_key()?;
            if !lock_wait || key == Key::Return {
                break key;
            }
        };
        self.display.clear()?;
        self.timer
            .sleep(Duration::from_millis(self.config.settle_ms));
        Ok(key)
    }

    fn wait_for_key(&mut self) -> Result<Key, SessionError> {
        loop {
            let events = self.input.poll();
            check_quit(&events)?;
            for event in &events {
                if let Event::KeyDown { key, .. } = event {
                    return Ok(*key);
                }
            }
        }
    }

    /// Full-screen text prompt. Return submits once at least one
    /// non-whitespace character has been typed; the answer comes back
    /// trimmed.
    pub fn get_input(&mut self, prompt: &str) -> Result<String, SessionError> {
        self.display.clear()?;
        self.timer
            .sleep(Duration::from_millis(self.config.settle_ms));

        let mut typed = String::new();
        self.display.show_text(&format!("{prompt}\n{typed}"))?;
        loop {
            let events = self.input.poll();
            check_quit(&events)?;
            let mut refresh = false;
            let mut done = false;
            for event in &events {
                match event {
                    Event::Text { text } => {
                        typed.push_str(text);
                        refresh = true;
                    }
                    Event::KeyDown {
                        key: Key::Backspace,
                        ..
                    } if !typed.is_empty() => {
                        typed.pop();
                        refresh = true;
                    }
                    Event::KeyDown {
                        key: Key::Return, ..
                    } if !typed.trim().is_empty() => {
                        done = true;
                    }
                    _ => {}
                }
            }
            if done {
                break;
            }
            if refresh {
                self.display.show_text(&format!("{prompt}\n{typed}"))?;
            }
        }
        self.display.clear()?;
        Ok(typed.trim().to_string())
    }
}

fn ms_between(start: u64, end: u64) -> f64 {
    end.saturating_sub(start) as f64 / 1_000_000.0
}
