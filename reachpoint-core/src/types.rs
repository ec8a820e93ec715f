use serde::{Deserialize, Serialize};

/// Experimental group assignment, fixed at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Group {
    /// Physical practice with the long prism-pointing phase.
    Pp50,
    /// Physical practice followed by motor imagery exposure.
    PpMi,
    /// Physical practice followed by control imagery exposure.
    PpCtrl,
    /// Physical practice only, no main exposure phase.
    PpNone,
    /// Reserved id "test": runs the Pp50 path with demographics skipped.
    Demo,
}

impl Group {
    /// Parses the label typed at the group prompt. The demo group is
    /// never typed here; it is selected through the reserved id.
    pub fn parse(label: &str) -> Option<Self> {
        Some(match label {
            "PP50" => Group::Pp50,
            "PP-MI" => Group::PpMi,
            "PP-CTRL" => Group::PpCtrl,
            "PP-None" => Group::PpNone,
            _ => return None,
        })
    }

    /// Label written to the group column of the output file.
    pub fn label(&self) -> &'static str {
        match self {
            Group::Pp50 => "PP50",
            Group::PpMi => "PP-MI",
            Group::PpCtrl => "PP-CTRL",
            Group::PpNone => "PP-None",
            Group::Demo => "test",
        }
    }

    /// Whether the prism-pointing phase is the repeated 25-trial block
    /// rather than the single 20-trial block.
    pub fn long_prism_phase(&self) -> bool {
        matches!(self, Group::Pp50 | Group::Demo)
    }

    /// Whether an imagery exposure phase follows prism pointing.
    pub fn has_imagery_phase(&self) -> bool {
        matches!(self, Group::PpMi | Group::PpCtrl)
    }
}

/// Session block, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Familiarization,
    Baseline,
    PpExposure,
    Pp50Exposure,
    Exposure,
    PostTest,
}

impl Block {
    /// Trials for a single invocation of the block. The repeated
    /// exposure blocks run ten invocations per session.
    pub fn trials_per_run(&self) -> u32 {
        match self {
            Block::Familiarization => 40,
            Block::Baseline => 10,
            Block::PpExposure => 20,
            Block::Pp50Exposure => 25,
            Block::Exposure => 23,
            Block::PostTest => 10,
        }
    }

    /// Label written to the block column of the output file.
    pub fn label(&self) -> &'static str {
        match self {
            Block::Familiarization => "Familiarization",
            Block::Baseline => "Baseline",
            Block::PpExposure => "PPExposure",
            Block::Pp50Exposure => "PP50Exposure",
            Block::Exposure => "Exposure",
            Block::PostTest => "PostTest",
        }
    }

    /// Blocks where the occlusion goggles close on spacebar release so
    /// the movement trajectory is performed without vision.
    pub fn occludes_reach(&self) -> bool {
        matches!(self, Block::Baseline | Block::PostTest)
    }
}

/// Demographics collected at intake, immutable for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub id: String,
    pub created: String,
    pub sex: String,
    pub age: String,
    pub handedness: String,
    pub group: Group,
}

/// Measurements from one completed trial. Fields that do not apply to
/// the trial kind stay `None` and are written as the nan sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Stimulus onset to the touch, or to the spacebar release on
    /// imagery trials, in milliseconds.
    pub response_time_ms: f64,
    /// Stimulus onset to the first spacebar release, in milliseconds.
    pub reaction_time_ms: Option<f64>,
    /// Stimulus centre in screen pixels.
    pub stimulus_px: (f32, f32),
    /// Stimulus centre in millimetres from the screen origin.
    pub stimulus_mm: (f64, f64),
    /// Touch point in millimetres from the screen origin.
    pub touch_mm: Option<(f64, f64)>,
    /// Signed touch error per axis, touch minus stimulus.
    pub distance_mm: Option<(f64, f64)>,
}
