//! Instruction screens, shown between blocks.

pub const FAMILIARIZATION: &str = "Welcome to the first block of the reach and point task!

Your task is to reach and point to the red dot as quickly and accurately as possible.

First you will press and hold the space bar with your dominant index finger.

When you see the red dot target appear, quickly release the space bar and point to the target.

Once complete, return your dominant index finger to the space bar.

Press the spacebar again to initiate the next trial.

When you are ready to begin, please press the enter key.";

pub const GET_STUDY_INVESTIGATOR: &str = "Block complete!

Please let the study investigator know that you have completed the block.

They will provide you with the next step of instructions.";

pub const BASELINE: &str = "Your next task is the baseline block.

You will press and hold the spacebar to initiate each trial as before.

When you see the red dot appear, reach and point to it as quickly and accurately as possible

This time, your vision will be blocked during the movement trajectory

When you are ready to begin, please press the enter key.";

pub const EXPOSURE_PP: &str = "Your next task is the exposure block.

You will press and hold the spacebar to initiate as before.

When you see the red dot appear, reach and point to it as quickly and accurately as possible

When you are ready to begin, please press the enter key.";

pub const EXPOSURE_CTRL: &str = "Your next task is the exposure block.

You will press and hold the spacebar.

When you see the red dot appear,
imagine drawing a line between the center of the target and your index finger.

KEEP THE SPACEBAR PRESSED until you have completed imagining drawing the line.

When you are ready to begin, please press the enter key.";

pub const EXPOSURE_MI: &str = "Your next task is the exposure block.

You will press and hold the spacebar.

When you see the red dot appear,
vividly imagine yourself reaching and pointing to the center of the target.

KEEP THE SPACEBAR PRESSED until you have completed the imagined the reach and point

When you are ready to begin, please press the enter key.";

pub const POST_TEST: &str = "Your next task is the final block.

You will press and hold the spacebar.

When you see the red dot appear, reach and point to it as quickly and accurately as possible

This time, your vision will be blocked during the movement trajectory

When you are ready to begin, please press the enter key.";

pub const DONE: &str = "You are done!

The experiment is now complete.

Please let the study investigator know you are done.";
