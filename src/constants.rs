// src/constants.rs

// Trial file layout.
pub const HEADER_LINE_COUNT: usize = 5;
pub const DATA_TYPE_HEADER_LINE: usize = 2; // 1-based
pub const AXIS_HEADER_LINE: usize = 5; // 1-based
pub const FIRST_DATA_LINE: usize = HEADER_LINE_COUNT + 1;
pub const TRIAL_FILE_DELIMITER: char = '\t';
pub const TRIAL_FILE_SUFFIX: &str = "_normalized.txt";

// Demographics table columns (0-based).
// subject,sex,age,height,mass,dom_limb,inv_limb,...
pub const DEM_COL_SUBJECT: usize = 0;
pub const DEM_COL_HEIGHT: usize = 3;
pub const DEM_COL_MASS: usize = 4;
pub const DEM_COL_INVOLVED_LIMB: usize = 6;

// Header field names.
pub const FIELD_FP1: &str = "FP1";
pub const FIELD_FP2: &str = "FP2";
pub const FIELD_FP3: &str = "FP3";
pub const FIELD_RIGHT_KNEE_ANGLE: &str = "RIGHTKNEEANGLE";
pub const FIELD_LEFT_KNEE_ANGLE: &str = "LEFTKNEEANGLE";
pub const FIELD_RIGHT_KNEE_MOMENT: &str = "RIGHTKNEEMOMENT";
pub const FIELD_LEFT_KNEE_MOMENT: &str = "LEFTKNEEMOMENT";

// Axis labels.
pub const AXIS_X: &str = "X";
pub const AXIS_Y: &str = "Y";
pub const AXIS_Z: &str = "Z";

// Output.
pub const MISSING_VALUE_MARKER: &str = "NA";
pub const OUTPUT_DELIMITER: u8 = b',';
pub const COMBINED_FILE_TAG: &str = "all";

pub const DEFAULT_NUM_TRIALS: usize = 5;
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".csv";

// src/constants.rs
