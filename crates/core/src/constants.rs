//! Constants used throughout the pgs core crate.
//!
//! Well-known source variable names, fixed identifier type tags and output file names.

/// Demographic variable carrying the patient chart (medical record) number.
pub const PATIENT_CHART_VARNAME: &str = "ITMEDREC";

/// Demographic variable carrying the patient visit/encounter number.
pub const ENCOUNTER_VARNAME: &str = "ITUNIQUE";

/// Demographic variable carrying the admission date.
pub const ADMIT_DATE_VARNAME: &str = "ITADMDAT";

/// Identifier type tag for answers taken from the `HCAHPS` section.
///
/// Fixed by the warehouse loader, unlike the configurable record id type used everywhere else.
pub const HCAHPS_ANSWER_ID_TYPE: &str = "ExternalPressGaneyId";

/// Default directory for fetched export files.
pub const DEFAULT_RAW_DATA_DIR: &str = "rawdata";

/// Default directory for written tables.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Filename for the surveys table.
pub const SURVEYS_FILENAME: &str = "surveys.csv";

/// Filename for the questions table.
pub const QUESTIONS_FILENAME: &str = "questions.csv";

/// Filename for the answers table.
pub const ANSWERS_FILENAME: &str = "answers.csv";

/// Filename for the denormalized export.
pub const ALLDATA_FILENAME: &str = "alldata.csv";
