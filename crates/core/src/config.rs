//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the pipeline as an
//! `Arc<CoreConfig>`. Nothing in the transformation reads environment variables or files on
//! its own.

use crate::{SurveyError, SurveyResult};
use pgs_types::NonEmptyText;
use serde::Deserialize;
use std::str::FromStr;

/// How a structured `ANALYSIS` value of zero is recorded in `ResponseNumeric`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumericPolicy {
    /// `"0"` leaves `ResponseNumeric` unset. This is what the warehouse tables have always
    /// contained.
    #[default]
    ZeroIsUnset,
    /// `"0"` is recorded as numeric zero.
    KeepZero,
}

impl NumericPolicy {
    /// Parse a response value into its numeric form under this policy.
    ///
    /// Surrounding whitespace is ignored. Anything that is not an integer is unset.
    pub fn numeric_value(self, value: &str) -> Option<i64> {
        let parsed = value.trim().parse::<i64>().ok()?;
        match (self, parsed) {
            (NumericPolicy::ZeroIsUnset, 0) => None,
            (_, n) => Some(n),
        }
    }
}

impl FromStr for NumericPolicy {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero-is-unset" | "zero_is_unset" => Ok(NumericPolicy::ZeroIsUnset),
            "keep-zero" | "keep_zero" => Ok(NumericPolicy::KeepZero),
            other => Err(SurveyError::Config(format!(
                "unknown numeric policy '{other}' (expected 'zero-is-unset' or 'keep-zero')"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    client_id: NonEmptyText,
    patient_id_type: NonEmptyText,
    encounter_id_type: NonEmptyText,
    record_id_type: NonEmptyText,
    numeric_policy: NumericPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with the default numeric policy.
    pub fn new(
        client_id: NonEmptyText,
        patient_id_type: NonEmptyText,
        encounter_id_type: NonEmptyText,
        record_id_type: NonEmptyText,
    ) -> Self {
        Self {
            client_id,
            patient_id_type,
            encounter_id_type,
            record_id_type,
            numeric_policy: NumericPolicy::default(),
        }
    }

    /// Create a `CoreConfig` from raw strings, rejecting blank values.
    pub fn from_values(
        client_id: &str,
        patient_id_type: &str,
        encounter_id_type: &str,
        record_id_type: &str,
    ) -> SurveyResult<Self> {
        Ok(Self::new(
            required("client_id", client_id)?,
            required("patient_id_type", patient_id_type)?,
            required("encounter_id_type", encounter_id_type)?,
            required("record_id_type", record_id_type)?,
        ))
    }

    /// Parse a YAML run configuration.
    ///
    /// ```yaml
    /// client_id: "4242"
    /// ehr_patient_id_type: EhrMrn
    /// ehr_encounter_id_type: EhrCsn
    /// press_ganey_record_id_type: PressGaneyId
    /// numeric_policy: zero-is-unset   # optional
    /// ```
    pub fn from_yaml_str(yaml_text: &str) -> SurveyResult<Self> {
        let file: RunConfigFile =
            serde_yaml::from_str(yaml_text).map_err(SurveyError::YamlDeserialization)?;

        let cfg = Self::from_values(
            &file.client_id,
            &file.ehr_patient_id_type,
            &file.ehr_encounter_id_type,
            &file.press_ganey_record_id_type,
        )?;

        Ok(cfg.with_numeric_policy(numeric_policy_from_env_value(file.numeric_policy)?))
    }

    /// Replace the numeric policy.
    pub fn with_numeric_policy(mut self, numeric_policy: NumericPolicy) -> Self {
        self.numeric_policy = numeric_policy;
        self
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    pub fn patient_id_type(&self) -> &str {
        self.patient_id_type.as_str()
    }

    pub fn encounter_id_type(&self) -> &str {
        self.encounter_id_type.as_str()
    }

    pub fn record_id_type(&self) -> &str {
        self.record_id_type.as_str()
    }

    pub fn numeric_policy(&self) -> NumericPolicy {
        self.numeric_policy
    }
}

#[derive(Debug, Deserialize)]
struct RunConfigFile {
    client_id: String,
    ehr_patient_id_type: String,
    ehr_encounter_id_type: String,
    press_ganey_record_id_type: String,
    #[serde(default)]
    numeric_policy: Option<String>,
}

fn required(name: &str, value: &str) -> SurveyResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| SurveyError::Config(format!("{name} cannot be empty")))
}

/// Parse the numeric policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default policy.
pub fn numeric_policy_from_env_value(value: Option<String>) -> SurveyResult<NumericPolicy> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<NumericPolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}
