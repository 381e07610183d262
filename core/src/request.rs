//! Evaluation request parsing and validation
//!
//! Requests arrive as JSON with `patient_info`, `biochemical_indicators` and
//! `imaging_data` sections. Marker presence is checked first, in fixed
//! order, so that a missing marker is reported before anything else.

use crate::analysis::MarkerValues;
use crate::error::{OsteocatError, Result};
use crate::types::{Indicator, PatientContext, Sex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bone-density sentinel meaning "not supplied"
pub const BONE_DENSITY_NOT_ENTERED: &str = "未输入";

/// Raw evaluation request
///
/// Sections stay as raw JSON until they are read, so that a malformed
/// `patient_info` never hides a missing marker.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub patient_info: Value,
    #[serde(default)]
    pub biochemical_indicators: Map<String, Value>,
    #[serde(default)]
    pub imaging_data: Value,
}

/// Patient details forwarded to the summarization collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientBasicInfo {
    #[serde(rename = "患者性别")]
    pub gender: String,
    #[serde(rename = "患者年龄")]
    pub age: i64,
    #[serde(rename = "患者身高", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(rename = "患者体重", skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl EvaluationRequest {
    /// Parses a request from JSON text
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Extracts the six marker values
    ///
    /// # Errors
    ///
    /// - [`OsteocatError::MissingIndicator`] naming the first marker that is
    ///   absent, `null`, zero, `false` or an empty string
    /// - [`OsteocatError::InvalidInput`] if a marker is not a number
    pub fn marker_values(&self) -> Result<MarkerValues> {
        let mut values = [0.0; 6];
        for (slot, indicator) in values.iter_mut().zip(Indicator::MARKERS) {
            let label = indicator.request_label();
            let missing = || OsteocatError::MissingIndicator(label.to_string());
            *slot = match self.biochemical_indicators.get(label) {
                None | Some(Value::Null) | Some(Value::Bool(false)) => return Err(missing()),
                Some(Value::String(s)) if s.is_empty() => return Err(missing()),
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(v) if v == 0.0 => return Err(missing()),
                    Some(v) => v,
                    None => return Err(format!("{label} is not a finite number").into()),
                },
                Some(other) => {
                    return Err(format!("{label} must be a number, got {other}").into())
                }
            };
        }
        let [beta_ctx, p1np, vitamin_d, n_mid, pth, calcitonin] = values;
        Ok(MarkerValues {
            beta_ctx,
            p1np,
            vitamin_d,
            n_mid,
            pth,
            calcitonin,
        })
    }

    /// Extracts the optional bone-density T-score
    ///
    /// Absent, `null` and the "未输入" sentinel all mean not supplied.
    pub fn bone_density(&self) -> Result<Option<f64>> {
        match self.imaging_data.get("Bone Density") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s == BONE_DENSITY_NOT_ENTERED => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| "Bone Density is not a finite number".into()),
            Some(other) => Err(format!(
                "Bone Density must be a number or \"{BONE_DENSITY_NOT_ENTERED}\", got {other}"
            )
            .into()),
        }
    }

    /// Builds the patient context, including the bone-density T-score
    pub fn patient_context(&self) -> Result<PatientContext> {
        let sex = self.sex()?;
        let age = self.age()?;
        let ctx = PatientContext::new(sex, age);
        Ok(match self.bone_density()? {
            Some(t_score) => ctx.with_bone_density(t_score),
            None => ctx,
        })
    }

    /// Patient details for the summarization prompt
    ///
    /// Height is forwarded only above 100 and weight only above 20; smaller
    /// or non-numeric values are treated as placeholders.
    pub fn basic_info(&self) -> Result<PatientBasicInfo> {
        let measurement = |key: &str| self.patient_info.get(key).and_then(Value::as_f64);
        Ok(PatientBasicInfo {
            gender: self.sex()?.label().to_string(),
            age: i64::from(self.age()?),
            height: measurement("height").filter(|h| *h > 100.0),
            weight: measurement("weight").filter(|w| *w > 20.0),
        })
    }

    fn sex(&self) -> Result<Sex> {
        match self.patient_info.get("gender") {
            None | Some(Value::Null) => Err("patient_info.gender is required".into()),
            Some(Value::String(gender)) => Sex::from_label(gender)
                .ok_or_else(|| OsteocatError::InvalidInput(format!("unknown gender: {gender}"))),
            Some(other) => {
                Err(format!("patient_info.gender must be a string, got {other}").into())
            }
        }
    }

    /// Reads the age; integer-valued floats such as `35.0` are accepted
    fn age(&self) -> Result<u32> {
        let age = match self.patient_info.get("age") {
            None | Some(Value::Null) => return Err("patient_info.age is required".into()),
            Some(Value::Number(n)) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|v| *v >= 0.0 && v.fract() == 0.0)
                    .map(|v| v as u64)
            }),
            Some(_) => None,
        };
        age.and_then(|a| u32::try_from(a).ok()).ok_or_else(|| {
            OsteocatError::InvalidInput(format!("invalid age: {}", self.patient_info["age"]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scenario() -> Value {
        json!({
            "patient_info": {"gender": "男", "age": 35, "height": 0.0, "weight": 0.0},
            "biochemical_indicators": {
                "β-CTX": 1.0,
                "P1NP": 33.0,
                "25-Hydroxy Vitamin D": 20.0,
                "N-MID Osteocalcin": 15.0,
                "Parathyroid Hormone": 27.0,
                "Calcitonin": 1.0
            },
            "imaging_data": {"Bone Density": -1.0},
            "medical_history": {"history": "", "medications": "", "testing_time": ""}
        })
    }

    fn parse(value: Value) -> EvaluationRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scenario_parses() {
        let request = parse(scenario());
        let values = request.marker_values().unwrap();
        assert_eq!(values.beta_ctx, 1.0);
        assert_eq!(values.calcitonin, 1.0);

        let ctx = request.patient_context().unwrap();
        assert_eq!(ctx.sex, Sex::Male);
        assert_eq!(ctx.age, Some(35));
        assert_eq!(ctx.bone_density, Some(-1.0));
    }

    #[test]
    fn test_missing_marker_is_named() {
        let mut value = scenario();
        value["biochemical_indicators"]
            .as_object_mut()
            .unwrap()
            .remove("Parathyroid Hormone");
        let err = parse(value).marker_values().unwrap_err();
        assert!(
            matches!(err, OsteocatError::MissingIndicator(ref f) if f == "Parathyroid Hormone")
        );
    }

    #[test]
    fn test_first_missing_marker_wins() {
        let mut value = scenario();
        let markers = value["biochemical_indicators"].as_object_mut().unwrap();
        markers.remove("Calcitonin");
        markers.insert("P1NP".to_string(), Value::Null);
        let err = parse(value).marker_values().unwrap_err();
        assert_eq!(err.to_string(), "Missing required biochemical indicator: P1NP");
    }

    #[test]
    fn test_zero_marker_counts_as_missing() {
        let mut value = scenario();
        value["biochemical_indicators"]["β-CTX"] = json!(0);
        let err = parse(value).marker_values().unwrap_err();
        assert!(err.is_missing_indicator());
    }

    #[test]
    fn test_non_numeric_marker_is_invalid() {
        let mut value = scenario();
        value["biochemical_indicators"]["Calcitonin"] = json!("high");
        let err = parse(value).marker_values().unwrap_err();
        assert!(matches!(err, OsteocatError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_or_false_marker_counts_as_missing() {
        let mut value = scenario();
        value["biochemical_indicators"]["Calcitonin"] = json!("");
        let err = parse(value).marker_values().unwrap_err();
        assert_eq!(err.to_string(), "Missing required biochemical indicator: Calcitonin");

        let mut value = scenario();
        value["biochemical_indicators"]["P1NP"] = json!(false);
        assert!(parse(value).marker_values().unwrap_err().is_missing_indicator());
    }

    #[test]
    fn test_missing_marker_reported_despite_malformed_patient_info() {
        let mut value = scenario();
        value["patient_info"] = json!({"gender": 1, "age": "thirty-five"});
        value["biochemical_indicators"]
            .as_object_mut()
            .unwrap()
            .remove("Parathyroid Hormone");
        let request = EvaluationRequest::from_json_str(&value.to_string()).unwrap();
        let err = request.marker_values().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required biochemical indicator: Parathyroid Hormone"
        );
        assert!(matches!(request.patient_context(), Err(OsteocatError::InvalidInput(_))));
    }

    #[test]
    fn test_integer_valued_float_age() {
        let mut value = scenario();
        value["patient_info"]["age"] = json!(35.0);
        let request = EvaluationRequest::from_json_str(&value.to_string()).unwrap();
        assert_eq!(request.patient_context().unwrap().age, Some(35));
        assert_eq!(request.basic_info().unwrap().age, 35);

        let mut value = scenario();
        value["patient_info"]["age"] = json!(35.5);
        assert!(parse(value).patient_context().is_err());
    }

    #[test]
    fn test_bone_density_sentinel() {
        let mut value = scenario();
        value["imaging_data"]["Bone Density"] = json!(BONE_DENSITY_NOT_ENTERED);
        let request = parse(value);
        assert_eq!(request.bone_density().unwrap(), None);
        assert!(!request.patient_context().unwrap().has_bone_density());

        let mut value = scenario();
        value.as_object_mut().unwrap().remove("imaging_data");
        assert_eq!(parse(value).bone_density().unwrap(), None);

        let mut value = scenario();
        value["imaging_data"]["Bone Density"] = json!("n/a");
        assert!(parse(value).bone_density().is_err());
    }

    #[test]
    fn test_patient_validation() {
        let mut value = scenario();
        value["patient_info"]["gender"] = json!("unknown");
        assert!(parse(value).patient_context().is_err());

        let mut value = scenario();
        value["patient_info"]["age"] = json!(-3);
        assert!(parse(value).patient_context().is_err());

        let mut value = scenario();
        value["patient_info"]["age"] = json!(0);
        assert_eq!(parse(value).patient_context().unwrap().age, None);
    }

    #[test]
    fn test_basic_info_filters_placeholders() {
        let info = parse(scenario()).basic_info().unwrap();
        assert_eq!(info.gender, "男");
        assert_eq!(info.age, 35);
        assert_eq!(info.height, None);
        assert_eq!(info.weight, None);

        let mut value = scenario();
        value["patient_info"]["height"] = json!(172.5);
        value["patient_info"]["weight"] = json!(68.0);
        let json = serde_json::to_value(parse(value).basic_info().unwrap()).unwrap();
        assert_eq!(json["患者身高"], json!(172.5));
        assert_eq!(json["患者体重"], json!(68.0));
    }

    #[test]
    fn test_from_json_str_rejects_malformed() {
        assert!(EvaluationRequest::from_json_str("{not json").is_err());
        assert!(EvaluationRequest::from_json_str("{}").is_ok());
    }
}
