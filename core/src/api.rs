use crate::analysis::IndicatorPanel;
use crate::error::{OsteocatError, Result};
use crate::report::Report;
use crate::request::EvaluationRequest;
use crate::summary::{build_prompt, summarize, Summarizer, Summary, SummaryInput};
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

/// Success message of the evaluation envelope
pub const SUCCESS_MESSAGE: &str = "Data processed successfully.";

/// Depth of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnalysisMode {
    /// Per-indicator classification only
    #[default]
    Fast,
    /// Classification plus the external comprehensive summary
    Full,
}

impl AnalysisMode {
    /// Parses a mode name; "slow" is accepted as an alias of "full"
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Some(AnalysisMode::Fast),
            "full" | "slow" => Some(AnalysisMode::Full),
            _ => None,
        }
    }

    pub fn simple_name(&self) -> &'static str {
        match self {
            AnalysisMode::Fast => "fast",
            AnalysisMode::Full => "full",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Successful evaluation payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Per-indicator report, with abnormal flags
    #[serde(rename = "指标逐一分析")]
    pub indicators: Report,

    /// Comprehensive summary, full mode only
    #[serde(rename = "综合分析及建议", skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

/// Tagged evaluation outcome: full success or a single failure message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EvaluationResponse {
    Success {
        message: String,
        result: AnalysisResult,
    },
    Error {
        message: String,
    },
}

impl EvaluationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, EvaluationResponse::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            EvaluationResponse::Success { message, .. } | EvaluationResponse::Error { message } => {
                message
            }
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            EvaluationResponse::Success { result, .. } => Some(result),
            EvaluationResponse::Error { .. } => None,
        }
    }
}

impl From<Result<AnalysisResult>> for EvaluationResponse {
    fn from(outcome: Result<AnalysisResult>) -> Self {
        match outcome {
            Ok(result) => EvaluationResponse::Success {
                message: SUCCESS_MESSAGE.to_string(),
                result,
            },
            Err(e @ OsteocatError::MissingIndicator(_)) => EvaluationResponse::Error {
                message: e.to_string(),
            },
            Err(e) => EvaluationResponse::Error {
                message: format!("An error occurred: {}", e),
            },
        }
    }
}

/// Main entry point for bone-metabolism evaluation
///
/// # Example
///
/// ```
/// use osteocat_core::{AnalysisMode, BoneMetabolismAnalyzer, EvaluationRequest, Indicator};
///
/// let request = EvaluationRequest::from_json_str(r#"{
///     "patient_info": {"gender": "女", "age": 58},
///     "biochemical_indicators": {
///         "β-CTX": 0.45, "P1NP": 40.0, "25-Hydroxy Vitamin D": 18.0,
///         "N-MID Osteocalcin": 20.0, "Parathyroid Hormone": 70.0, "Calcitonin": 3.0
///     },
///     "imaging_data": {"Bone Density": "未输入"}
/// }"#).unwrap();
///
/// let result = BoneMetabolismAnalyzer::evaluate(&request, AnalysisMode::Fast, None).unwrap();
/// let vd = result.indicators.get(Indicator::VitaminD).unwrap();
/// assert_eq!(vd.result, "维生素D缺乏");
/// assert_eq!(vd.is_abnormal, Some(true));
/// assert!(result.indicators.get(Indicator::BoneDensity).is_none());
/// ```
pub struct BoneMetabolismAnalyzer;

impl BoneMetabolismAnalyzer {
    /// Validates the request and classifies every indicator
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required marker is missing (checked first, in fixed order)
    /// - A marker, the bone density, gender or age is malformed
    pub fn analyze(request: &EvaluationRequest) -> Result<IndicatorPanel> {
        let values = request.marker_values()?;
        let context = request.patient_context()?;

        let mut panel = IndicatorPanel::new(context, &values);
        panel.log_inputs();
        panel.analyze();
        debug!("Analyzed: {}", panel.value_digest());
        Ok(panel)
    }

    /// Runs an evaluation in the requested mode
    ///
    /// Full mode calls `summarizer` once with the unflagged report; it is an
    /// error to request full mode without one.
    pub fn evaluate(
        request: &EvaluationRequest,
        mode: AnalysisMode,
        summarizer: Option<&dyn Summarizer>,
    ) -> Result<AnalysisResult> {
        let panel = Self::analyze(request)?;

        let summary = match mode {
            AnalysisMode::Fast => None,
            AnalysisMode::Full => {
                let summarizer = summarizer.ok_or_else(|| {
                    OsteocatError::Summarizer("full analysis requires a summarizer".to_string())
                })?;
                let patient = request.basic_info()?;
                let report = panel.to_report(false);
                Some(summarize(summarizer, &SummaryInput::new(&patient, &report))?)
            }
        };

        info!(
            "Evaluation complete ({} mode, {} abnormal indicators)",
            mode,
            panel.abnormal_indicators().len()
        );

        Ok(AnalysisResult {
            indicators: panel.to_report(true),
            summary,
        })
    }

    /// Builds the summarization prompt a full evaluation would send
    pub fn summary_prompt(request: &EvaluationRequest) -> Result<String> {
        let panel = Self::analyze(request)?;
        let patient = request.basic_info()?;
        let report = panel.to_report(false);
        build_prompt(&SummaryInput::new(&patient, &report))
    }

    /// Runs an evaluation and wraps the outcome in the tagged envelope
    pub fn respond(
        request: &EvaluationRequest,
        mode: AnalysisMode,
        summarizer: Option<&dyn Summarizer>,
    ) -> EvaluationResponse {
        let outcome = Self::evaluate(request, mode, summarizer);
        if let Err(e) = &outcome {
            warn!("Evaluation failed: {}", e);
        }
        outcome.into()
    }

    /// Parses a JSON request and responds; malformed JSON becomes an error
    /// response
    pub fn respond_json(
        json: &str,
        mode: AnalysisMode,
        summarizer: Option<&dyn Summarizer>,
    ) -> EvaluationResponse {
        match EvaluationRequest::from_json_str(json) {
            Ok(request) => Self::respond(&request, mode, summarizer),
            Err(e) => {
                warn!("Rejected request: {}", e);
                EvaluationResponse::from(Err::<AnalysisResult, _>(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Indicator;
    use serde_json::{json, Value};

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
            "imaging_data": {"Bone Density": -1.0}
        })
    }

    fn request(value: Value) -> EvaluationRequest {
        serde_json::from_value(value).unwrap()
    }

    fn summary_answer() -> String {
        json!({
            "结论解读": "骨代谢总体平衡。",
            "用药建议": "补充维生素D。",
            "生活方式建议": "增加日照。",
            "参考依据": "《原发性骨质疏松症诊疗指南（2022）》",
            "复诊建议": "3个月后复查。"
        })
        .to_string()
    }

    #[test]
    fn test_analysis_mode_from_str() {
        assert_eq!(AnalysisMode::from_str("fast"), Some(AnalysisMode::Fast));
        assert_eq!(AnalysisMode::from_str("slow"), Some(AnalysisMode::Full));
        assert_eq!(AnalysisMode::from_str(" FULL "), Some(AnalysisMode::Full));
        assert_eq!(AnalysisMode::from_str("other"), None);
    }

    #[test]
    fn test_end_to_end_fast_response() {
        let request = request(scenario());
        let response = BoneMetabolismAnalyzer::respond(&request, AnalysisMode::Fast, None);
        assert!(response.is_success());
        assert_eq!(response.message(), SUCCESS_MESSAGE);

        let report = &response.result().unwrap().indicators;
        assert_eq!(report.len(), 7);
        let expectations = [
            (Indicator::BetaCtx, "中偏高区间", "高动力型（原发性）"),
            (Indicator::P1np, "中区间", "正常"),
            (Indicator::VitaminD, "低区间", "维生素D不足"),
            (Indicator::NMid, "低区间", "轻微骨形成不足(缺失材料)"),
            (Indicator::Pth, "正常区间", "正常骨代谢"),
            (Indicator::Calcitonin, "正常区间", "正常"),
            (Indicator::BoneDensity, "正常区间", "骨密度正常"),
        ];
        for (indicator, range_prefix, result) in expectations {
            let entry = report.get(indicator).unwrap();
            assert!(entry.range.starts_with(range_prefix), "{indicator}: {}", entry.range);
            assert_eq!(entry.result, result, "{indicator}");
            assert_eq!(entry.is_abnormal, Some(false), "{indicator}");
        }
    }

    #[test]
    fn test_envelope_json_shape() {
        let request = request(scenario());
        let response = BoneMetabolismAnalyzer::respond(&request, AnalysisMode::Fast, None);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["message"], SUCCESS_MESSAGE);
        assert!(value["result"]["指标逐一分析"]["β_CTX_analysis"].is_object());
        assert!(value["result"].get("综合分析及建议").is_none());
    }

    #[test]
    fn test_missing_field_scenario() {
        let mut value = scenario();
        value["biochemical_indicators"]
            .as_object_mut()
            .unwrap()
            .remove("Parathyroid Hormone");
        let response = BoneMetabolismAnalyzer::respond(&request(value), AnalysisMode::Fast, None);
        assert!(!response.is_success());
        assert!(response.result().is_none());
        assert_eq!(
            response.message(),
            "Missing required biochemical indicator: Parathyroid Hormone"
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_float_age_request_is_evaluated() {
        let mut value = scenario();
        value["patient_info"]["age"] = json!(35.0);
        let response =
            BoneMetabolismAnalyzer::respond_json(&value.to_string(), AnalysisMode::Fast, None);
        assert!(response.is_success(), "{}", response.message());

        value["biochemical_indicators"]
            .as_object_mut()
            .unwrap()
            .remove("Parathyroid Hormone");
        let response =
            BoneMetabolismAnalyzer::respond_json(&value.to_string(), AnalysisMode::Fast, None);
        assert_eq!(
            response.message(),
            "Missing required biochemical indicator: Parathyroid Hormone"
        );
    }

    #[test]
    fn test_missing_marker_reported_before_bad_patient_info() {
        let mut value = scenario();
        value["patient_info"]["gender"] = json!("?");
        value["biochemical_indicators"]
            .as_object_mut()
            .unwrap()
            .remove("β-CTX");
        let err = BoneMetabolismAnalyzer::evaluate(&request(value), AnalysisMode::Fast, None)
            .unwrap_err();
        assert!(err.is_missing_indicator());
    }

    #[test]
    fn test_internal_failure_is_wrapped() {
        let mut value = scenario();
        value["biochemical_indicators"]["P1NP"] = json!("33");
        let response = BoneMetabolismAnalyzer::respond(&request(value), AnalysisMode::Fast, None);
        assert!(response.message().starts_with("An error occurred: "));
        assert!(response.result().is_none());
    }

    #[test]
    fn test_malformed_json_is_wrapped() {
        let response = BoneMetabolismAnalyzer::respond_json("{", AnalysisMode::Fast, None);
        assert!(!response.is_success());
        assert!(response.message().starts_with("An error occurred: "));
    }

    #[test]
    fn test_full_mode_attaches_summary() {
        let answer = format!("```json\n{}\n```", summary_answer());
        let summarizer = |_: &str, prompt: &str| -> Result<String> {
            // The collaborator sees the unflagged report
            assert!(!prompt.contains("是否异常"));
            assert!(prompt.contains("β_CTX_analysis"));
            Ok(answer.clone())
        };
        let request = request(scenario());
        let result =
            BoneMetabolismAnalyzer::evaluate(&request, AnalysisMode::Full, Some(&summarizer))
                .unwrap();
        let summary = result.summary.unwrap();
        assert_eq!(summary.follow_up, "3个月后复查。");
        assert_eq!(result.indicators.get(Indicator::Pth).unwrap().is_abnormal, Some(false));
    }

    #[test]
    fn test_full_mode_parse_failure_is_distinct() {
        let summarizer = |_: &str, _: &str| -> Result<String> { Ok("not json".to_string()) };
        let request = request(scenario());
        let err = BoneMetabolismAnalyzer::evaluate(&request, AnalysisMode::Full, Some(&summarizer))
            .unwrap_err();
        assert!(matches!(err, OsteocatError::SummaryParse { ref raw } if raw == "not json"));

        let response =
            BoneMetabolismAnalyzer::respond(&request, AnalysisMode::Full, Some(&summarizer));
        assert!(response.result().is_none());
        assert!(response.message().contains("not json"));
    }

    #[test]
    fn test_summary_prompt_uses_unflagged_report() {
        let prompt = BoneMetabolismAnalyzer::summary_prompt(&request(scenario())).unwrap();
        assert!(prompt.contains("\"患者年龄\": 35"));
        assert!(prompt.contains("N_MID_analysis"));
        assert!(!prompt.contains("是否异常"));
    }

    #[test]
    fn test_full_mode_requires_summarizer() {
        let err = BoneMetabolismAnalyzer::evaluate(&request(scenario()), AnalysisMode::Full, None)
            .unwrap_err();
        assert!(matches!(err, OsteocatError::Summarizer(_)));
    }
}
