//! Interface to the external summarization collaborator
//!
//! The collaborator is opaque: it receives a prompt built from the patient's
//! basic info and the unflagged report, and returns text that must parse as
//! a JSON object with exactly the five [`Summary`] keys. Transport, model
//! choice and retries belong to the [`Summarizer`] implementation.

use crate::error::{OsteocatError, Result};
use crate::report::Report;
use crate::request::PatientBasicInfo;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// System role sent alongside every prompt
pub const SYSTEM_ROLE: &str = "你是一个专业的骨代谢医生。";

/// Produces a completion for a prompt
pub trait Summarizer {
    fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

impl<F> Summarizer for F
where
    F: Fn(&str, &str) -> Result<String>,
{
    fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        self(system, prompt)
    }
}

/// Comprehensive analysis returned by the collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Summary {
    #[serde(rename = "结论解读")]
    pub conclusion: String,
    #[serde(rename = "用药建议")]
    pub medication: String,
    #[serde(rename = "生活方式建议")]
    pub lifestyle: String,
    #[serde(rename = "参考依据")]
    pub references: String,
    #[serde(rename = "复诊建议")]
    pub follow_up: String,
}

/// Payload embedded in the prompt
#[derive(Debug, Clone, Serialize)]
pub struct SummaryInput<'a> {
    #[serde(rename = "患者基本信息")]
    pub patient: &'a PatientBasicInfo,
    #[serde(rename = "骨代谢检验数据")]
    pub report: &'a Report,
}

impl<'a> SummaryInput<'a> {
    pub fn new(patient: &'a PatientBasicInfo, report: &'a Report) -> Self {
        Self { patient, report }
    }
}

fn example_summary() -> Summary {
    Summary {
        conclusion: "根据多项指标结果，患者的骨代谢状态总体表现为高动力性倾向。β-CTX指标显示骨吸收活性显著增强，提示骨量流失风险较高；\
                     P1NP指标处于正常范围，说明骨形成能力未见明显异常；维生素D水平不足可能影响钙吸收及骨代谢平衡；\
                     N-MID指标偏低，提示轻微骨形成不足。结合骨密度T值为正常，无明显骨质疏松风险。"
            .to_string(),
        medication: "1. 补充钙剂（如碳酸钙）每日1000mg和维生素D 800-1200 IU；\n\
                     2. 若骨吸收过高，建议使用抗骨吸收药物如双膦酸盐或地舒单抗；\n\
                     3. 若进一步检查发现骨形成能力下降，可考虑使用特立帕肽以促进成骨。"
            .to_string(),
        lifestyle: "1. 增加户外活动，保证每日15-30分钟的阳光照射；\n\
                    2. 饮食中增加富含钙质和维生素D的食物，如奶制品、鱼类、鸡蛋等；\n\
                    3. 避免久坐、吸烟和过量饮酒，保持适度运动，建议进行低冲击力的抗阻运动如快走或瑜伽；\n\
                    4. 定期监测骨健康状况，避免跌倒等骨折风险。"
            .to_string(),
        references: "1. 《中国骨质疏松诊治指南（2020年版）》；\n\
                     2. 《骨转换生化标志物临床应用指南（2021）》；\n\
                     3. 《原发性骨质疏松症诊疗指南（2022）》。"
            .to_string(),
        follow_up: "建议3个月后复查骨代谢相关指标（如β-CTX、P1NP、N-MID）以及骨密度T值，评估干预效果。\
                    若骨代谢异常持续，应进一步排查继发性骨质疏松的潜在原因（如甲状旁腺功能亢进或维生素D缺乏）并调整治疗方案。"
            .to_string(),
    }
}

/// Builds the prompt sent to the collaborator
pub fn build_prompt(input: &SummaryInput<'_>) -> Result<String> {
    let example = serde_json::to_string_pretty(&example_summary())?;
    let data = serde_json::to_string_pretty(input)?;
    Ok(format!(
        "你是一名专业的骨代谢医生，根据以下输入数据生成综合分析报告：

### 输入数据说明
- 患者的骨代谢检验数据包括以下指标：
    1. β-CTX (单位ng/ml)
    2. P1NP (单位μg/ml)
    3. VD (单位ng/ml)
    4. N-MID (单位ng/ml)
    5. PTH (单位ng/ml)
    6. CT (单位pg/ml)
    7. 骨密度T值 (可选)
- 每个指标包含：当前值、参考区间、指标结果、指标解读、用药建议。

### 输出要求
- 必须严格按照以下字段生成输出：
    1. 结论解读
    2. 用药建议
    3. 生活方式建议
    4. 参考依据
    5. 复诊建议
- 输出格式为标准 JSON。
- 示例输出：{example}

### 输入数据
{data}

### 请直接返回 JSON 格式的结果：
"
    ))
}

/// Strips Markdown code fences (```json / ```) around a JSON answer
pub fn clean_markdown_json(raw: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let re = FENCE.get_or_init(|| Regex::new(r"```json|```").expect("Failed to compile regex"));
    re.replace_all(raw, "").trim().to_string()
}

/// Parses a collaborator response
///
/// # Errors
///
/// Returns [`OsteocatError::SummaryParse`] carrying the raw text when the
/// cleaned response is not a JSON object with exactly the five keys.
pub fn parse_summary(raw: &str) -> Result<Summary> {
    serde_json::from_str(&clean_markdown_json(raw)).map_err(|e| {
        warn!("Summary response rejected: {}", e);
        OsteocatError::SummaryParse {
            raw: raw.to_string(),
        }
    })
}

/// Builds the prompt, calls the collaborator once and parses its answer
pub fn summarize(summarizer: &dyn Summarizer, input: &SummaryInput<'_>) -> Result<Summary> {
    let prompt = build_prompt(input)?;
    debug!("Summary prompt: {} chars", prompt.chars().count());
    let raw = summarizer.complete(SYSTEM_ROLE, &prompt)?;
    parse_summary(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> PatientBasicInfo {
        PatientBasicInfo {
            gender: "女".to_string(),
            age: 62,
            height: Some(158.0),
            weight: None,
        }
    }

    fn sample_answer() -> String {
        serde_json::to_string(&example_summary()).unwrap()
    }

    #[test]
    fn test_clean_markdown_json() {
        assert_eq!(clean_markdown_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(clean_markdown_json("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_fenced_summary() {
        let raw = format!("```json\n{}\n```", sample_answer());
        let summary = parse_summary(&raw).unwrap();
        assert_eq!(summary, example_summary());
    }

    #[test]
    fn test_non_json_is_distinct_error_with_raw_text() {
        let err = parse_summary("抱歉，我无法完成。").unwrap_err();
        match err {
            OsteocatError::SummaryParse { raw } => assert_eq!(raw, "抱歉，我无法完成。"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        assert!(parse_summary(r#"{"结论解读": "x"}"#).is_err());

        let mut value = serde_json::to_value(example_summary()).unwrap();
        value["额外"] = serde_json::json!("y");
        assert!(parse_summary(&value.to_string()).is_err());
    }

    #[test]
    fn test_prompt_embeds_input_and_contract() {
        let info = sample_info();
        let report = Report::default();
        let prompt = build_prompt(&SummaryInput {
            patient: &info,
            report: &report,
        })
        .unwrap();
        assert!(prompt.contains("\"患者性别\": \"女\""));
        assert!(prompt.contains("\"患者身高\": 158.0"));
        assert!(!prompt.contains("患者体重"));
        assert!(prompt.contains("骨代谢检验数据"));
        assert!(prompt.contains("复诊建议"));
    }

    #[test]
    fn test_summarize_calls_collaborator_once() {
        use std::cell::Cell;

        let calls = Cell::new(0);
        let answer = sample_answer();
        let summarizer = |system: &str, prompt: &str| -> Result<String> {
            calls.set(calls.get() + 1);
            assert_eq!(system, SYSTEM_ROLE);
            assert!(prompt.contains("患者基本信息"));
            Ok(answer.clone())
        };

        let info = sample_info();
        let report = Report::default();
        let input = SummaryInput {
            patient: &info,
            report: &report,
        };
        let summary = summarize(&summarizer, &input).unwrap();
        assert_eq!(summary.follow_up, example_summary().follow_up);
        assert_eq!(calls.get(), 1);
    }
}
