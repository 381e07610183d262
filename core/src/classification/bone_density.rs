use crate::types::{
    format_value, Classification, ClauseKind, Interpretation, PatientContext, Tier, ValueRange,
};

const NORMAL_FROM: f64 = -1.0;
const OSTEOPOROSIS_AT_OR_BELOW: f64 = -2.5;

const PREAMBLE: &str = "骨密度（T值）是骨量的重要指标，用于评估骨质疏松风险。";
const GUIDELINE: &str = "《中国骨质疏松诊治指南（2020年版）》、DXA骨密度检测标准.pdf";

/// Classifies a bone-density T-score
///
/// `≥ -1.0` → 正常, `(-2.5, -1.0)` → 偏低, `≤ -2.5` → 过低 (flagged).
pub fn classify(value: f64, _unit: &str, _ctx: &PatientContext) -> Classification {
    let standard = ValueRange::between(NORMAL_FROM, 1.0);
    let shown = format_value(value);
    let preamble = Interpretation::new().with(ClauseKind::Preamble, PREAMBLE);

    if value >= NORMAL_FROM {
        let range = "T值 ≥ -1.0".to_string();
        Classification {
            tier: Tier::Normal,
            result: "骨密度正常",
            is_abnormal: false,
            interpretation: preamble
                .with(
                    ClauseKind::Placement,
                    format!("当前骨密度T值为{shown}，处于正常范围：{range}。"),
                )
                .with(
                    ClauseKind::Finding,
                    "提示骨量良好，骨折风险较低，无需特别干预，但建议定期监测骨密度变化。",
                ),
            medication_suggestion: "",
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: String::new(),
            reference: ValueRange::at_least(NORMAL_FROM),
            standard,
        }
    } else if value > OSTEOPOROSIS_AT_OR_BELOW {
        let range = "-2.5 < T值 < -1.0".to_string();
        Classification {
            tier: Tier::Reduced,
            result: "骨量减少",
            is_abnormal: false,
            interpretation: preamble
                .with(
                    ClauseKind::Placement,
                    format!("当前骨密度T值为{shown}，处于骨量减少范围：{range}。"),
                )
                .with(
                    ClauseKind::Finding,
                    "提示骨量低于正常水平，但尚未达到骨质疏松的诊断标准。\
                     建议适当补充钙和维生素D，保持运动，预防进一步骨量丢失。",
                ),
            medication_suggestion: "",
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: String::new(),
            reference: ValueRange::between(OSTEOPOROSIS_AT_OR_BELOW, NORMAL_FROM),
            standard,
        }
    } else {
        let range = "T值 ≤ -2.5".to_string();
        Classification {
            tier: Tier::VeryLow,
            result: "骨质疏松",
            is_abnormal: true,
            interpretation: preamble
                .with(
                    ClauseKind::Placement,
                    format!("当前骨密度T值为{shown}，低于骨质疏松诊断标准：{range}。"),
                )
                .with(
                    ClauseKind::Finding,
                    "提示骨量显著减少，骨折风险显著增加。\
                     建议进行药物干预（如抗骨吸收治疗），同时补充钙和维生素D，必要时结合骨代谢指标综合评估治疗效果。",
                ),
            medication_suggestion: "",
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: String::new(),
            reference: ValueRange::below(OSTEOPOROSIS_AT_OR_BELOW),
            standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sex;
    use rstest::rstest;

    #[rstest]
    #[case(2.0, Tier::Normal, "骨密度正常", false)]
    #[case(-1.0, Tier::Normal, "骨密度正常", false)]
    #[case(-1.01, Tier::Reduced, "骨量减少", false)]
    #[case(-2.49, Tier::Reduced, "骨量减少", false)]
    #[case(-2.5, Tier::VeryLow, "骨质疏松", true)]
    #[case(-4.0, Tier::VeryLow, "骨质疏松", true)]
    fn test_boundaries(
        #[case] value: f64,
        #[case] tier: Tier,
        #[case] result: &str,
        #[case] abnormal: bool,
    ) {
        let ctx = PatientContext::new(Sex::Male, 60).with_bone_density(value);
        let outcome = classify(value, "", &ctx);
        assert_eq!(outcome.tier, tier);
        assert_eq!(outcome.result, result);
        assert_eq!(outcome.is_abnormal, abnormal);
    }

    #[test]
    fn test_placement_cites_value_and_own_range() {
        let ctx = PatientContext::new(Sex::Male, 35).with_bone_density(-1.0);
        let outcome = classify(-1.0, "", &ctx);
        assert_eq!(
            outcome.interpretation.clause(ClauseKind::Placement),
            Some("当前骨密度T值为-1.0，处于正常范围：T值 ≥ -1.0。")
        );
    }
}
