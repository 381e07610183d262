use crate::types::{
    format_value, Classification, ClauseKind, Interpretation, PatientContext, Sex, Tier,
    ValueRange,
};

const GUIDELINE: &str =
    "骨质疏松性骨折诊疗指南（2022年版）.pdf、中国老年骨质疏松症诊疗指南（2023）.pdf";

/// Returns the calcitonin upper limit for a sex: male 9.72, female 6.26
pub fn threshold(sex: Sex) -> f64 {
    match sex {
        Sex::Male => 9.72,
        Sex::Female => 6.26,
    }
}

/// Classifies a calcitonin value: `< T` → 正常, `≥ T` → 偏高 (flagged)
pub fn classify(value: f64, unit: &str, ctx: &PatientContext) -> Classification {
    let limit = threshold(ctx.sex);
    let shown = format_value(limit);
    let placement = format!("{}正常区间为CT值 ≤ {shown}{unit}，", ctx.sex);

    if value < limit {
        Classification {
            tier: Tier::Normal,
            result: "正常",
            is_abnormal: false,
            interpretation: Interpretation::new()
                .with(ClauseKind::Placement, placement)
                .with(
                    ClauseKind::Finding,
                    "当前指标正常。提示骨代谢活动无明显异常，患者的骨吸收状态良好。\
                     骨质疏松风险可能不由甲状腺髓样瘤、肺小细胞癌等疾病引起。",
                ),
            medication_suggestion: "",
            guideline: GUIDELINE,
            reference_value_range: format!("CT ≤ {shown}{unit}"),
            reference_age_range: String::new(),
            reference: ValueRange::below(limit),
            standard: ValueRange::below(limit),
        }
    } else {
        Classification {
            tier: Tier::Elevated,
            result: "提示甲状腺髓样瘤",
            is_abnormal: true,
            interpretation: Interpretation::new()
                .with(ClauseKind::Placement, placement)
                .with(
                    ClauseKind::Finding,
                    "当前指标显著偏高，（尤其是CT值升高超过参考值上限的两倍以上），\
                     需结合患者病史、影像学检查和甲状腺功能评估，\
                     明确是否存在甲状腺髓样癌、肺小细胞癌或其他肿瘤性疾病。\
                     要与患者的骨代谢问题（如骨质疏松或高骨吸收状态）区分开来。",
                ),
            medication_suggestion: "",
            guideline: GUIDELINE,
            reference_value_range: format!("CT ≥ {shown}{unit}"),
            reference_age_range: String::new(),
            reference: ValueRange::at_least(limit),
            standard: ValueRange::below(limit),
        }
    }
}
