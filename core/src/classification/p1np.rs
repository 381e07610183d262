use crate::types::{
    format_value, Classification, ClauseKind, Interpretation, PatientContext, Sex, Tier,
    ValueRange,
};

const PREAMBLE: &str = "P1NP指标是骨形成标志物，反映成骨细胞活性。";
const GUIDELINE: &str = "总I型胶原氨基端延长肽（Total-P1NP）.pdf";

/// Returns the (low, high) P1NP thresholds for a sex
///
/// Male: 22.59 / 75.17. Female: 14.56 / 59.62.
pub fn thresholds(sex: Sex) -> (f64, f64) {
    match sex {
        Sex::Male => (22.59, 75.17),
        Sex::Female => (14.56, 59.62),
    }
}

/// Classifies a P1NP value (bone formation marker)
///
/// `< low` → 低, `[low, high)` → 中 (result "正常"), `≥ high` → 高.
/// Only the outer tiers are flagged.
pub fn classify(value: f64, unit: &str, ctx: &PatientContext) -> Classification {
    let (low, high) = thresholds(ctx.sex);
    let (shown_low, shown_high) = (format_value(low), format_value(high));
    let standard = ValueRange::between(22.59, 75.17);
    let preamble = Interpretation::new().with(ClauseKind::Preamble, PREAMBLE);
    let sex = ctx.sex;

    if value < low {
        let range = format!("P1NP < {shown_low}{unit}");
        Classification {
            tier: Tier::Low,
            result: "低动力型",
            is_abnormal: true,
            interpretation: preamble
                .with(ClauseKind::Placement, format!("当前指标处于{sex}的低区间：{range}。"))
                .with(
                    ClauseKind::Finding,
                    "提示骨形成能力下降，若骨密度 (T值) 低于-2.5，则为低动力型骨质疏松。\
                     成骨细胞活性不足，骨代谢失衡，易导致骨量丢失和脆性骨折。\
                     常见于老年患者、长期使用糖皮质激素或其他影响骨形成的慢性疾病。",
                ),
            medication_suggestion: "成骨治疗：特立帕肽",
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: String::new(),
            reference: ValueRange::below(low),
            standard,
        }
    } else if value < high {
        let range = format!("{shown_low} <= P1NP < {shown_high}{unit}");
        Classification {
            tier: Tier::Mid,
            result: "正常",
            is_abnormal: false,
            interpretation: preamble
                .with(ClauseKind::Placement, format!("当前指标处于{sex}的正常区间：{range}。"))
                .with(
                    ClauseKind::Finding,
                    "说明骨吸收与骨形成处于平衡状态，无明显骨代谢异常。\
                     正常骨代谢患者无需特殊治疗，但若存在骨密度下降趋势或骨折风险，则需采取预防措施。",
                ),
            medication_suggestion: "",
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: String::new(),
            reference: ValueRange::between(low, high),
            standard,
        }
    } else {
        let range = format!("P1NP >= {shown_high}{unit}（参考值范围浮动）");
        Classification {
            tier: Tier::High,
            result: "重度骨量流失",
            is_abnormal: true,
            interpretation: preamble
                .with(ClauseKind::Placement, format!("当前指标处于{sex}的高区间：{range}。"))
                .with(
                    ClauseKind::Finding,
                    "骨形成活跃，但常伴随骨吸收增加，提示高转换状态、重度骨量流失。\
                     需综合评估 β-CTX 和 PTH指标，明确是否存在继发性骨质疏松。",
                ),
            medication_suggestion: "抗骨治疗：双膦酸盐或者地舒单抗",
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: String::new(),
            reference: ValueRange::at_least(high),
            standard,
        }
    }
}
