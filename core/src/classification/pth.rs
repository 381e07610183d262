use crate::types::{Classification, ClauseKind, Interpretation, PatientContext, Tier, ValueRange};

const LOW_BELOW: f64 = 14.8;
const HIGH_ABOVE: f64 = 64.5;

const GUIDELINE: &str = "原发性骨质疏松症诊疗指南_2022.pdf";

const NO_BONE_DENSITY: &str = "未提供骨密度 (T值) 数据，";

/// Result label, bone-density clause and finding clause for one branch
struct Narrative {
    result: &'static str,
    bone_density: &'static str,
    finding: &'static str,
}

/// Selects the narrative for a tier and bone-density outcome
///
/// `deficient` is `None` when no T-score was supplied.
fn narrative(tier: Tier, deficient: Option<bool>) -> Narrative {
    match (tier, deficient) {
        (Tier::Low, Some(true)) => Narrative {
            result: "非甲旁引起的骨质疏松症",
            bone_density: "结合骨密度 (T值) 低于-2.5，",
            finding: "提示骨质疏松可能由其他非甲状旁腺原因引起，如营养不良或维生素D缺乏。\
                      建议进一步评估其他骨代谢相关因素。",
        },
        (Tier::Low, Some(false)) => Narrative {
            result: "非甲旁引起的轻微骨质疏松风险",
            bone_density: "但骨密度 (T值) 正常。",
            finding: "提示甲状旁腺功能可能正常，但需注意是否存在轻微骨形成不足或其他骨健康问题。",
        },
        (Tier::Low, None) => Narrative {
            result: "非甲旁相关骨代谢异常",
            bone_density: NO_BONE_DENSITY,
            finding: "建议结合骨密度检查进一步评估是否存在骨质疏松或其他代谢异常。",
        },
        (Tier::Normal, Some(true)) => Narrative {
            result: "非甲旁引起的骨质疏松症",
            bone_density: "但骨密度 (T值) 低于-2.5，",
            finding: "提示骨质疏松可能由其他因素引起，如骨吸收过高或骨形成不足。",
        },
        (Tier::Normal, Some(false)) => Narrative {
            result: "正常骨代谢",
            bone_density: "且骨密度 (T值) 正常。",
            finding: "说明甲状旁腺功能正常，骨代谢无明显异常。",
        },
        (Tier::Normal, None) => Narrative {
            result: "正常骨代谢",
            bone_density: NO_BONE_DENSITY,
            finding: "建议结合影像学检查进一步确认骨健康状态。",
        },
        (_, Some(true)) => Narrative {
            result: "甲旁亢引起的骨质疏松症",
            bone_density: "结合骨密度 (T值) 低于-2.5，",
            finding: "提示甲状旁腺功能亢进导致的骨吸收过高，可能伴随骨质疏松症风险。\
                      建议进行甲状旁腺功能检查，评估是否存在甲旁亢或继发性骨质疏松。",
        },
        (_, Some(false)) => Narrative {
            result: "甲旁亢导致的骨代谢异常",
            bone_density: "但骨密度 (T值) 正常。",
            finding: "提示甲状旁腺功能亢进，但尚未引发明显骨量减少。建议监测甲状旁腺功能和骨密度变化。",
        },
        (_, None) => Narrative {
            result: "甲旁相关异常",
            bone_density: NO_BONE_DENSITY,
            finding: "建议进行甲状旁腺功能检查，结合影像学评估进一步确认骨健康状态。",
        },
    }
}

/// Classifies a parathyroid hormone value
///
/// `< 14.8` → 低, `[14.8, 64.5]` → 正常, `> 64.5` → 偏高. Each tier has a
/// narrative for a deficient T-score (`< -2.5`), a non-deficient T-score and
/// no T-score. Low and high are always flagged; normal only with a
/// deficient T-score.
pub fn classify(value: f64, unit: &str, ctx: &PatientContext) -> Classification {
    let (tier, tier_name, range, reference) = if value < LOW_BELOW {
        (
            Tier::Low,
            "低",
            format!("PTH < 14.8{unit}"),
            ValueRange::below(LOW_BELOW),
        )
    } else if value <= HIGH_ABOVE {
        (
            Tier::Normal,
            "正常",
            format!("14.8 ≤ PTH ≤ 64.5{unit}"),
            ValueRange::between(LOW_BELOW, HIGH_ABOVE),
        )
    } else {
        (
            Tier::Elevated,
            "偏高",
            format!("PTH > 64.5{unit}"),
            ValueRange::at_least(HIGH_ABOVE),
        )
    };

    let deficient = ctx.bone_density_deficient();
    let story = narrative(tier, deficient);
    let is_abnormal = tier != Tier::Normal || deficient == Some(true);

    Classification {
        tier,
        result: story.result,
        is_abnormal,
        interpretation: Interpretation::new()
            .with(
                ClauseKind::Placement,
                format!("当前指标处于{tier_name}区间：{range}。"),
            )
            .with(ClauseKind::BoneDensity, story.bone_density)
            .with(ClauseKind::Finding, story.finding),
        medication_suggestion: "",
        guideline: GUIDELINE,
        reference_value_range: range,
        reference_age_range: String::new(),
        reference,
        standard: ValueRange::between(LOW_BELOW, HIGH_ABOVE),
    }
}
