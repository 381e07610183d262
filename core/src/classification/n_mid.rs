use crate::types::{
    Classification, ClauseKind, Interpretation, NMidAgeBracket, PatientContext, Tier, ValueRange,
};

const GUIDELINE: &str = "N-MID骨钙素（N-MID Osteocalcin）.pdf、原发性骨质疏松症诊疗指南_2022.pdf";

/// Returns the (low, high) N-MID comparison thresholds for an age bracket
///
/// The normal tier spans `[low, 2 * high]`.
pub fn thresholds(bracket: NMidAgeBracket) -> (f64, f64) {
    match bracket {
        NMidAgeBracket::UpTo29 | NMidAgeBracket::From30To50 => (22.0, 69.0),
        NMidAgeBracket::From51To70 => (15.0, 46.0),
        NMidAgeBracket::Over70 => (13.0, 13.0),
    }
}

/// Reference range text shown for an age bracket
///
/// The 30–50 bracket displays 15–41 although it compares against 22/69.
fn bracket_display(bracket: NMidAgeBracket, unit: &str) -> String {
    match bracket {
        NMidAgeBracket::UpTo29 => format!("22 < N-MID < 69{unit}"),
        NMidAgeBracket::From30To50 => format!("15 < N-MID < 41{unit}"),
        NMidAgeBracket::From51To70 => format!("15 < N-MID < 46{unit}"),
        NMidAgeBracket::Over70 => format!("N-MID < 13{unit}"),
    }
}

/// Classifies an N-MID osteocalcin value
///
/// # Algorithm
///
/// 1. Resolve `(low, high)` from the patient's age bracket
/// 2. `< low` → 低, `[low, 2·high]` → 正常, `> 2·high` → 高 (always flagged)
/// 3. Within 低 and 正常, split on the bone-density T-score (`< -2.5` is
///    deficient); without a T-score, 低 falls back to a generic narrative
///    and 正常 splits on whether the value exceeds `high`
pub fn classify(value: f64, unit: &str, ctx: &PatientContext) -> Classification {
    let bracket = ctx.n_mid_bracket();
    let (low, high) = thresholds(bracket);
    let display = bracket_display(bracket, unit);
    let opening = format!("对于{}年龄群体的N-MID参考范围为{display}; ", bracket.label());
    let standard = ValueRange::between(low, high * 2.0);

    let (tier, result, is_abnormal, interpretation, reference) = if value < low {
        let placement = format!("{opening}当前N-MID数值低于区间。");
        let (result, is_abnormal, interpretation) = match ctx.bone_density_deficient() {
            Some(true) => (
                "骨形成不足或低动力型骨质疏松(缺失材料)",
                true,
                Interpretation::new()
                    .with(ClauseKind::Placement, placement)
                    .with(ClauseKind::BoneDensity, "结合骨密度 (T值) 低于-2.5，")
                    .with(
                        ClauseKind::Finding,
                        "推测为骨形成不足或低动力型骨质疏松，需重点促进骨形成。",
                    ),
            ),
            Some(false) => (
                "轻微骨形成不足(缺失材料)",
                false,
                Interpretation::new()
                    .with(ClauseKind::Placement, placement)
                    .with(ClauseKind::BoneDensity, "但骨密度 (T值) 数值正常, ")
                    .with(
                        ClauseKind::Finding,
                        "提示可能存在轻微骨形成不足，但无明显骨质疏松风险。建议定期复查骨密度并关注骨健康。",
                    ),
            ),
            None => (
                "骨形成不足(缺失材料)",
                true,
                Interpretation::new().with(ClauseKind::Placement, placement).with(
                    ClauseKind::BoneDensity,
                    "建议进一步评估骨密度情况，结合骨密度T值综合判断。",
                ),
            ),
        };
        (Tier::Low, result, is_abnormal, interpretation, ValueRange::below(low))
    } else if value <= high * 2.0 {
        let level = if value <= high {
            "当前N-MID数值正常。"
        } else {
            "当前N-MID数值偏高。"
        };
        let placement = format!("{opening}{level}");
        let (result, is_abnormal, interpretation) = match ctx.bone_density_deficient() {
            Some(true) => (
                "低动力型骨质疏松",
                true,
                Interpretation::new()
                    .with(ClauseKind::Placement, placement)
                    .with(ClauseKind::BoneDensity, "结合骨密度 (T值) 低于-2.5，")
                    .with(
                        ClauseKind::Finding,
                        "推测为原发性骨质疏松，需重点促进骨形成。需关注骨质疏松风险。",
                    ),
            ),
            Some(false) => (
                "正常",
                false,
                Interpretation::new()
                    .with(ClauseKind::Placement, placement)
                    .with(ClauseKind::BoneDensity, "结合骨密度 (T值) 正常，")
                    .with(
                        ClauseKind::Finding,
                        "说明骨代谢处于平衡状态，无明显骨代谢异常。",
                    ),
            ),
            None if value <= high => (
                "正常",
                false,
                Interpretation::new()
                    .with(ClauseKind::Placement, placement)
                    .with(ClauseKind::BoneDensity, "由于未提供骨密度T值数据，")
                    .with(
                        ClauseKind::Finding,
                        "建议结合影像学评估进一步确认骨质健康情况。",
                    ),
            ),
            None => (
                "骨代谢活跃",
                true,
                Interpretation::new().with(ClauseKind::Placement, placement).with(
                    ClauseKind::Finding,
                    "可能提示骨代谢活跃状态，建议结合骨密度T值和临床表现进一步评估。\
                     尤其需关注是否存在骨吸收增加导致的骨量减少风险。",
                ),
            ),
        };
        (Tier::Normal, result, is_abnormal, interpretation, standard)
    } else {
        let interpretation = Interpretation::new()
            .with(
                ClauseKind::Placement,
                format!("{opening}N-MID数值超出参考范围两倍，严重偏高。"),
            )
            .with(
                ClauseKind::Finding,
                "推测为继发性骨质疏松，可能与肾功能不全、甲状旁腺功能异常、恶性肿瘤等继发性因素相关。\
                 建议患者去肾内科评估肾功能（GFR 检查），必要时治疗基础病因，骨代谢干预需谨慎。",
            );
        (
            Tier::High,
            "继发性骨质疏松",
            true,
            interpretation,
            ValueRange::at_least(high * 2.0),
        )
    };

    Classification {
        tier,
        result,
        is_abnormal,
        interpretation,
        medication_suggestion: "",
        guideline: GUIDELINE,
        reference_value_range: display,
        reference_age_range: bracket.label().to_string(),
        reference,
        standard,
    }
}
