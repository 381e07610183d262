use crate::types::{
    format_value, BetaCtxAgeBracket, Classification, ClauseKind, Interpretation, PatientContext,
    Sex, Tier, ValueRange,
};

const LOW_BELOW: f64 = 0.2;
const LOW_MID_BELOW: f64 = 0.3;
const HIGH_FROM: f64 = 2.0;

const PREAMBLE: &str = "β-CTX指标反映骨吸收活性。";
const GUIDELINE: &str =
    "原发性骨质疏松症诊疗指南_2022.pdf、中国老年骨质疏松症诊疗指南（2023）.pdf";
const ANTI_RESORPTIVE: &str = "抗骨治疗：双膦酸盐、地舒单抗";

/// Returns the boundary between the "中" and "中偏高" tiers
///
/// Female: 0.563. Male by age bracket: <50 → 0.573, 50–70 → 0.695,
/// >70 → 0.835. Unknown age uses the youngest bracket.
pub fn mid_high_threshold(ctx: &PatientContext) -> f64 {
    match ctx.sex {
        Sex::Female => 0.563,
        Sex::Male => match ctx.beta_ctx_bracket() {
            BetaCtxAgeBracket::Under50 => 0.573,
            BetaCtxAgeBracket::From50To70 => 0.695,
            BetaCtxAgeBracket::Over70 => 0.835,
        },
    }
}

/// Classifies a β-CTX value (bone resorption marker)
///
/// # Algorithm
///
/// 1. `< 0.2` → 低 (flagged)
/// 2. `[0.2, 0.3)` → 中偏低 (flagged)
/// 3. `[0.3, T)` → 中, where T is [`mid_high_threshold`]
/// 4. `[T, 2.0)` → 中偏高
/// 5. `≥ 2.0` → 高 (flagged)
///
/// The two middle tiers are not flagged.
pub fn classify(value: f64, unit: &str, ctx: &PatientContext) -> Classification {
    let standard = ValueRange::between(LOW_MID_BELOW, HIGH_FROM);
    let preamble = Interpretation::new().with(ClauseKind::Preamble, PREAMBLE);

    if value < LOW_BELOW {
        let range = format!("β < 0.2{unit}");
        Classification {
            tier: Tier::Low,
            result: "低动力型",
            is_abnormal: true,
            interpretation: preamble
                .with(ClauseKind::Placement, format!("当前指标处于低区间：{range}。"))
                .with(
                    ClauseKind::Finding,
                    "骨吸收显著降低，破骨细胞活性不足，若骨密度 (T值) 低于-2.5，则为低动力型骨质疏松。\
                     常见于老年人、长期卧床或服用特定药物（如糖皮质激素）的患者。需要促进骨形成，而非抑制骨吸收。",
                ),
            medication_suggestion: "成骨治疗：使用特立帕肽。",
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: String::new(),
            reference: ValueRange::between(0.0, LOW_BELOW),
            standard,
        }
    } else if value < LOW_MID_BELOW {
        let range = format!("0.2 < β < 0.3{unit}");
        Classification {
            tier: Tier::LowMid,
            result: "中低型",
            is_abnormal: true,
            interpretation: preamble
                .with(
                    ClauseKind::Placement,
                    format!("当前指标处于{}的中低区间：{range}。", ctx.sex),
                )
                .with(
                    ClauseKind::Finding,
                    "骨吸收略有活跃，但仍处于低水平，骨质流失较缓慢。\
                     若骨密度 (T值) 低于-2.5，则为早期骨质疏松，需要进行基础干预和补充治疗。",
                ),
            medication_suggestion: "服钙剂、维生素D。",
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: String::new(),
            reference: ValueRange::between(LOW_BELOW, LOW_MID_BELOW),
            standard,
        }
    } else if value < HIGH_FROM {
        classify_middle(value, unit, ctx, preamble, standard)
    } else {
        let range = format!("β ≥ 2.0{unit}（约两倍参考值）");
        Classification {
            tier: Tier::High,
            result: "高动力型（继发性）",
            is_abnormal: true,
            interpretation: preamble
                .with(ClauseKind::Placement, format!("当前指标处于高区间：{range}。"))
                .with(
                    ClauseKind::Finding,
                    "骨吸收极为活跃，属于高动力型（继发性）骨质疏松，通常由 继发性病因（如甲状旁腺功能亢进）导致，\
                     病因明确的情况下，应先解决基础问题，再进行骨质疏松治疗。",
                ),
            medication_suggestion: ANTI_RESORPTIVE,
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: String::new(),
            reference: ValueRange::at_least(HIGH_FROM),
            standard,
        }
    }
}

/// Splits `[0.3, 2.0)` at the sex/age dependent threshold
fn classify_middle(
    value: f64,
    unit: &str,
    ctx: &PatientContext,
    preamble: Interpretation,
    standard: ValueRange,
) -> Classification {
    let threshold = mid_high_threshold(ctx);
    let shown = format_value(threshold);
    let (cohort, age_range) = match ctx.sex {
        Sex::Male => {
            let bracket = ctx.beta_ctx_bracket().label();
            (format!("{bracket}男性"), bracket.to_string())
        }
        Sex::Female => ("女性".to_string(), String::new()),
    };

    if value < threshold {
        let range = format!("0.3 < β < {shown}{unit}");
        Classification {
            tier: Tier::Mid,
            result: "中高动力型",
            is_abnormal: false,
            interpretation: preamble
                .with(
                    ClauseKind::Placement,
                    format!("当前指标处于{cohort}的中区间：{range}。"),
                )
                .with(
                    ClauseKind::Finding,
                    "骨吸收活性增强，若骨密度 (T值) 低于-2.5，则为中高动力型骨质疏松；\
                     多见于围绝经期女性或老年人。需要积极控制骨吸收，防止骨量进一步流失。",
                ),
            medication_suggestion: ANTI_RESORPTIVE,
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: age_range,
            reference: ValueRange::between(LOW_MID_BELOW, threshold),
            standard,
        }
    } else {
        let range = format!("{shown} < β < 2.0{unit}");
        let finding = match ctx.sex {
            Sex::Male => {
                "骨吸收显著活跃，骨代谢处于高动力状态，若骨密度 (T值) 低于-2.5，则为高动力型（原发性）骨质疏松。\
                 骨量快速流失，易发生骨折，需要加强抗骨吸收治疗。"
            }
            Sex::Female => {
                "骨吸收活性增强，属于中高动力型骨质疏松；多见于围绝经期女性或老年人。\
                 需要积极控制骨吸收，防止骨量进一步流失。"
            }
        };
        Classification {
            tier: Tier::MidHigh,
            result: "高动力型（原发性）",
            is_abnormal: false,
            interpretation: preamble
                .with(
                    ClauseKind::Placement,
                    format!("当前指标处于{cohort}的中高区间：{range}。"),
                )
                .with(ClauseKind::Finding, finding),
            medication_suggestion: ANTI_RESORPTIVE,
            guideline: GUIDELINE,
            reference_value_range: range,
            reference_age_range: age_range,
            reference: ValueRange::between(threshold, HIGH_FROM),
            standard,
        }
    }
}
