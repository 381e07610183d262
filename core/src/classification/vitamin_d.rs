use crate::types::{Classification, ClauseKind, Interpretation, PatientContext, Tier, ValueRange};

const DEFICIENT_BELOW: f64 = 20.0;
const SUFFICIENT_FROM: f64 = 30.0;

const GUIDELINE: &str =
    "25-羟基维生素D（25-Hydroxyvitamin D）.pdf、《骨转换生化标志物临床应用指南》2021版.pdf";

/// Classifies a 25-hydroxy vitamin D value
///
/// `< 20` → 严重不足 (flagged), `[20, 30)` → 低, `≥ 30` → 正常.
/// The insufficient `[20, 30)` tier is not flagged.
pub fn classify(value: f64, unit: &str, _ctx: &PatientContext) -> Classification {
    let standard = ValueRange::between(DEFICIENT_BELOW, SUFFICIENT_FROM);

    if value < DEFICIENT_BELOW {
        Classification {
            tier: Tier::SevereDeficiency,
            result: "维生素D缺乏",
            is_abnormal: true,
            interpretation: Interpretation::new().with(
                ClauseKind::Finding,
                "维生素D严重不足，可能导致钙吸收降低，引发骨质疏松、骨软化甚至低钙血症。\
                 老年人、孕妇、长期日照不足者或肝肾功能不全患者常见。需快速补充维生素D，避免进一步骨质流失或并发症。",
            ),
            medication_suggestion: "",
            guideline: GUIDELINE,
            reference_value_range: format!("VD < 20{unit}"),
            reference_age_range: String::new(),
            reference: ValueRange::below(DEFICIENT_BELOW),
            standard,
        }
    } else if value < SUFFICIENT_FROM {
        Classification {
            tier: Tier::Low,
            result: "维生素D不足",
            is_abnormal: false,
            interpretation: Interpretation::new().with(
                ClauseKind::Finding,
                "维生素D水平低于理想范围，但尚未导致严重代谢紊乱。\
                 钙吸收率下降，可能存在轻度骨质减少，长期维持此状态会增加骨质疏松风险。",
            ),
            medication_suggestion: "",
            guideline: GUIDELINE,
            reference_value_range: format!("20 ≤ VD < 30{unit}"),
            reference_age_range: String::new(),
            reference: ValueRange::between(DEFICIENT_BELOW, SUFFICIENT_FROM),
            standard,
        }
    } else {
        Classification {
            tier: Tier::Normal,
            result: "维生素D充足",
            is_abnormal: false,
            interpretation: Interpretation::new().with(
                ClauseKind::Finding,
                "维生素D水平在理想范围内，钙吸收效率高，骨代谢处于正常状态。",
            ),
            medication_suggestion: "",
            guideline: GUIDELINE,
            reference_value_range: format!("VD ≥ 30{unit}"),
            reference_age_range: String::new(),
            reference: ValueRange::at_least(SUFFICIENT_FROM),
            standard,
        }
    }
}
