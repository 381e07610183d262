//! Per-indicator classification procedures
//!
//! Each submodule holds one indicator's threshold resolution and narrative
//! composition. Procedures are pure: they read a value, its unit and the
//! [`PatientContext`], and return a [`Classification`].

pub mod beta_ctx;
pub mod bone_density;
pub mod calcitonin;
pub mod n_mid;
pub mod p1np;
pub mod pth;
pub mod vitamin_d;

use crate::types::{Classification, Indicator, IndicatorRecord, PatientContext};
use log::debug;

/// Runs the procedure for `indicator`
pub fn classify(
    indicator: Indicator,
    value: f64,
    unit: &str,
    ctx: &PatientContext,
) -> Classification {
    match indicator {
        Indicator::BetaCtx => beta_ctx::classify(value, unit, ctx),
        Indicator::P1np => p1np::classify(value, unit, ctx),
        Indicator::VitaminD => vitamin_d::classify(value, unit, ctx),
        Indicator::NMid => n_mid::classify(value, unit, ctx),
        Indicator::Pth => pth::classify(value, unit, ctx),
        Indicator::Calcitonin => calcitonin::classify(value, unit, ctx),
        Indicator::BoneDensity => bone_density::classify(value, unit, ctx),
    }
}

/// Classifies a seeded record in place
pub fn classify_record(record: &mut IndicatorRecord, ctx: &PatientContext) {
    let outcome = classify(record.indicator, record.value, &record.unit, ctx);
    record.apply(outcome);
    debug!("{}", record.summary_line());
}
