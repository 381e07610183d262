//! Core type definitions for bone-metabolism classification
//!
//! This module provides the fundamental types used throughout the osteocat library:
//! - [`Indicator`]: The six biochemical markers plus bone density
//! - [`Sex`] and [`PatientContext`]: Threshold-selection inputs
//! - [`Tier`]: Coarse classification buckets
//! - [`IndicatorRecord`]: One indicator's value and classification outputs
//! - [`Interpretation`]: Narrative built from composable [`Clause`]s
//! - [`ReferenceTable`]: Per-indicator defaults applied before classification

mod context;
mod enums;
mod range;
mod record;
mod reference;

pub use context::{
    BetaCtxAgeBracket, NMidAgeBracket, PatientContext, BONE_DENSITY_DEFICIENT_BELOW,
};
pub use enums::{Indicator, Sex, Tier};
pub use range::{format_value, ValueRange};
pub use record::{Classification, Clause, ClauseKind, IndicatorRecord, Interpretation};
pub use reference::{ReferenceEntry, ReferenceTable};
