use super::{format_value, Indicator, Tier, ValueRange};
use std::fmt;

/// Role of one interpretation clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    /// What the indicator measures
    Preamble,
    /// Where the value sits: tier, cohort (sex / age bracket) and range
    Placement,
    /// How the bone-density T-score (or its absence) shapes the reading
    BoneDensity,
    /// Clinical meaning and recommended follow-up
    Finding,
}

/// One templated fragment of an interpretation
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub kind: ClauseKind,
    pub text: String,
}

/// Interpretation narrative assembled from clauses
///
/// Rendering concatenates clause texts in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Interpretation {
    clauses: Vec<Clause>,
}

impl Interpretation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a clause
    pub fn with(mut self, kind: ClauseKind, text: impl Into<String>) -> Self {
        self.clauses.push(Clause {
            kind,
            text: text.into(),
        });
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns the text of the first clause of the given kind
    pub fn clause(&self, kind: ClauseKind) -> Option<&str> {
        self.clauses
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.text.as_str())
    }

    pub fn has(&self, kind: ClauseKind) -> bool {
        self.clause(kind).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for clause in &self.clauses {
            write!(f, "{}", clause.text)?;
        }
        Ok(())
    }
}

/// Output of one classification procedure
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub tier: Tier,
    pub result: &'static str,
    pub is_abnormal: bool,
    pub interpretation: Interpretation,
    pub medication_suggestion: &'static str,
    pub guideline: &'static str,
    /// Display form of the boundary that selected the tier
    pub reference_value_range: String,
    /// Age bracket label, empty when the rule is not age-bracketed
    pub reference_age_range: String,
    /// Numeric bounds of the selected tier
    pub reference: ValueRange,
    /// Numeric bounds considered normal for this patient
    pub standard: ValueRange,
}

/// One indicator's value and classification outputs
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRecord {
    pub indicator: Indicator,
    pub name: String,
    pub unit: String,
    pub value: f64,

    pub tier: Option<Tier>,
    pub result: String,
    pub is_abnormal: bool,
    pub interpretation: Interpretation,
    pub medication_suggestion: String,
    pub guideline: String,

    pub reference_value_range: String,
    pub reference_age_range: String,
    pub reference: ValueRange,
    pub standard: ValueRange,
}

impl IndicatorRecord {
    /// Creates an unclassified record
    pub fn new(
        indicator: Indicator,
        name: impl Into<String>,
        unit: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            indicator,
            name: name.into(),
            unit: unit.into(),
            value,
            tier: None,
            result: String::new(),
            is_abnormal: false,
            interpretation: Interpretation::new(),
            medication_suggestion: String::new(),
            guideline: String::new(),
            reference_value_range: String::new(),
            reference_age_range: String::new(),
            reference: ValueRange::default(),
            standard: ValueRange::default(),
        }
    }

    pub fn is_classified(&self) -> bool {
        self.tier.is_some()
    }

    /// Stores a classification outcome on the record
    ///
    /// Range bounds the outcome leaves open keep their seeded values.
    pub fn apply(&mut self, outcome: Classification) {
        self.tier = Some(outcome.tier);
        self.result = outcome.result.to_string();
        self.is_abnormal = outcome.is_abnormal;
        self.interpretation = outcome.interpretation;
        self.medication_suggestion = outcome.medication_suggestion.to_string();
        self.guideline = outcome.guideline.to_string();
        self.reference_value_range = outcome.reference_value_range;
        self.reference_age_range = outcome.reference_age_range;
        self.reference = self.reference.overlay(outcome.reference);
        self.standard = self.standard.overlay(outcome.standard);
    }

    /// Returns "<value> <unit>" as shown in reports
    pub fn display_value(&self) -> String {
        format!("{} {}", format_value(self.value), self.unit)
    }

    /// Returns "<tier>区间 <range>" as shown in reports
    pub fn display_range(&self) -> String {
        let tier = self.tier.map(|t| t.label()).unwrap_or_default();
        format!("{}区间 {}", tier, self.reference_value_range)
    }

    /// One-line digest for logging
    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} -> {} / {} (abnormal: {})",
            self.indicator,
            self.display_value(),
            self.tier.map(|t| t.label()).unwrap_or("-"),
            self.result,
            self.is_abnormal
        )
    }
}
