use super::{Indicator, IndicatorRecord, ValueRange};
use std::sync::OnceLock;

/// Display metadata and coarse default range for one indicator
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    pub name: String,
    pub unit: String,
    pub range: ValueRange,
}

impl ReferenceEntry {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            range: ValueRange::between(min, max),
        }
    }
}

/// Per-indicator defaults applied before classification
///
/// Every record is seeded from this table so that its name, unit and
/// reference/standard ranges are deterministic even before a
/// classification branch overrides them. The table always holds exactly
/// one entry per [`Indicator`].
///
/// # Example
///
/// ```
/// use osteocat_core::{Indicator, ReferenceEntry, ReferenceTable};
///
/// let table = ReferenceTable::default()
///     .with_entry(Indicator::Calcitonin, ReferenceEntry::new("降钙素(CT)", "pg/ml", 0.0, 50.0));
///
/// assert_eq!(table.entry(Indicator::Calcitonin).range.max, Some(50.0));
/// assert_eq!(table.entry(Indicator::P1np).unit, "μg/ml");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    entries: [ReferenceEntry; 7],
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self {
            entries: [
                ReferenceEntry::new("β-胶原特殊序列(β-ctx)", "ng/ml", 0.0, 4.0),
                ReferenceEntry::new("总I型胶原氨基端延长肽(P1NP)", "μg/ml", 10.0, 90.0),
                ReferenceEntry::new("25-羟基维生素D(VD)", "ng/ml", 0.0, 100.0),
                ReferenceEntry::new("N端中段骨钙素(N-MID)", "ng/ml", 0.0, 200.0),
                ReferenceEntry::new("甲状旁腺激素(PTH)", "ng/ml", 0.0, 100.0),
                ReferenceEntry::new("降钙素(CT)", "pg/ml", 0.0, 40.0),
                ReferenceEntry::new("骨密度T值", "", -5.0, 5.0),
            ],
        }
    }
}

impl ReferenceTable {
    /// Returns the shared read-only default table
    pub fn standard() -> &'static ReferenceTable {
        static TABLE: OnceLock<ReferenceTable> = OnceLock::new();
        TABLE.get_or_init(ReferenceTable::default)
    }

    /// Builder: replace the entry for one indicator
    pub fn with_entry(mut self, indicator: Indicator, entry: ReferenceEntry) -> Self {
        self.entries[slot(indicator)] = entry;
        self
    }

    pub fn entry(&self, indicator: Indicator) -> &ReferenceEntry {
        &self.entries[slot(indicator)]
    }

    /// Creates an unclassified record carrying this table's defaults
    pub fn seed(&self, indicator: Indicator, value: f64) -> IndicatorRecord {
        let entry = self.entry(indicator);
        let mut record = IndicatorRecord::new(indicator, &entry.name, &entry.unit, value);
        record.reference = entry.range;
        record.standard = entry.range;
        record
    }
}

fn slot(indicator: Indicator) -> usize {
    match indicator {
        Indicator::BetaCtx => 0,
        Indicator::P1np => 1,
        Indicator::VitaminD => 2,
        Indicator::NMid => 3,
        Indicator::Pth => 4,
        Indicator::Calcitonin => 5,
        Indicator::BoneDensity => 6,
    }
}
