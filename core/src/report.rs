//! Serialized per-indicator report
//!
//! Field names are a compatibility contract with the presentation layer and
//! the summarization prompt; they must not change.

use crate::types::{Indicator, IndicatorRecord};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One indicator's entry in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReport {
    #[serde(rename = "标题")]
    pub title: String,
    #[serde(rename = "当前值")]
    pub current_value: String,
    #[serde(rename = "参考区间")]
    pub range: String,
    #[serde(rename = "指标结果")]
    pub result: String,
    #[serde(rename = "指标解读")]
    pub interpretation: String,
    #[serde(rename = "用药建议")]
    pub medication_suggestion: String,
    #[serde(rename = "参考文件")]
    pub guideline: String,
    /// Present only in the flagged serialization mode
    #[serde(rename = "是否异常", default, skip_serializing_if = "Option::is_none")]
    pub is_abnormal: Option<bool>,
}

impl IndicatorReport {
    pub fn from_record(record: &IndicatorRecord, include_abnormal: bool) -> Self {
        Self {
            title: format!("{} 指标解读", record.name),
            current_value: record.display_value(),
            range: record.display_range(),
            result: record.result.clone(),
            interpretation: record.interpretation.to_string(),
            medication_suggestion: record.medication_suggestion.clone(),
            guideline: record.guideline.clone(),
            is_abnormal: include_abnormal.then_some(record.is_abnormal),
        }
    }
}

/// Ordered mapping from report key to indicator entry
///
/// Serializes as a JSON object keyed by [`Indicator::report_key`], in
/// record order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    entries: Vec<(Indicator, IndicatorReport)>,
}

impl Report {
    pub fn from_records(records: &[IndicatorRecord], include_abnormal: bool) -> Self {
        Self {
            entries: records
                .iter()
                .map(|r| (r.indicator, IndicatorReport::from_record(r, include_abnormal)))
                .collect(),
        }
    }

    pub fn get(&self, indicator: Indicator) -> Option<&IndicatorReport> {
        self.entries
            .iter()
            .find(|(i, _)| *i == indicator)
            .map(|(_, entry)| entry)
    }

    pub fn entries(&self) -> &[(Indicator, IndicatorReport)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (indicator, entry) in &self.entries {
            map.serialize_entry(indicator.report_key(), entry)?;
        }
        map.end()
    }
}
