use crate::classification::classify_record;
use crate::report::Report;
use crate::types::{format_value, Indicator, IndicatorRecord, PatientContext, ReferenceTable};
use log::info;

/// The six required marker values of one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerValues {
    pub beta_ctx: f64,
    pub p1np: f64,
    pub vitamin_d: f64,
    pub n_mid: f64,
    pub pth: f64,
    pub calcitonin: f64,
}

impl MarkerValues {
    /// Returns the value for a marker, `None` for bone density
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::BetaCtx => Some(self.beta_ctx),
            Indicator::P1np => Some(self.p1np),
            Indicator::VitaminD => Some(self.vitamin_d),
            Indicator::NMid => Some(self.n_mid),
            Indicator::Pth => Some(self.pth),
            Indicator::Calcitonin => Some(self.calcitonin),
            Indicator::BoneDensity => None,
        }
    }
}

/// Per-request set of indicator records
///
/// Holds one record per marker, plus a bone-density record when the
/// context carries a T-score. Records are seeded from a [`ReferenceTable`]
/// on construction and classified by [`IndicatorPanel::analyze`].
///
/// # Example
///
/// ```
/// use osteocat_core::{IndicatorPanel, MarkerValues, PatientContext, Sex, Tier, Indicator};
///
/// let ctx = PatientContext::new(Sex::Male, 35).with_bone_density(-1.0);
/// let values = MarkerValues {
///     beta_ctx: 1.0,
///     p1np: 33.0,
///     vitamin_d: 20.0,
///     n_mid: 15.0,
///     pth: 27.0,
///     calcitonin: 1.0,
/// };
///
/// let mut panel = IndicatorPanel::new(ctx, &values);
/// panel.analyze();
///
/// let ctx_record = panel.record(Indicator::BetaCtx).unwrap();
/// assert_eq!(ctx_record.tier, Some(Tier::MidHigh));
/// assert_eq!(panel.records().len(), 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPanel {
    context: PatientContext,
    records: Vec<IndicatorRecord>,
}

impl IndicatorPanel {
    /// Seeds records from the shared default table
    pub fn new(context: PatientContext, values: &MarkerValues) -> Self {
        Self::with_table(context, values, ReferenceTable::standard())
    }

    /// Seeds records from a custom table
    pub fn with_table(
        context: PatientContext,
        values: &MarkerValues,
        table: &ReferenceTable,
    ) -> Self {
        let mut records: Vec<IndicatorRecord> = Indicator::MARKERS
            .iter()
            .filter_map(|&i| values.get(i).map(|v| table.seed(i, v)))
            .collect();
        if let Some(t_score) = context.bone_density {
            records.push(table.seed(Indicator::BoneDensity, t_score));
        }
        Self { context, records }
    }

    pub fn context(&self) -> &PatientContext {
        &self.context
    }

    /// Records in report order
    pub fn records(&self) -> &[IndicatorRecord] {
        &self.records
    }

    pub fn record(&self, indicator: Indicator) -> Option<&IndicatorRecord> {
        self.records.iter().find(|r| r.indicator == indicator)
    }

    /// Runs every classification procedure
    pub fn analyze(&mut self) {
        let ctx = self.context;
        for record in &mut self.records {
            classify_record(record, &ctx);
        }
    }

    /// Serializes the records, optionally including the abnormal flag
    pub fn to_report(&self, include_abnormal: bool) -> Report {
        Report::from_records(&self.records, include_abnormal)
    }

    /// Logs the request inputs
    pub fn log_inputs(&self) {
        let ctx = &self.context;
        let age = ctx
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "缺失年龄信息".to_string());
        info!("===== Patient Indicators Analysis =====");
        info!("性别: {}，年龄: {}", ctx.sex, age);
        for record in &self.records {
            info!("{}: {}", record.indicator, record.display_value());
        }
        if ctx.bone_density.is_none() {
            info!("无骨密度数值");
        }
    }

    /// Returns the indicators flagged abnormal after analysis
    pub fn abnormal_indicators(&self) -> Vec<Indicator> {
        self.records
            .iter()
            .filter(|r| r.is_abnormal)
            .map(|r| r.indicator)
            .collect()
    }

    /// Renders a short "name=value" listing, used in logs
    pub fn value_digest(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{}={}", r.indicator, format_value(r.value)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
