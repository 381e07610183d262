pub mod analysis;
pub mod api;
pub mod classification;
pub mod cli;
pub mod error;
pub mod report;
pub mod request;
pub mod summary;
pub mod types;

pub use analysis::{IndicatorPanel, MarkerValues};
pub use api::{AnalysisMode, AnalysisResult, BoneMetabolismAnalyzer, EvaluationResponse};
pub use classification::{classify, classify_record};
pub use cli::report::TextReport;
pub use error::{OsteocatError, Result};
pub use report::{IndicatorReport, Report};
pub use request::{EvaluationRequest, PatientBasicInfo};
pub use summary::{Summarizer, Summary, SummaryInput};
pub use types::*;
