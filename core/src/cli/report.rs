use crate::api::AnalysisResult;
use std::fmt;

/// Text report formatter for an evaluation result
pub struct TextReport<'a> {
    result: &'a AnalysisResult,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(result: &'a AnalysisResult) -> Self {
        Self { result }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bone Metabolism Analysis")?;
        writeln!(f, "========================")?;
        writeln!(f)?;

        for (indicator, entry) in self.result.indicators.entries() {
            let marker = if entry.is_abnormal == Some(true) {
                " [abnormal]"
            } else {
                ""
            };
            writeln!(f, "{}{}", entry.title, marker)?;
            writeln!(f, "  Indicator:      {}", indicator)?;
            writeln!(f, "  Value:          {}", entry.current_value)?;
            writeln!(f, "  Range:          {}", entry.range)?;
            writeln!(f, "  Result:         {}", entry.result)?;
            writeln!(f, "  Interpretation: {}", entry.interpretation)?;
            if !entry.medication_suggestion.is_empty() {
                writeln!(f, "  Suggestion:     {}", entry.medication_suggestion)?;
            }
            writeln!(f, "  Guideline:      {}", entry.guideline)?;
            writeln!(f)?;
        }

        if let Some(summary) = &self.result.summary {
            writeln!(f, "Comprehensive Summary")?;
            writeln!(f, "---------------------")?;
            writeln!(f, "结论解读: {}", summary.conclusion)?;
            writeln!(f, "用药建议: {}", summary.medication)?;
            writeln!(f, "生活方式建议: {}", summary.lifestyle)?;
            writeln!(f, "参考依据: {}", summary.references)?;
            writeln!(f, "复诊建议: {}", summary.follow_up)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{IndicatorPanel, MarkerValues};
    use crate::summary::Summary;
    use crate::types::{PatientContext, Sex};

    fn result(ctx: PatientContext, values: MarkerValues) -> AnalysisResult {
        let mut panel = IndicatorPanel::new(ctx, &values);
        panel.analyze();
        AnalysisResult {
            indicators: panel.to_report(true),
            summary: None,
        }
    }

    fn values() -> MarkerValues {
        MarkerValues {
            beta_ctx: 1.0,
            p1np: 33.0,
            vitamin_d: 12.0,
            n_mid: 15.0,
            pth: 27.0,
            calcitonin: 1.0,
        }
    }

    #[test]
    fn test_text_report_format() {
        let result = result(
            PatientContext::new(Sex::Male, 35).with_bone_density(-1.0),
            values(),
        );
        let output = format!("{}", TextReport::new(&result));

        assert!(output.contains("Bone Metabolism Analysis"));
        assert!(output.contains("β-胶原特殊序列(β-ctx) 指标解读\n"));
        assert!(output.contains("  Value:          1.0 ng/ml"));
        assert!(output.contains("  Result:         维生素D缺乏"));
        assert!(output.contains("  Suggestion:     抗骨治疗：双膦酸盐、地舒单抗"));
        assert!(output.contains("[abnormal]"));
        assert!(!output.contains("Comprehensive Summary"));
    }

    #[test]
    fn test_text_report_includes_summary() {
        let mut result = result(PatientContext::new(Sex::Female, 60), values());
        result.summary = Some(Summary {
            conclusion: "骨吸收增强".to_string(),
            medication: "补钙".to_string(),
            lifestyle: "日照".to_string(),
            references: "指南".to_string(),
            follow_up: "3个月后复查".to_string(),
        });
        let output = TextReport::new(&result).to_string();
        assert!(output.contains("Comprehensive Summary"));
        assert!(output.contains("复诊建议: 3个月后复查"));
        assert!(!output.contains("Bone Density"));
    }
}
