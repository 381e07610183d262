use std::fmt;

/// Bone-metabolism indicator
///
/// The six required biochemical markers plus the optional bone-density
/// T-score. Each variant carries its static report key and request label;
/// classification dispatches on the variant, never on runtime data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    BetaCtx,
    P1np,
    VitaminD,
    NMid,
    Pth,
    Calcitonin,
    BoneDensity,
}

impl Indicator {
    /// Required biochemical markers, in request validation order
    pub const MARKERS: [Indicator; 6] = [
        Indicator::BetaCtx,
        Indicator::P1np,
        Indicator::VitaminD,
        Indicator::NMid,
        Indicator::Pth,
        Indicator::Calcitonin,
    ];

    /// All indicators in report order
    pub const ALL: [Indicator; 7] = [
        Indicator::BetaCtx,
        Indicator::P1np,
        Indicator::VitaminD,
        Indicator::NMid,
        Indicator::Pth,
        Indicator::Calcitonin,
        Indicator::BoneDensity,
    ];

    /// Returns the key used in serialized reports
    pub fn report_key(&self) -> &'static str {
        match self {
            Indicator::BetaCtx => "β_CTX_analysis",
            Indicator::P1np => "P1NP_analysis",
            Indicator::VitaminD => "VD_analysis",
            Indicator::NMid => "N_MID_analysis",
            Indicator::Pth => "PTH_analysis",
            Indicator::Calcitonin => "CT_analysis",
            Indicator::BoneDensity => "Bone_analysis",
        }
    }

    /// Returns the field label used in evaluation requests
    pub fn request_label(&self) -> &'static str {
        match self {
            Indicator::BetaCtx => "β-CTX",
            Indicator::P1np => "P1NP",
            Indicator::VitaminD => "25-Hydroxy Vitamin D",
            Indicator::NMid => "N-MID Osteocalcin",
            Indicator::Pth => "Parathyroid Hormone",
            Indicator::Calcitonin => "Calcitonin",
            Indicator::BoneDensity => "Bone Density",
        }
    }

    /// Returns whether this is one of the six required markers
    pub fn is_marker(&self) -> bool {
        !matches!(self, Indicator::BoneDensity)
    }

    /// Looks up an indicator by its report key
    pub fn from_report_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.report_key() == key)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.request_label())
    }
}

/// Patient sex, the first threshold-selection dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parses the request gender label ("男" / "女")
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim() {
            "男" => Some(Sex::Male),
            "女" => Some(Sex::Female),
            _ => None,
        }
    }

    /// Returns the request gender label
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "男",
            Sex::Female => "女",
        }
    }

    /// Returns the narrative form ("男性" / "女性")
    pub fn narrative(&self) -> &'static str {
        match self {
            Sex::Male => "男性",
            Sex::Female => "女性",
        }
    }

    pub fn is_male(&self) -> bool {
        matches!(self, Sex::Male)
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.narrative())
    }
}

/// Coarse classification bucket for one indicator value
///
/// Labels are shared across indicators: β-CTX uses the five-step
/// low/mid/high ladder, Vitamin D uses `SevereDeficiency`/`Low`/`Normal`,
/// PTH and Calcitonin report their upper tier as `Elevated`, and bone
/// density uses `Normal`/`Reduced`/`VeryLow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Low,
    LowMid,
    Mid,
    MidHigh,
    High,
    Normal,
    SevereDeficiency,
    Elevated,
    Reduced,
    VeryLow,
}

impl Tier {
    /// Returns the display label
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Low => "低",
            Tier::LowMid => "中偏低",
            Tier::Mid => "中",
            Tier::MidHigh => "中偏高",
            Tier::High => "高",
            Tier::Normal => "正常",
            Tier::SevereDeficiency => "严重不足",
            Tier::Elevated => "偏高",
            Tier::Reduced => "偏低",
            Tier::VeryLow => "过低",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
