use super::Sex;
use std::fmt;

/// Bone-density T-score below which N-MID and PTH treat the patient as
/// osteoporotic. Comparison is strict: a T-score of exactly -2.5 is not
/// deficient here, although the bone-density tier itself calls it "过低".
pub const BONE_DENSITY_DEFICIENT_BELOW: f64 = -2.5;

/// Per-request patient context
///
/// Built fresh for every evaluation. `age == None` means the age is unknown;
/// age-bracketed rules then fall into their youngest bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatientContext {
    pub sex: Sex,
    pub age: Option<u32>,
    pub bone_density: Option<f64>,
}

impl PatientContext {
    /// Creates a context without a bone-density measurement
    ///
    /// An age of `0` is the request's "unknown" sentinel.
    pub fn new(sex: Sex, age: u32) -> Self {
        Self {
            sex,
            age: (age > 0).then_some(age),
            bone_density: None,
        }
    }

    /// Builder: attach a bone-density T-score
    pub fn with_bone_density(mut self, t_score: f64) -> Self {
        self.bone_density = Some(t_score);
        self
    }

    pub fn has_bone_density(&self) -> bool {
        self.bone_density.is_some()
    }

    pub fn is_male(&self) -> bool {
        self.sex.is_male()
    }

    /// Returns `None` without a bone-density value, otherwise whether the
    /// T-score falls below -2.5
    pub fn bone_density_deficient(&self) -> Option<bool> {
        self.bone_density
            .map(|t| t < BONE_DENSITY_DEFICIENT_BELOW)
    }

    /// Age bracket used by the male β-CTX threshold
    pub fn beta_ctx_bracket(&self) -> BetaCtxAgeBracket {
        BetaCtxAgeBracket::for_age(self.age)
    }

    /// Age bracket used by the N-MID reference table
    pub fn n_mid_bracket(&self) -> NMidAgeBracket {
        NMidAgeBracket::for_age(self.age)
    }
}

/// Male β-CTX age bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BetaCtxAgeBracket {
    Under50,
    From50To70,
    Over70,
}

impl BetaCtxAgeBracket {
    pub fn for_age(age: Option<u32>) -> Self {
        match age.unwrap_or(0) {
            a if a < 50 => BetaCtxAgeBracket::Under50,
            50..=70 => BetaCtxAgeBracket::From50To70,
            _ => BetaCtxAgeBracket::Over70,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BetaCtxAgeBracket::Under50 => "50岁以下",
            BetaCtxAgeBracket::From50To70 => "50~70岁之间",
            BetaCtxAgeBracket::Over70 => "70岁以上",
        }
    }
}

impl fmt::Display for BetaCtxAgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// N-MID osteocalcin age bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NMidAgeBracket {
    UpTo29,
    From30To50,
    From51To70,
    Over70,
}

impl NMidAgeBracket {
    pub fn for_age(age: Option<u32>) -> Self {
        match age.unwrap_or(0) {
            0..=29 => NMidAgeBracket::UpTo29,
            30..=50 => NMidAgeBracket::From30To50,
            51..=70 => NMidAgeBracket::From51To70,
            _ => NMidAgeBracket::Over70,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NMidAgeBracket::UpTo29 => "18~29岁",
            NMidAgeBracket::From30To50 => "30~50岁",
            NMidAgeBracket::From51To70 => "51~70岁",
            NMidAgeBracket::Over70 => "70岁以上",
        }
    }
}

impl fmt::Display for NMidAgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_zero_age_is_unknown() {
        let ctx = PatientContext::new(Sex::Male, 0);
        assert_eq!(ctx.age, None);
        assert_eq!(ctx.beta_ctx_bracket(), BetaCtxAgeBracket::Under50);
        assert_eq!(ctx.n_mid_bracket(), NMidAgeBracket::UpTo29);
    }

    #[rstest]
    #[case(49, BetaCtxAgeBracket::Under50)]
    #[case(50, BetaCtxAgeBracket::From50To70)]
    #[case(70, BetaCtxAgeBracket::From50To70)]
    #[case(71, BetaCtxAgeBracket::Over70)]
    fn test_beta_ctx_brackets(#[case] age: u32, #[case] expected: BetaCtxAgeBracket) {
        assert_eq!(BetaCtxAgeBracket::for_age(Some(age)), expected);
    }

    #[rstest]
    #[case(29, NMidAgeBracket::UpTo29)]
    #[case(30, NMidAgeBracket::From30To50)]
    #[case(50, NMidAgeBracket::From30To50)]
    #[case(51, NMidAgeBracket::From51To70)]
    #[case(70, NMidAgeBracket::From51To70)]
    #[case(71, NMidAgeBracket::Over70)]
    fn test_n_mid_brackets(#[case] age: u32, #[case] expected: NMidAgeBracket) {
        assert_eq!(NMidAgeBracket::for_age(Some(age)), expected);
    }

    #[test]
    fn test_bone_density_deficiency_is_strict() {
        let ctx = PatientContext::new(Sex::Female, 60);
        assert_eq!(ctx.bone_density_deficient(), None);
        assert!(!ctx.has_bone_density());

        assert_eq!(ctx.with_bone_density(-2.5).bone_density_deficient(), Some(false));
        assert_eq!(ctx.with_bone_density(-2.51).bone_density_deficient(), Some(true));
        assert!(ctx.with_bone_density(0.0).has_bone_density());
    }
}
