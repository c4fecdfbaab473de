use serde::Serialize;

use super::category::{ExpectedTotals, SecurityCategory};

/// Pass count for one category. `passed` never exceeds `expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub category: SecurityCategory,
    pub passed: u32,
    pub expected: u32,
    /// Checks answered by the target's limiter, whether or not they counted.
    pub rate_limited: u32,
}

impl CategoryTally {
    pub fn new(category: SecurityCategory, expected: u32) -> Self {
        Self { category, passed: 0, expected, rate_limited: 0 }
    }

    /// Add one pass, saturating at the expected total.
    pub fn record_pass(self) -> Self {
        Self {
            passed: (self.passed + 1).min(self.expected),
            ..self
        }
    }

    pub fn record_rate_limited(self) -> Self {
        Self {
            rate_limited: self.rate_limited + 1,
            ..self
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.expected == 0 {
            return 0.0;
        }
        (self.passed as f64 * 100.0) / self.expected as f64
    }
}

/// Ordinal security grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    NeedsImprovement,
    Good,
    Excellent,
    Outstanding,
}

impl Grade {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 95.0 {
            Grade::Outstanding
        } else if pct >= 85.0 {
            Grade::Excellent
        } else if pct >= 70.0 {
            Grade::Good
        } else {
            Grade::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::Outstanding => "Outstanding (最優秀, production-ready)",
            Grade::Excellent => "Excellent (優秀)",
            Grade::Good => "Good (良好)",
            Grade::NeedsImprovement => "Needs improvement (要改善)",
        }
    }
}

/// Per-category tallies for one security run.
///
/// Passed by value through every category and reduced once at report time;
/// nothing holds a mutable reference to it across probes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    tallies: Vec<CategoryTally>,
}

impl Scorecard {
    pub fn new(totals: &ExpectedTotals) -> Self {
        let tallies = SecurityCategory::ALL
            .iter()
            .map(|category| CategoryTally::new(*category, totals.get(*category)))
            .collect();
        Self { tallies }
    }

    fn update(mut self, category: SecurityCategory, f: impl FnOnce(CategoryTally) -> CategoryTally) -> Self {
        if let Some(tally) = self.tallies.iter_mut().find(|t| t.category == category) {
            *tally = f(*tally);
        }
        self
    }

    pub fn record_pass(self, category: SecurityCategory) -> Self {
        self.update(category, CategoryTally::record_pass)
    }

    pub fn record_rate_limited(self, category: SecurityCategory) -> Self {
        self.update(category, CategoryTally::record_rate_limited)
    }

    pub fn tally(&self, category: SecurityCategory) -> Option<&CategoryTally> {
        self.tallies.iter().find(|t| t.category == category)
    }

    pub fn tallies(&self) -> &[CategoryTally] {
        &self.tallies
    }

    pub fn total_passed(&self) -> u32 {
        self.tallies.iter().map(|t| t.passed).sum()
    }

    pub fn total_expected(&self) -> u32 {
        self.tallies.iter().map(|t| t.expected).sum()
    }

    /// Sum of passed over sum of expected, in percent.
    pub fn overall_percentage(&self) -> f64 {
        let expected = self.total_expected();
        if expected == 0 {
            return 0.0;
        }
        (self.total_passed() as f64 * 100.0) / expected as f64
    }

    /// Overall percentage at the one decimal the scorecard prints.
    pub fn displayed_percentage(&self) -> f64 {
        (self.overall_percentage() * 10.0).round() / 10.0
    }

    /// Graded on the printed value.
    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.displayed_percentage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold_passes(card: Scorecard, category: SecurityCategory, n: u32) -> Scorecard {
        (0..n).fold(card, |card, _| card.record_pass(category))
    }

    #[test]
    fn test_tally_caps_at_expected() {
        let card = fold_passes(Scorecard::new(&ExpectedTotals::standard()), SecurityCategory::RateLimiting, 10);
        let tally = card.tally(SecurityCategory::RateLimiting).unwrap();
        assert_eq!(tally.passed, 3);
        assert_eq!(tally.percentage(), 100.0);
    }

    #[test]
    fn test_zero_expected_is_zero_percent() {
        let totals = ExpectedTotals::standard().with(SecurityCategory::NumericAttacks, 0);
        let card = Scorecard::new(&totals).record_pass(SecurityCategory::NumericAttacks);
        let tally = card.tally(SecurityCategory::NumericAttacks).unwrap();
        assert_eq!(tally.passed, 0);
        assert_eq!(tally.percentage(), 0.0);
    }

    #[test]
    fn test_overall_percentage_exact() {
        let mut card = Scorecard::new(&ExpectedTotals::standard());
        for category in SecurityCategory::ALL {
            card = fold_passes(card, category, category.default_expected());
        }
        assert_eq!(card.total_passed(), 29);
        assert_eq!(card.overall_percentage(), 100.0);
        assert_eq!(card.grade(), Grade::Outstanding);
    }

    #[test]
    fn test_grade_thresholds_are_strict() {
        assert_eq!(Grade::from_percentage(95.0), Grade::Outstanding);
        assert_eq!(Grade::from_percentage(94.9), Grade::Excellent);
        assert_eq!(Grade::from_percentage(85.0), Grade::Excellent);
        assert_eq!(Grade::from_percentage(84.99), Grade::Good);
        assert_eq!(Grade::from_percentage(70.0), Grade::Good);
        assert_eq!(Grade::from_percentage(69.9), Grade::NeedsImprovement);
    }

    #[test]
    fn test_nineteen_of_twenty_is_outstanding() {
        let totals = ExpectedTotals::standard()
            .with(SecurityCategory::BasicFunctionality, 20)
            .with(SecurityCategory::InjectionAttacks, 0)
            .with(SecurityCategory::XssAttacks, 0)
            .with(SecurityCategory::InputValidation, 0)
            .with(SecurityCategory::NumericAttacks, 0)
            .with(SecurityCategory::RateLimiting, 0);
        let card = fold_passes(Scorecard::new(&totals), SecurityCategory::BasicFunctionality, 19);
        assert_eq!(card.overall_percentage(), 95.0);
        assert_eq!(card.grade(), Grade::Outstanding);
    }

    fn basic_only(expected: u32) -> ExpectedTotals {
        SecurityCategory::ALL
            .iter()
            .fold(ExpectedTotals::standard(), |totals, category| totals.with(*category, 0))
            .with(SecurityCategory::BasicFunctionality, expected)
    }

    #[test]
    fn test_grade_follows_displayed_value() {
        let card = fold_passes(Scorecard::new(&basic_only(2500)), SecurityCategory::BasicFunctionality, 2374);
        assert!(card.overall_percentage() < 95.0);
        assert_eq!(card.displayed_percentage(), 95.0);
        assert_eq!(card.grade(), Grade::Outstanding);

        let card = fold_passes(Scorecard::new(&basic_only(2500)), SecurityCategory::BasicFunctionality, 2373);
        assert_eq!(card.displayed_percentage(), 94.9);
        assert_eq!(card.grade(), Grade::Excellent);
    }

    #[test]
    fn test_rate_limited_tracked_separately() {
        let card = Scorecard::new(&ExpectedTotals::standard())
            .record_rate_limited(SecurityCategory::InputValidation)
            .record_pass(SecurityCategory::InputValidation);
        let tally = card.tally(SecurityCategory::InputValidation).unwrap();
        assert_eq!((tally.passed, tally.rate_limited), (1, 1));
    }
}
