use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Scored categories of the security suite, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityCategory {
    BasicFunctionality,
    InjectionAttacks,
    XssAttacks,
    InputValidation,
    NumericAttacks,
    RateLimiting,
}

impl SecurityCategory {
    pub const ALL: [SecurityCategory; 6] = [
        Self::BasicFunctionality,
        Self::InjectionAttacks,
        Self::XssAttacks,
        Self::InputValidation,
        Self::NumericAttacks,
        Self::RateLimiting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicFunctionality => "basic_functionality",
            Self::InjectionAttacks => "injection_attacks",
            Self::XssAttacks => "xss_attacks",
            Self::InputValidation => "input_validation",
            Self::NumericAttacks => "numeric_attacks",
            Self::RateLimiting => "rate_limiting",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BasicFunctionality => "Basic functionality",
            Self::InjectionAttacks => "Command injection defense",
            Self::XssAttacks => "XSS defense",
            Self::InputValidation => "Input validation",
            Self::NumericAttacks => "Numeric parameter defense",
            Self::RateLimiting => "Rate limiting",
        }
    }

    /// Number of scored checks the standard suite runs for this category.
    pub fn default_expected(&self) -> u32 {
        match self {
            Self::BasicFunctionality => 3,
            Self::InjectionAttacks => 8,
            Self::XssAttacks => 6,
            Self::InputValidation => 5,
            Self::NumericAttacks => 4,
            Self::RateLimiting => 3,
        }
    }
}

impl std::fmt::Display for SecurityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected-total table. Missing entries fall back to the standard totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedTotals {
    overrides: BTreeMap<SecurityCategory, u32>,
}

impl ExpectedTotals {
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: SecurityCategory, expected: u32) -> Self {
        self.overrides.insert(category, expected);
        self
    }

    pub fn get(&self, category: SecurityCategory) -> u32 {
        self.overrides
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_expected())
    }

    pub fn total(&self) -> u32 {
        SecurityCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_totals_sum() {
        assert_eq!(ExpectedTotals::standard().total(), 29);
    }

    #[test]
    fn test_override_replaces_single_category() {
        let totals = ExpectedTotals::standard().with(SecurityCategory::RateLimiting, 5);
        assert_eq!(totals.get(SecurityCategory::RateLimiting), 5);
        assert_eq!(totals.get(SecurityCategory::XssAttacks), 6);
        assert_eq!(totals.total(), 31);
    }

    #[test]
    fn test_category_serde_names() {
        let parsed: SecurityCategory = serde_json::from_str("\"xss_attacks\"").unwrap();
        assert_eq!(parsed, SecurityCategory::XssAttacks);
        assert_eq!(SecurityCategory::InputValidation.to_string(), "input_validation");
    }

    #[test]
    fn test_totals_deserialize_from_yaml_map() {
        let totals: ExpectedTotals = serde_yaml::from_str("numeric_attacks: 2\n").unwrap();
        assert_eq!(totals.get(SecurityCategory::NumericAttacks), 2);
        assert_eq!(totals.get(SecurityCategory::InjectionAttacks), 8);
    }
}
