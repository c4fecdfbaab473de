pub mod category;
pub mod matcher;
pub mod scorecard;

pub use category::{ExpectedTotals, SecurityCategory};
pub use matcher::{
    AudioMatcher, ClientErrorMatcher, IndicatorMatcher, JsonFieldMatcher, MatchBasis, ResponseMatcher,
    StructuredErrorMatcher, Verdict,
};
pub use scorecard::{CategoryTally, Grade, Scorecard};
