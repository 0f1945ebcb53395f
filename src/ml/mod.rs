//! Profitability prediction
//!
//! "ML" in this bot's sense: a fixed-weight, explainable rule engine, not a
//! trained model. Every score carries the ordered list of reasons that
//! produced it, so a recommendation can always be justified.
//!
//! The scorer itself is a pure function over explicit inputs; the predictor
//! wraps it with the store lookups needed to assemble those inputs.

mod predictor;
mod scorer;

#[cfg(test)]
mod tests;

pub use predictor::{MlPredictor, Recommendation};
pub use scorer::{FeatureSnapshot, Profitability, ProfitabilityScorer, ProfitabilitySignal};
