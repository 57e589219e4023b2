//! Error types for grammar loading and generation runs

use thiserror::Error;

/// Configuration problems, always detected before any expansion work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grammar has no rules")]
    EmptyRules,
    #[error("grammar axiom is empty")]
    EmptyAxiom,
    #[error("rule {index}: input must be exactly one symbol, got {input:?}")]
    InvalidRuleInput { index: usize, input: String },
    #[error("rule {index} ({input}): probability must be finite and >= 0, got {probability}")]
    InvalidProbability {
        index: usize,
        input: char,
        probability: f64,
    },
    #[error("iterations must be non-negative, got {0}")]
    NegativeIterations(i64),
    #[error("iterations {0} do not fit in 32 bits")]
    IterationsOutOfRange(i64),
    #[error("iterations {requested} exceed the configured limit of {limit}")]
    TooManyIterations { requested: u32, limit: u32 },
    #[error("seed {seed:?} is malformed: {reason}")]
    MalformedSeed { seed: String, reason: &'static str },
    #[error("{field} is out of range: {value}")]
    InvalidParameter { field: &'static str, value: f64 },
    #[error("initial direction must be a non-zero vector")]
    ZeroDirection,
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    #[error("unknown grammar: {0}")]
    UnknownGrammar(String),
}

/// Failure of a single generation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("expansion exceeded {limit} symbols during iteration {iteration}")]
    ExpansionTooLarge { iteration: u32, limit: usize },
}

pub type GenerateResult<T> = Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: GenerateError = ConfigError::EmptyRules.into();
        assert_eq!(err.to_string(), "grammar has no rules");
    }

    #[test]
    fn test_expansion_message() {
        let err = GenerateError::ExpansionTooLarge {
            iteration: 3,
            limit: 100,
        };
        assert_eq!(
            err.to_string(),
            "expansion exceeded 100 symbols during iteration 3"
        );
    }
}
