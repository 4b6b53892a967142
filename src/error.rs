use thiserror::Error;

/// Ways a solve can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No probe length in `1..=max` was accepted by the oracle.
    #[error("secret length not found in 1..={max}")]
    LengthNotFound { max: usize },
    /// The oracle answered -1 to a candidate built from the alphabet.
    #[error("oracle rejected {candidate} as containing an invalid symbol")]
    InvalidSymbol { candidate: String },
    /// The oracle broke its contract.
    #[error("oracle answered {candidate} inconsistently: {reason}")]
    Oracle { candidate: String, reason: String },
    /// The arrangement search used up its budget without a full match.
    #[error("arrangement search gave up after {attempts} attempts")]
    FallbackExhausted { attempts: usize },
    /// Position resolution ended short of a full match and no fallback was allowed.
    #[error("best candidate {best} only matched {score} positions")]
    Unresolved { best: String, score: usize },
    /// A secret handed to the reference oracle was malformed.
    #[error("invalid secret: {0}")]
    InvalidSecret(String),
}

pub type Result<T> = std::result::Result<T, Error>;
