use thiserror::Error;

pub type Result<T> = std::result::Result<T, CalcError>;

/// Reasons a calculation refuses to produce a series or metric.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("{name} series is empty")]
    EmptySeries { name: &'static str },

    #[error("series length mismatch: {left} has {left_len} values, {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("principal must be a positive finite amount, got {0}")]
    InvalidPrincipal(f64),

    #[error("{what} must be between {min} and {max}, got {value}")]
    OutOfRange {
        what: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("{what} must be finite")]
    NonFinite { what: &'static str },

    #[error("price at index {index} is invalid: {value}")]
    InvalidPrice { index: usize, value: f64 },

    #[error("CAGR is undefined for start value {start}, end value {end} over {years} years")]
    UndefinedCagr { start: f64, end: f64, years: usize },
}
