use thiserror::Error;

mod domain_types;

pub use domain_types::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid taxonomy term: {term} - {reason}")]
    InvalidTerm { term: String, reason: String },

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Value out of bounds: {value}, expected {min}..={max}")]
    OutOfBounds { value: u64, min: u64, max: u64 },
}
