//! Error types for the models and matrices.

use std::fmt::Display;
use std::fmt::Formatter;

/// The given character is not a valid symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidSymbol(pub char);

impl Display for InvalidSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid symbol: {:?}", self.0)
    }
}

impl std::error::Error for InvalidSymbol {}

/// Invalid data was passed to initialize a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidData;

impl Display for InvalidData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid data")
    }
}

impl std::error::Error for InvalidData {}

/// An error raised while building or converting a model or a matrix.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A k-mer contains a symbol outside of `{A, C, G, T}`.
    InvalidKmer(String),
    /// A k-mer length is not supported by the model.
    InvalidLength { length: usize, max: usize },
    /// A matrix symbol outside of `{A, C, G, T}`.
    InvalidSymbol(char),
    /// A position range does not fit in the matrix.
    InvalidRange {
        start: usize,
        length: usize,
        available: usize,
    },
    /// A persisted record lacks one of its identifying fields.
    IncompleteMetadata(&'static str),
    /// A model type outside of `FREQUENCY` and `MARKOV`.
    UnsupportedModelType(String),
    /// A frequency column sums to zero and cannot be normalized.
    DegenerateConversion { position: usize },
    /// Frequencies that are not valid probabilities.
    InvalidData,
}

impl From<InvalidSymbol> for Error {
    fn from(error: InvalidSymbol) -> Self {
        Error::InvalidSymbol(error.0)
    }
}

impl From<InvalidData> for Error {
    fn from(_error: InvalidData) -> Self {
        Error::InvalidData
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidKmer(kmer) => write!(f, "invalid k-mer: {:?}", kmer),
            Error::InvalidLength { length, max } => {
                write!(f, "invalid k-mer length {} (expected 1..={})", length, max)
            }
            Error::InvalidSymbol(c) => write!(f, "invalid symbol: {:?}", c),
            Error::InvalidRange {
                start,
                length,
                available,
            } => write!(
                f,
                "range {}..{} out of bounds for matrix of length {}",
                start,
                start + length,
                available
            ),
            Error::IncompleteMetadata(field) => write!(f, "incomplete metadata: missing {}", field),
            Error::UnsupportedModelType(ty) => write!(f, "unsupported model type: {:?}", ty),
            Error::DegenerateConversion { position } => {
                write!(f, "column {} sums to zero and cannot be normalized", position)
            }
            Error::InvalidData => f.write_str("invalid data"),
        }
    }
}

impl std::error::Error for Error {}
