use log::warn;

use super::MatrixMetadata;
use super::WeightMatrix;
use crate::abc::Alphabet;
use crate::abc::Dna;
use crate::abc::Nucleotide;
use crate::abc::Symbol;
use crate::err::Error;

/// A persisted weight of a matrix.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixRow {
    pub position: usize,
    pub symbol: char,
    pub weight: f32,
}

impl MatrixRow {
    /// Create a new row.
    pub fn new(position: usize, symbol: char, weight: f32) -> Self {
        Self {
            position,
            symbol,
            weight,
        }
    }
}

impl WeightMatrix {
    /// Load a matrix from its metadata and persisted rows.
    ///
    /// Rows may come in any order, and symbols may be lowercase. The matrix
    /// length is given by the largest position; weights missing from the
    /// rows are left unfilled (`NaN`). Units are detected once all rows are
    /// read.
    pub fn from_rows<I>(metadata: MatrixMetadata, rows: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = MatrixRow>,
    {
        let rows = rows
            .into_iter()
            .map(|row| -> Result<_, Error> {
                let symbol = Nucleotide::from_char(row.symbol)?;
                Ok((row.position, symbol, row.weight))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let length = rows.iter().map(|&(pos, _, _)| pos + 1).max().unwrap_or(0);

        let mut matrix = Self::unfilled(metadata, length);
        for (pos, symbol, weight) in rows {
            matrix.set(pos, symbol, weight);
        }
        let missing = matrix.data.iter().flatten().filter(|w| w.is_nan()).count();
        if missing > 0 {
            warn!(
                "{} weights missing from rows of {:?}",
                missing,
                matrix.metadata.name()
            );
        }
        matrix.set_log_odds();
        Ok(matrix)
    }

    /// The persisted rows of this matrix, sorted by position then symbol.
    pub fn rows(&self) -> Vec<MatrixRow> {
        let mut rows = Vec::with_capacity(self.len() * 4);
        for (position, weights) in self.data.iter().enumerate() {
            for (&symbol, &weight) in Dna::symbols().iter().zip(weights) {
                rows.push(MatrixRow::new(position, symbol.as_char(), weight));
            }
        }
        rows
    }
}
