//! Position weight matrices describing sequence motifs.
//!
//! A [`WeightMatrix`] stores one weight per position and nucleotide, either
//! as frequencies or as log-odds scores against a background composition.
//!
//! # Example
//! ```
//! # use bgmotif::abc::*;
//! # use bgmotif::pwm::*;
//! let mut pwm = WeightMatrix::from_columns(
//!     MatrixMetadata::new("MA0001", "1"),
//!     [[0.7, 0.1, 0.1, 0.1], [0.45, 0.0, 0.45, 0.1]],
//! )
//! .unwrap();
//! assert_eq!(pwm.consensus(), "AR");
//!
//! pwm.to_log_odds(None);
//! assert!(pwm.is_log_odds());
//! assert!((pwm.get(0, Nucleotide::A) - 1.4854268).abs() < 1e-5);
//! ```

use std::fmt::Display;
use std::fmt::Formatter;

use log::debug;
use log::warn;
use typenum::consts::U4;

use super::abc::BaseComposition;
use super::abc::Dna;
use super::abc::Nucleotide;
use super::abc::Symbol;
use super::dense::DenseMatrix;
use super::err::Error;
use super::seq::EncodedSequence;

mod consensus;
mod rows;

pub use self::consensus::ConsensusThresholds;
pub use self::rows::MatrixRow;

/// The smallest weight considered when converting to log-odds.
pub const PSEUDO_EPSILON: f32 = 1e-6;

// --- MatrixMetadata ----------------------------------------------------------

/// Descriptive and persistence metadata attached to a weight matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixMetadata {
    name: String,
    version: String,
    kind: Option<String>,
    id: Option<u64>,
    species_id: Option<u64>,
    background_id: Option<u64>,
}

impl MatrixMetadata {
    /// Create new metadata for a matrix with the given name and version.
    pub fn new<N, V>(name: N, version: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Attach the kind of matrix, e.g. the database it originates from.
    pub fn with_kind<S: Into<String>>(mut self, kind: S) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Attach the persistence identifier of the matrix.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach the identifier of the species the matrix was derived in.
    pub fn with_species_id(mut self, species_id: u64) -> Self {
        self.species_id = Some(species_id);
        self
    }

    /// Attach the persistence identifier of the associated background.
    pub fn with_background_id(mut self, background_id: u64) -> Self {
        self.background_id = Some(background_id);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn species_id(&self) -> Option<u64> {
        self.species_id
    }

    pub fn background_id(&self) -> Option<u64> {
        self.background_id
    }
}

/// The identity of a weight matrix, as used by its equality relation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatrixKey {
    Id(u64),
    NameVersion(String, String),
}

// --- WeightMatrix ------------------------------------------------------------

/// A matrix storing a weight for each nucleotide at each motif position.
///
/// Two matrices compare equal when they share a persistence identifier,
/// or, when either lacks one, when both their name and version match.
/// Use [`WeightMatrix::is_same`] to compare the weights themselves.
#[derive(Clone, Debug)]
pub struct WeightMatrix {
    metadata: MatrixMetadata,
    data: DenseMatrix<f32, U4>,
    log_odds: bool,
}

impl WeightMatrix {
    /// Create a new matrix of the given length filled with zeros.
    pub fn new(metadata: MatrixMetadata, length: usize) -> Self {
        Self {
            metadata,
            data: DenseMatrix::new(length),
            log_odds: false,
        }
    }

    /// Create a new matrix of the given length filled with `NaN`.
    ///
    /// Unfilled matrices are placeholders awaiting their weights, e.g.
    /// while importing a row set in arbitrary order.
    pub fn unfilled(metadata: MatrixMetadata, length: usize) -> Self {
        let mut matrix = Self::new(metadata, length);
        matrix.data.fill(f32::NAN);
        matrix
    }

    /// Create a new matrix from per-position weights in `A, C, G, T` order.
    ///
    /// The units of the weights are detected with [`WeightMatrix::set_log_odds`].
    pub fn from_columns<I>(metadata: MatrixMetadata, columns: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<[f32]>,
    {
        let columns = columns.into_iter().collect::<Vec<_>>();
        if columns.iter().any(|c| c.as_ref().len() != 4) {
            return Err(Error::InvalidData);
        }
        let mut matrix = Self {
            metadata,
            data: DenseMatrix::from_rows(columns),
            log_odds: false,
        };
        matrix.set_log_odds();
        Ok(matrix)
    }

    /// The metadata of the matrix.
    #[inline]
    pub fn metadata(&self) -> &MatrixMetadata {
        &self.metadata
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    #[inline]
    pub fn version(&self) -> &str {
        self.metadata.version()
    }

    #[inline]
    pub fn kind(&self) -> Option<&str> {
        self.metadata.kind()
    }

    /// The length of the motif encoded in this weight matrix.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.rows()
    }

    /// Check whether the matrix has no position.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.rows() == 0
    }

    /// The raw weights of the matrix.
    #[inline]
    pub fn weights(&self) -> &DenseMatrix<f32, U4> {
        &self.data
    }

    /// Get the weight of a symbol at a position.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    #[inline]
    pub fn get(&self, pos: usize, symbol: Nucleotide) -> f32 {
        self.data[pos][symbol.as_index()]
    }

    /// Get the weight of a symbol character at a position.
    ///
    /// Lowercase characters are accepted.
    pub fn get_char(&self, pos: usize, symbol: char) -> Result<f32, Error> {
        let n = Nucleotide::from_char(symbol)?;
        Ok(self.get(pos, n))
    }

    /// Set the weight of a symbol at a position.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    #[inline]
    pub fn set(&mut self, pos: usize, symbol: Nucleotide, weight: f32) {
        self.data[pos][symbol.as_index()] = weight;
    }

    /// Get the weights at a position, in `A, C, G, T` order.
    pub fn column(&self, pos: usize) -> [f32; 4] {
        let row = &self.data[pos];
        [row[0], row[1], row[2], row[3]]
    }

    /// Get the weights of the complement symbols at a position.
    ///
    /// The weights are in `T, G, C, A` order, so that indexing with a
    /// symbol yields the weight of its complement.
    pub fn comp_column(&self, pos: usize) -> [f32; 4] {
        let row = &self.data[pos];
        [row[3], row[2], row[1], row[0]]
    }

    /// The highest score achievable with this matrix.
    pub fn max_score(&self) -> f32 {
        self.data
            .iter()
            .map(|row| row.iter().cloned().fold(f32::NEG_INFINITY, f32::max))
            .sum()
    }

    /// The lowest score achievable with this matrix.
    pub fn min_score(&self) -> f32 {
        self.data
            .iter()
            .map(|row| row.iter().cloned().fold(f32::INFINITY, f32::min))
            .sum()
    }

    // --- Units ---------------------------------------------------------------

    /// Detect whether the weights are log-odds scores.
    ///
    /// The matrix is flagged as log-odds if any weight is negative, and as
    /// frequencies otherwise. Returns the new flag.
    pub fn set_log_odds(&mut self) -> bool {
        self.log_odds = self.data.iter().flatten().any(|&w| w < 0.0);
        self.log_odds
    }

    /// Whether the weights are log-odds scores.
    #[inline]
    pub fn is_log_odds(&self) -> bool {
        self.log_odds
    }

    /// Convert frequency weights to log-odds scores against a background.
    ///
    /// Each weight `w` of symbol `x` becomes `log2(max(w, ε) / bg(x))`,
    /// with `ε` being [`PSEUDO_EPSILON`]. Background frequencies are floored
    /// at `ε` as well. A uniform background is used when none is given.
    /// Nothing is done if the matrix is already log-odds.
    pub fn to_log_odds<B>(&mut self, background: B)
    where
        B: Into<Option<BaseComposition>>,
    {
        if self.log_odds || self.set_log_odds() {
            return;
        }
        let bg = background.into().unwrap_or_default();
        for row in self.data.iter_mut() {
            for (w, &f) in row.iter_mut().zip(bg.frequencies()) {
                *w = (w.max(PSEUDO_EPSILON) / f.max(PSEUDO_EPSILON)).log2();
            }
        }
        self.log_odds = true;
        debug!("converted {:?} to log-odds", self.metadata.name());
    }

    /// Get a log-odds copy of this matrix.
    pub fn log_odds_version<B>(&self, background: B) -> Self
    where
        B: Into<Option<BaseComposition>>,
    {
        let mut matrix = self.clone();
        matrix.to_log_odds(background);
        matrix
    }

    /// Convert log-odds scores back to frequency weights.
    ///
    /// Each score `s` of symbol `x` becomes `2^s * bg(x)`. The conversion
    /// is only exact when using the background of the forward conversion.
    /// Nothing is done if the matrix is already in frequency form.
    pub fn to_frequency<B>(&mut self, background: B)
    where
        B: Into<Option<BaseComposition>>,
    {
        if !(self.log_odds || self.set_log_odds()) {
            return;
        }
        let bg = match background.into() {
            Some(bg) => bg,
            None => {
                warn!(
                    "converting {:?} to frequencies with a uniform background",
                    self.metadata.name()
                );
                BaseComposition::uniform()
            }
        };
        for row in self.data.iter_mut() {
            for (w, &f) in row.iter_mut().zip(bg.frequencies()) {
                *w = w.exp2() * f.max(PSEUDO_EPSILON);
            }
        }
        self.log_odds = false;
    }

    /// Rescale the frequencies at each position so that they sum to one.
    ///
    /// Nothing is done for log-odds matrices. If any position sums to zero,
    /// an error is returned and the matrix is left unchanged.
    pub fn normalize_frequencies(&mut self) -> Result<(), Error> {
        if self.log_odds || self.set_log_odds() {
            return Ok(());
        }
        let sums = self
            .data
            .iter()
            .map(|row| row.iter().sum::<f32>())
            .collect::<Vec<_>>();
        if let Some(position) = sums.iter().position(|&s| s == 0.0) {
            return Err(Error::DegenerateConversion { position });
        }
        for (row, s) in self.data.iter_mut().zip(sums) {
            for w in row.iter_mut() {
                *w /= s;
            }
        }
        Ok(())
    }

    // --- Derived matrices ----------------------------------------------------

    /// Get the reverse complement of this matrix.
    ///
    /// Position `i` of the result holds the complement weights of position
    /// `len - 1 - i` of this matrix.
    pub fn reverse_complement(&self) -> Self {
        let columns = (0..self.len())
            .rev()
            .map(|i| self.comp_column(i))
            .collect::<Vec<_>>();
        Self {
            metadata: self.metadata.clone(),
            data: DenseMatrix::from_rows(columns),
            log_odds: self.log_odds,
        }
    }

    /// Copy the positions `start..start+length` into a new matrix.
    pub fn sub_matrix(&self, start: usize, length: usize) -> Result<Self, Error> {
        let end = start.checked_add(length).filter(|&end| end <= self.len());
        match end {
            None => Err(Error::InvalidRange {
                start,
                length,
                available: self.len(),
            }),
            Some(end) => Ok(Self {
                metadata: self.metadata.clone(),
                data: DenseMatrix::from_rows((start..end).map(|i| &self.data[i])),
                log_odds: self.log_odds,
            }),
        }
    }

    // --- Scoring -------------------------------------------------------------

    /// Score the window of a sequence starting at `pos`.
    ///
    /// Returns `None` if the window does not fit in the sequence.
    pub fn score(&self, sequence: &EncodedSequence<Dna>, pos: usize) -> Option<f32> {
        if pos.checked_add(self.len())? > sequence.len() {
            return None;
        }
        Some(
            (0..self.len())
                .map(|i| self.data[i][sequence[pos + i].as_index()])
                .sum(),
        )
    }

    /// Score the reverse complement of the window starting at `pos`.
    ///
    /// This is the score of the opposite strand, computed without building
    /// the reverse complement matrix.
    pub fn score_rc(&self, sequence: &EncodedSequence<Dna>, pos: usize) -> Option<f32> {
        if pos.checked_add(self.len())? > sequence.len() {
            return None;
        }
        let l = self.len();
        Some(
            (0..l)
                .map(|i| self.comp_column(l - 1 - i)[sequence[pos + i].as_index()])
                .sum(),
        )
    }

    /// Compute the information content of a position, in bits.
    ///
    /// Log-odds weights are read as scores against a uniform background.
    pub fn information_content(&self, pos: usize) -> f32 {
        let mut column = self.column(pos);
        if self.log_odds {
            for w in column.iter_mut() {
                *w = w.exp2() * 0.25;
            }
        }
        let total: f32 = column.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let entropy: f32 = column
            .iter()
            .map(|w| w / total)
            .filter(|&p| p > 0.0)
            .map(|p| -p * p.log2())
            .sum();
        2.0 - entropy
    }

    /// Get the symbols of a position sorted by decreasing weight.
    ///
    /// Ties are kept in `A, C, G, T` order.
    pub fn letter_order(&self, pos: usize) -> [Nucleotide; 4] {
        let column = self.column(pos);
        let mut order = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T];
        order.sort_by(|x, y| {
            column[y.as_index()]
                .partial_cmp(&column[x.as_index()])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
    }

    // --- Identity ------------------------------------------------------------

    /// The identity of the matrix.
    pub fn key(&self) -> MatrixKey {
        match self.metadata.id() {
            Some(id) => MatrixKey::Id(id),
            None => MatrixKey::NameVersion(
                self.metadata.name().to_string(),
                self.metadata.version().to_string(),
            ),
        }
    }

    /// Check whether two matrices have exactly the same weights and units.
    pub fn is_same(&self, other: &Self) -> bool {
        self.log_odds == other.log_odds && self.data == other.data
    }
}

impl PartialEq for WeightMatrix {
    fn eq(&self, other: &Self) -> bool {
        match (self.metadata.id(), other.metadata.id()) {
            (Some(x), Some(y)) => x == y,
            _ => {
                self.metadata.name() == other.metadata.name()
                    && self.metadata.version() == other.metadata.version()
            }
        }
    }
}

impl AsRef<WeightMatrix> for WeightMatrix {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl AsRef<DenseMatrix<f32, U4>> for WeightMatrix {
    fn as_ref(&self) -> &DenseMatrix<f32, U4> {
        &self.data
    }
}

impl Display for WeightMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "pos\tA\tC\tG\tT")?;
        for (i, row) in self.data.iter().enumerate() {
            write!(f, "{}", i)?;
            for w in row {
                write!(f, "\t{}", w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
