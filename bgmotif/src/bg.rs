//! Background models describing the k-mer statistics of typical sequence.
//!
//! Three interconvertible representations are provided:
//!
//! - [`CountsBackgroundModel`] stores raw k-mer occurences, usually
//!   accumulated from sequences, and derives frequencies lazily.
//! - [`FrequencyBackgroundModel`] stores the marginal probability of
//!   observing each k-mer.
//! - [`MarkovBackgroundModel`] stores the probability of the next base
//!   given the preceding `k-1` bases.
//!
//! All of them implement the [`BackgroundModel`] trait, and
//! [`AnyBackgroundModel`] can hold any of them when the concrete
//! representation is only known at runtime (e.g. when loading rows).
//!
//! # Example
//! ```
//! # use bgmotif::bg::*;
//! let mut counts = CountsBackgroundModel::new(Metadata::new("example"), 2).unwrap();
//! counts.add_kmer_counts_from_sequence("ACGTTGCA", false);
//! assert_eq!(counts.kmer_count("TG"), 1);
//!
//! let markov = MarkovBackgroundModel::from(&counts);
//! assert!((markov.markov_prob("AC") - 1.0).abs() < 1e-9);
//! assert!((markov.markov_prob("TG") - 0.5).abs() < 1e-9);
//! ```

use log::debug;
use log::warn;

use super::abc::Alphabet;
use super::abc::BaseComposition;
use super::abc::Dna;
use super::abc::Nucleotide;
use super::abc::Symbol;
use super::err::Error;
use super::kmer;
use super::kmer::KmerCode;

mod build;
mod counts;
mod freq;
mod markov;
mod rows;
#[cfg(feature = "sampling")]
mod sample;
pub mod strand;

pub use self::build::Chromosome;
pub use self::build::Genome;
pub use self::build::Region;
pub use self::counts::CountsBackgroundModel;
pub use self::freq::FrequencyBackgroundModel;
pub use self::markov::MarkovBackgroundModel;
pub use self::rows::BackgroundRow;
pub use self::rows::ModelRecord;
pub use self::rows::ModelType;

// --- Metadata ----------------------------------------------------------------

/// Descriptive and persistence metadata attached to a background model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    name: String,
    genome: Option<String>,
    map_id: Option<u64>,
    model_id: Option<u64>,
}

impl Metadata {
    /// Create new metadata for a model with the given name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attach an opaque genome identifier.
    pub fn with_genome<S: Into<String>>(mut self, genome: S) -> Self {
        self.genome = Some(genome.into());
        self
    }

    /// Attach the persistence identifier of the model instance.
    pub fn with_map_id(mut self, map_id: u64) -> Self {
        self.map_id = Some(map_id);
        self
    }

    /// Attach the persistence identifier of the model description.
    pub fn with_model_id(mut self, model_id: u64) -> Self {
        self.model_id = Some(model_id);
        self
    }

    /// The name of the model.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The genome the model was built for, if known.
    pub fn genome(&self) -> Option<&str> {
        self.genome.as_deref()
    }

    /// The persistence identifier of the model instance, if any.
    pub fn map_id(&self) -> Option<u64> {
        self.map_id
    }

    /// The persistence identifier of the model description, if any.
    pub fn model_id(&self) -> Option<u64> {
        self.model_id
    }
}

// --- BackgroundModel ---------------------------------------------------------

/// The common contract of all background model representations.
pub trait BackgroundModel {
    /// The metadata of the model.
    fn metadata(&self) -> &Metadata;

    /// The length of the longest k-mers described by the model.
    fn max_kmer_len(&self) -> usize;

    /// The order of the Markov chain described by the model.
    fn markov_order(&self) -> usize {
        self.max_kmer_len() - 1
    }

    /// Get the marginal probability of observing a k-mer.
    ///
    /// Unknown, invalid or too long k-mers have a frequency of zero.
    fn frequency(&self, kmer: &str) -> f64;

    /// Get the probability of the last base of a k-mer given its prefix.
    ///
    /// Unknown, invalid or too long k-mers have a probability of zero.
    fn markov_prob(&self, kmer: &str) -> f64;

    /// Get the k-mers of the given length stored in the model, in
    /// lexicographic order.
    fn kmers(&self, length: usize) -> Vec<String>;

    /// Whether the model statistics are stranded, if known.
    fn stranded(&self) -> Option<bool>;

    /// Override the strandedness of the model.
    fn set_stranded(&mut self, stranded: bool);

    /// Compute, record and return the strandedness of the model.
    ///
    /// See [`strand::detect`] for the decision rule.
    fn check_and_set_stranded(&mut self) -> bool;

    /// Make the model symmetric under reverse-complementation.
    ///
    /// This does nothing unless the model is stranded; strandedness is
    /// computed first if it is unknown.
    fn degenerate_strands(&mut self);

    /// Get the order-0 composition of the model.
    ///
    /// The single-base probabilities are rescaled to sum to one. Falls back
    /// to a uniform composition if the model has no single-base statistics.
    fn base_composition(&self) -> BaseComposition {
        let symbols = Dna::as_str();
        let mut probabilities = [0.0f64; 4];
        for (i, p) in probabilities.iter_mut().enumerate() {
            *p = self.markov_prob(&symbols[i..=i]);
        }
        let total: f64 = probabilities.iter().sum();
        if total > 0.0 && total.is_finite() {
            let frequencies = probabilities.map(|p| (p / total) as f32);
            if let Ok(composition) = BaseComposition::new(frequencies) {
                return composition;
            }
        }
        warn!(
            "no base composition in {:?}, using a uniform background",
            self.metadata().name()
        );
        BaseComposition::uniform()
    }

    /// Compute the log2-probability of a sequence under the Markov chain.
    ///
    /// The first bases are scored with the shorter contexts available, then
    /// each base is scored using the `markov_order()` preceding bases.
    fn log_probability(&self, sequence: &str) -> Result<f64, Error> {
        let bytes = sequence.as_bytes();
        if let Some(&c) = bytes.iter().find(|&&c| Nucleotide::from_ascii(c).is_err()) {
            debug!("rejecting sequence with invalid symbol {:?}", c as char);
            return Err(Error::InvalidKmer(sequence.to_string()));
        }
        let order = self.markov_order();
        let mut logp = 0.0;
        for i in 0..bytes.len() {
            let start = i.saturating_sub(order);
            logp += self.markov_prob(&sequence[start..=i]).log2();
        }
        Ok(logp)
    }
}

// --- AnyBackgroundModel ------------------------------------------------------

/// A background model in any of the supported representations.
#[derive(Clone, Debug)]
pub enum AnyBackgroundModel {
    Counts(CountsBackgroundModel),
    Frequency(FrequencyBackgroundModel),
    Markov(MarkovBackgroundModel),
}

impl AnyBackgroundModel {
    fn as_dyn(&self) -> &dyn BackgroundModel {
        match self {
            AnyBackgroundModel::Counts(m) => m,
            AnyBackgroundModel::Frequency(m) => m,
            AnyBackgroundModel::Markov(m) => m,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn BackgroundModel {
        match self {
            AnyBackgroundModel::Counts(m) => m,
            AnyBackgroundModel::Frequency(m) => m,
            AnyBackgroundModel::Markov(m) => m,
        }
    }

    /// Convert the model to its Markov representation.
    pub fn to_markov(&self) -> MarkovBackgroundModel {
        match self {
            AnyBackgroundModel::Counts(m) => MarkovBackgroundModel::from(m),
            AnyBackgroundModel::Frequency(m) => MarkovBackgroundModel::from(m),
            AnyBackgroundModel::Markov(m) => m.clone(),
        }
    }

    /// Convert the model to its frequency representation.
    pub fn to_frequency(&self) -> FrequencyBackgroundModel {
        match self {
            AnyBackgroundModel::Counts(m) => FrequencyBackgroundModel::from(m),
            AnyBackgroundModel::Frequency(m) => m.clone(),
            AnyBackgroundModel::Markov(m) => FrequencyBackgroundModel::from(m),
        }
    }
}

impl BackgroundModel for AnyBackgroundModel {
    fn metadata(&self) -> &Metadata {
        self.as_dyn().metadata()
    }

    fn max_kmer_len(&self) -> usize {
        self.as_dyn().max_kmer_len()
    }

    fn frequency(&self, kmer: &str) -> f64 {
        self.as_dyn().frequency(kmer)
    }

    fn markov_prob(&self, kmer: &str) -> f64 {
        self.as_dyn().markov_prob(kmer)
    }

    fn kmers(&self, length: usize) -> Vec<String> {
        self.as_dyn().kmers(length)
    }

    fn stranded(&self) -> Option<bool> {
        self.as_dyn().stranded()
    }

    fn set_stranded(&mut self, stranded: bool) {
        self.as_dyn_mut().set_stranded(stranded)
    }

    fn check_and_set_stranded(&mut self) -> bool {
        self.as_dyn_mut().check_and_set_stranded()
    }

    fn degenerate_strands(&mut self) {
        self.as_dyn_mut().degenerate_strands()
    }
}

impl From<CountsBackgroundModel> for AnyBackgroundModel {
    fn from(model: CountsBackgroundModel) -> Self {
        AnyBackgroundModel::Counts(model)
    }
}

impl From<FrequencyBackgroundModel> for AnyBackgroundModel {
    fn from(model: FrequencyBackgroundModel) -> Self {
        AnyBackgroundModel::Frequency(model)
    }
}

impl From<MarkovBackgroundModel> for AnyBackgroundModel {
    fn from(model: MarkovBackgroundModel) -> Self {
        AnyBackgroundModel::Markov(model)
    }
}

// --- helpers -----------------------------------------------------------------

/// Check that a maximum k-mer length can be handled by a model.
fn check_max_kmer_len(max_kmer_len: usize) -> Result<(), Error> {
    if max_kmer_len == 0 || max_kmer_len > kmer::MAX_KMER_LEN {
        Err(Error::InvalidLength {
            length: max_kmer_len,
            max: kmer::MAX_KMER_LEN,
        })
    } else {
        Ok(())
    }
}

/// Encode a k-mer for a write into a model with the given maximum length.
fn locate(kmer: &str, max_kmer_len: usize) -> Result<(usize, KmerCode), Error> {
    if kmer.is_empty() || kmer.len() > max_kmer_len {
        return Err(Error::InvalidLength {
            length: kmer.len(),
            max: max_kmer_len,
        });
    }
    kmer::encode_bytes(kmer.as_bytes())
        .map(|code| (kmer.len(), code))
        .ok_or_else(|| Error::InvalidKmer(kmer.to_string()))
}

/// Encode a k-mer for a read from a model, or `None` if it cannot be stored.
#[inline]
fn lookup(kmer: &str, max_kmer_len: usize) -> Option<(usize, KmerCode)> {
    if kmer.is_empty() || kmer.len() > max_kmer_len {
        None
    } else {
        kmer::encode_bytes(kmer.as_bytes()).map(|code| (kmer.len(), code))
    }
}

/// Derive a conditional probability from marginal k-mer frequencies.
///
/// The probability of `code` is its frequency divided by the total
/// frequency of the 4 k-mers sharing its `(length-1)`-prefix, or zero
/// when that total is zero.
fn conditional<F>(length: usize, code: KmerCode, frequency: F) -> f64
where
    F: Fn(usize, KmerCode) -> f64,
{
    let row = (code >> 2) << 2;
    let total: f64 = (row..row + 4).map(|c| frequency(length, c)).sum();
    if total > 0.0 {
        frequency(length, code) / total
    } else {
        0.0
    }
}
