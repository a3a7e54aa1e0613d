use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use log::warn;

use super::AnyBackgroundModel;
use super::BackgroundModel;
use super::CountsBackgroundModel;
use super::FrequencyBackgroundModel;
use super::MarkovBackgroundModel;
use super::Metadata;
use crate::err::Error;
use crate::kmer;
use crate::kmer::KmerCode;
use crate::table::KmerTable;

// --- ModelType ---------------------------------------------------------------

/// The representation used to persist a background model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelType {
    /// Rows store marginal k-mer frequencies (and optionally counts).
    Frequency,
    /// Rows store conditional probabilities.
    Markov,
}

impl ModelType {
    /// The persisted name of the model type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Frequency => "FREQUENCY",
            ModelType::Markov => "MARKOV",
        }
    }
}

impl FromStr for ModelType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREQUENCY" => Ok(ModelType::Frequency),
            "MARKOV" => Ok(ModelType::Markov),
            other => Err(Error::UnsupportedModelType(other.to_string())),
        }
    }
}

impl Display for ModelType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- ModelRecord -------------------------------------------------------------

/// The metadata record of a persisted background model.
///
/// Every field is optional as read from storage; [`ModelRecord::validate`]
/// checks that the record identifies a model completely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelRecord {
    pub map_id: Option<u64>,
    pub genome_id: Option<String>,
    pub model_id: Option<u64>,
    pub name: Option<String>,
    pub max_kmer_len: Option<usize>,
    pub model_type: Option<String>,
}

impl ModelRecord {
    /// Create a complete record describing a model.
    fn describe<M: BackgroundModel + ?Sized>(model: &M, model_type: ModelType) -> Self {
        let metadata = model.metadata();
        Self {
            map_id: metadata.map_id(),
            genome_id: metadata.genome().map(String::from),
            model_id: metadata.model_id(),
            name: Some(metadata.name().to_string()),
            max_kmer_len: Some(model.max_kmer_len()),
            model_type: Some(model_type.as_str().to_string()),
        }
    }

    /// Check the record and extract the model metadata from it.
    pub fn validate(&self) -> Result<(Metadata, usize, ModelType), Error> {
        let map_id = self.map_id.ok_or(Error::IncompleteMetadata("map id"))?;
        let genome = self
            .genome_id
            .as_ref()
            .ok_or(Error::IncompleteMetadata("genome id"))?;
        let model_id = self.model_id.ok_or(Error::IncompleteMetadata("model id"))?;
        let name = self.name.as_ref().ok_or(Error::IncompleteMetadata("name"))?;
        let max_kmer_len = self
            .max_kmer_len
            .ok_or(Error::IncompleteMetadata("kmer length"))?;
        let model_type = self
            .model_type
            .as_deref()
            .ok_or(Error::IncompleteMetadata("model type"))?
            .parse()?;
        let metadata = Metadata::new(name.as_str())
            .with_genome(genome.as_str())
            .with_map_id(map_id)
            .with_model_id(model_id);
        Ok((metadata, max_kmer_len, model_type))
    }
}

// --- BackgroundRow -----------------------------------------------------------

/// A persisted k-mer entry of a background model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackgroundRow {
    pub kmer: String,
    pub probability: f64,
    pub count: Option<u64>,
}

impl BackgroundRow {
    /// Create a new row without a count.
    pub fn new<S: Into<String>>(kmer: S, probability: f64) -> Self {
        Self {
            kmer: kmer.into(),
            probability,
            count: None,
        }
    }

    /// Attach a count to the row.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }
}

/// Emit rows for tables of increasing length, in lexicographic order.
fn emit_rows<F>(tables: &[KmerTable<f64>], count: F) -> Vec<BackgroundRow>
where
    F: Fn(usize, KmerCode) -> Option<u64>,
{
    let mut rows = Vec::new();
    for table in tables {
        let length = table.length();
        for (code, p) in table {
            rows.push(BackgroundRow {
                kmer: kmer::decode(code, length),
                probability: p,
                count: count(length, code),
            });
        }
    }
    rows
}

/// Infer the longest k-mer length from pre-split `(kmer, value)` pairs.
fn longest<K: AsRef<str>>(pairs: &[(K, f64)]) -> usize {
    pairs
        .iter()
        .map(|(k, _)| k.as_ref().len())
        .max()
        .unwrap_or(1)
}

// --- FrequencyBackgroundModel ------------------------------------------------

impl FrequencyBackgroundModel {
    /// Load a frequency model from its persisted record and rows.
    pub fn from_rows<I>(record: &ModelRecord, rows: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = BackgroundRow>,
    {
        let (metadata, max_kmer_len, model_type) = record.validate()?;
        if model_type != ModelType::Frequency {
            return Err(Error::UnsupportedModelType(model_type.to_string()));
        }
        let mut model = Self::new(metadata, max_kmer_len)?;
        for row in rows {
            model.set_frequency(&row.kmer, row.probability)?;
        }
        Ok(model)
    }

    /// Build a frequency model from pre-split `(kmer, frequency)` pairs.
    ///
    /// The maximum k-mer length is the length of the longest k-mer.
    pub fn from_pairs<K: AsRef<str>>(metadata: Metadata, pairs: &[(K, f64)]) -> Result<Self, Error> {
        let mut model = Self::new(metadata, longest(pairs))?;
        for (kmer, f) in pairs {
            model.set_frequency(kmer.as_ref(), *f)?;
        }
        Ok(model)
    }

    /// The persisted record describing this model.
    pub fn record(&self) -> ModelRecord {
        ModelRecord::describe(self, ModelType::Frequency)
    }

    /// The persisted rows of this model, sorted by length then k-mer.
    pub fn rows(&self) -> Vec<BackgroundRow> {
        let tables = (1..=self.max_kmer_len())
            .filter_map(|l| self.frequencies(l).cloned())
            .collect::<Vec<_>>();
        emit_rows(&tables, |_, _| None)
    }
}

// --- MarkovBackgroundModel ---------------------------------------------------

impl MarkovBackgroundModel {
    /// Load a Markov model from its persisted record and rows.
    ///
    /// Rows are not required to sum to one for each prefix, but a warning
    /// is logged when they do not.
    pub fn from_rows<I>(record: &ModelRecord, rows: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = BackgroundRow>,
    {
        let (metadata, max_kmer_len, model_type) = record.validate()?;
        if model_type != ModelType::Markov {
            return Err(Error::UnsupportedModelType(model_type.to_string()));
        }
        let mut model = Self::new(metadata, max_kmer_len)?;
        for row in rows {
            model.set_markov_prob(&row.kmer, row.probability)?;
        }
        if !model.is_normalized(1e-6) {
            warn!(
                "conditional probabilities of {:?} do not sum to one",
                model.metadata().name()
            );
        }
        Ok(model)
    }

    /// Build a Markov model from pre-split `(kmer, probability)` pairs.
    ///
    /// The maximum k-mer length is the length of the longest k-mer.
    pub fn from_pairs<K: AsRef<str>>(metadata: Metadata, pairs: &[(K, f64)]) -> Result<Self, Error> {
        let mut model = Self::new(metadata, longest(pairs))?;
        for (kmer, p) in pairs {
            model.set_markov_prob(kmer.as_ref(), *p)?;
        }
        Ok(model)
    }

    /// The persisted record describing this model.
    pub fn record(&self) -> ModelRecord {
        ModelRecord::describe(self, ModelType::Markov)
    }

    /// The persisted rows of this model, sorted by length then k-mer.
    pub fn rows(&self) -> Vec<BackgroundRow> {
        let tables = (1..=self.max_kmer_len())
            .filter_map(|l| self.probabilities(l).cloned())
            .collect::<Vec<_>>();
        emit_rows(&tables, |_, _| None)
    }
}

// --- CountsBackgroundModel ---------------------------------------------------

impl CountsBackgroundModel {
    /// Load a counts model from a persisted frequency record and rows.
    ///
    /// Rows without a count are read as zero occurences.
    pub fn from_rows<I>(record: &ModelRecord, rows: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = BackgroundRow>,
    {
        let (metadata, max_kmer_len, model_type) = record.validate()?;
        if model_type != ModelType::Frequency {
            return Err(Error::UnsupportedModelType(model_type.to_string()));
        }
        let mut model = Self::new(metadata, max_kmer_len)?;
        let mut missing = 0;
        for row in rows {
            let count = row.count.unwrap_or_else(|| {
                missing += 1;
                0
            });
            model.set_kmer_count(&row.kmer, count)?;
        }
        if missing > 0 {
            warn!("{} rows without a count read as zero", missing);
        }
        Ok(model)
    }

    /// The persisted record describing this model.
    ///
    /// Counts models are persisted as frequency models with counts.
    pub fn record(&self) -> ModelRecord {
        ModelRecord::describe(self, ModelType::Frequency)
    }

    /// The persisted rows of this model, sorted by length then k-mer.
    pub fn rows(&self) -> Vec<BackgroundRow> {
        let tables = (1..=self.max_kmer_len())
            .map(|l| {
                let mut table = KmerTable::new(l);
                if let Some(counts) = self.counts(l) {
                    for (code, _) in counts {
                        table.set_code(code, self.frequency_code(l, code));
                    }
                }
                table
            })
            .collect::<Vec<_>>();
        emit_rows(&tables, |l, c| self.counts(l).map(|t| t.get_code(c)))
    }
}

// --- AnyBackgroundModel ------------------------------------------------------

impl AnyBackgroundModel {
    /// Load a model from its persisted record and rows.
    ///
    /// The representation is chosen from the record model type.
    pub fn from_rows<I>(record: &ModelRecord, rows: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = BackgroundRow>,
    {
        let (_, _, model_type) = record.validate()?;
        match model_type {
            ModelType::Frequency => FrequencyBackgroundModel::from_rows(record, rows).map(Self::from),
            ModelType::Markov => MarkovBackgroundModel::from_rows(record, rows).map(Self::from),
        }
    }

    /// The persisted record describing this model.
    pub fn record(&self) -> ModelRecord {
        match self {
            AnyBackgroundModel::Counts(m) => m.record(),
            AnyBackgroundModel::Frequency(m) => m.record(),
            AnyBackgroundModel::Markov(m) => m.record(),
        }
    }

    /// The persisted rows of this model, sorted by length then k-mer.
    pub fn rows(&self) -> Vec<BackgroundRow> {
        match self {
            AnyBackgroundModel::Counts(m) => m.rows(),
            AnyBackgroundModel::Frequency(m) => m.rows(),
            AnyBackgroundModel::Markov(m) => m.rows(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(model_type: &str) -> ModelRecord {
        ModelRecord {
            map_id: Some(1),
            genome_id: Some(String::from("sacCer3")),
            model_id: Some(7),
            name: Some(String::from("yeast")),
            max_kmer_len: Some(2),
            model_type: Some(model_type.to_string()),
        }
    }

    #[test]
    fn test_validate_incomplete() {
        let mut r = record("MARKOV");
        r.model_id = None;
        assert_eq!(r.validate(), Err(Error::IncompleteMetadata("model id")));
        let mut r = record("MARKOV");
        r.max_kmer_len = None;
        assert_eq!(r.validate(), Err(Error::IncompleteMetadata("kmer length")));
    }

    #[test]
    fn test_validate_unsupported() {
        assert_eq!(
            record("COUNTS").validate(),
            Err(Error::UnsupportedModelType(String::from("COUNTS")))
        );
        assert!(record("markov").validate().is_err());
    }

    #[test]
    fn test_rows_sorted() {
        let rows = vec![
            BackgroundRow::new("TA", 0.1),
            BackgroundRow::new("C", 0.2),
            BackgroundRow::new("AG", 0.3),
            BackgroundRow::new("A", 0.4),
        ];
        let model = FrequencyBackgroundModel::from_rows(&record("FREQUENCY"), rows).unwrap();
        let kmers = model.rows().into_iter().map(|r| r.kmer).collect::<Vec<_>>();
        assert_eq!(kmers, ["A", "C", "AG", "TA"]);
    }

    #[test]
    fn test_any_from_rows() {
        let rows = vec![BackgroundRow::new("A", 0.5), BackgroundRow::new("AC", 1.0)];
        let any = AnyBackgroundModel::from_rows(&record("MARKOV"), rows.clone()).unwrap();
        assert!(matches!(any, AnyBackgroundModel::Markov(_)));
        assert_eq!(any.markov_prob("AC"), 1.0);
        assert_eq!(any.metadata().genome(), Some("sacCer3"));
        assert_eq!(any.record(), record("MARKOV"));
        assert_eq!(any.rows(), rows);
    }

    #[test]
    fn test_from_rows_invalid_kmer() {
        let rows = vec![BackgroundRow::new("AN", 0.5)];
        let err = FrequencyBackgroundModel::from_rows(&record("FREQUENCY"), rows).unwrap_err();
        assert_eq!(err, Error::InvalidKmer(String::from("AN")));
    }

    #[test]
    fn test_counts_rows() {
        let mut counts = CountsBackgroundModel::new(
            Metadata::new("yeast")
                .with_genome("sacCer3")
                .with_map_id(1)
                .with_model_id(7),
            2,
        )
        .unwrap();
        counts.add_kmer_counts_from_sequence("AAC", false);
        let rows = counts.rows();
        assert_eq!(rows[0], BackgroundRow::new("A", 2.0 / 3.0).with_count(2));
        assert_eq!(rows[3], BackgroundRow::new("AC", 0.5).with_count(1));

        let record = counts.record();
        assert_eq!(record, self::record("FREQUENCY"));
        let loaded = CountsBackgroundModel::from_rows(&record, rows).unwrap();
        assert_eq!(loaded.kmer_count("AA"), 1);
        assert_eq!(loaded.kmer_count("A"), 2);
    }

    #[test]
    fn test_from_pairs() {
        let pairs = [("A", 0.3), ("C", 0.2), ("G", 0.2), ("T", 0.3), ("ACG", 0.01)];
        let model = FrequencyBackgroundModel::from_pairs(Metadata::new("p"), &pairs).unwrap();
        assert_eq!(model.max_kmer_len(), 3);
        assert_eq!(model.frequency("ACG"), 0.01);
    }
}
