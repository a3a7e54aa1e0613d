use log::debug;

use super::check_max_kmer_len;
use super::conditional;
use super::locate;
use super::lookup;
use super::strand;
use super::BackgroundModel;
use super::CountsBackgroundModel;
use super::MarkovBackgroundModel;
use super::Metadata;
use crate::err::Error;
use crate::kmer::KmerCode;
use crate::table::KmerTable;

// --- FrequencyBackgroundModel ------------------------------------------------

/// A background model storing the marginal frequency of each k-mer.
///
/// Frequencies of a given length are expected, but not required, to sum
/// to one; use [`FrequencyBackgroundModel::normalize`] to enforce it.
#[derive(Clone, Debug)]
pub struct FrequencyBackgroundModel {
    metadata: Metadata,
    frequencies: Vec<KmerTable<f64>>,
    stranded: Option<bool>,
}

impl FrequencyBackgroundModel {
    /// Create a new empty model for k-mers up to the given length.
    pub fn new(metadata: Metadata, max_kmer_len: usize) -> Result<Self, Error> {
        check_max_kmer_len(max_kmer_len)?;
        Ok(Self {
            metadata,
            frequencies: (1..=max_kmer_len).map(KmerTable::new).collect(),
            stranded: None,
        })
    }

    /// Set the frequency of a k-mer.
    pub fn set_frequency(&mut self, kmer: &str, frequency: f64) -> Result<(), Error> {
        let (length, code) = locate(kmer, self.max_kmer_len())?;
        self.frequencies[length - 1].set_code(code, frequency);
        self.stranded = None;
        Ok(())
    }

    /// Get the table of frequencies for k-mers of the given length.
    pub fn frequencies(&self, length: usize) -> Option<&KmerTable<f64>> {
        length.checked_sub(1).and_then(|i| self.frequencies.get(i))
    }

    /// Rescale the frequencies of each length so that they sum to one.
    ///
    /// Lengths without any non-zero frequency are left untouched.
    pub fn normalize(&mut self) {
        for table in self.frequencies.iter_mut() {
            let total = table.total();
            if total > 0.0 {
                let rescaled = table.iter().map(|(c, f)| (c, f / total)).collect::<Vec<_>>();
                for (code, f) in rescaled {
                    table.set_code(code, f);
                }
            }
        }
        self.stranded = None;
    }

    #[inline]
    pub(crate) fn frequency_code(&self, length: usize, code: KmerCode) -> f64 {
        self.frequencies[length - 1].get_code(code)
    }
}

impl BackgroundModel for FrequencyBackgroundModel {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn max_kmer_len(&self) -> usize {
        self.frequencies.len()
    }

    fn frequency(&self, kmer: &str) -> f64 {
        match lookup(kmer, self.max_kmer_len()) {
            Some((length, code)) => self.frequency_code(length, code),
            None => 0.0,
        }
    }

    fn markov_prob(&self, kmer: &str) -> f64 {
        match lookup(kmer, self.max_kmer_len()) {
            Some((length, code)) => conditional(length, code, |l, c| self.frequency_code(l, c)),
            None => 0.0,
        }
    }

    fn kmers(&self, length: usize) -> Vec<String> {
        self.frequencies(length)
            .map(|t| t.kmers().collect())
            .unwrap_or_default()
    }

    fn stranded(&self) -> Option<bool> {
        self.stranded
    }

    fn set_stranded(&mut self, stranded: bool) {
        self.stranded = Some(stranded);
    }

    fn check_and_set_stranded(&mut self) -> bool {
        let tables = &self.frequencies;
        let stranded = strand::detect(1..tables.len() + 1, |l, c| tables[l - 1].get_code(c));
        debug!("model {:?} stranded: {}", self.metadata.name(), stranded);
        self.stranded = Some(stranded);
        stranded
    }

    fn degenerate_strands(&mut self) {
        let stranded = match self.stranded {
            Some(s) => s,
            None => self.check_and_set_stranded(),
        };
        if stranded {
            for table in self.frequencies.iter_mut() {
                strand::symmetrize(table, |x, y| (x + y) / 2.0);
            }
            self.stranded = Some(false);
        }
    }
}

impl From<&CountsBackgroundModel> for FrequencyBackgroundModel {
    fn from(counts: &CountsBackgroundModel) -> Self {
        let frequencies = (1..=counts.max_kmer_len())
            .map(|length| {
                let mut table = KmerTable::new(length);
                if let Some(c) = counts.counts(length) {
                    for (code, _) in c {
                        table.set_code(code, counts.frequency_code(length, code));
                    }
                }
                table
            })
            .collect();
        Self {
            metadata: counts.metadata().clone(),
            frequencies,
            stranded: counts.stranded(),
        }
    }
}

impl From<CountsBackgroundModel> for FrequencyBackgroundModel {
    fn from(counts: CountsBackgroundModel) -> Self {
        Self::from(&counts)
    }
}

impl From<&MarkovBackgroundModel> for FrequencyBackgroundModel {
    fn from(markov: &MarkovBackgroundModel) -> Self {
        let frequencies = (1..=markov.max_kmer_len())
            .map(|length| {
                let mut table = KmerTable::new(length);
                if let Some(p) = markov.probabilities(length) {
                    for (code, _) in p {
                        table.set_code(code, markov.frequency_code(length, code));
                    }
                }
                table
            })
            .collect();
        Self {
            metadata: markov.metadata().clone(),
            frequencies,
            stranded: markov.stranded(),
        }
    }
}

impl From<MarkovBackgroundModel> for FrequencyBackgroundModel {
    fn from(markov: MarkovBackgroundModel) -> Self {
        Self::from(&markov)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_counts() {
        let mut counts = CountsBackgroundModel::new(Metadata::new("c"), 2).unwrap();
        counts.add_kmer_counts_from_sequence("ACCGTTAC", false);
        let freq = FrequencyBackgroundModel::from(&counts);
        for length in 1..=2 {
            let total = counts.total_count(length) as f64;
            for kmer in counts.kmers(length) {
                let expected = counts.kmer_count(&kmer) as f64 / total;
                assert!((freq.frequency(&kmer) - expected).abs() < 1e-12);
            }
        }
        assert_eq!(freq.kmers(2), counts.kmers(2));
        assert_eq!(freq.stranded(), Some(true));
    }

    #[test]
    fn test_normalize() {
        let mut freq = FrequencyBackgroundModel::new(Metadata::new("f"), 1).unwrap();
        freq.set_frequency("A", 2.0).unwrap();
        freq.set_frequency("T", 6.0).unwrap();
        freq.normalize();
        assert_eq!(freq.frequency("A"), 0.25);
        assert_eq!(freq.frequency("T"), 0.75);
        assert_eq!(freq.frequency("C"), 0.0);
    }

    #[test]
    fn test_degenerate_strands() {
        let mut freq = FrequencyBackgroundModel::new(Metadata::new("f"), 1).unwrap();
        freq.set_frequency("A", 0.4).unwrap();
        freq.set_frequency("C", 0.2).unwrap();
        freq.set_frequency("G", 0.2).unwrap();
        freq.set_frequency("T", 0.2).unwrap();
        // C and G match, so the model is flagged stranded
        freq.degenerate_strands();
        assert!((freq.frequency("A") - 0.3).abs() < 1e-12);
        assert!((freq.frequency("T") - 0.3).abs() < 1e-12);
        assert_eq!(freq.stranded(), Some(false));
        freq.degenerate_strands();
        assert!((freq.frequency("A") - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_markov_prob() {
        let mut freq = FrequencyBackgroundModel::new(Metadata::new("f"), 2).unwrap();
        freq.set_frequency("CA", 0.1).unwrap();
        freq.set_frequency("CT", 0.3).unwrap();
        assert!((freq.markov_prob("CT") - 0.75).abs() < 1e-12);
        assert_eq!(freq.markov_prob("CC"), 0.0);
        assert_eq!(freq.markov_prob("TT"), 0.0);
    }
}
