use std::collections::BTreeMap;

use log::debug;

use super::check_max_kmer_len;
use super::conditional;
use super::locate;
use super::lookup;
use super::strand;
use super::BackgroundModel;
use super::CountsBackgroundModel;
use super::FrequencyBackgroundModel;
use super::Metadata;
use crate::err::Error;
use crate::kmer::KmerCode;
use crate::table::KmerTable;

// --- MarkovBackgroundModel ---------------------------------------------------

/// A background model storing conditional probabilities of the next base.
///
/// The probability of a k-mer `p + b` is `P(b | p)`, the probability of
/// observing base `b` right after the `(k-1)`-mer `p`. For a well-formed
/// model, the 4 probabilities sharing a prefix sum to one; this is not
/// enforced on writes, see [`MarkovBackgroundModel::normalize`].
#[derive(Clone, Debug)]
pub struct MarkovBackgroundModel {
    metadata: Metadata,
    probabilities: Vec<KmerTable<f64>>,
    stranded: Option<bool>,
}

impl MarkovBackgroundModel {
    /// Create a new empty model for k-mers up to the given length.
    pub fn new(metadata: Metadata, max_kmer_len: usize) -> Result<Self, Error> {
        check_max_kmer_len(max_kmer_len)?;
        Ok(Self {
            metadata,
            probabilities: (1..=max_kmer_len).map(KmerTable::new).collect(),
            stranded: None,
        })
    }

    /// Set the probability of the last base of a k-mer given its prefix.
    pub fn set_markov_prob(&mut self, kmer: &str, probability: f64) -> Result<(), Error> {
        let (length, code) = locate(kmer, self.max_kmer_len())?;
        self.probabilities[length - 1].set_code(code, probability);
        self.stranded = None;
        Ok(())
    }

    /// Get the table of conditional probabilities for the given length.
    pub fn probabilities(&self, length: usize) -> Option<&KmerTable<f64>> {
        length.checked_sub(1).and_then(|i| self.probabilities.get(i))
    }

    /// Sum the probabilities of each prefix row of the given table.
    fn row_sums(table: &KmerTable<f64>) -> BTreeMap<KmerCode, f64> {
        let mut sums = BTreeMap::new();
        for (code, p) in table {
            *sums.entry(code >> 2).or_insert(0.0) += p;
        }
        sums
    }

    /// Rescale the probabilities sharing a prefix so that they sum to one.
    ///
    /// Rows without any non-zero probability are left untouched.
    pub fn normalize(&mut self) {
        for table in self.probabilities.iter_mut() {
            let sums = Self::row_sums(table);
            let rescaled = table
                .iter()
                .filter_map(|(code, p)| {
                    let total = sums[&(code >> 2)];
                    if total > 0.0 {
                        Some((code, p / total))
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>();
            for (code, p) in rescaled {
                table.set_code(code, p);
            }
        }
        self.stranded = None;
    }

    /// Check whether every stored prefix row sums to one.
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        self.probabilities.iter().all(|table| {
            Self::row_sums(table)
                .values()
                .all(|total| (total - 1.0).abs() <= tolerance)
        })
    }

    /// Compute the marginal frequency of a k-mer by chaining probabilities.
    pub(crate) fn frequency_code(&self, length: usize, code: KmerCode) -> f64 {
        let mut f = 1.0;
        for l in 1..=length {
            let prefix = code >> (2 * (length - l));
            f *= self.probabilities[l - 1].get_code(prefix);
            if f == 0.0 {
                break;
            }
        }
        f
    }

    /// Build the conditional probability tables from marginal frequencies.
    ///
    /// `codes[l - 1]` lists the k-mers of length `l` to store.
    fn from_frequencies<F>(metadata: Metadata, codes: Vec<Vec<KmerCode>>, frequency: F) -> Self
    where
        F: Fn(usize, KmerCode) -> f64,
    {
        let mut probabilities = Vec::with_capacity(codes.len());
        for (i, kmers) in codes.into_iter().enumerate() {
            let length = i + 1;
            let mut table = KmerTable::new(length);
            for code in kmers {
                table.set_code(code, conditional(length, code, &frequency));
            }
            probabilities.push(table);
        }
        Self {
            metadata,
            probabilities,
            stranded: None,
        }
    }
}

impl BackgroundModel for MarkovBackgroundModel {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn max_kmer_len(&self) -> usize {
        self.probabilities.len()
    }

    fn frequency(&self, kmer: &str) -> f64 {
        match lookup(kmer, self.max_kmer_len()) {
            Some((length, code)) => self.frequency_code(length, code),
            None => 0.0,
        }
    }

    fn markov_prob(&self, kmer: &str) -> f64 {
        match lookup(kmer, self.max_kmer_len()) {
            Some((length, code)) => self.probabilities[length - 1].get_code(code),
            None => 0.0,
        }
    }

    fn kmers(&self, length: usize) -> Vec<String> {
        self.probabilities(length)
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
        let max = self.max_kmer_len();
        let stranded = strand::detect(1..max + 1, |l, c| self.frequency_code(l, c));
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
            let mut freq = FrequencyBackgroundModel::from(&*self);
            freq.set_stranded(true);
            freq.degenerate_strands();
            self.probabilities = MarkovBackgroundModel::from(&freq).probabilities;
            self.stranded = Some(false);
        }
    }
}

impl From<&FrequencyBackgroundModel> for MarkovBackgroundModel {
    fn from(freq: &FrequencyBackgroundModel) -> Self {
        let codes: Vec<Vec<KmerCode>> = (1..=freq.max_kmer_len())
            .map(|length| {
                freq.frequencies(length)
                    .map(|table| table.iter().map(|(code, _)| code).collect())
                    .unwrap_or_default()
            })
            .collect();
        let mut markov = Self::from_frequencies(freq.metadata().clone(), codes, |l, c| {
            freq.frequency_code(l, c)
        });
        markov.stranded = freq.stranded();
        markov
    }
}

impl From<FrequencyBackgroundModel> for MarkovBackgroundModel {
    fn from(freq: FrequencyBackgroundModel) -> Self {
        Self::from(&freq)
    }
}

impl From<&CountsBackgroundModel> for MarkovBackgroundModel {
    fn from(counts: &CountsBackgroundModel) -> Self {
        let codes: Vec<Vec<KmerCode>> = (1..=counts.max_kmer_len())
            .map(|length| {
                counts
                    .counts(length)
                    .map(|table| table.iter().map(|(code, _)| code).collect())
                    .unwrap_or_default()
            })
            .collect();
        let mut markov = Self::from_frequencies(counts.metadata().clone(), codes, |l, c| {
            counts.frequency_code(l, c)
        });
        markov.stranded = counts.stranded();
        markov
    }
}

impl From<CountsBackgroundModel> for MarkovBackgroundModel {
    fn from(counts: CountsBackgroundModel) -> Self {
        Self::from(&counts)
    }
}
