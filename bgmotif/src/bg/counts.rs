use std::cell::OnceCell;

use log::debug;

use super::check_max_kmer_len;
use super::conditional;
use super::locate;
use super::lookup;
use super::strand;
use super::BackgroundModel;
use super::Metadata;
use crate::err::Error;
use crate::kmer;
use crate::kmer::KmerCode;
use crate::table::KmerTable;

// --- CountsBackgroundModel ---------------------------------------------------

/// A background model storing raw k-mer counts.
///
/// Frequencies are derived from the counts lazily, once per k-mer length,
/// and the cached table is dropped whenever a count of that length changes.
/// The cache uses a [`OnceCell`], so the model is not [`Sync`]: wrap it in
/// a `Mutex` to share it between threads.
#[derive(Clone, Debug)]
pub struct CountsBackgroundModel {
    metadata: Metadata,
    counts: Vec<KmerTable<u64>>,
    frequencies: Vec<OnceCell<KmerTable<f64>>>,
    stranded: Option<bool>,
}

impl CountsBackgroundModel {
    /// Create a new empty model for k-mers up to the given length.
    pub fn new(metadata: Metadata, max_kmer_len: usize) -> Result<Self, Error> {
        check_max_kmer_len(max_kmer_len)?;
        Ok(Self {
            metadata,
            counts: (1..=max_kmer_len).map(KmerTable::new).collect(),
            frequencies: (1..=max_kmer_len).map(|_| OnceCell::new()).collect(),
            stranded: None,
        })
    }

    /// Get the number of occurences of a k-mer.
    pub fn kmer_count(&self, kmer: &str) -> u64 {
        match lookup(kmer, self.max_kmer_len()) {
            Some((length, code)) => self.counts[length - 1].get_code(code),
            None => 0,
        }
    }

    /// Get the table of counts for k-mers of the given length.
    pub fn counts(&self, length: usize) -> Option<&KmerTable<u64>> {
        length.checked_sub(1).and_then(|i| self.counts.get(i))
    }

    /// Get the total number of k-mers of the given length.
    pub fn total_count(&self, length: usize) -> u64 {
        self.counts(length).map(KmerTable::total).unwrap_or(0)
    }

    /// Set the number of occurences of a k-mer.
    pub fn set_kmer_count(&mut self, kmer: &str, count: u64) -> Result<(), Error> {
        let (length, code) = locate(kmer, self.max_kmer_len())?;
        self.counts[length - 1].set_code(code, count);
        self.invalidate(length);
        Ok(())
    }

    /// Add `delta` occurences of a k-mer.
    pub fn add_to_kmer_count(&mut self, kmer: &str, delta: u64) -> Result<(), Error> {
        let (length, code) = locate(kmer, self.max_kmer_len())?;
        self.counts[length - 1].add_code(code, delta);
        self.invalidate(length);
        Ok(())
    }

    /// Count the k-mers of all lengths found in a sequence.
    ///
    /// Every substring of length `1..=max_kmer_len` is counted, including
    /// the shorter ones at the end of the sequence, unless it contains a
    /// symbol outside of the alphabet (an ambiguity code or a gap). When
    /// `include_reverse_complement` is set, the reverse complement of every
    /// counted k-mer is counted as well, and the model is marked unstranded;
    /// otherwise it is marked stranded.
    pub fn add_kmer_counts_from_sequence(&mut self, sequence: &str, include_reverse_complement: bool) {
        let bytes = sequence.as_bytes();
        let max_kmer_len = self.max_kmer_len();
        for start in 0..bytes.len() {
            for length in 1..=max_kmer_len.min(bytes.len() - start) {
                // a longer k-mer would contain the same invalid symbol
                let code = match kmer::encode_bytes(&bytes[start..start + length]) {
                    Some(code) => code,
                    None => break,
                };
                let table = &mut self.counts[length - 1];
                table.add_code(code, 1);
                if include_reverse_complement {
                    table.add_code(kmer::reverse_complement_code(code, length), 1);
                }
            }
        }
        for length in 1..=max_kmer_len {
            self.invalidate(length);
        }
        self.stranded = Some(!include_reverse_complement);
    }

    /// Drop the cached frequencies for k-mers of the given length.
    fn invalidate(&mut self, length: usize) {
        self.frequencies[length - 1].take();
        self.stranded = None;
    }

    /// Get the frequency table for the given length, building it if needed.
    fn frequency_table(&self, length: usize) -> &KmerTable<f64> {
        self.frequencies[length - 1].get_or_init(|| {
            let counts = &self.counts[length - 1];
            let total = counts.total();
            debug!(
                "building frequency table for {}-mers of {:?} ({} k-mers)",
                length,
                self.metadata.name(),
                total
            );
            let mut table = KmerTable::new(length);
            for (code, count) in counts {
                let f = if total > 0 {
                    count as f64 / total as f64
                } else {
                    0.0
                };
                table.set_code(code, f);
            }
            table
        })
    }

    #[inline]
    pub(crate) fn frequency_code(&self, length: usize, code: KmerCode) -> f64 {
        self.frequency_table(length).get_code(code)
    }
}

impl BackgroundModel for CountsBackgroundModel {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn max_kmer_len(&self) -> usize {
        self.counts.len()
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
        self.counts(length)
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
        let counts = &self.counts;
        let stranded = strand::detect(1..counts.len() + 1, |l, c| counts[l - 1].get_code(c));
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
            for length in 1..=self.max_kmer_len() {
                strand::symmetrize(&mut self.counts[length - 1], |x, y| x + y);
                self.invalidate(length);
            }
            self.stranded = Some(false);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn model(max_kmer_len: usize) -> CountsBackgroundModel {
        CountsBackgroundModel::new(Metadata::new("test"), max_kmer_len).unwrap()
    }

    #[test]
    fn test_new_invalid_length() {
        assert!(CountsBackgroundModel::new(Metadata::new("x"), 0).is_err());
        assert!(CountsBackgroundModel::new(Metadata::new("x"), 40).is_err());
    }

    #[test]
    fn test_count_sequence() {
        let mut m = model(3);
        m.add_kmer_counts_from_sequence("ACGTA", false);
        assert_eq!(m.total_count(1), 5);
        assert_eq!(m.total_count(2), 4);
        assert_eq!(m.total_count(3), 3);
        assert_eq!(m.kmer_count("A"), 2);
        assert_eq!(m.kmer_count("TA"), 1);
        assert_eq!(m.kmer_count("GTA"), 1);
        assert_eq!(m.stranded(), Some(true));
    }

    #[test]
    fn test_count_sequence_skips_invalid() {
        let mut m = model(3);
        m.add_kmer_counts_from_sequence("ACNGT-A", false);
        assert_eq!(m.total_count(1), 5);
        assert_eq!(m.kmer_count("AC"), 1);
        assert_eq!(m.kmer_count("GT"), 1);
        assert_eq!(m.total_count(2), 2);
        assert_eq!(m.total_count(3), 0);
    }

    #[test]
    fn test_count_sequence_revcomp() {
        let mut m = model(2);
        m.add_kmer_counts_from_sequence("AAC", true);
        assert_eq!(m.kmer_count("AA"), 1);
        assert_eq!(m.kmer_count("TT"), 1);
        assert_eq!(m.kmer_count("AC"), 1);
        assert_eq!(m.kmer_count("GT"), 1);
        assert_eq!(m.kmer_count("A"), 2);
        assert_eq!(m.kmer_count("T"), 2);
        assert_eq!(m.stranded(), Some(false));
    }

    #[test]
    fn test_frequency_cache_invalidation() {
        let mut m = model(1);
        m.set_kmer_count("A", 1).unwrap();
        m.set_kmer_count("C", 3).unwrap();
        assert_eq!(m.frequency("C"), 0.75);
        m.add_to_kmer_count("A", 2).unwrap();
        assert_eq!(m.frequency("C"), 0.5);
        assert_eq!(m.frequency("A"), 0.5);
        assert_eq!(m.frequency("G"), 0.0);
    }

    #[test]
    fn test_frequency_empty() {
        let m = model(2);
        assert_eq!(m.frequency("AC"), 0.0);
        assert_eq!(m.markov_prob("AC"), 0.0);
    }

    #[test]
    fn test_set_invalid() {
        let mut m = model(2);
        assert_eq!(
            m.set_kmer_count("AX", 1),
            Err(Error::InvalidKmer(String::from("AX")))
        );
        assert!(m.add_to_kmer_count("ACG", 1).is_err());
        assert_eq!(m.kmer_count("AX"), 0);
    }

    #[test]
    fn test_markov_prob() {
        let mut m = model(2);
        m.set_kmer_count("AA", 1).unwrap();
        m.set_kmer_count("AC", 3).unwrap();
        m.set_kmer_count("CA", 4).unwrap();
        assert_eq!(m.markov_prob("AC"), 0.75);
        assert_eq!(m.markov_prob("CA"), 1.0);
        assert_eq!(m.markov_prob("GA"), 0.0);
    }

    #[test]
    fn test_degenerate_strands_idempotent() {
        let mut m = model(2);
        m.add_kmer_counts_from_sequence("AACGA", false);
        assert_eq!(m.stranded(), Some(true));
        m.degenerate_strands();
        let once = (1..=2).map(|l| m.counts(l).unwrap().clone()).collect::<Vec<_>>();
        assert_eq!(m.kmer_count("A"), 3);
        assert_eq!(m.kmer_count("T"), 3);
        assert_eq!(m.kmer_count("AA"), 1);
        assert_eq!(m.kmer_count("TT"), 1);
        m.degenerate_strands();
        let twice = (1..=2).map(|l| m.counts(l).unwrap().clone()).collect::<Vec<_>>();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_degenerate_strands_unstranded() {
        let mut m = model(1);
        m.add_kmer_counts_from_sequence("ACG", true);
        let before = m.counts(1).unwrap().clone();
        m.degenerate_strands();
        assert_eq!(m.counts(1).unwrap(), &before);
    }

    #[test]
    fn test_check_and_set_stranded() {
        let mut m = model(1);
        for (kmer, count) in [("A", 1), ("C", 2), ("G", 3), ("T", 4)] {
            m.set_kmer_count(kmer, count).unwrap();
        }
        assert_eq!(m.stranded(), None);
        assert!(!m.check_and_set_stranded());
        assert_eq!(m.stranded(), Some(false));

        m.set_kmer_count("T", 1).unwrap();
        assert_eq!(m.stranded(), None);
        assert!(m.check_and_set_stranded());
    }
}
