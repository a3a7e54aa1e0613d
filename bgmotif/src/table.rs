//! Sparse storage for values attached to k-mers of a fixed length.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::FusedIterator;
use std::ops::AddAssign;

use super::err::Error;
use super::kmer;
use super::kmer::KmerCode;

// --- KmerTable ---------------------------------------------------------------

/// A table mapping k-mers of a single length to a numeric value.
///
/// Only k-mers that were explicitly set are stored; any other k-mer of
/// the right length reads as the zero element of `T`. Entries are kept
/// sorted by k-mer code, i.e. in lexicographic order.
#[derive(Clone, Debug, PartialEq)]
pub struct KmerTable<T> {
    length: usize,
    data: BTreeMap<KmerCode, T>,
}

impl<T: Copy + Default> KmerTable<T> {
    /// Create a new empty table for k-mers of the given length.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            data: BTreeMap::new(),
        }
    }

    /// The length of the k-mers stored in this table.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// The number of k-mers stored in this table.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the value for a k-mer code, or zero if the k-mer was never set.
    #[inline]
    pub fn get_code(&self, code: KmerCode) -> T {
        self.data.get(&code).copied().unwrap_or_default()
    }

    /// Get the value for a k-mer, or zero if the k-mer was never set.
    ///
    /// Invalid k-mers and k-mers of another length also read as zero.
    pub fn get(&self, kmer: &str) -> T {
        if kmer.len() != self.length {
            return T::default();
        }
        match kmer::encode_bytes(kmer.as_bytes()) {
            Some(code) => self.get_code(code),
            None => T::default(),
        }
    }

    /// Check whether the given k-mer code has been set.
    #[inline]
    pub fn contains_code(&self, code: KmerCode) -> bool {
        self.data.contains_key(&code)
    }

    /// Set the value for a k-mer code.
    #[inline]
    pub fn set_code(&mut self, code: KmerCode, value: T) {
        self.data.insert(code, value);
    }

    /// Set the value for a k-mer.
    pub fn set(&mut self, kmer: &str, value: T) -> Result<(), Error> {
        let code = self.validate(kmer)?;
        self.set_code(code, value);
        Ok(())
    }

    /// Remove all entries from the table.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterate over the k-mer codes and their values, in lexicographic order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.data.iter(),
        }
    }

    /// Iterate over the k-mers of this table, in lexicographic order.
    pub fn kmers(&self) -> impl Iterator<Item = String> + '_ {
        self.data.keys().map(|&code| kmer::decode(code, self.length))
    }

    /// Encode a k-mer, checking that it belongs in this table.
    fn validate(&self, kmer: &str) -> Result<KmerCode, Error> {
        if kmer.len() != self.length {
            return Err(Error::InvalidLength {
                length: kmer.len(),
                max: self.length,
            });
        }
        kmer::encode_bytes(kmer.as_bytes()).ok_or_else(|| Error::InvalidKmer(kmer.to_string()))
    }
}

impl<T: Copy + Default + AddAssign> KmerTable<T> {
    /// Add `delta` to the value of a k-mer code.
    #[inline]
    pub fn add_code(&mut self, code: KmerCode, delta: T) {
        *self.data.entry(code).or_default() += delta;
    }

    /// Add `delta` to the value of a k-mer.
    pub fn add(&mut self, kmer: &str, delta: T) -> Result<(), Error> {
        let code = self.validate(kmer)?;
        self.add_code(code, delta);
        Ok(())
    }

    /// Compute the sum of all values in the table.
    pub fn total(&self) -> T {
        let mut total = T::default();
        for &x in self.data.values() {
            total += x;
        }
        total
    }
}

impl<'a, T: Copy + Default> IntoIterator for &'a KmerTable<T> {
    type Item = (KmerCode, T);
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- Iter --------------------------------------------------------------------

/// An iterator over the entries of a [`KmerTable`].
pub struct Iter<'a, T> {
    inner: btree_map::Iter<'a, KmerCode, T>,
}

impl<T: Copy> Iterator for Iter<'_, T> {
    type Item = (KmerCode, T);
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&code, &x)| (code, x))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Copy> ExactSizeIterator for Iter<'_, T> {}

impl<T: Copy> FusedIterator for Iter<'_, T> {}

impl<T: Copy> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(&code, &x)| (code, x))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_missing() {
        let table = KmerTable::<u64>::new(2);
        assert_eq!(table.get("AC"), 0);
        assert_eq!(table.get("ACG"), 0);
        assert_eq!(table.get("NN"), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_invalid() {
        let mut table = KmerTable::<f64>::new(2);
        assert_eq!(table.set("AN", 0.5), Err(Error::InvalidKmer(String::from("AN"))));
        assert!(matches!(
            table.set("ACG", 0.5),
            Err(Error::InvalidLength { length: 3, max: 2 })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_add_total() {
        let mut table = KmerTable::<u64>::new(2);
        table.add("GT", 3).unwrap();
        table.add("gt", 2).unwrap();
        table.add("AA", 1).unwrap();
        assert_eq!(table.get("GT"), 5);
        assert_eq!(table.total(), 6);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_kmers_sorted() {
        let mut table = KmerTable::<u64>::new(2);
        for kmer in ["TA", "AC", "CG", "AA"] {
            table.set(kmer, 1).unwrap();
        }
        let kmers = table.kmers().collect::<Vec<_>>();
        assert_eq!(kmers, ["AA", "AC", "CG", "TA"]);
    }
}
