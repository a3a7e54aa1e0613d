//! Reverse-complement symmetry of k-mer statistics.

use std::ops::Range;

use log::debug;

use crate::kmer;
use crate::kmer::KmerCode;
use crate::table::KmerTable;

/// Enumerate the reverse-complement pairs of k-mer codes of a given length.
///
/// Each unordered pair is produced once, self-complementary k-mers
/// excluded. See [`kmer::rev_comp_pairs`].
pub fn enumerate_rev_comp_pairs(length: usize) -> Vec<(KmerCode, KmerCode)> {
    kmer::rev_comp_pairs(length).collect()
}

/// Decide whether a model is stranded from its k-mer values.
///
/// Lengths are scanned from 1 upward, and the first reverse-complement
/// pair whose two values are exactly equal flags the whole model as
/// stranded; the model is only unstranded if no such pair exists at any
/// length. Unset k-mers count as zero, so a pair of unobserved k-mers
/// matches.
pub fn detect<T, F>(lengths: Range<usize>, value: F) -> bool
where
    T: PartialEq,
    F: Fn(usize, KmerCode) -> T,
{
    for length in lengths {
        for (x, y) in kmer::rev_comp_pairs(length) {
            if value(length, x) == value(length, y) {
                debug!(
                    "found matching reverse-complement pair {}/{}",
                    kmer::decode(x, length),
                    kmer::decode(y, length)
                );
                return true;
            }
        }
    }
    false
}

/// Replace the values of each reverse-complement pair with a combination.
///
/// Pairs where neither k-mer was set are left untouched, so that the
/// table does not gain entries for unobserved k-mers.
pub(crate) fn symmetrize<T, F>(table: &mut KmerTable<T>, combine: F)
where
    T: Copy + Default,
    F: Fn(T, T) -> T,
{
    let length = table.length();
    for (x, y) in kmer::rev_comp_pairs(length) {
        if table.contains_code(x) || table.contains_code(y) {
            let v = combine(table.get_code(x), table.get_code(y));
            table.set_code(x, v);
            table.set_code(y, v);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_detect_first_match() {
        let mut table = KmerTable::<u64>::new(1);
        table.set("A", 1).unwrap();
        table.set("C", 2).unwrap();
        table.set("G", 2).unwrap();
        table.set("T", 3).unwrap();
        // C/G match even though A/T do not
        assert!(detect(1..2, |_, c| table.get_code(c)));

        table.set("G", 4).unwrap();
        assert!(!detect(1..2, |_, c| table.get_code(c)));
    }

    #[test]
    fn test_symmetrize() {
        let mut table = KmerTable::<u64>::new(2);
        table.set("AA", 3).unwrap();
        table.set("TT", 1).unwrap();
        table.set("AC", 2).unwrap();
        symmetrize(&mut table, |x, y| x + y);
        assert_eq!(table.get("AA"), 4);
        assert_eq!(table.get("TT"), 4);
        assert_eq!(table.get("AC"), 2);
        assert_eq!(table.get("GT"), 2);
        assert!(!table.contains_code(kmer::encode("CC").unwrap()));
    }
}
