//! Base-4 integer codes for k-mers.
//!
//! A k-mer of length `k` is encoded as a `k`-digit base-4 number, with
//! `A=0`, `C=1`, `G=2` and `T=3`, the first base being the most significant
//! digit. Codes of k-mers of the same length sort in lexicographic order,
//! and the code of the `(k-1)`-prefix of a k-mer is `code >> 2`.
//!
//! # Example
//! ```
//! # use bgmotif::kmer;
//! let code = kmer::encode("ACG").unwrap();
//! assert_eq!(code, 0b00_01_10);
//! assert_eq!(kmer::decode(code, 3), "ACG");
//! assert_eq!(kmer::decode(kmer::reverse_complement_code(code, 3), 3), "CGT");
//! ```

use super::abc::Nucleotide;
use super::abc::Symbol;
use super::err::Error;

/// The integer type storing a k-mer code.
pub type KmerCode = u64;

/// The longest k-mer that fits in a [`KmerCode`].
pub const MAX_KMER_LEN: usize = 31;

/// Encode a k-mer given as raw ASCII, or `None` if it contains any
/// symbol outside of the DNA alphabet.
#[inline]
pub fn encode_bytes(kmer: &[u8]) -> Option<KmerCode> {
    let mut code = 0;
    for &c in kmer {
        let n = Nucleotide::from_ascii(c).ok()?;
        code = (code << 2) | n.as_index() as KmerCode;
    }
    Some(code)
}

/// Encode a k-mer string, case-insensitively.
pub fn encode(kmer: &str) -> Result<KmerCode, Error> {
    if kmer.is_empty() || kmer.len() > MAX_KMER_LEN {
        return Err(Error::InvalidLength {
            length: kmer.len(),
            max: MAX_KMER_LEN,
        });
    }
    encode_bytes(kmer.as_bytes()).ok_or_else(|| Error::InvalidKmer(kmer.to_string()))
}

/// Decode a k-mer code of the given length into an uppercase string.
pub fn decode(code: KmerCode, length: usize) -> String {
    let mut s = String::with_capacity(length);
    for i in (0..length).rev() {
        let digit = ((code >> (2 * i)) & 0b11) as usize;
        if let Some(n) = Nucleotide::from_index(digit) {
            s.push(n.as_char());
        }
    }
    s
}

/// Get the code of the reverse complement of a k-mer code.
#[inline]
pub fn reverse_complement_code(mut code: KmerCode, length: usize) -> KmerCode {
    let mut rc = 0;
    for _ in 0..length {
        rc = (rc << 2) | (0b11 - (code & 0b11));
        code >>= 2;
    }
    rc
}

/// Get the reverse complement of a k-mer string.
pub fn reverse_complement(kmer: &str) -> Result<String, Error> {
    let code = encode(kmer)?;
    Ok(decode(reverse_complement_code(code, kmer.len()), kmer.len()))
}

/// The number of distinct k-mers of the given length.
#[inline]
pub fn count(length: usize) -> KmerCode {
    1 << (2 * length)
}

/// Iterate over all k-mers of the given length, in lexicographic order.
pub fn all_kmers(length: usize) -> impl Iterator<Item = String> {
    (0..count(length)).map(move |code| decode(code, length))
}

/// Enumerate the pairs of k-mer codes that are reverse complement of each other.
///
/// Each unordered pair is produced exactly once, with the smallest code
/// first; self-complementary k-mers (such as `AT` or `ACGT`) are excluded.
///
/// # Example
/// ```
/// # use bgmotif::kmer;
/// let pairs = kmer::rev_comp_pairs(2).collect::<Vec<_>>();
/// assert_eq!(pairs.len(), 6);
/// assert_eq!(pairs[0], (kmer::encode("AA").unwrap(), kmer::encode("TT").unwrap()));
/// ```
pub fn rev_comp_pairs(length: usize) -> impl Iterator<Item = (KmerCode, KmerCode)> {
    (0..count(length)).filter_map(move |code| {
        let rc = reverse_complement_code(code, length);
        if code < rc {
            Some((code, rc))
        } else {
            None
        }
    })
}
