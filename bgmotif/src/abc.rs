//! Digital encoding for DNA sequences.

use std::fmt::Debug;

use generic_array::ArrayLength;
use generic_array::GenericArray;
use typenum::consts::U4;
use typenum::marker_traits::NonZero;
use typenum::marker_traits::Unsigned;

use super::err::InvalidData;
use super::err::InvalidSymbol;

// --- Symbol ------------------------------------------------------------------

/// A symbol from a biological alphabet.
pub trait Symbol: Sized + Copy + Eq {
    /// View this symbol as a zero-based index.
    fn as_index(&self) -> usize;
    /// View this symbol as a string character.
    fn as_char(&self) -> char {
        self.as_ascii() as char
    }
    /// Parse a string character into a symbol.
    fn from_char(c: char) -> Result<Self, InvalidSymbol> {
        if c.is_ascii() {
            Self::from_ascii(c as u8)
        } else {
            Err(InvalidSymbol(c))
        }
    }
    /// View this symbol as an ASCII charater.
    fn as_ascii(&self) -> u8;
    /// Parse an ASCII character into a symbol.
    fn from_ascii(c: u8) -> Result<Self, InvalidSymbol>;
}

/// A symbol that can be complemented.
pub trait ComplementableSymbol: Symbol {
    /// Get the complement of this symbol.
    fn complement(&self) -> Self;
}

// --- Alphabet ----------------------------------------------------------------

/// A biological alphabet with associated metadata.
pub trait Alphabet: Debug + Copy + Default + 'static {
    type Symbol: Symbol + Debug;
    type K: Unsigned + NonZero + ArrayLength + Debug;

    /// Get all the symbols of this alphabet, in index order.
    fn symbols() -> &'static [Self::Symbol];

    /// Get a string with all symbols from this alphabet.
    fn as_str() -> &'static str;
}

// --- DNA ---------------------------------------------------------------------

/// The DNA alphabet composed of 4 deoxyribonucleotides.
///
/// There is no wildcard symbol: ambiguity codes and gaps are rejected
/// at the boundary, and k-mers containing them are never counted.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dna;

impl Alphabet for Dna {
    type Symbol = Nucleotide;
    type K = U4;

    fn symbols() -> &'static [Nucleotide] {
        &[Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T]
    }

    fn as_str() -> &'static str {
        "ACGT"
    }
}

/// A deoxyribonucleotide.
///
/// Discriminants follow the lexicographic order, so that base-4 k-mer
/// codes sort the same way as the k-mer strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Nucleotide {
    /// Adenine.
    A = 0,
    /// Cytosine.
    C = 1,
    /// Guanine.
    G = 2,
    /// Thymine.
    T = 3,
}

impl Nucleotide {
    /// Get the nucleotide with the given index, if any.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Nucleotide::A),
            1 => Some(Nucleotide::C),
            2 => Some(Nucleotide::G),
            3 => Some(Nucleotide::T),
            _ => None,
        }
    }
}

impl From<Nucleotide> for char {
    fn from(n: Nucleotide) -> char {
        n.as_char()
    }
}

impl Symbol for Nucleotide {
    #[inline]
    fn as_index(&self) -> usize {
        *self as usize
    }

    fn as_ascii(&self) -> u8 {
        match self {
            Nucleotide::A => b'A',
            Nucleotide::C => b'C',
            Nucleotide::G => b'G',
            Nucleotide::T => b'T',
        }
    }

    #[inline]
    fn from_ascii(c: u8) -> Result<Self, InvalidSymbol> {
        match c {
            b'A' | b'a' => Ok(Nucleotide::A),
            b'C' | b'c' => Ok(Nucleotide::C),
            b'G' | b'g' => Ok(Nucleotide::G),
            b'T' | b't' => Ok(Nucleotide::T),
            _ => Err(InvalidSymbol(c as char)),
        }
    }
}

impl ComplementableSymbol for Nucleotide {
    #[inline]
    fn complement(&self) -> Self {
        match *self {
            Nucleotide::A => Nucleotide::T,
            Nucleotide::T => Nucleotide::A,
            Nucleotide::G => Nucleotide::C,
            Nucleotide::C => Nucleotide::G,
        }
    }
}

// --- BaseComposition ---------------------------------------------------------

/// The order-0 background frequencies of each nucleotide.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseComposition {
    frequencies: GenericArray<f32, <Dna as Alphabet>::K>,
}

impl BaseComposition {
    /// Create a new composition with the given frequencies.
    ///
    /// The array must contain valid frequencies, i.e. real numbers between
    /// zero and one that sum to one (up to rounding errors).
    pub fn new<F>(frequencies: F) -> Result<Self, InvalidData>
    where
        F: Into<GenericArray<f32, <Dna as Alphabet>::K>>,
    {
        let frequencies = frequencies.into();
        let mut sum = 0.0;
        for &f in frequencies.iter() {
            if !(0.0..=1.0).contains(&f) {
                return Err(InvalidData);
            }
            sum += f;
        }
        if (sum - 1.0).abs() > 1e-4 {
            return Err(InvalidData);
        }
        Ok(Self { frequencies })
    }

    /// Create a new composition with uniform frequencies.
    ///
    /// # Example
    /// ```
    /// # use bgmotif::abc::*;
    /// let bg = BaseComposition::uniform();
    /// assert_eq!(bg.frequencies(), &[0.25, 0.25, 0.25, 0.25]);
    /// ```
    pub fn uniform() -> Self {
        Self {
            frequencies: GenericArray::from([0.25; 4]),
        }
    }

    /// A reference to the raw frequencies, in `A, C, G, T` order.
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    /// Get the frequency of a single nucleotide.
    #[inline]
    pub fn get(&self, symbol: Nucleotide) -> f32 {
        self.frequencies[symbol.as_index()]
    }
}

impl AsRef<[f32]> for BaseComposition {
    fn as_ref(&self) -> &[f32] {
        self.frequencies()
    }
}

impl Default for BaseComposition {
    fn default() -> Self {
        Self::uniform()
    }
}
