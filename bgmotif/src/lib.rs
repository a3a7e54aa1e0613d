#![doc = include_str!("../README.md")]

extern crate generic_array;
extern crate log;
extern crate typenum;

pub mod abc;
pub mod bg;
pub mod dense;
pub mod err;
pub mod kmer;
pub mod pwm;
pub mod scan;
pub mod seq;
pub mod table;

pub use abc::Alphabet;
pub use abc::BaseComposition;
pub use abc::ComplementableSymbol;
pub use abc::Dna;
pub use abc::Nucleotide;
pub use abc::Symbol;
pub use bg::AnyBackgroundModel;
pub use bg::BackgroundModel;
pub use bg::CountsBackgroundModel;
pub use bg::FrequencyBackgroundModel;
pub use bg::MarkovBackgroundModel;
pub use dense::DenseMatrix;
pub use err::Error;
pub use err::InvalidSymbol;
pub use pwm::WeightMatrix;
pub use scan::Scanner;
pub use seq::EncodedSequence;
pub use table::KmerTable;
