use std::borrow::Cow;

use log::debug;
use log::warn;

use super::CountsBackgroundModel;
use super::Metadata;
use crate::err::Error;

// --- Genome ------------------------------------------------------------------

/// A chromosome of a genome, identified by its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chromosome {
    pub name: String,
    pub length: usize,
}

impl Chromosome {
    /// Create a new chromosome record.
    pub fn new<S: Into<String>>(name: S, length: usize) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

/// A half-open interval `[start, end)` on a chromosome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub chromosome: String,
    pub start: usize,
    pub end: usize,
}

impl Region {
    /// Create a new region.
    pub fn new<S: Into<String>>(chromosome: S, start: usize, end: usize) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
        }
    }

    /// The number of bases covered by the region.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check whether the region covers no base.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A genome handle provided by the caller.
///
/// Background models only need to enumerate the chromosomes of a genome
/// and to fetch the sequence of a region; storage and lookup are left to
/// the implementor.
pub trait Genome {
    /// An opaque identifier for the genome, e.g. its assembly name.
    fn name(&self) -> &str;

    /// The chromosomes of the genome.
    fn chromosomes(&self) -> Vec<Chromosome>;

    /// The sequence of a region, or `None` if it cannot be fetched.
    fn sequence(&self, region: &Region) -> Option<Cow<'_, str>>;
}

// --- builders ----------------------------------------------------------------

impl CountsBackgroundModel {
    /// Count the k-mers of a collection of sequences.
    pub fn from_sequences<I>(
        metadata: Metadata,
        max_kmer_len: usize,
        sequences: I,
        include_reverse_complement: bool,
    ) -> Result<Self, Error>
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<str>,
    {
        let mut model = Self::new(metadata, max_kmer_len)?;
        for sequence in sequences {
            model.add_kmer_counts_from_sequence(sequence.as_ref(), include_reverse_complement);
        }
        Ok(model)
    }

    /// Count the k-mers of a list of regions of a genome.
    ///
    /// Regions that cannot be fetched from the genome are skipped.
    pub fn from_regions<G, I>(
        metadata: Metadata,
        max_kmer_len: usize,
        genome: &G,
        regions: I,
        include_reverse_complement: bool,
    ) -> Result<Self, Error>
    where
        G: Genome + ?Sized,
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<Region>,
    {
        let metadata = match metadata.genome() {
            Some(_) => metadata,
            None => metadata.with_genome(genome.name()),
        };
        let mut model = Self::new(metadata, max_kmer_len)?;
        for region in regions {
            let region = region.as_ref();
            match genome.sequence(region) {
                Some(sequence) => {
                    debug!(
                        "counting k-mers in {}:{}-{}",
                        region.chromosome, region.start, region.end
                    );
                    model.add_kmer_counts_from_sequence(&sequence, include_reverse_complement);
                }
                None => warn!(
                    "skipping region {}:{}-{} missing from genome {:?}",
                    region.chromosome,
                    region.start,
                    region.end,
                    genome.name()
                ),
            }
        }
        Ok(model)
    }

    /// Count the k-mers of every chromosome of a genome.
    pub fn from_genome<G>(
        metadata: Metadata,
        max_kmer_len: usize,
        genome: &G,
        include_reverse_complement: bool,
    ) -> Result<Self, Error>
    where
        G: Genome + ?Sized,
    {
        let regions = genome
            .chromosomes()
            .into_iter()
            .map(|chrom| Region::new(chrom.name, 0, chrom.length))
            .collect::<Vec<_>>();
        Self::from_regions(
            metadata,
            max_kmer_len,
            genome,
            regions,
            include_reverse_complement,
        )
    }
}

impl AsRef<Region> for Region {
    fn as_ref(&self) -> &Region {
        self
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use super::*;
    use crate::bg::BackgroundModel;

    struct TestGenome(BTreeMap<&'static str, &'static str>);

    impl Genome for TestGenome {
        fn name(&self) -> &str {
            "test"
        }

        fn chromosomes(&self) -> Vec<Chromosome> {
            self.0
                .iter()
                .map(|(name, seq)| Chromosome::new(*name, seq.len()))
                .collect()
        }

        fn sequence(&self, region: &Region) -> Option<Cow<'_, str>> {
            let seq = self.0.get(region.chromosome.as_str())?;
            seq.get(region.start..region.end).map(Cow::Borrowed)
        }
    }

    fn genome() -> TestGenome {
        let mut chroms = BTreeMap::new();
        chroms.insert("chr1", "ACGTACGT");
        chroms.insert("chr2", "AANNTT");
        TestGenome(chroms)
    }

    #[test]
    fn test_from_genome() {
        let model = CountsBackgroundModel::from_genome(Metadata::new("g"), 2, &genome(), false)
            .unwrap();
        assert_eq!(model.metadata().genome(), Some("test"));
        assert_eq!(model.total_count(1), 12);
        assert_eq!(model.kmer_count("A"), 4);
        assert_eq!(model.kmer_count("AA"), 1);
        assert_eq!(model.kmer_count("AC"), 2);
    }

    #[test]
    fn test_from_regions() {
        let regions = [
            Region::new("chr1", 0, 4),
            Region::new("chr3", 0, 4),
            Region::new("chr2", 4, 6),
        ];
        let model = CountsBackgroundModel::from_regions(
            Metadata::new("r").with_genome("other"),
            2,
            &genome(),
            &regions,
            false,
        )
        .unwrap();
        assert_eq!(model.metadata().genome(), Some("other"));
        assert_eq!(model.total_count(1), 6);
        assert_eq!(model.kmer_count("TT"), 1);
    }

    #[test]
    fn test_from_sequences() {
        let model =
            CountsBackgroundModel::from_sequences(Metadata::new("s"), 1, ["AC", "cg"], true)
                .unwrap();
        assert_eq!(model.kmer_count("C"), 3);
        assert_eq!(model.kmer_count("G"), 3);
        assert_eq!(model.kmer_count("A"), 1);
        assert_eq!(model.kmer_count("T"), 1);
        assert_eq!(model.stranded(), Some(false));
    }
}
