#![feature(test)]

extern crate bgmotif;
extern crate rand;
extern crate test;

use bgmotif::bg::BackgroundModel;
use bgmotif::bg::CountsBackgroundModel;
use bgmotif::bg::FrequencyBackgroundModel;
use bgmotif::bg::MarkovBackgroundModel;
use bgmotif::bg::Metadata;
use rand::rngs::StdRng;
use rand::SeedableRng;

const N: usize = 100_000;

/// Generate a reproducible sequence from an order-0 background.
fn sequence() -> String {
    let mut markov = MarkovBackgroundModel::new(Metadata::new("bench"), 1).unwrap();
    for (kmer, p) in [("A", 0.3), ("C", 0.2), ("G", 0.2), ("T", 0.3)] {
        markov.set_markov_prob(kmer, p).unwrap();
    }
    markov.sample(&mut StdRng::seed_from_u64(42), N)
}

mod counts {
    use super::*;

    fn bench_add(bencher: &mut test::Bencher, max_kmer_len: usize, rc: bool) {
        let seq = sequence();
        bencher.iter(|| {
            let mut counts = CountsBackgroundModel::new(Metadata::new("bench"), max_kmer_len).unwrap();
            counts.add_kmer_counts_from_sequence(&seq, rc);
            test::black_box(counts);
        });
        bencher.bytes = seq.len() as u64;
    }

    #[bench]
    fn k3(bencher: &mut test::Bencher) {
        bench_add(bencher, 3, false);
    }

    #[bench]
    fn k6(bencher: &mut test::Bencher) {
        bench_add(bencher, 6, false);
    }

    #[bench]
    fn k6_rc(bencher: &mut test::Bencher) {
        bench_add(bencher, 6, true);
    }
}

mod convert {
    use super::*;

    fn counts() -> CountsBackgroundModel {
        let mut counts = CountsBackgroundModel::new(Metadata::new("bench"), 6).unwrap();
        counts.add_kmer_counts_from_sequence(&sequence(), false);
        counts
    }

    #[bench]
    fn counts_to_markov(bencher: &mut test::Bencher) {
        let counts = counts();
        bencher.iter(|| test::black_box(MarkovBackgroundModel::from(&counts)));
    }

    #[bench]
    fn markov_to_frequency(bencher: &mut test::Bencher) {
        let markov = MarkovBackgroundModel::from(&counts());
        bencher.iter(|| test::black_box(FrequencyBackgroundModel::from(&markov)));
    }

    #[bench]
    fn degenerate_strands(bencher: &mut test::Bencher) {
        let counts = counts();
        bencher.iter(|| {
            let mut c = counts.clone();
            c.set_stranded(true);
            c.degenerate_strands();
            test::black_box(c);
        });
    }
}
