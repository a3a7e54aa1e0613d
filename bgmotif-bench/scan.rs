#![feature(test)]

extern crate bgmotif;
extern crate rand;
extern crate test;

use bgmotif::abc::Dna;
use bgmotif::bg::BackgroundModel;
use bgmotif::bg::MarkovBackgroundModel;
use bgmotif::bg::Metadata;
use bgmotif::pwm::MatrixMetadata;
use bgmotif::pwm::WeightMatrix;
use bgmotif::scan::Scanner;
use bgmotif::seq::EncodedSequence;
use rand::rngs::StdRng;
use rand::SeedableRng;

const N: usize = 100_000;

fn setup() -> (WeightMatrix, EncodedSequence<Dna>) {
    let mut markov = MarkovBackgroundModel::new(Metadata::new("bench"), 1).unwrap();
    for (kmer, p) in [("A", 0.3), ("C", 0.2), ("G", 0.2), ("T", 0.3)] {
        markov.set_markov_prob(kmer, p).unwrap();
    }
    let seq = markov.sample(&mut StdRng::seed_from_u64(42), N);
    let encoded = EncodedSequence::encode(&seq).unwrap();

    let pwm = WeightMatrix::from_columns(
        MatrixMetadata::new("GATA", "1"),
        [
            [0.2, 0.3, 0.3, 0.2],
            [0.9, 0.0, 0.1, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.9, 0.0, 0.1, 0.0],
        ],
    )
    .unwrap()
    .log_odds_version(markov.base_composition());
    (pwm, encoded)
}

#[bench]
fn threshold(bencher: &mut test::Bencher) {
    let (pwm, seq) = setup();
    let threshold = pwm.max_score() - 2.0;
    bencher.iter(|| test::black_box(Scanner::new(&pwm, &seq).threshold(threshold).count()));
    bencher.bytes = seq.len() as u64;
}

#[bench]
fn best(bencher: &mut test::Bencher) {
    let (pwm, seq) = setup();
    bencher.iter(|| test::black_box(Scanner::new(&pwm, &seq).best()));
    bencher.bytes = seq.len() as u64;
}
