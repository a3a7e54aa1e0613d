extern crate bgmotif;

use bgmotif::abc::BaseComposition;
use bgmotif::abc::Nucleotide;
use bgmotif::bg::BackgroundModel;
use bgmotif::bg::MarkovBackgroundModel;
use bgmotif::bg::Metadata;
use bgmotif::pwm::MatrixMetadata;
use bgmotif::pwm::WeightMatrix;
use bgmotif::scan::Scanner;
use bgmotif::scan::Strand;
use bgmotif::seq::EncodedSequence;

fn metadata() -> MatrixMetadata {
    MatrixMetadata::new("MA0004", "1").with_kind("JASPAR")
}

fn frequencies() -> WeightMatrix {
    WeightMatrix::from_columns(
        metadata(),
        [
            [0.2, 0.8, 0.0, 0.0],
            [0.95, 0.0, 0.05, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    )
    .unwrap()
}

#[test]
fn max_score() {
    let pwm =
        WeightMatrix::from_columns(metadata(), [[1.0, 2.0, 0.0, 0.0], [0.0, 0.0, 3.0, 1.0]])
            .unwrap();
    assert_eq!(pwm.max_score(), 5.0);
    assert_eq!(pwm.min_score(), 0.0);
}

#[test]
fn consensus() {
    let pwm = WeightMatrix::from_columns(
        metadata(),
        [[0.7, 0.1, 0.1, 0.1], [0.45, 0.0, 0.45, 0.1]],
    )
    .unwrap();
    assert_eq!(pwm.consensus_letter(0), 'A');
    assert_eq!(pwm.consensus_letter(1), 'R');
    assert_eq!(frequencies().consensus(), "CACGTG");
}

#[test]
fn log_odds_roundtrip() {
    let bg = BaseComposition::new([0.3, 0.2, 0.2, 0.3]).unwrap();
    let original = frequencies();
    let mut pwm = original.log_odds_version(bg.clone());
    assert!(pwm.is_log_odds());
    pwm.to_frequency(bg);
    assert!(!pwm.is_log_odds());
    for i in 0..pwm.len() {
        for (x, y) in pwm.column(i).iter().zip(original.column(i).iter()) {
            assert!((x - y).abs() < 1e-5, "{} != {}", x, y);
        }
    }
}

#[test]
fn reverse_complement_involution() {
    let pwm = frequencies();
    let rc = pwm.reverse_complement();
    assert!(!rc.is_same(&pwm));
    assert!(rc.reverse_complement().is_same(&pwm));
    // CACGTG is its own reverse complement
    assert_eq!(rc.consensus(), "CACGTG");
    assert_eq!(rc.get(0, Nucleotide::C), 1.0);
}

#[test]
fn scan_palindrome() {
    let pwm = frequencies().log_odds_version(None);
    let seq = EncodedSequence::encode("TTCACGTGAA").unwrap();
    let hits = Scanner::new(&pwm, &seq)
        .threshold(pwm.max_score() - 1.0)
        .collect::<Vec<_>>();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].position, 2);
    assert_eq!(hits[0].strand, Strand::Direct);
    assert_eq!(hits[1].position, 2);
    assert_eq!(hits[1].strand, Strand::Reverse);
}

#[test]
fn rows_roundtrip() {
    let pwm = frequencies();
    let rows = pwm.rows();
    assert_eq!(rows.len(), 24);
    let loaded = WeightMatrix::from_rows(pwm.metadata().clone(), rows.into_iter().rev()).unwrap();
    assert!(loaded.is_same(&pwm));
    assert_eq!(loaded, pwm);
}

#[test]
fn log_odds_from_unnormalized_markov() {
    let mut markov = MarkovBackgroundModel::new(Metadata::new("bg"), 1).unwrap();
    for (kmer, p) in [("A", 0.3), ("C", 0.2), ("G", 0.2), ("T", 0.2)] {
        markov.set_markov_prob(kmer, p).unwrap();
    }
    let mut pwm = WeightMatrix::from_columns(metadata(), [[0.7, 0.1, 0.1, 0.1]]).unwrap();
    pwm.to_log_odds(markov.base_composition());
    let a = (0.7f32 / (0.3 / 0.9)).log2();
    let c = (0.1f32 / (0.2 / 0.9)).log2();
    assert!((pwm.get(0, Nucleotide::A) - a).abs() < 1e-4);
    assert!((pwm.get(0, Nucleotide::C) - c).abs() < 1e-4);
}

#[test]
fn log_odds_roundtrip_zero_background() {
    let bg = BaseComposition::new([0.5, 0.0, 0.0, 0.5]).unwrap();
    let original =
        WeightMatrix::from_columns(metadata(), [[0.7, 0.1, 0.1, 0.1], [0.0, 0.5, 0.5, 0.0]])
            .unwrap();
    let mut pwm = original.log_odds_version(bg.clone());
    assert!(pwm.weights().iter().flatten().all(|w| w.is_finite()));
    pwm.to_frequency(bg);
    for i in 0..original.len() {
        for (x, y) in pwm.column(i).iter().zip(original.column(i)) {
            assert!((x - y).abs() < 1e-4, "{} != {}", x, y);
        }
    }
}

#[test]
fn units_detected_after_set() {
    let mut pwm = WeightMatrix::new(metadata(), 2);
    pwm.set(0, Nucleotide::A, 1.0);
    pwm.set(1, Nucleotide::C, -1.0);
    pwm.set(1, Nucleotide::G, 1.0);
    assert!(!pwm.is_log_odds());

    let mut copy = pwm.clone();
    assert!(copy.normalize_frequencies().is_ok());
    assert!(copy.is_log_odds());
    assert_eq!(copy.column(1), pwm.column(1));

    pwm.to_frequency(None);
    assert!(!pwm.is_log_odds());
    assert!(pwm.weights().iter().flatten().all(|&w| w > 0.0));
    assert!((pwm.get(0, Nucleotide::A) - 0.5).abs() < 1e-6);
    assert!((pwm.get(1, Nucleotide::C) - 0.125).abs() < 1e-6);
}
