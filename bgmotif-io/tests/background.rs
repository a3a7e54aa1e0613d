use std::io::Cursor;

use bgmotif::bg::BackgroundModel;
use bgmotif::bg::CountsBackgroundModel;
use bgmotif::bg::FrequencyBackgroundModel;
use bgmotif::bg::MarkovBackgroundModel;
use bgmotif::bg::Metadata;
use bgmotif_io::background;
use bgmotif_io::error::Error;

const TABLE: &str = concat!(
    "# yeast order-1 background\n",
    "A\t0.3\n",
    "C\t0.2\n",
    "G\t0.2\n",
    "T\t0.3\n",
    "\n",
    "0\tAA\t0.35\n",
    "1\tAC\t0.15\n",
    "2\tAG\t0.2\n",
    "3\tAT\t0.3\n",
);

#[test]
fn read_markov() {
    let markov = background::read_markov(Cursor::new(TABLE), Metadata::new("yeast")).unwrap();
    assert_eq!(markov.max_kmer_len(), 2);
    assert_eq!(markov.markov_prob("A"), 0.3);
    assert_eq!(markov.markov_prob("AC"), 0.15);
    assert_eq!(markov.markov_prob("CA"), 0.0);
    assert!((markov.frequency("AA") - 0.105).abs() < 1e-12);
}

#[test]
fn read_invalid_kmer() {
    let text = "A 0.5\nN 0.5\n";
    match background::read_frequency(Cursor::new(text), Metadata::new("n")) {
        Err(Error::Model(bgmotif::err::Error::InvalidKmer(kmer))) => assert_eq!(kmer, "N"),
        other => panic!("unexpected result: {:?}", other.map(|m| m.max_kmer_len())),
    }
}

#[test]
fn write_then_read() {
    let mut counts = CountsBackgroundModel::new(Metadata::new("seq"), 3).unwrap();
    counts.add_kmer_counts_from_sequence("ACGGTCAAGTTTACGCAGGT", true);
    let freq = FrequencyBackgroundModel::from(&counts);

    let mut buffer = Vec::new();
    background::write(&mut buffer, &freq.rows()).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.starts_with("A\t"));

    let loaded = background::read_frequency(Cursor::new(text), Metadata::new("seq")).unwrap();
    assert_eq!(loaded.max_kmer_len(), 3);
    assert_eq!(loaded.rows(), freq.rows());

    let markov = MarkovBackgroundModel::from(&loaded);
    assert!(markov.is_normalized(1e-9));
}
