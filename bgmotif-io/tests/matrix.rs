use std::io::Cursor;

use bgmotif::abc::Nucleotide;
use bgmotif::pwm::MatrixMetadata;
use bgmotif::pwm::WeightMatrix;
use bgmotif_io::matrix;

const MATRICES: &str = concat!(
    ">MA0004 1\n",
    "0.2  0.95 0.0 0.0 0.0 0.0\n",
    "0.8  0.0  1.0 0.0 0.0 0.0\n",
    "0.0  0.05 0.0 1.0 0.0 1.0\n",
    "0.0  0.0  0.0 0.0 1.0 0.0\n",
    "\n",
    ">MA0006 2\n",
    "-1.0 2.0\n",
    "-1.0 -1.0\n",
    "2.0 -1.0\n",
    "-1.0 -1.0\n",
);

#[test]
fn read_records() {
    let matrices = matrix::read(Cursor::new(MATRICES))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(matrices.len(), 2);

    assert_eq!(matrices[0].name(), "MA0004");
    assert_eq!(matrices[0].len(), 6);
    assert!(!matrices[0].is_log_odds());
    assert_eq!(matrices[0].consensus(), "CACGTG");

    assert_eq!(matrices[1].version(), "2");
    assert!(matrices[1].is_log_odds());
    assert_eq!(matrices[1].get(0, Nucleotide::G), 2.0);
    assert_eq!(matrices[1].consensus(), "GA");
}

#[test]
fn write_then_read() {
    let pwm = WeightMatrix::from_columns(
        MatrixMetadata::new("MA0008", "3"),
        [[0.25, 0.25, 0.5, 0.0], [0.125, 0.375, 0.0, 0.5]],
    )
    .unwrap();
    let mut buffer = Vec::new();
    matrix::write(&mut buffer, &pwm).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(
        text,
        ">MA0008 3\n0.25\t0.125\n0.25\t0.375\n0.5\t0\n0\t0.5\n"
    );

    let loaded = matrix::read(Cursor::new(text)).next().unwrap().unwrap();
    assert_eq!(loaded, pwm);
    assert!(loaded.is_same(&pwm));
}
