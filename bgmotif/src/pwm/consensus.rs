use super::WeightMatrix;
use crate::abc::Nucleotide;
use crate::abc::Symbol;

/// The two-symbol IUPAC codes considered for degenerate positions.
const PAIRS: [(char, Nucleotide, Nucleotide); 6] = [
    ('R', Nucleotide::A, Nucleotide::G),
    ('Y', Nucleotide::C, Nucleotide::T),
    ('S', Nucleotide::C, Nucleotide::G),
    ('W', Nucleotide::A, Nucleotide::T),
    ('K', Nucleotide::G, Nucleotide::T),
    ('M', Nucleotide::A, Nucleotide::C),
];

// --- ConsensusThresholds -----------------------------------------------------

/// The weights a position must exceed to get a consensus letter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConsensusThresholds {
    /// Threshold for the weight of a single symbol.
    pub single: f32,
    /// Threshold for the summed weights of a two-symbol code.
    pub pair: f32,
}

impl ConsensusThresholds {
    /// The thresholds for log-odds matrices.
    pub const fn log_odds() -> Self {
        Self {
            single: 0.5,
            pair: 1.2,
        }
    }

    /// The thresholds for frequency matrices.
    pub const fn frequency() -> Self {
        Self {
            single: 0.6,
            pair: 0.8,
        }
    }

    /// The default thresholds for the units of a matrix.
    pub fn for_matrix(matrix: &WeightMatrix) -> Self {
        if matrix.is_log_odds() {
            Self::log_odds()
        } else {
            Self::frequency()
        }
    }
}

impl Default for ConsensusThresholds {
    fn default() -> Self {
        Self::frequency()
    }
}

// --- Consensus ---------------------------------------------------------------

impl WeightMatrix {
    /// Get the consensus letter of a position.
    ///
    /// Uses the default thresholds for the units of the matrix.
    pub fn consensus_letter(&self, pos: usize) -> char {
        self.consensus_letter_with(pos, ConsensusThresholds::for_matrix(self))
    }

    /// Get the consensus letter of a position using custom thresholds.
    ///
    /// A symbol is selected if its weight exceeds the single threshold and
    /// is strictly the largest of the position. Otherwise, the two-symbol
    /// code with the largest summed weight above the pair threshold is
    /// selected, and `N` if there is none.
    pub fn consensus_letter_with(&self, pos: usize, thresholds: ConsensusThresholds) -> char {
        let column = self.column(pos);

        let mut best: Option<(usize, f32)> = None;
        let mut tied = false;
        for (i, &w) in column.iter().enumerate() {
            match best {
                Some((_, b)) if w == b => tied = true,
                Some((_, b)) if w < b => (),
                _ => {
                    best = Some((i, w));
                    tied = false;
                }
            }
        }
        if let Some((i, w)) = best {
            if !tied && w > thresholds.single {
                if let Some(n) = Nucleotide::from_index(i) {
                    return n.as_char();
                }
            }
        }

        let mut code = 'N';
        let mut score = thresholds.pair;
        for &(c, x, y) in PAIRS.iter() {
            let s = column[x.as_index()] + column[y.as_index()];
            if s > score {
                code = c;
                score = s;
            }
        }
        code
    }

    /// Get the consensus sequence of the whole matrix.
    pub fn consensus(&self) -> String {
        let thresholds = ConsensusThresholds::for_matrix(self);
        (0..self.len())
            .map(|i| self.consensus_letter_with(i, thresholds))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pwm::MatrixMetadata;

    fn pwm(columns: &[[f32; 4]]) -> WeightMatrix {
        WeightMatrix::from_columns(MatrixMetadata::new("c", "1"), columns).unwrap()
    }

    #[test]
    fn test_single() {
        let pwm = pwm(&[[0.7, 0.1, 0.1, 0.1], [0.1, 0.1, 0.1, 0.7]]);
        assert_eq!(pwm.consensus_letter(0), 'A');
        assert_eq!(pwm.consensus(), "AT");
    }

    #[test]
    fn test_pair() {
        let pwm = pwm(&[[0.45, 0.0, 0.45, 0.1], [0.0, 0.45, 0.1, 0.45]]);
        assert_eq!(pwm.consensus_letter(0), 'R');
        assert_eq!(pwm.consensus_letter(1), 'Y');
    }

    #[test]
    fn test_none() {
        let pwm = pwm(&[[0.25, 0.25, 0.25, 0.25]]);
        assert_eq!(pwm.consensus(), "N");
    }

    #[test]
    fn test_tied_single() {
        let pwm = pwm(&[[0.0, 0.0, 0.0, 0.0]]);
        let t = ConsensusThresholds {
            single: -1.0,
            pair: 1.0,
        };
        assert_eq!(pwm.consensus_letter_with(0, t), 'N');
    }

    #[test]
    fn test_log_odds_thresholds() {
        let pwm = pwm(&[[1.0, -1.0, -1.0, -1.0], [0.6, -2.0, 0.6, -2.0]]);
        assert!(pwm.is_log_odds());
        assert_eq!(ConsensusThresholds::for_matrix(&pwm), ConsensusThresholds::log_odds());
        assert_eq!(pwm.consensus(), "AN");
        assert_eq!(pwm.consensus_letter_with(1, ConsensusThresholds::frequency()), 'R');
    }
}
