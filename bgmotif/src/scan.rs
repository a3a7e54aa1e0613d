//! Scanner reporting the motif hits found on both strands of a sequence.

use super::abc::Dna;
use super::pwm::WeightMatrix;
use super::seq::EncodedSequence;

/// The strand a hit was found on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strand {
    Direct,
    Reverse,
}

/// A hit describing a scored position somewhere in the sequence.
///
/// The position is always the start of the window on the direct strand.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub position: usize,
    pub strand: Strand,
    pub score: f32,
}

impl Hit {
    /// Create a new hit.
    pub fn new(position: usize, strand: Strand, score: f32) -> Self {
        Self {
            position,
            strand,
            score,
        }
    }
}

/// An iterator over the hits of a matrix scoring above a threshold.
///
/// Both strands are scored at each position, the reverse strand using the
/// complement columns of the matrix.
#[derive(Debug)]
pub struct Scanner<'a> {
    pwm: &'a WeightMatrix,
    seq: &'a EncodedSequence<Dna>,
    threshold: f32,
    position: usize,
    pending: Option<Hit>,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given matrix and sequence.
    pub fn new(pwm: &'a WeightMatrix, seq: &'a EncodedSequence<Dna>) -> Self {
        Self {
            pwm,
            seq,
            threshold: 0.0,
            position: 0,
            pending: None,
        }
    }

    /// Change the threshold for the scanner.
    pub fn threshold(&mut self, threshold: f32) -> &mut Self {
        self.threshold = threshold;
        self
    }

    /// Consume the scanner to find the best hit, regardless of threshold.
    ///
    /// On equal scores, the first position wins, and the direct strand wins
    /// over the reverse strand.
    pub fn best(&mut self) -> Option<Hit> {
        let mut best: Option<Hit> = self.pending.take();
        while let Some((direct, reverse)) = self.advance() {
            for hit in [direct, reverse] {
                if best.as_ref().map(|b| hit.score > b.score).unwrap_or(true) {
                    best = Some(hit);
                }
            }
        }
        best
    }

    /// Score both strands at the next position.
    fn advance(&mut self) -> Option<(Hit, Hit)> {
        let i = self.position;
        let direct = self.pwm.score(self.seq, i)?;
        let reverse = self.pwm.score_rc(self.seq, i)?;
        self.position += 1;
        Some((
            Hit::new(i, Strand::Direct, direct),
            Hit::new(i, Strand::Reverse, reverse),
        ))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Hit;
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(hit) = self.pending.take() {
            return Some(hit);
        }
        while let Some((direct, reverse)) = self.advance() {
            let threshold = self.threshold;
            match (direct.score >= threshold, reverse.score >= threshold) {
                (true, true) => {
                    self.pending = Some(reverse);
                    return Some(direct);
                }
                (true, false) => return Some(direct),
                (false, true) => return Some(reverse),
                (false, false) => (),
            }
        }
        None
    }
}
