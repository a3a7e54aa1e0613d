use log::warn;
use rand::distributions::Distribution;
use rand::distributions::Uniform;
use rand::Rng;
use rand_distr::WeightedIndex;

use super::BackgroundModel;
use super::MarkovBackgroundModel;
use crate::abc::Nucleotide;
use crate::abc::Symbol;

impl MarkovBackgroundModel {
    /// Generate a random sequence from the Markov chain.
    ///
    /// Each base is drawn given up to `markov_order()` preceding bases.
    /// Contexts that were never observed fall back to a uniform draw.
    ///
    /// # Example
    /// ```
    /// # use bgmotif::bg::*;
    /// let mut markov = MarkovBackgroundModel::new(Metadata::new("at"), 1).unwrap();
    /// markov.set_markov_prob("A", 0.5).unwrap();
    /// markov.set_markov_prob("T", 0.5).unwrap();
    /// let seq = markov.sample(&mut rand::thread_rng(), 20);
    /// assert_eq!(seq.len(), 20);
    /// assert!(seq.chars().all(|c| c == 'A' || c == 'T'));
    /// ```
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, length: usize) -> String {
        let order = self.markov_order();
        let uniform = Uniform::new(0, 4);
        let mut sequence = String::with_capacity(length);
        let mut fallbacks = 0;

        for i in 0..length {
            let context = &sequence[i.saturating_sub(order)..i];
            let table = match self.probabilities(context.len() + 1) {
                Some(table) => table,
                None => break,
            };
            let prefix = if context.is_empty() {
                0
            } else {
                crate::kmer::encode_bytes(context.as_bytes()).unwrap_or(0)
            };
            let weights = (0..4)
                .map(|j| table.get_code((prefix << 2) | j))
                .collect::<Vec<f64>>();
            let index = match WeightedIndex::new(&weights) {
                Ok(dist) => dist.sample(rng),
                Err(_) => {
                    fallbacks += 1;
                    uniform.sample(rng)
                }
            };
            if let Some(n) = Nucleotide::from_index(index) {
                sequence.push(n.as_char());
            }
        }

        if fallbacks > 0 {
            warn!(
                "{} bases drawn uniformly from unobserved contexts of {:?}",
                fallbacks,
                self.metadata().name()
            );
        }
        sequence
    }
}
