use super::corpus::WordCorpus;
use super::prelude::*;
use std::collections::HashMap;

// Anchor points of the piecewise-linear frequency -> cost map. Frequencies are
// zipf-style values; F_MEAN is roughly the corpus mean and F_MAX the ceiling
// observed in english frequency data.
const F_MEAN: f64 = 1.75;
const F_MAX: f64 = 6.4;
const C_RARE: Cost = 2.0;
const C_MEAN: Cost = 1.0;
const C_COMMON: Cost = 0.6;

///
/// Maps every guess word to a positive, finite cost: rare words are expensive
/// to play, common words are cheap. The UCS driver accumulates these costs
/// along a path, and the entropy policy divides information gain by them.
///
/// Two linear regions, joined at F_MEAN:
/// * f in [0, F_MEAN]: cost falls from C_RARE at f=0 to C_MEAN at F_MEAN
/// * f in (F_MEAN, F_MAX]: cost falls from C_MEAN to C_COMMON at F_MAX
///
/// Words missing from the table take f = 0 and therefore cost C_RARE.
///
#[derive(Clone, Debug)]
pub struct FrequencyModel {
    cost: Vec<Cost>,
    sorted_guess_ids: Vec<WordId>,
}

impl FrequencyModel {
    pub fn new(corpus: &WordCorpus, table: &HashMap<String, f64>) -> Self {
        let raw: Vec<f64> = corpus
            .guess_words()
            .iter()
            .map(|w| table.get(w).copied().unwrap_or(0.0))
            .collect();

        let cost = raw.iter().copied().map(word_cost).collect();

        // guess ids ordered most common first; ties resolve by ascending id so
        // the ordering is stable across runs
        let mut sorted_guess_ids: Vec<WordId> = (0..corpus.guess_count() as WordId).collect();
        sorted_guess_ids.sort_by(|a, b| {
            raw[*b as usize]
                .total_cmp(&raw[*a as usize])
                .then(a.cmp(b))
        });

        Self {
            cost,
            sorted_guess_ids,
        }
    }

    /// Cost of playing the given guess.
    pub fn cost(&self, guess: WordId) -> Cost {
        self.cost[guess as usize]
    }

    /// All guess ids, most frequent first. The frequency-weighted minimax and
    /// entropy policies iterate this order so that the first guess reaching a
    /// given score is also the most common one to do so.
    pub fn sorted_guess_ids(&self) -> &[WordId] {
        &self.sorted_guess_ids
    }

    /// Sorts a candidate guess list in place, most frequent first. Used for
    /// the endgame case where the search space is the candidate set itself.
    pub fn sort_by_frequency(&self, guesses: &mut [WordId]) {
        // self.cost is strictly decreasing in raw frequency within each
        // region, so ascending cost is descending frequency
        guesses.sort_by(|a, b| {
            self.cost[*a as usize]
                .total_cmp(&self.cost[*b as usize])
                .then(a.cmp(b))
        });
    }
}

fn word_cost(f: f64) -> Cost {
    if f <= F_MEAN {
        let ratio = f / F_MEAN;
        C_RARE - ratio * (C_RARE - C_MEAN)
    } else {
        let ratio = (f - F_MEAN) / (F_MAX - F_MEAN);
        C_MEAN - ratio * (C_MEAN - C_COMMON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0, 2.0 ; "missing words are maximally expensive")]
    #[test_case(1.75, 1.0 ; "mean frequency costs one")]
    #[test_case(6.4, 0.6 ; "ceiling frequency is cheapest")]
    fn test_cost_anchors(f: f64, expected: Cost) {
        assert!((word_cost(f) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cost_decreases_with_frequency() {
        let mut prev = word_cost(0.0);
        for step in 1..=64 {
            let f = F_MAX * (step as f64) / 64.0;
            let c = word_cost(f);
            assert!(c < prev, "cost must strictly fall as frequency rises");
            assert!(c > 0.0 && c.is_finite());
            prev = c;
        }
    }

    #[test]
    fn test_sorted_ids_descend_by_frequency() {
        let corpus = WordCorpus::new(
            vec!["salet".into(), "crane".into(), "about".into()],
            vec!["crane".into()],
        )
        .expect("valid corpus");
        let table = HashMap::from([
            ("salet".to_string(), 2.3),
            ("crane".to_string(), 3.6),
            ("about".to_string(), 6.2),
        ]);
        let model = FrequencyModel::new(&corpus, &table);

        // about (6.2) > crane (3.6) > salet (2.3)
        assert_eq!(model.sorted_guess_ids(), &[2, 1, 0]);
        assert!(model.cost(2) < model.cost(1));
        assert!(model.cost(1) < model.cost(0));
    }

    #[test]
    fn test_unknown_word_costs_rare() {
        let corpus = WordCorpus::new(
            vec!["salet".into(), "zonal".into()],
            vec!["salet".into()],
        )
        .expect("valid corpus");
        let model = FrequencyModel::new(&corpus, &HashMap::new());
        assert_eq!(model.cost(0), C_RARE);
        assert_eq!(model.cost(1), C_RARE);
    }
}
