use super::color::Colorings;
use super::corpus::WordCorpus;
use super::lookup::GameHistory;
use super::matrix::PatternMatrix;
use super::prelude::*;

///
/// Projects a game history down to the candidate set: the ascending answer ids
/// still consistent with every (guess, pattern) pair observed so far.
///
/// Each history entry keeps only the answers whose matrix cell under that
/// guess equals the reported code, so the set can only shrink. Entries whose
/// guess is unknown to the corpus, or whose pattern digits are out of range,
/// are skipped with a warning rather than failing the whole projection: a
/// player typing an off-list word should degrade the filter, not crash it.
///
pub fn filter_candidates(
    corpus: &WordCorpus,
    matrix: &PatternMatrix,
    history: &GameHistory,
) -> Vec<WordId> {
    filter_from(corpus, matrix, history, corpus.all_answer_ids())
}

/// Same as [`filter_candidates`] but narrowing an existing set instead of the
/// full answer corpus.
pub fn filter_from(
    corpus: &WordCorpus,
    matrix: &PatternMatrix,
    history: &GameHistory,
    mut candidates: Vec<WordId>,
) -> Vec<WordId> {
    for (guess, digits) in history.guesses.iter().zip(history.patterns.iter()) {
        let guess_id = match corpus.guess_index_of(guess) {
            Some(id) => id,
            None => {
                log::warn!("history guess '{}' is not in the guess corpus, skipping", guess);
                continue;
            }
        };

        let code = match Colorings::from_digits(digits) {
            Some(colorings) => colorings.to_code(),
            None => {
                log::warn!("history pattern {:?} has digits outside 0..=2, skipping", digits);
                continue;
            }
        };

        let row = matrix.row(guess_id);
        candidates.retain(|&a| row[a as usize] == code);
    }

    candidates
}
