/*
 * MIT License
 *
 * Copyright (c) 2022 Joseph Sacchini
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use super::data::LoadDataErr;
use super::prelude::*;
use std::collections::HashMap;

///
/// The two ordered word lists the whole solver indexes into.
///
/// The guess list holds every word the player may legally enter; the answer
/// list holds the words the puzzle can actually be (normally a subset of the
/// guess list). Each word owns a dense zero-based index in its list, stable
/// for the lifetime of the corpus, and both directions resolve in O(1).
///
/// Construction validates the corpora once so that nothing downstream has to:
/// every word is a normalized 5-letter lowercase string, duplicates are
/// dropped keeping the first occurrence, and every answer word must also be a
/// legal guess (the selector relies on that cross-lookup being total).
///
#[derive(Clone, Debug)]
pub struct WordCorpus {
    guess_words: Vec<String>,
    answer_words: Vec<String>,
    guess_index: HashMap<String, WordId>,
    answer_index: HashMap<String, WordId>,
    /// For each answer id, the id of the same word in the guess list.
    answer_to_guess: Vec<WordId>,
}

impl WordCorpus {
    pub fn new(guess_words: Vec<String>, answer_words: Vec<String>) -> Result<Self, LoadDataErr> {
        let (guess_words, guess_index) = index_words("guess list", guess_words)?;
        let (answer_words, answer_index) = index_words("answer list", answer_words)?;

        let mut answer_to_guess = Vec::with_capacity(answer_words.len());
        for word in &answer_words {
            let gid = guess_index
                .get(word)
                .copied()
                .ok_or_else(|| LoadDataErr::AnswerNotGuessable(word.clone()))?;
            answer_to_guess.push(gid);
        }

        Ok(Self {
            guess_words,
            answer_words,
            guess_index,
            answer_index,
            answer_to_guess,
        })
    }

    pub fn guess_count(&self) -> usize {
        self.guess_words.len()
    }

    pub fn answer_count(&self) -> usize {
        self.answer_words.len()
    }

    pub fn guess_index_of(&self, word: &str) -> Option<WordId> {
        self.guess_index.get(word).copied()
    }

    pub fn answer_index_of(&self, word: &str) -> Option<WordId> {
        self.answer_index.get(word).copied()
    }

    pub fn guess_word(&self, id: WordId) -> &str {
        &self.guess_words[id as usize]
    }

    pub fn answer_word(&self, id: WordId) -> &str {
        &self.answer_words[id as usize]
    }

    /// The guess-list id of an answer word. Total: enforced at construction.
    pub fn answer_guess_id(&self, answer: WordId) -> WordId {
        self.answer_to_guess[answer as usize]
    }

    pub fn guess_words(&self) -> &[String] {
        &self.guess_words
    }

    pub fn answer_words(&self) -> &[String] {
        &self.answer_words
    }

    /// Every answer id in ascending order: the root candidate set.
    pub fn all_answer_ids(&self) -> Vec<WordId> {
        (0..self.answer_count() as WordId).collect()
    }
}

fn index_words(
    name: &str,
    words: Vec<String>,
) -> Result<(Vec<String>, HashMap<String, WordId>), LoadDataErr> {
    let mut kept = Vec::with_capacity(words.len());
    let mut index = HashMap::with_capacity(words.len());

    for raw in words {
        let word = normalize_wordle_word(&raw);
        if word.is_empty() {
            continue;
        }
        if !is_wordle_str(&word) {
            return Err(LoadDataErr::NonWordleWord(word));
        }

        // first occurrence wins; later duplicates are dropped so ids stay dense
        if !index.contains_key(&word) {
            if kept.len() >= u16::MAX as usize {
                return Err(LoadDataErr::WordListTooLarge(name.to_string(), kept.len()));
            }
            index.insert(word.clone(), kept.len() as WordId);
            kept.push(word);
        }
    }

    if kept.is_empty() {
        return Err(LoadDataErr::EmptyWordList(name.to_string()));
    }

    Ok((kept, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_dense_stable_indices() {
        let corpus = WordCorpus::new(
            words(&["salet", "crane", "raise", "about"]),
            words(&["crane", "about"]),
        )
        .expect("valid corpus");

        assert_eq!(corpus.guess_count(), 4);
        assert_eq!(corpus.answer_count(), 2);
        assert_eq!(corpus.guess_index_of("crane"), Some(1));
        assert_eq!(corpus.answer_index_of("crane"), Some(0));
        assert_eq!(corpus.guess_word(0), "salet");
        assert_eq!(corpus.answer_word(1), "about");
        assert_eq!(corpus.answer_guess_id(1), 3);
        assert_eq!(corpus.all_answer_ids(), vec![0, 1]);
    }

    #[test]
    fn test_duplicates_removed_first_wins() {
        let corpus = WordCorpus::new(
            words(&["salet", "crane", "salet", "crane"]),
            words(&["crane"]),
        )
        .expect("valid corpus");
        assert_eq!(corpus.guess_count(), 2);
        assert_eq!(corpus.guess_index_of("salet"), Some(0));
    }

    #[test]
    fn test_normalization_applied() {
        let corpus = WordCorpus::new(words(&["  CRANE ", "salet"]), words(&["crane"]))
            .expect("valid corpus");
        assert_eq!(corpus.guess_index_of("crane"), Some(0));
    }

    #[test]
    fn test_malformed_word_rejected() {
        assert!(matches!(
            WordCorpus::new(words(&["toolong"]), words(&["toolong"])),
            Err(LoadDataErr::NonWordleWord(_))
        ));
    }

    #[test]
    fn test_answer_outside_guess_list_rejected() {
        assert!(matches!(
            WordCorpus::new(words(&["salet"]), words(&["crane"])),
            Err(LoadDataErr::AnswerNotGuessable(w)) if w == "crane"
        ));
    }
}
