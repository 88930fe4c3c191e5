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

use super::color::{Colorings, ALL_CORRECT_CODE};
use super::filter::filter_candidates;
use super::prelude::*;
use super::resources::Resources;
use super::search::{build_strategy, CancelFlag, SearchConfig, SearchErr};
use super::strategy::{save_strategy, StrategyMap};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// The opening word used when a fresh map has to be seeded and the caller did
/// not configure one.
pub const DEFAULT_OPENER: &str = "salet";

///
/// What the game controller reports to the solver: the words played so far,
/// the parallel per-position color digits (0 absent, 1 misplaced, 2 correct,
/// left-most square first), and whether the game has ended.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHistory {
    pub guesses: Vec<String>,
    pub patterns: Vec<[u8; WORD_SIZE]>,
    pub game_over: bool,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, guess: &str, pattern: [u8; WORD_SIZE]) {
        self.guesses.push(normalize_wordle_word(guess));
        self.patterns.push(pattern);
    }

    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty()
    }
}

/// How the runtime lookup behaves: which driver/policy combination backs
/// seeding and off-plan recovery, and where (if anywhere) the grown map is
/// persisted after a search.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    pub search: SearchConfig,
    pub strategy_path: Option<PathBuf>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default().with_opener(DEFAULT_OPENER),
            strategy_path: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum LookupErr {
    /// The filter came back empty: some reported pattern contradicts the rest.
    /// A controller bug or a mistyped color row, never a solver state.
    #[error("no answer word is consistent with the recorded history")]
    ImpossibleState,
    #[error("'{0}' is not an answer word")]
    UnknownTarget(String),
    #[error(transparent)]
    Search(#[from] SearchErr),
}

///
/// The live lookup: given the game so far, what to type next.
///
/// * a finished game gets no guess
/// * an empty history on an empty map first seeds the map by running the
///   configured driver with an opening word
/// * otherwise the history is filtered down to the surviving candidate set,
///   which is the key into the strategy map
/// * a miss means the player went off plan; the driver re-searches with the
///   live set as root and the sub-map is merged in, so the same deviation
///   never triggers a second search
///
/// The map only ever grows here. If a strategy path is configured the grown
/// map is persisted best-effort: a failed save is logged and the in-memory
/// map stays valid (use [`save_strategy`] directly to observe save errors).
///
pub fn suggest(
    res: &Resources,
    map: &mut StrategyMap,
    history: &GameHistory,
    config: &SolverConfig,
    cancel: &CancelFlag,
) -> Result<Option<String>, LookupErr> {
    if history.game_over {
        return Ok(None);
    }

    if history.is_empty() && map.is_empty() {
        let mut seed = config.search.clone();
        if seed.opener.is_none() {
            seed.opener = Some(DEFAULT_OPENER.to_string());
        }
        log::info!("empty strategy map, seeding with opener {:?}", seed.opener);

        let outcome = build_strategy(&res.corpus, &res.matrix, &res.freq, None, &seed, cancel)?;
        map.merge(outcome.map);
        persist_best_effort(map, config);
    }

    let candidates = filter_candidates(&res.corpus, &res.matrix, history);
    if candidates.is_empty() {
        return Err(LookupErr::ImpossibleState);
    }
    if candidates.len() == 1 {
        return Ok(Some(res.corpus.answer_word(candidates[0]).to_string()));
    }

    if let Some(guess) = map.get(&candidates) {
        return Ok(Some(res.corpus.guess_word(guess).to_string()));
    }

    // off plan: the live set was never reached by the precomputed tree
    log::info!(
        "off-plan state ({} candidates), running a partial re-search",
        candidates.len()
    );
    let mut sub = config.search.clone();
    sub.opener = None;
    let outcome = build_strategy(
        &res.corpus,
        &res.matrix,
        &res.freq,
        Some(&candidates),
        &sub,
        cancel,
    )?;
    map.merge(outcome.map);
    persist_best_effort(map, config);

    Ok(map
        .get(&candidates)
        .map(|guess| res.corpus.guess_word(guess).to_string()))
}

fn persist_best_effort(map: &StrategyMap, config: &SolverConfig) {
    if let Some(path) = &config.strategy_path {
        if let Err(err) = save_strategy(map, path) {
            log::warn!("could not persist strategy map to {}: {}", path.display(), err);
        }
    }
}

/// One self-played game, driven entirely by [`suggest`].
#[derive(Clone, Debug)]
pub struct PlayOutcome {
    pub guesses: Vec<String>,
    pub solved: bool,
}

///
/// Replays the runtime lookup against a known target, feeding each suggested
/// guess back through the coloring rule until the target is hit or the turns
/// run out. The map grows across calls, so sweeping many targets through the
/// same map exercises exactly the strategy reuse a live game would see.
///
pub fn play_out(
    res: &Resources,
    map: &mut StrategyMap,
    target: &str,
    config: &SolverConfig,
    cancel: &CancelFlag,
) -> Result<PlayOutcome, LookupErr> {
    let target = normalize_wordle_word(target);
    if res.corpus.answer_index_of(&target).is_none() {
        return Err(LookupErr::UnknownTarget(target));
    }

    let mut history = GameHistory::new();
    let mut guesses = Vec::new();

    while guesses.len() < NUM_TURNS {
        let guess = match suggest(res, map, &history, config, cancel)? {
            Some(guess) => guess,
            None => break,
        };

        let colorings = Colorings::with_guess_answer(&guess, &target);
        history.push(&guess, colorings.digits());
        guesses.push(guess);

        if colorings.to_code() == ALL_CORRECT_CODE {
            return Ok(PlayOutcome {
                guesses,
                solved: true,
            });
        }
    }

    Ok(PlayOutcome {
        guesses,
        solved: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::corpus::WordCorpus;
    use crate::wordle::freq::FrequencyModel;
    use crate::wordle::matrix::PatternMatrix;
    use crate::wordle::search::Algorithm;
    use crate::wordle::select::partition_set;
    use std::collections::HashMap;
    use test_case::test_case;

    fn fixture() -> Resources {
        let guesses = vec![
            "salet", "raise", "crane", "crony", "brick", "paper", "round", "mound", "pound",
            "hound", "crumb", "debut", "vivid", "gruff", "ample", "theme",
        ];
        let answers = vec![
            "crane", "crony", "brick", "paper", "round", "mound", "pound", "hound", "crumb",
            "debut", "vivid", "gruff", "ample", "theme",
        ];
        let corpus = WordCorpus::new(
            guesses.into_iter().map(String::from).collect(),
            answers.into_iter().map(String::from).collect(),
        )
        .expect("valid corpus");
        let matrix = PatternMatrix::build(&corpus);
        let freq = FrequencyModel::new(
            &corpus,
            &HashMap::from([
                ("salet".to_string(), 2.3),
                ("raise".to_string(), 4.5),
                ("crane".to_string(), 3.6),
                ("round".to_string(), 4.9),
            ]),
        );
        Resources {
            corpus,
            matrix,
            freq,
        }
    }

    fn digits_for(guess: &str, answer: &str) -> [u8; WORD_SIZE] {
        Colorings::with_guess_answer(guess, answer).digits()
    }

    #[test]
    fn test_empty_history_seeds_and_returns_opener() {
        let res = fixture();
        let mut map = StrategyMap::new();
        let config = SolverConfig::default();

        let guess = suggest(&res, &mut map, &GameHistory::new(), &config, &CancelFlag::new())
            .expect("lookup works");
        assert_eq!(guess.as_deref(), Some(DEFAULT_OPENER));
        assert!(!map.is_empty(), "the first lookup must leave a seeded map");
    }

    #[test]
    fn test_terminal_history_gets_no_guess() {
        let res = fixture();
        let mut map = StrategyMap::new();
        let mut history = GameHistory::new();
        history.push("crane", [2, 2, 2, 2, 2]);
        history.game_over = true;

        let guess = suggest(
            &res,
            &mut map,
            &history,
            &SolverConfig::default(),
            &CancelFlag::new(),
        )
        .expect("lookup works");
        assert_eq!(guess, None);
        assert!(map.is_empty(), "a finished game must not trigger a search");
    }

    #[test]
    fn test_contradictory_history_is_impossible_state() {
        let res = fixture();
        let mut map = StrategyMap::new();
        let mut history = GameHistory::new();
        // two different guesses both claimed all-correct: nothing survives
        history.push("crane", [2, 2, 2, 2, 2]);
        history.push("round", [2, 2, 2, 2, 2]);

        assert!(matches!(
            suggest(
                &res,
                &mut map,
                &history,
                &SolverConfig::default(),
                &CancelFlag::new()
            ),
            Err(LookupErr::ImpossibleState)
        ));
    }

    #[test]
    fn test_single_survivor_is_returned_without_searching() {
        let res = fixture();
        let mut map = StrategyMap::new();
        let mut history = GameHistory::new();
        history.push("crane", digits_for("crane", "crane"));

        let guess = suggest(
            &res,
            &mut map,
            &history,
            &SolverConfig::default(),
            &CancelFlag::new(),
        )
        .expect("lookup works");
        assert_eq!(guess.as_deref(), Some("crane"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_all_absent_opener_narrows_and_splits() {
        let res = fixture();
        let mut map = StrategyMap::new();
        let mut history = GameHistory::new();
        history.push("salet", [0, 0, 0, 0, 0]);

        let guess = suggest(
            &res,
            &mut map,
            &history,
            &SolverConfig::default(),
            &CancelFlag::new(),
        )
        .expect("lookup works")
        .expect("a guess exists");

        let guess_id = res.corpus.guess_index_of(&guess).expect("guess is legal");
        let set = filter_candidates(&res.corpus, &res.matrix, &history);
        assert!(set.len() > 1);
        // the suggestion must genuinely split the surviving set
        let worst = partition_set(&res.matrix, &set, guess_id)
            .groups
            .iter()
            .map(|(_, group)| group.len())
            .max()
            .unwrap();
        assert!(worst < set.len());
    }

    #[test]
    fn test_same_candidate_set_same_guess_across_histories() {
        let res = fixture();
        let mut map = StrategyMap::new();
        let config = SolverConfig::default();
        let cancel = CancelFlag::new();

        // two different transcripts projecting to the same candidate set
        let mut short = GameHistory::new();
        short.push("salet", [0, 0, 0, 0, 0]);
        let mut long = GameHistory::new();
        long.push("salet", [0, 0, 0, 0, 0]);
        long.push("salet", [0, 0, 0, 0, 0]);

        let a = suggest(&res, &mut map, &short, &config, &cancel).expect("lookup works");
        let b = suggest(&res, &mut map, &long, &config, &cancel).expect("lookup works");
        assert_eq!(a, b);
    }

    #[test]
    fn test_off_plan_recovery_searches_once() {
        let res = fixture();
        let cancel = CancelFlag::new();
        let config = SolverConfig::default();

        // a map precomputed for the "salet" opener
        let mut map = StrategyMap::new();
        let seeded = build_strategy(
            &res.corpus,
            &res.matrix,
            &res.freq,
            None,
            &SearchConfig::default().with_opener("salet"),
            &cancel,
        )
        .expect("driver runs");
        map.merge(seeded.map);

        // the player opened with "raise" instead
        let mut history = GameHistory::new();
        history.push("raise", digits_for("raise", "crumb"));

        let first = suggest(&res, &mut map, &history, &config, &cancel)
            .expect("lookup works")
            .expect("recovery produces a guess");
        let size_after_recovery = map.len();

        let second = suggest(&res, &mut map, &history, &config, &cancel)
            .expect("lookup works")
            .expect("second lookup produces a guess");
        assert_eq!(first, second);
        assert_eq!(
            map.len(),
            size_after_recovery,
            "an identical lookup must be served from the merged map"
        );
    }

    #[test_case(Algorithm::Bfs)]
    #[test_case(Algorithm::Ucs)]
    #[test_case(Algorithm::AStar)]
    fn test_play_out_solves_fixture_answers(algorithm: Algorithm) {
        let res = fixture();
        let cancel = CancelFlag::new();
        let config = SolverConfig {
            search: SearchConfig::new(algorithm).with_opener("salet"),
            strategy_path: None,
        };

        let mut map = StrategyMap::new();
        for target in res.corpus.answer_words().to_vec() {
            let outcome =
                play_out(&res, &mut map, &target, &config, &cancel).expect("play works");
            assert!(
                outcome.solved && outcome.guesses.len() <= NUM_TURNS,
                "{:?} did not solve {} within {} guesses: {:?}",
                algorithm,
                target,
                NUM_TURNS,
                outcome.guesses,
            );
            assert_eq!(outcome.guesses.last().unwrap(), &target);
        }
    }

    // The wide net: a hundred answers spread over the embedded corpus, played
    // to completion under each driver. Every game must land on the target
    // within the six allowed guesses.
    #[test_case(Algorithm::Bfs)]
    #[test_case(Algorithm::Ucs)]
    #[test_case(Algorithm::AStar)]
    fn test_sweep_embedded_corpus(algorithm: Algorithm) {
        let res = Resources::from_embedded().expect("embedded data loads");
        let cancel = CancelFlag::new();
        let config = SolverConfig {
            search: SearchConfig::new(algorithm).with_opener(DEFAULT_OPENER),
            strategy_path: None,
        };

        let answers = res.corpus.answer_words().to_vec();
        let step = (answers.len() / 100).max(1);
        let mut map = StrategyMap::new();

        for target in answers.iter().step_by(step).take(100) {
            let outcome = play_out(&res, &mut map, target, &config, &cancel).expect("play works");
            assert!(
                outcome.solved && outcome.guesses.len() <= NUM_TURNS,
                "{:?} did not solve {} within {} guesses: {:?}",
                algorithm,
                target,
                NUM_TURNS,
                outcome.guesses,
            );
            assert_eq!(outcome.guesses.last().unwrap(), target);
        }
    }

    #[test]
    fn test_unknown_target_rejected() {
        let res = fixture();
        let mut map = StrategyMap::new();
        assert!(matches!(
            play_out(
                &res,
                &mut map,
                "qwert",
                &SolverConfig::default(),
                &CancelFlag::new()
            ),
            Err(LookupErr::UnknownTarget(_))
        ));
    }
}
