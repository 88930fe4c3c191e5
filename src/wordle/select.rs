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

use super::color::{Colorings, PatternCode};
use super::corpus::WordCorpus;
use super::freq::FrequencyModel;
use super::matrix::PatternMatrix;
use super::prelude::*;

///
/// How the selector scores a guess against a candidate set.
///
///   * Minimax = smallest worst-case group; ties go to the cheaper word
///   * EntropyEfficiency = most information per unit of cost
///   * FrequencyMinimax = smallest worst-case group, scanning most-common
///     words first so the first word reaching the best worst-case wins
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectPolicy {
    Minimax,
    EntropyEfficiency,
    FrequencyMinimax,
}

/// A candidate set split by the pattern code a guess would produce: one group
/// per code actually observed, codes ascending, groups ascending within.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    pub groups: Vec<(PatternCode, Vec<WordId>)>,
}

/// The selector's verdict for one node: the guess to play and how it splits
/// the candidate set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub guess: WordId,
    pub partition: Partition,
}

///
/// Picks the next guess for a candidate set.
///
/// `set` is the ascending answer ids still alive, `depth` counts guesses
/// already committed (so depth 5 means this pick is the sixth and final
/// guess). Deterministic for fixed inputs; None only for an empty set.
///
/// Search-space rules shared by every policy:
///   * a single candidate is simply played
///   * with two candidates, or on the final guess, only the candidates
///     themselves are worth playing (an outside probe can never win now)
///   * otherwise the whole guess corpus is scanned
///
/// The scan keeps a 243-slot count histogram per candidate guess and defers
/// building the actual group lists until the winner is known, so each node
/// allocates group storage exactly once.
///
pub fn select_move(
    corpus: &WordCorpus,
    matrix: &PatternMatrix,
    freq: &FrequencyModel,
    set: &[WordId],
    depth: usize,
    policy: SelectPolicy,
) -> Option<Selection> {
    if set.is_empty() {
        return None;
    }

    if set.len() == 1 {
        let guess = corpus.answer_guess_id(set[0]);
        return Some(finish(matrix, set, guess));
    }

    let final_guess = depth + 1 >= NUM_TURNS;
    let restricted: Option<Vec<WordId>> = if set.len() <= 2 || final_guess {
        let mut ids: Vec<WordId> = set.iter().map(|&a| corpus.answer_guess_id(a)).collect();
        if policy == SelectPolicy::FrequencyMinimax {
            freq.sort_by_frequency(&mut ids);
        }
        Some(ids)
    } else {
        None
    };

    let chosen = match (policy, &restricted) {
        (SelectPolicy::Minimax, Some(ids)) => {
            scan_worst_case(matrix, freq, set, ids.iter().copied(), true)
        }
        (SelectPolicy::Minimax, None) => {
            scan_worst_case(matrix, freq, set, 0..corpus.guess_count() as WordId, true)
        }
        (SelectPolicy::FrequencyMinimax, Some(ids)) => {
            scan_worst_case(matrix, freq, set, ids.iter().copied(), false)
        }
        (SelectPolicy::FrequencyMinimax, None) => scan_worst_case(
            matrix,
            freq,
            set,
            freq.sorted_guess_ids().iter().copied(),
            false,
        ),
        (SelectPolicy::EntropyEfficiency, Some(ids)) => {
            scan_entropy(matrix, freq, set, ids.iter().copied())
        }
        (SelectPolicy::EntropyEfficiency, None) => scan_entropy(
            matrix,
            freq,
            set,
            freq.sorted_guess_ids().iter().copied(),
        ),
    };

    // a non-empty set must always produce a move
    let guess = chosen.unwrap_or_else(|| corpus.answer_guess_id(set[0]));
    Some(finish(matrix, set, guess))
}

/// Splits `set` by the pattern code each answer would show under `guess`.
/// This is the single deferred materialization per selected node; the driver
/// also calls it directly when seeding a forced opener.
pub fn partition_set(matrix: &PatternMatrix, set: &[WordId], guess: WordId) -> Partition {
    let row = matrix.row(guess);
    let mut buckets: Vec<Vec<WordId>> = vec![Vec::new(); Colorings::NUM_STATES];
    for &a in set {
        buckets[row[a as usize] as usize].push(a);
    }

    let groups = buckets
        .into_iter()
        .enumerate()
        .filter(|(_, group)| !group.is_empty())
        .map(|(code, group)| (code as PatternCode, group))
        .collect();

    Partition { groups }
}

fn finish(matrix: &PatternMatrix, set: &[WordId], guess: WordId) -> Selection {
    Selection {
        guess,
        partition: partition_set(matrix, set, guess),
    }
}

///
/// Worst-case partition scan. A guess improves on the incumbent when its
/// largest group is strictly smaller, or (with `tie_break_cost`) when it is
/// equally large but the word is cheaper to play. A guess whose largest group
/// is a single word cannot be beaten, so the scan stops there.
///
fn scan_worst_case(
    matrix: &PatternMatrix,
    freq: &FrequencyModel,
    set: &[WordId],
    space: impl Iterator<Item = WordId>,
    tie_break_cost: bool,
) -> Option<WordId> {
    let mut best: Option<WordId> = None;
    let mut best_worst = usize::MAX;
    let mut best_cost = Cost::INFINITY;

    for guess in space {
        let row = matrix.row(guess);
        let mut counts = [0u32; Colorings::NUM_STATES];
        let mut worst = 0u32;
        for &a in set {
            let slot = &mut counts[row[a as usize] as usize];
            *slot += 1;
            worst = worst.max(*slot);
        }
        let worst = worst as usize;

        let cost = freq.cost(guess);
        let improved =
            worst < best_worst || (tie_break_cost && worst == best_worst && cost < best_cost);
        if improved {
            best = Some(guess);
            best_worst = worst;
            best_cost = cost;

            if best_worst == 1 {
                break;
            }
        }
    }

    best
}

///
/// Entropy-per-cost scan. The information gained by a guess is the Shannon
/// entropy of its partition, H = -sum(p * log2 p) over the group proportions;
/// efficiency is H divided by the word's cost. The theoretical ceiling for H
/// is log2(|set|), so a cheap guess within 0.1 bit of the ceiling ends the
/// scan early.
///
fn scan_entropy(
    matrix: &PatternMatrix,
    freq: &FrequencyModel,
    set: &[WordId],
    space: impl Iterator<Item = WordId>,
) -> Option<WordId> {
    let total = set.len() as f64;
    let max_entropy = total.log2();

    let mut best: Option<WordId> = None;
    let mut best_efficiency = f64::NEG_INFINITY;

    for guess in space {
        let row = matrix.row(guess);
        let mut counts = [0u32; Colorings::NUM_STATES];
        for &a in set {
            counts[row[a as usize] as usize] += 1;
        }

        let mut entropy = 0.0;
        for &count in counts.iter().filter(|c| **c > 0) {
            let p = count as f64 / total;
            entropy -= p * p.log2();
        }

        let cost = freq.cost(guess);
        let efficiency = entropy / cost;
        if efficiency > best_efficiency {
            best = Some(guess);
            best_efficiency = efficiency;

            if entropy > max_entropy - 0.1 && cost < 0.8 {
                break;
            }
        }
    }

    best
}
