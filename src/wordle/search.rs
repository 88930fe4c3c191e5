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

use super::color::ALL_CORRECT_CODE;
use super::corpus::WordCorpus;
use super::freq::FrequencyModel;
use super::matrix::PatternMatrix;
use super::prelude::*;
use super::select::{partition_set, select_move, SelectPolicy};
use super::strategy::StrategyMap;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

///
/// The three graph-search drivers over candidate-set space. They share one
/// frontier; only the priority of a node differs:
///
///   * Bfs = insertion order (a queue)
///   * Ucs = cost accumulated along the path of chosen words
///   * AStar = that cost plus an optimistic estimate of what is left
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Bfs,
    Ucs,
    AStar,
}

impl Algorithm {
    /// The move-selection policy each driver pairs with by default: BFS plays
    /// plain minimax, UCS resolves minimax ties toward common words, and A*
    /// chases entropy per unit cost.
    pub fn default_policy(self) -> SelectPolicy {
        match self {
            Algorithm::Bfs => SelectPolicy::Minimax,
            Algorithm::Ucs => SelectPolicy::FrequencyMinimax,
            Algorithm::AStar => SelectPolicy::EntropyEfficiency,
        }
    }

    fn priority(self, g: Cost, seq: u64, set_len: usize) -> f64 {
        match self {
            Algorithm::Bfs => seq as f64,
            Algorithm::Ucs => g,
            Algorithm::AStar => g + heuristic(set_len),
        }
    }
}

///
/// The A* remaining-cost estimate: log2(n) bits are needed to single out one
/// of n equally likely candidates, and a guess buys roughly one bit per unit
/// cost, so log2(n) never overestimates. h(0) and h(1) are zero because a
/// solved or empty state costs nothing more.
///
pub fn heuristic(set_len: usize) -> f64 {
    if set_len >= 2 {
        (set_len as f64).log2()
    } else {
        0.0
    }
}

/// How a driver run is shaped: which frontier discipline, which selector
/// policy, an optional forced opening word, and the advisory depth cap.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    pub policy: SelectPolicy,
    pub opener: Option<String>,
    pub max_depth: usize,
}

impl SearchConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            policy: algorithm.default_policy(),
            opener: None,
            max_depth: NUM_TURNS,
        }
    }

    pub fn with_opener(mut self, opener: impl Into<String>) -> Self {
        self.opener = Some(opener.into());
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(Algorithm::Bfs)
    }
}

/// Cooperative cancellation shared between a driver run and its caller.
/// Tested once per frontier pop; a cancelled run returns the partial map.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    /// Lowers the flag again so the holder can be reused for the next run.
    pub fn clear(&self) {
        self.0.store(false, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Bookkeeping for one driver run.
#[derive(Clone, Debug)]
pub struct SearchStats {
    pub nodes_processed: u64,
    pub frontier_peak: usize,
    pub elapsed: Duration,
    pub cancelled: bool,
}

/// What a driver run hands back: the strategy entries it recorded plus the
/// bookkeeping. The caller merges the map wherever it wants it.
#[derive(Debug)]
pub struct SearchOutcome {
    pub map: StrategyMap,
    pub stats: SearchStats,
}

#[derive(Error, Debug)]
pub enum SearchErr {
    #[error("opening word '{0}' is not in the guess corpus")]
    UnknownOpener(String),
}

/// A frontier entry. `priority` orders the heap (smallest first); `seq` is the
/// insertion tie-breaker that also gives BFS its queue behaviour.
struct Node {
    priority: f64,
    g: Cost,
    depth: usize,
    seq: u64,
    set: Vec<WordId>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the maximum, so compare the other way around to get
        // the lowest priority (and then earliest insertion) first
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

///
/// Expands every candidate set reachable from the root and records one chosen
/// guess per set.
///
/// The state graph is canonicalized: a set's identity is its ascending id
/// tuple, and a visited table collapses transpositions (many histories, one
/// state). Nodes whose set is a single answer record that answer directly.
/// Children are pushed for every pattern group except all-correct, which is a
/// win, not a state.
///
/// `root` of None means the full answer corpus. With a forced opener the root
/// is assigned that word up front and its partition children enter the
/// frontier at depth 1; otherwise the selector picks the opening move too.
///
/// Termination: frontier exhausted, or `cancel` raised (the map built so far
/// is returned, flagged in the stats).
///
pub fn build_strategy(
    corpus: &WordCorpus,
    matrix: &PatternMatrix,
    freq: &FrequencyModel,
    root: Option<&[WordId]>,
    config: &SearchConfig,
    cancel: &CancelFlag,
) -> Result<SearchOutcome, SearchErr> {
    let started = Instant::now();
    let root_set: Vec<WordId> = match root {
        Some(set) => set.to_vec(),
        None => corpus.all_answer_ids(),
    };

    let mut map = StrategyMap::new();
    let mut visited: HashSet<Box<[WordId]>> = HashSet::new();
    let mut frontier: BinaryHeap<Node> = BinaryHeap::new();
    let mut seq: u64 = 0;
    let push = |frontier: &mut BinaryHeap<Node>, seq: &mut u64, g: Cost, depth: usize, set: Vec<WordId>| {
        let priority = config.algorithm.priority(g, *seq, set.len());
        frontier.push(Node {
            priority,
            g,
            depth,
            seq: *seq,
            set,
        });
        *seq += 1;
    };

    match &config.opener {
        Some(opener) if !root_set.is_empty() => {
            let opener_id = corpus
                .guess_index_of(opener)
                .ok_or_else(|| SearchErr::UnknownOpener(opener.clone()))?;

            let key = StrategyMap::canonical_key(&root_set);
            map.insert(key.clone(), opener_id);
            visited.insert(key);

            let g = freq.cost(opener_id);
            for (code, group) in partition_set(matrix, &root_set, opener_id).groups {
                if code == ALL_CORRECT_CODE {
                    continue;
                }
                push(&mut frontier, &mut seq, g, 1, group);
            }
        }
        _ => {
            push(&mut frontier, &mut seq, 0.0, 0, root_set);
        }
    }

    let mut nodes_processed: u64 = 0;
    let mut frontier_peak = frontier.len();
    let mut cancelled = false;

    while let Some(node) = frontier.pop() {
        // the single suspension point of the driver
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        let key = StrategyMap::canonical_key(&node.set);
        if visited.contains(&key) {
            continue;
        }
        visited.insert(key.clone());

        if node.set.len() == 1 {
            map.insert(key, corpus.answer_guess_id(node.set[0]));
            continue;
        }

        if node.depth >= config.max_depth {
            continue;
        }

        let selection = match select_move(corpus, matrix, freq, &node.set, node.depth, config.policy)
        {
            Some(selection) => selection,
            None => continue,
        };
        map.insert(key, selection.guess);

        let g = node.g + freq.cost(selection.guess);
        for (code, group) in selection.partition.groups {
            if code == ALL_CORRECT_CODE {
                continue;
            }
            push(&mut frontier, &mut seq, g, node.depth + 1, group);
        }

        nodes_processed += 1;
        frontier_peak = frontier_peak.max(frontier.len());
        if nodes_processed % 500 == 0 {
            log::info!(
                "{:?}: {} nodes processed, frontier {}, {:.1}s",
                config.algorithm,
                nodes_processed,
                frontier.len(),
                started.elapsed().as_secs_f64(),
            );
        }
    }

    let stats = SearchStats {
        nodes_processed,
        frontier_peak,
        elapsed: started.elapsed(),
        cancelled,
    };
    log::info!(
        "{:?} finished: {} states mapped, {} nodes, {:.1}s{}",
        config.algorithm,
        map.len(),
        stats.nodes_processed,
        stats.elapsed.as_secs_f64(),
        if stats.cancelled { " (cancelled)" } else { "" },
    );

    Ok(SearchOutcome { map, stats })
}
