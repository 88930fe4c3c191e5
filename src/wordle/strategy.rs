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

use super::prelude::*;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Canonical identity of a candidate set: its ascending answer ids. Two
/// histories reaching the same surviving answers share this key, which is what
/// makes sub-tree reuse across play lines possible.
pub type StateKey = Box<[WordId]>;

///
/// The decision table the search drivers build: one chosen guess per reachable
/// candidate set. Created empty, extended by drivers, merged with on-disk
/// copies, never shrunk. An entry once written is never rewritten, so merging
/// deltas in any order yields the same table.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrategyMap {
    entries: HashMap<StateKey, WordId>,
}

impl StrategyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonicalizes a candidate set into a map key. Candidate sets are
    /// produced ascending everywhere in this crate; this only asserts it.
    pub fn canonical_key(set: &[WordId]) -> StateKey {
        debug_assert!(set.windows(2).all(|w| w[0] < w[1]));
        set.into()
    }

    pub fn get(&self, set: &[WordId]) -> Option<WordId> {
        self.entries.get(set).copied()
    }

    /// Records a choice for a state. First write wins: re-running a driver
    /// over an already-built region cannot change existing assignments.
    pub fn insert(&mut self, key: StateKey, guess: WordId) {
        self.entries.entry(key).or_insert(guess);
    }

    /// Folds another map into this one, keeping existing entries.
    pub fn merge(&mut self, delta: StrategyMap) {
        for (key, guess) in delta.entries {
            self.entries.entry(key).or_insert(guess);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, WordId)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }
}

#[derive(Error, Debug)]
pub enum StoreErr {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("strategy file could not be decoded")]
    Codec(#[from] bincode::Error),
}

/// On-disk layout: entries sorted by key. A sorted vector rather than a map so
/// that saving the same table always produces the same bytes.
#[derive(Serialize, Deserialize)]
struct StrategyFile {
    entries: Vec<(Vec<WordId>, WordId)>,
}

lazy_static! {
    // Exclusive writer lock for saves. Scoped acquisition: the guard drops on
    // every exit path, error or not.
    static ref SAVE_LOCK: Mutex<()> = Mutex::new(());
}

///
/// Persists the map. Writers are serialized through an exclusive lock and the
/// bytes land in a sibling temp file that is renamed over the target, so a
/// reader either sees the previous complete map or the new complete map.
///
pub fn save_strategy(map: &StrategyMap, path: &Path) -> Result<(), StoreErr> {
    let _guard = SAVE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let mut entries: Vec<(Vec<WordId>, WordId)> = map
        .iter()
        .map(|(key, guess)| (key.to_vec(), guess))
        .collect();
    entries.sort();

    let tmp = tmp_sibling(path);
    {
        let mut out = BufWriter::new(fs::File::create(&tmp)?);
        bincode::serialize_into(&mut out, &StrategyFile { entries })?;
        out.flush()?;
    }
    fs::rename(&tmp, path)?;

    log::debug!("strategy map saved to {} ({} states)", path.display(), map.len());
    Ok(())
}

/// Loads a map from disk. A missing file is an empty map, not an error; a
/// present-but-undecodable file is.
pub fn load_strategy(path: &Path) -> Result<StrategyMap, StoreErr> {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(StrategyMap::new());
        }
        Err(err) => return Err(err.into()),
    };

    let decoded: StrategyFile = bincode::deserialize_from(BufReader::new(file))?;
    let mut map = StrategyMap::new();
    for (key, guess) in decoded.entries {
        map.insert(key.into_boxed_slice(), guess);
    }

    log::debug!("loaded strategy map with {} states", map.len());
    Ok(map)
}

fn tmp_sibling(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
