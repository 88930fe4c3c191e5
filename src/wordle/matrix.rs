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

use super::color::{pattern_code, Colorings, PatternCode, ALL_CORRECT_CODE};
use super::corpus::WordCorpus;
use super::data::LoadDataErr;
use super::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

///
/// The precomputed pattern oracle: a dense G x A byte table where cell (g, a)
/// holds the pattern code of guessing GuessWords[g] against AnswerWords[a].
///
/// Row-major and contiguous so that a single guess's row can be sliced against
/// a candidate index array; that row slicing is the hot path of both the
/// candidate filter and the move selector.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatrix {
    guess_count: usize,
    answer_count: usize,
    cells: Vec<u8>,
}

impl PatternMatrix {
    ///
    /// Fills the whole table from the coloring rule. This is the one-shot
    /// offline job; at play time the matrix always comes from a file.
    ///
    pub fn build(corpus: &WordCorpus) -> Self {
        let guess_count = corpus.guess_count();
        let answer_count = corpus.answer_count();
        let mut cells = vec![0u8; guess_count * answer_count];

        for g in 0..guess_count {
            let guess = corpus.guess_word(g as WordId);
            let row = &mut cells[g * answer_count..(g + 1) * answer_count];
            for (a, slot) in row.iter_mut().enumerate() {
                *slot = pattern_code(guess, corpus.answer_word(a as WordId));
            }
            if g % 1024 == 0 {
                log::debug!("matrix build: {}/{} rows", g, guess_count);
            }
        }

        Self {
            guess_count,
            answer_count,
            cells,
        }
    }

    pub fn guess_count(&self) -> usize {
        self.guess_count
    }

    pub fn answer_count(&self) -> usize {
        self.answer_count
    }

    /// The pattern code for one (guess, answer) pair.
    pub fn code(&self, guess: WordId, answer: WordId) -> PatternCode {
        self.cells[guess as usize * self.answer_count + answer as usize]
    }

    /// One guess's codes against every answer, indexed by answer id.
    pub fn row(&self, guess: WordId) -> &[u8] {
        let start = guess as usize * self.answer_count;
        &self.cells[start..start + self.answer_count]
    }
}

#[derive(Error, Debug)]
pub enum MatrixErr {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("matrix file could not be decoded")]
    Codec(#[from] bincode::Error),
    #[error(transparent)]
    Corpus(#[from] LoadDataErr),
    #[error("matrix holds {found} cells but the word lists require {expected}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("matrix cell ({guess}, {answer}) holds {value}, outside the pattern code range")]
    BadCell {
        guess: String,
        answer: String,
        value: u8,
    },
    #[error("matrix cell ({guess}, {answer}) holds {found} but the coloring rule gives {expected}")]
    VerifyFailed {
        guess: String,
        answer: String,
        expected: u8,
        found: u8,
    },
}

/// On-disk layout: both word lists in load order plus the raw row-major cells.
/// Plain vectors only, so identical inputs always serialize byte-identically.
#[derive(Serialize, Deserialize)]
struct MatrixFile {
    guess_words: Vec<String>,
    answer_words: Vec<String>,
    cells: Vec<u8>,
}

/// Persists the matrix and the corpora it was built from as a single blob.
/// The write goes to a sibling temp file first and is renamed into place, so
/// readers never observe a half-written matrix.
pub fn save_matrix(
    corpus: &WordCorpus,
    matrix: &PatternMatrix,
    path: &Path,
) -> Result<(), MatrixErr> {
    let file = MatrixFile {
        guess_words: corpus.guess_words().to_vec(),
        answer_words: corpus.answer_words().to_vec(),
        cells: matrix.cells.clone(),
    };

    let tmp = tmp_sibling(path);
    {
        let mut out = BufWriter::new(fs::File::create(&tmp)?);
        bincode::serialize_into(&mut out, &file)?;
        out.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

///
/// Loads a matrix blob, reconstructs the corpus it carries, and verifies the
/// table against the coloring rule before handing it out.
///
/// Verification is a spot check, not a full recompute: every sampled answer's
/// self-match cell must be all-correct, and a deterministic lattice of cells
/// (always including the corners) is recomputed from scratch. A full check
/// lives in the test suite where the corpora are small.
///
pub fn load_matrix(path: &Path) -> Result<(WordCorpus, PatternMatrix), MatrixErr> {
    let input = BufReader::new(fs::File::open(path)?);
    let file: MatrixFile = bincode::deserialize_from(input)?;

    let corpus = WordCorpus::new(file.guess_words, file.answer_words)?;
    let expected = corpus.guess_count() * corpus.answer_count();
    if file.cells.len() != expected {
        return Err(MatrixErr::ShapeMismatch {
            expected,
            found: file.cells.len(),
        });
    }

    let matrix = PatternMatrix {
        guess_count: corpus.guess_count(),
        answer_count: corpus.answer_count(),
        cells: file.cells,
    };
    verify_matrix(&corpus, &matrix)?;

    log::info!(
        "loaded pattern matrix: {} guesses x {} answers ({} KiB)",
        matrix.guess_count,
        matrix.answer_count,
        matrix.cells.len() / 1024,
    );
    Ok((corpus, matrix))
}

fn verify_matrix(corpus: &WordCorpus, matrix: &PatternMatrix) -> Result<(), MatrixErr> {
    for (at, &cell) in matrix.cells.iter().enumerate() {
        if cell as usize >= Colorings::NUM_STATES {
            return Err(MatrixErr::BadCell {
                guess: corpus
                    .guess_word((at / matrix.answer_count) as WordId)
                    .into(),
                answer: corpus
                    .answer_word((at % matrix.answer_count) as WordId)
                    .into(),
                value: cell,
            });
        }
    }

    // self-match diagonal: every sampled answer against itself must be all green
    for a in sample_ids(corpus.answer_count()) {
        let g = corpus.answer_guess_id(a);
        if matrix.code(g, a) != ALL_CORRECT_CODE {
            return Err(MatrixErr::VerifyFailed {
                guess: corpus.answer_word(a).into(),
                answer: corpus.answer_word(a).into(),
                expected: ALL_CORRECT_CODE,
                found: matrix.code(g, a),
            });
        }
    }

    // lattice of recomputed cells, corners included
    for g in sample_ids(corpus.guess_count()) {
        for a in sample_ids(corpus.answer_count()) {
            let expected = pattern_code(corpus.guess_word(g), corpus.answer_word(a));
            let found = matrix.code(g, a);
            if expected != found {
                return Err(MatrixErr::VerifyFailed {
                    guess: corpus.guess_word(g).into(),
                    answer: corpus.answer_word(a).into(),
                    expected,
                    found,
                });
            }
        }
    }

    Ok(())
}

/// Up to 32 evenly spread ids over [0, count), always including both ends.
fn sample_ids(count: usize) -> Vec<WordId> {
    debug_assert!(count > 0);
    let step = (count / 32).max(1);
    let mut out: Vec<WordId> = (0..count).step_by(step).map(|v| v as WordId).collect();
    if *out.last().unwrap() != (count - 1) as WordId {
        out.push((count - 1) as WordId);
    }
    out
}

fn tmp_sibling(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
