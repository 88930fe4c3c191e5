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

use crate::wordle::prelude::*;
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::num::ParseFloatError;
use std::path::Path;
use std::str::Utf8Error;
use thiserror::Error;

// Companion data shipped with the crate. Each file can be overridden with an
// explicit path at load time; these are the embedded defaults.
pub const DATA_DIRECTORY: &str = "data/";
pub const ALLOWED_WORDS_FILE_NAME: &str = "allowed_words.txt";
pub const ANSWERS_FILE_NAME: &str = "answers.txt";
pub const FREQUENCY_FILE_NAME: &str = "word_frequencies.txt";

#[derive(RustEmbed)]
#[folder = "data/"]
struct RawData;

#[derive(Error, Debug)]
pub enum LoadDataErr {
    #[error("missing data file '{0}'")]
    MissingFile(String),
    #[error(transparent)]
    EncodingError(#[from] Utf8Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("the word '{0}' is not a valid 5-letter lowercase word")]
    NonWordleWord(String),
    #[error("word list '{0}' contains no words")]
    EmptyWordList(String),
    #[error("malformed frequency line '{0}'")]
    BadFrequencyLine(String),
    #[error("malformed floating point text '{0}'")]
    BadFloatStr(String, #[source] ParseFloatError),
    #[error("the answer word '{0}' is not present in the guess list")]
    AnswerNotGuessable(String),
    #[error("word list '{0}' has {1} words, more than the supported {max}", max = u16::MAX)]
    WordListTooLarge(String, usize),
}

/// Reads one of the default word list files (embedded, with a filesystem
/// fallback so edits to data/ work without rebuilding).
pub fn read_default_word_list(name: &str) -> Result<Vec<String>, LoadDataErr> {
    let raw = retrieve_file_as_str(name)?.ok_or_else(|| LoadDataErr::MissingFile(name.into()))?;
    let words = parse_word_list(name, &raw)?;
    log::debug!("got {} words from data file {}", words.len(), name);
    Ok(words)
}

/// Reads a word list from an explicit path: one 5-letter lowercase word per
/// line, empty lines ignored, anything else is a hard error.
pub fn read_word_list_path(path: &Path) -> Result<Vec<String>, LoadDataErr> {
    let raw = std::fs::read_to_string(path)?;
    parse_word_list(&path.display().to_string(), &raw)
}

fn parse_word_list(name: &str, raw: &str) -> Result<Vec<String>, LoadDataErr> {
    let mut out = Vec::new();
    for line in raw.lines() {
        let word = normalize_wordle_word(line);
        if word.is_empty() {
            continue;
        }
        if !is_wordle_str(&word) {
            return Err(LoadDataErr::NonWordleWord(word));
        }
        out.push(word);
    }

    if out.is_empty() {
        return Err(LoadDataErr::EmptyWordList(name.to_string()));
    }

    Ok(out)
}

/// Reads the default frequency table (embedded, filesystem fallback).
pub fn read_default_frequency_table() -> Result<HashMap<String, f64>, LoadDataErr> {
    let raw = retrieve_file_as_str(FREQUENCY_FILE_NAME)?
        .ok_or_else(|| LoadDataErr::MissingFile(FREQUENCY_FILE_NAME.into()))?;
    parse_frequency_table(&raw)
}

/// Reads a frequency table from an explicit path.
pub fn read_frequency_table_path(path: &Path) -> Result<HashMap<String, f64>, LoadDataErr> {
    let raw = std::fs::read_to_string(path)?;
    parse_frequency_table(&raw)
}

/// Parses frequency data. Each line carries a word and its frequency split by
/// a single space, for example "crane 3.61". Words missing from the table are
/// treated as frequency 0 by the consumer, so the table does not need to cover
/// the whole guess corpus.
fn parse_frequency_table(raw: &str) -> Result<HashMap<String, f64>, LoadDataErr> {
    let mut out = HashMap::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let (word, freq) = line
            .split_once(' ')
            .ok_or_else(|| LoadDataErr::BadFrequencyLine(line.to_string()))?;

        let word = normalize_wordle_word(word);
        if !is_wordle_str(&word) {
            return Err(LoadDataErr::NonWordleWord(word));
        }

        let freq = freq
            .trim()
            .parse::<f64>()
            .map_err(|err| LoadDataErr::BadFloatStr(freq.to_string(), err))?;
        out.insert(word, freq);
    }

    log::debug!("got {} frequency entries", out.len());
    Ok(out)
}

fn retrieve_file_as_str(name: &str) -> Result<Option<String>, LoadDataErr> {
    let f: rust_embed::EmbeddedFile = if let Some(data) = RawData::get(name) {
        data
    } else {
        if let Ok(mut f) = std::fs::File::open(format!("{}{}", DATA_DIRECTORY, name)) {
            let mut out = String::default();
            if std::io::Read::read_to_string(&mut f, &mut out).is_ok() {
                return Ok(Some(out));
            }
        }

        return Ok(None);
    };

    Ok(Some(
        std::str::from_utf8(&f.data)
            .map_err(LoadDataErr::EncodingError)?
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_word_lists_load() {
        let allowed = read_default_word_list(ALLOWED_WORDS_FILE_NAME).expect("allowed list loads");
        let answers = read_default_word_list(ANSWERS_FILE_NAME).expect("answer list loads");
        assert!(allowed.len() > answers.len());
        assert!(answers.iter().all(|w| is_wordle_str(w)));
    }

    #[test]
    fn test_default_frequency_table_loads() {
        let table = read_default_frequency_table().expect("frequency table loads");
        assert!(table.contains_key("salet"));
        assert!(table.values().all(|f| f.is_finite() && *f >= 0.0));
    }

    #[test]
    fn test_malformed_word_list_is_loud() {
        assert!(matches!(
            parse_word_list("inline", "crane\nfour\nsalet"),
            Err(LoadDataErr::NonWordleWord(w)) if w == "four"
        ));
        assert!(matches!(
            parse_word_list("inline", "\n\n"),
            Err(LoadDataErr::EmptyWordList(_))
        ));
    }

    #[test]
    fn test_malformed_frequency_lines_are_loud() {
        assert!(matches!(
            parse_frequency_table("crane"),
            Err(LoadDataErr::BadFrequencyLine(_))
        ));
        assert!(matches!(
            parse_frequency_table("crane x.y"),
            Err(LoadDataErr::BadFloatStr(_, _))
        ));
    }
}
