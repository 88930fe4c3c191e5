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

//! One-shot offline job: build the pattern matrix for a guess/answer word
//! list pair and persist it (word lists included) as a single blob. Running
//! it twice over the same inputs produces byte-identical files.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use wordle_strategist::wordle::*;

#[derive(Parser)]
#[command(about = "Precompute the guess/answer pattern matrix")]
struct Args {
    /// Guess word list (one word per line); embedded default when omitted
    #[arg(long)]
    allowed: Option<PathBuf>,
    /// Answer word list (one word per line); embedded default when omitted
    #[arg(long)]
    answers: Option<PathBuf>,
    /// Where to write the matrix blob
    #[arg(long, default_value = "pattern_matrix.bin")]
    out: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let allowed = match &args.allowed {
        Some(path) => read_word_list_path(path)?,
        None => read_default_word_list(ALLOWED_WORDS_FILE_NAME)?,
    };
    let answers = match &args.answers {
        Some(path) => read_word_list_path(path)?,
        None => read_default_word_list(ANSWERS_FILE_NAME)?,
    };
    let corpus = WordCorpus::new(allowed, answers)?;
    eprintln!(
        "building {} x {} pattern matrix...",
        corpus.guess_count(),
        corpus.answer_count()
    );

    let (dur, matrix) = timed(|| PatternMatrix::build(&corpus));
    eprintln!("matrix built in {:.2}s", dur.as_secs_f64());

    let (dur, saved) = timed(|| save_matrix(&corpus, &matrix, &args.out));
    saved?;
    eprintln!(
        "done! wrote {} cells to {} in {:.2}s",
        corpus.guess_count() * corpus.answer_count(),
        args.out.display(),
        dur.as_secs_f64()
    );
    Ok(())
}

fn timed<R, F>(f: F) -> (Duration, R)
where
    F: FnOnce() -> R,
{
    let start_at = Instant::now();
    let out = f();
    let dur = start_at.elapsed();

    (dur, out)
}
