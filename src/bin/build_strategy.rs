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

//! Offline strategy precompute: run one of the drivers over the full answer
//! set and persist the resulting strategy map, merging into any map already
//! on disk at the output path.

use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use wordle_strategist::wordle::*;

#[derive(Parser)]
#[command(about = "Precompute a full strategy map")]
struct Args {
    /// Pattern matrix blob from gen_matrix; embedded data when omitted
    #[arg(long)]
    matrix: Option<PathBuf>,
    /// Frequency table file; embedded default when omitted
    #[arg(long)]
    frequencies: Option<PathBuf>,
    /// Which search driver to run
    #[arg(long, value_enum, default_value = "bfs")]
    algorithm: AlgoArg,
    /// Forced opening word
    #[arg(long, default_value = "salet")]
    opener: String,
    /// Let the selector pick the opening move instead of forcing one
    #[arg(long)]
    no_opener: bool,
    /// Where to write (and merge) the strategy map
    #[arg(long, default_value = "strategy_map.bin")]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgoArg {
    Bfs,
    Ucs,
    Astar,
}

impl From<AlgoArg> for Algorithm {
    fn from(arg: AlgoArg) -> Self {
        match arg {
            AlgoArg::Bfs => Algorithm::Bfs,
            AlgoArg::Ucs => Algorithm::Ucs,
            AlgoArg::Astar => Algorithm::AStar,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let resources = match &args.matrix {
        Some(path) => Resources::from_matrix_file(path, args.frequencies.as_deref())?,
        None => Resources::from_embedded()?,
    };

    let mut config = SearchConfig::new(args.algorithm.into());
    if !args.no_opener {
        config = config.with_opener(args.opener.clone());
    }

    eprintln!(
        "running {:?} over {} answers (opener: {})...",
        config.algorithm,
        resources.corpus.answer_count(),
        config.opener.as_deref().unwrap_or("selector's choice"),
    );
    let outcome = build_strategy(
        &resources.corpus,
        &resources.matrix,
        &resources.freq,
        None,
        &config,
        &CancelFlag::new(),
    )?;
    eprintln!(
        "search done: {} states, {} nodes, {:.1}s",
        outcome.map.len(),
        outcome.stats.nodes_processed,
        outcome.stats.elapsed.as_secs_f64(),
    );

    let mut merged = load_strategy(&args.out)?;
    let known_before = merged.len();
    merged.merge(outcome.map);
    save_strategy(&merged, &args.out)?;
    eprintln!(
        "done! wrote {} states to {} ({} already on disk)",
        merged.len(),
        args.out.display(),
        known_before,
    );
    Ok(())
}
