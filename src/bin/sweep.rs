//! Self-play sweep: replay the runtime lookup against every answer word (or a
//! sampled subset) and report wins, losses, and the guess distribution. The
//! strategy map grows across games exactly as it would across live sessions.

use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use wordle_strategist::wordle::*;

#[derive(Parser)]
#[command(about = "Replay the solver against known answers")]
struct Args {
    /// Pattern matrix blob from gen_matrix; embedded data when omitted
    #[arg(long)]
    matrix: Option<PathBuf>,
    /// Frequency table file; embedded default when omitted
    #[arg(long)]
    frequencies: Option<PathBuf>,
    /// Which search driver backs the lookup
    #[arg(long, value_enum, default_value = "bfs")]
    algorithm: AlgoArg,
    /// Opening word used when seeding a fresh map
    #[arg(long, default_value = "salet")]
    opener: String,
    /// Sweep only this many answers, evenly spread over the corpus
    #[arg(long)]
    limit: Option<usize>,
    /// Load the strategy map from here first and persist it after the sweep
    #[arg(long)]
    strategy: Option<PathBuf>,
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

    let config = SolverConfig {
        search: SearchConfig::new(args.algorithm.into()).with_opener(args.opener.clone()),
        strategy_path: None,
    };
    let mut map = match &args.strategy {
        Some(path) => load_strategy(path)?,
        None => StrategyMap::new(),
    };

    let answers = resources.corpus.answer_words().to_vec();
    let targets = sample(&answers, args.limit);
    eprintln!(
        "sweeping {} of {} answers with {:?}...",
        targets.len(),
        answers.len(),
        config.search.algorithm,
    );

    let cancel = CancelFlag::new();
    let mut wins = 0usize;
    let mut losses = 0usize;
    let mut total_guesses = 0usize;
    let mut guess_histogram = [0usize; NUM_TURNS];
    let mut failed: Vec<String> = Vec::new();

    for (played, target) in targets.iter().enumerate() {
        let outcome = play_out(&resources, &mut map, target, &config, &cancel)?;
        if outcome.solved {
            wins += 1;
            total_guesses += outcome.guesses.len();
            guess_histogram[outcome.guesses.len() - 1] += 1;
        } else {
            losses += 1;
            failed.push(target.clone());
        }

        if (played + 1) % 100 == 0 {
            eprintln!("... {}/{} games played", played + 1, targets.len());
        }
    }

    println!("games:  {}", targets.len());
    println!("wins:   {}", wins);
    println!("losses: {}", losses);
    if wins > 0 {
        println!("avg guesses: {:.3}", total_guesses as f64 / wins as f64);
    }
    for (turns, count) in guess_histogram.iter().enumerate() {
        println!("  solved in {}: {}", turns + 1, count);
    }
    for word in &failed {
        println!("  unsolved: {}", word);
    }

    if let Some(path) = &args.strategy {
        save_strategy(&map, path)?;
        eprintln!("strategy map persisted to {} ({} states)", path.display(), map.len());
    }
    Ok(())
}

/// Up to `limit` answers, evenly spread so short sweeps still touch the whole
/// alphabet range rather than one prefix of the corpus.
fn sample(answers: &[String], limit: Option<usize>) -> Vec<String> {
    match limit {
        Some(limit) if limit > 0 && limit < answers.len() => {
            let step = answers.len() / limit;
            answers
                .iter()
                .step_by(step.max(1))
                .take(limit)
                .cloned()
                .collect()
        }
        _ => answers.to_vec(),
    }
}
