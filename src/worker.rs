use crate::wordle::{
    build_strategy, load_strategy, save_strategy, suggest, CancelFlag, GameHistory, Resources,
    SearchConfig, SearchStats, SolverConfig, StrategyMap, WordId,
};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

///
/// The off-thread solver.
///
/// An embedding application keeps its UI thread free by pushing requests to
/// this worker and draining responses whenever it likes. The worker owns the
/// strategy map; the channels are the only way in or out, one writer on each
/// side, so the map never needs a lock of its own.
///
/// Long driver runs honor [`SolverWorker::cancel_current`], which raises the
/// shared flag the driver tests on every frontier pop.
///
pub struct SolverWorker {
    req_tx: Sender<SolverReq>,
    resp_rx: Receiver<SolverResp>,
    cancel: CancelFlag,
    handle: Option<JoinHandle<()>>,
}

/// What the embedding application can ask of the worker.
#[derive(Clone, Debug)]
pub enum SolverReq {
    /// Run the runtime lookup for a live game history.
    Suggest(GameHistory),
    /// Run a driver over the given root (None = full answer set) and fold the
    /// result into the worker's map.
    BuildStrategy {
        root: Option<Vec<WordId>>,
        search: SearchConfig,
    },
    /// Persist the worker's current map.
    Save(PathBuf),
    /// Stop the worker loop.
    Shutdown,
}

/// What the worker reports back.
#[derive(Clone, Debug)]
pub enum SolverResp {
    Suggestion(Option<String>),
    StrategyReady {
        states: usize,
        stats: SearchStats,
    },
    Saved(PathBuf),
    Failed(String),
}

impl SolverWorker {
    pub fn spawn(resources: Arc<Resources>, config: SolverConfig) -> Self {
        let (req_tx, req_rx) = channel();
        let (resp_tx, resp_rx) = channel();
        let cancel = CancelFlag::new();

        let worker_cancel = cancel.clone();
        let handle = std::thread::Builder::new()
            .name("solver-worker".into())
            .spawn(move || run_worker(resources, config, req_rx, resp_tx, worker_cancel))
            .expect("spawning the solver worker thread");

        Self {
            req_tx,
            resp_rx,
            cancel,
            handle: Some(handle),
        }
    }

    /// Queues a request. False if the worker has already shut down.
    pub fn request(&self, req: SolverReq) -> bool {
        self.req_tx.send(req).is_ok()
    }

    /// Blocks for the next response. None once the worker is gone.
    pub fn recv(&self) -> Option<SolverResp> {
        self.resp_rx.recv().ok()
    }

    /// Non-blocking drain hook for a UI tick.
    pub fn try_recv(&self) -> Option<SolverResp> {
        self.resp_rx.try_recv().ok()
    }

    /// Raises the cancellation flag for whatever the worker is computing.
    /// The interrupted driver still reports its partial result.
    pub fn cancel_current(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SolverWorker {
    fn drop(&mut self) {
        self.cancel.cancel();
        let _ = self.req_tx.send(SolverReq::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_worker(
    resources: Arc<Resources>,
    config: SolverConfig,
    req_rx: Receiver<SolverReq>,
    resp_tx: Sender<SolverResp>,
    cancel: CancelFlag,
) {
    log::debug!("solver worker starting");

    // pick up whatever was persisted by an earlier run
    let mut map = match &config.strategy_path {
        Some(path) => load_strategy(path).unwrap_or_else(|err| {
            log::warn!("could not load strategy map from {}: {}", path.display(), err);
            StrategyMap::new()
        }),
        None => StrategyMap::new(),
    };

    while let Ok(req) = req_rx.recv() {
        log::debug!("worker request {:?}", &req);
        // a cancellation only ever targets the in-flight computation, so each
        // new request starts with the flag lowered
        cancel.clear();

        let resp = match req {
            SolverReq::Shutdown => break,
            SolverReq::Suggest(history) => {
                match suggest(&resources, &mut map, &history, &config, &cancel) {
                    Ok(guess) => SolverResp::Suggestion(guess),
                    Err(err) => SolverResp::Failed(err.to_string()),
                }
            }
            SolverReq::BuildStrategy { root, search } => {
                let outcome = build_strategy(
                    &resources.corpus,
                    &resources.matrix,
                    &resources.freq,
                    root.as_deref(),
                    &search,
                    &cancel,
                );
                match outcome {
                    Ok(outcome) => {
                        map.merge(outcome.map);
                        SolverResp::StrategyReady {
                            states: map.len(),
                            stats: outcome.stats,
                        }
                    }
                    Err(err) => SolverResp::Failed(err.to_string()),
                }
            }
            SolverReq::Save(path) => match save_strategy(&map, &path) {
                Ok(()) => SolverResp::Saved(path),
                Err(err) => SolverResp::Failed(err.to_string()),
            },
        };

        if resp_tx.send(resp).is_err() {
            // nobody is listening anymore
            break;
        }
    }

    log::debug!("solver worker stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::{Algorithm, FrequencyModel, PatternMatrix, WordCorpus, DEFAULT_OPENER};
    use std::collections::HashMap;

    fn fixture() -> Arc<Resources> {
        let guesses = vec![
            "salet", "crane", "crony", "brick", "paper", "round", "mound", "pound", "hound",
            "crumb", "debut", "vivid",
        ];
        let answers = vec![
            "crane", "crony", "brick", "paper", "round", "mound", "pound", "hound", "crumb",
            "debut", "vivid",
        ];
        let corpus = WordCorpus::new(
            guesses.into_iter().map(String::from).collect(),
            answers.into_iter().map(String::from).collect(),
        )
        .expect("valid corpus");
        let matrix = PatternMatrix::build(&corpus);
        let freq = FrequencyModel::new(&corpus, &HashMap::new());
        Arc::new(Resources {
            corpus,
            matrix,
            freq,
        })
    }

    #[test]
    fn test_worker_suggests_from_fresh_game() {
        let worker = SolverWorker::spawn(fixture(), SolverConfig::default());
        assert!(worker.request(SolverReq::Suggest(GameHistory::new())));

        match worker.recv().expect("worker responds") {
            SolverResp::Suggestion(Some(word)) => assert_eq!(word, DEFAULT_OPENER),
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn test_worker_builds_and_saves() {
        let worker = SolverWorker::spawn(fixture(), SolverConfig::default());
        assert!(worker.request(SolverReq::BuildStrategy {
            root: None,
            search: SearchConfig::new(Algorithm::Ucs).with_opener("salet"),
        }));

        match worker.recv().expect("worker responds") {
            SolverResp::StrategyReady { states, stats } => {
                assert!(states > 0);
                assert!(!stats.cancelled);
            }
            other => panic!("unexpected response {:?}", other),
        }

        let path = std::env::temp_dir().join(format!(
            "wordle-strategist-worker-{}.bin",
            std::process::id()
        ));
        assert!(worker.request(SolverReq::Save(path.clone())));
        match worker.recv().expect("worker responds") {
            SolverResp::Saved(saved) => assert_eq!(saved, path),
            other => panic!("unexpected response {:?}", other),
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_worker_shuts_down_cleanly_on_drop() {
        let worker = SolverWorker::spawn(fixture(), SolverConfig::default());
        drop(worker);
    }
}
