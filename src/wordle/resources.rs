use super::corpus::WordCorpus;
use super::data::{
    read_default_frequency_table, read_default_word_list, read_frequency_table_path, LoadDataErr,
    ALLOWED_WORDS_FILE_NAME, ANSWERS_FILE_NAME,
};
use super::freq::FrequencyModel;
use super::matrix::{load_matrix, MatrixErr, PatternMatrix};
use once_cell::sync::OnceCell;
use std::path::Path;
use thiserror::Error;

///
/// The immutable trio everything else borrows: the corpora, the pattern
/// matrix, and the frequency-derived costs. Initialized once at startup and
/// shared freely afterwards; the strategy map is deliberately NOT in here
/// because it is the one thing that mutates.
///
#[derive(Debug)]
pub struct Resources {
    pub corpus: WordCorpus,
    pub matrix: PatternMatrix,
    pub freq: FrequencyModel,
}

#[derive(Error, Debug)]
pub enum ResourceErr {
    #[error(transparent)]
    Data(#[from] LoadDataErr),
    #[error(transparent)]
    Matrix(#[from] MatrixErr),
}

static GLOBAL: OnceCell<Resources> = OnceCell::new();

impl Resources {
    ///
    /// Production initialization: the matrix file is authoritative, carrying
    /// both word lists alongside the precomputed table (so corpora and matrix
    /// can never drift apart). A missing or unverifiable matrix is fatal
    /// here; the service never recomputes the table on demand.
    ///
    pub fn from_matrix_file(
        matrix_path: &Path,
        frequency_path: Option<&Path>,
    ) -> Result<Self, ResourceErr> {
        let (corpus, matrix) = load_matrix(matrix_path)?;
        let table = match frequency_path {
            Some(path) => read_frequency_table_path(path)?,
            None => read_default_frequency_table()?,
        };
        let freq = FrequencyModel::new(&corpus, &table);
        Ok(Self {
            corpus,
            matrix,
            freq,
        })
    }

    ///
    /// Initialization from the embedded companion data, building the matrix
    /// in-process. The embedded corpora are small enough that the offline
    /// build is instant; real deployments precompute with the gen_matrix job
    /// and use [`Resources::from_matrix_file`].
    ///
    pub fn from_embedded() -> Result<Self, ResourceErr> {
        let corpus = WordCorpus::new(
            read_default_word_list(ALLOWED_WORDS_FILE_NAME)?,
            read_default_word_list(ANSWERS_FILE_NAME)?,
        )?;
        let matrix = PatternMatrix::build(&corpus);
        let freq = FrequencyModel::new(&corpus, &read_default_frequency_table()?);
        Ok(Self {
            corpus,
            matrix,
            freq,
        })
    }

    ///
    /// Installs this instance as the process-wide singleton. Idempotent: if a
    /// singleton already exists the new instance is discarded and the
    /// existing one is returned, so racing initializers converge on one set
    /// of resources.
    ///
    pub fn install(self) -> &'static Resources {
        GLOBAL.get_or_init(|| self)
    }

    /// The installed singleton, if any.
    pub fn global() -> Option<&'static Resources> {
        GLOBAL.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_resources_are_consistent() {
        let res = Resources::from_embedded().expect("embedded data loads");
        assert_eq!(res.matrix.guess_count(), res.corpus.guess_count());
        assert_eq!(res.matrix.answer_count(), res.corpus.answer_count());
        assert!(res.corpus.guess_index_of("salet").is_some());

        // every answer resolves in the guess corpus
        for a in 0..res.corpus.answer_count() as crate::wordle::WordId {
            let g = res.corpus.answer_guess_id(a);
            assert_eq!(res.corpus.guess_word(g), res.corpus.answer_word(a));
        }
    }

    #[test]
    fn test_install_is_idempotent() {
        let first = Resources::from_embedded().expect("embedded data loads").install();
        let second = Resources::from_embedded().expect("embedded data loads").install();
        assert!(std::ptr::eq(first, second));
        assert!(Resources::global().is_some());
    }
}
