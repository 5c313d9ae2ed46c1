//! Substitution bank loading service
//!
//! Reads a corpus of bracketed utterances and builds the bank once per run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::utterances::parse_lines;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{BankBuilder, SubstitutionBank};
use crate::infrastructure::traits::{FileSystem, SentenceParser};

/// Bank plus bookkeeping about how it was built.
#[derive(Debug, Clone)]
pub struct BankLoad {
    pub bank: SubstitutionBank,
    /// Corpus files read, in order
    pub files: Vec<PathBuf>,
    pub sentences: usize,
    /// Lines that failed to parse
    pub skipped: usize,
}

/// Service for building the substitution bank from corpus files.
pub struct BankService {
    fs: Arc<dyn FileSystem>,
    parser: Arc<dyn SentenceParser>,
    wrapper_labels: Vec<String>,
    clause_labels: Vec<String>,
}

impl BankService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        parser: Arc<dyn SentenceParser>,
        wrapper_labels: Vec<String>,
        clause_labels: Vec<String>,
    ) -> Self {
        Self {
            fs,
            parser,
            wrapper_labels,
            clause_labels,
        }
    }

    /// Build the bank from a corpus file, or every file below a directory.
    ///
    /// A missing or unreadable corpus is fatal; malformed lines are not.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, corpus: &Path) -> ApplicationResult<BankLoad> {
        let files = self.corpus_files(corpus)?;
        let mut builder = BankBuilder::new(&self.wrapper_labels, &self.clause_labels);
        let mut sentences = 0;
        let mut skipped = 0;

        for file in &files {
            let content =
                self.fs
                    .read_to_string(file)
                    .map_err(|e| ApplicationError::CorpusUnreadable {
                        path: file.clone(),
                        source: e,
                    })?;
            let parsed = parse_lines(self.parser.as_ref(), &content, file);
            debug!(
                "load: {}: {} sentences, {} skipped",
                file.display(),
                parsed.utterances.len(),
                parsed.skipped
            );
            sentences += parsed.utterances.len();
            skipped += parsed.skipped;
            for utterance in parsed.utterances {
                builder.add(utterance.tree);
            }
        }

        let bank = builder.build();
        info!(
            "bank built from {} sentences: {} keys, {} candidates ({} lines skipped)",
            sentences,
            bank.key_count(),
            bank.len(),
            skipped
        );
        Ok(BankLoad {
            bank,
            files,
            sentences,
            skipped,
        })
    }

    fn corpus_files(&self, corpus: &Path) -> ApplicationResult<Vec<PathBuf>> {
        if self.fs.is_dir(corpus) {
            return self
                .fs
                .list_files(corpus)
                .map_err(|e| ApplicationError::CorpusUnreadable {
                    path: corpus.to_path_buf(),
                    source: e,
                });
        }
        Ok(vec![corpus.to_path_buf()])
    }
}
