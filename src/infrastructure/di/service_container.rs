//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{BankService, BatchService, GeneratorService};
use crate::config::Settings;
use crate::domain::SubstitutionBank;
use crate::infrastructure::parser::BracketParser;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, SentenceParser};

/// Container holding the shared dependencies of all services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Sentence parser used for corpus and input lines
    pub parser: Arc<dyn SentenceParser>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(BracketParser))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        parser: Arc<dyn SentenceParser>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            parser,
        }
    }

    pub fn bank_service(&self) -> BankService {
        BankService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.parser),
            self.settings.bank.wrapper_labels.clone(),
            self.settings.bank.clause_labels.clone(),
        )
    }

    /// Generator over `bank` using the configured policy and ceilings.
    pub fn generator(&self, bank: SubstitutionBank) -> Arc<GeneratorService> {
        Arc::new(GeneratorService::new(
            Arc::new(bank),
            Arc::new(self.settings.policy()),
            self.settings.limits(),
        ))
    }

    pub fn batch_service(&self, generator: Arc<GeneratorService>) -> BatchService {
        BatchService::new(Arc::clone(&self.fs), Arc::clone(&self.parser), generator)
    }
}
