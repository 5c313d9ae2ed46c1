//! Batch processing of utterance files
//!
//! Collects input files, generates variants for every utterance and renders
//! the per-file report.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::application::error_ext::IoResultExt;
use crate::application::services::generator::{GenerationReport, GeneratorService};
use crate::application::utterances::parse_lines;
use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::{FileSystem, SentenceParser};

/// Reports for every utterance of one input file, in line order.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub reports: Vec<GenerationReport>,
    /// Lines that failed to parse
    pub skipped: usize,
}

impl FileReport {
    pub fn variant_count(&self) -> usize {
        self.reports.iter().map(|r| r.variants.len()).sum()
    }

    /// Text form: one block per variant.
    ///
    /// ```text
    /// Comeback: he is a genius
    /// Original Tree: (S ...)
    /// Comeback Tree: (S ...)
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        for report in &self.reports {
            for variant in &report.variants {
                // Writing into a String cannot fail
                let _ = write!(
                    out,
                    "Comeback: {}\nOriginal Tree: {}\nComeback Tree: {}\n\n",
                    variant.sentence(),
                    report.template,
                    variant
                );
            }
        }
        out
    }
}

/// Service for running the generator over files and directories.
pub struct BatchService {
    fs: Arc<dyn FileSystem>,
    parser: Arc<dyn SentenceParser>,
    generator: Arc<GeneratorService>,
}

impl BatchService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        parser: Arc<dyn SentenceParser>,
        generator: Arc<GeneratorService>,
    ) -> Self {
        Self {
            fs,
            parser,
            generator,
        }
    }

    /// Expand inputs into files: directories are walked recursively in sorted
    /// order, files are kept as given.
    pub fn collect_inputs(&self, inputs: &[PathBuf]) -> ApplicationResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for input in inputs {
            if self.fs.is_dir(input) {
                files.extend(
                    self.fs
                        .list_files(input)
                        .with_path_context("list input directory", input)?,
                );
            } else if self.fs.is_file(input) {
                files.push(input.clone());
            } else {
                return Err(ApplicationError::InputNotFound(input.clone()));
            }
        }
        debug!("collect_inputs: {} files", files.len());
        Ok(files)
    }

    /// Generate variants for every utterance in `text`.
    ///
    /// Utterances are independent and processed in parallel; reports keep
    /// line order.
    pub fn process_text(&self, text: &str, source: &Path) -> ApplicationResult<FileReport> {
        let parsed = parse_lines(self.parser.as_ref(), text, source);
        let reports = parsed
            .utterances
            .par_iter()
            .map(|utterance| self.generator.generate(&utterance.tree))
            .collect::<ApplicationResult<Vec<_>>>()?;
        Ok(FileReport {
            path: source.to_path_buf(),
            reports,
            skipped: parsed.skipped,
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn process_file(&self, path: &Path) -> ApplicationResult<FileReport> {
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read input", path)?;
        let report = self.process_text(&text, path)?;
        info!(
            "{}: {} utterances, {} variants",
            path.display(),
            report.reports.len(),
            report.variant_count()
        );
        Ok(report)
    }

    /// Process every input; with `output_dir`, write `<output_dir>/<file name>`
    /// per input file. Inputs sharing a file name overwrite each other, last
    /// one wins.
    pub fn run(
        &self,
        inputs: &[PathBuf],
        output_dir: Option<&Path>,
    ) -> ApplicationResult<Vec<FileReport>> {
        let files = self.collect_inputs(inputs)?;
        let mut reports = Vec::with_capacity(files.len());
        let mut written = HashSet::new();
        for file in &files {
            let report = self.process_file(file)?;
            if let Some(dir) = output_dir {
                let target = self.write_report(&report, dir)?;
                if !written.insert(target.clone()) {
                    warn!(
                        "{}: written twice in this run, output for {} replaced the earlier one",
                        target.display(),
                        file.display()
                    );
                }
            }
            reports.push(report);
        }
        Ok(reports)
    }

    /// Write the rendered report next to its siblings in `dir`.
    pub fn write_report(&self, report: &FileReport, dir: &Path) -> ApplicationResult<PathBuf> {
        let name = report
            .path
            .file_name()
            .ok_or_else(|| ApplicationError::InputNotFound(report.path.clone()))?;
        let target = dir.join(name);
        self.fs
            .ensure_parent(&target)
            .with_path_context("create output directory", dir)?;
        self.fs
            .write(&target, &report.render())
            .with_path_context("write variants", &target)?;
        debug!("write_report: {}", target.display());
        Ok(target)
    }
}
