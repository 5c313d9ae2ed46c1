//! Command dispatch

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::BankLoad;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::TemplateArena;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = cli
        .project_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());

    match &cli.command {
        Some(Commands::Generate {
            inputs,
            corpus,
            output,
            powerset_ceiling,
            combination_ceiling,
        }) => {
            let mut settings = Settings::load(project_dir.as_deref())?;
            if let Some(corpus) = corpus {
                settings.bank.corpus = Some(corpus.clone());
            }
            if let Some(output) = output {
                settings.output.dir = Some(output.clone());
            }
            if let Some(ceiling) = powerset_ceiling {
                settings.engine.powerset_ceiling = positive(*ceiling, "--powerset-ceiling")?;
            }
            if let Some(ceiling) = combination_ceiling {
                settings.engine.combination_ceiling =
                    positive(*ceiling, "--combination-ceiling")?;
            }
            cmd_generate(ServiceContainer::new(settings), inputs)
        }
        Some(Commands::Bank { corpus, key }) => {
            let mut settings = Settings::load(project_dir.as_deref())?;
            if let Some(corpus) = corpus {
                settings.bank.corpus = Some(corpus.clone());
            }
            cmd_bank(&ServiceContainer::new(settings), key.as_deref())
        }
        Some(Commands::Show { tree }) => {
            let container = ServiceContainer::new(Settings::load(project_dir.as_deref())?);
            cmd_show(&container, tree)
        }
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => {
                let settings = Settings::load(project_dir.as_deref())?;
                output::info(&settings.to_toml()?);
                Ok(())
            }
            ConfigCommands::Template => {
                output::info(&Settings::template());
                Ok(())
            }
            ConfigCommands::Path => {
                cmd_config_path(project_dir.as_deref());
                Ok(())
            }
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

fn positive(value: u64, flag: &str) -> CliResult<u64> {
    if value == 0 {
        return Err(CliError::InvalidArgs(format!("{flag} must be positive")));
    }
    Ok(value)
}

fn load_bank(container: &ServiceContainer) -> CliResult<BankLoad> {
    let corpus = container.settings.bank.corpus.clone().ok_or_else(|| {
        CliError::Usage("no corpus configured: pass --corpus or set bank.corpus".to_string())
    })?;
    Ok(container.bank_service().load(&corpus)?)
}

#[instrument(level = "debug", skip(container))]
fn cmd_generate(container: ServiceContainer, inputs: &[PathBuf]) -> CliResult<()> {
    let loaded = load_bank(&container)?;
    if loaded.skipped > 0 {
        output::warning(&format!("{} corpus lines skipped", loaded.skipped));
    }
    let generator = container.generator(loaded.bank);
    let batch = container.batch_service(generator);
    let output_dir = container.settings.output.dir.clone();
    debug!("cmd_generate: output_dir={:?}", output_dir);

    let reports = batch.run(inputs, output_dir.as_deref())?;
    for report in &reports {
        match &output_dir {
            Some(dir) => output::success(&format!(
                "{}: {} variants -> {}",
                report.path.display(),
                report.variant_count(),
                dir.display()
            )),
            None => emit(&mut io::stdout().lock(), &report.render())?,
        }
        let aborted = report.reports.iter().filter(|r| r.is_aborted()).count();
        if aborted > 0 {
            output::warning(&format!(
                "{}: {} utterances exceeded the power-set ceiling",
                report.path.display(),
                aborted
            ));
        }
    }
    Ok(())
}

/// Write rendered variants; a closed pipe surfaces as an I/O error.
fn emit(out: &mut impl Write, text: &str) -> CliResult<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| InfraError::io("write variants to stdout", e))?;
    Ok(())
}

fn cmd_bank(container: &ServiceContainer, key: Option<&str>) -> CliResult<()> {
    let loaded = load_bank(container)?;
    let bank = &loaded.bank;
    match key {
        Some(key) => {
            let candidates = bank
                .get(key)
                .ok_or_else(|| CliError::InvalidArgs(format!("no candidates under key {key}")))?;
            output::header(&format!("{key}: {} candidates", candidates.len()));
            for candidate in candidates {
                output::detail(candidate);
            }
        }
        None => {
            output::header(&format!(
                "{} sentences, {} keys, {} candidates",
                loaded.sentences,
                bank.key_count(),
                bank.len()
            ));
            output::info(&bank.to_tree_string());
        }
    }
    Ok(())
}

fn cmd_show(container: &ServiceContainer, text: &str) -> CliResult<()> {
    let tree = container
        .parser
        .parse(text)
        .map_err(crate::application::ApplicationError::from)?;
    output::header(&tree.sentence());
    output::info(&TemplateArena::from_tree(&tree).to_tree_string());
    Ok(())
}

fn cmd_config_path(project_dir: Option<&Path>) {
    let mark = |path: &Path| if path.exists() { "" } else { " (not found)" };
    match global_config_path() {
        Some(path) => output::action("global", &format!("{}{}", path.display(), mark(&path))),
        None => output::action("global", &"no config directory"),
    }
    if let Some(dir) = project_dir {
        let path = local_config_path(dir);
        output::action("local", &format!("{}{}", path.display(), mark(&path)));
    }
}
