//! Import command implementation.

use std::path::PathBuf;

use kc_core::SyncConfig;
use kc_core::config::DEFAULT_STATE_FILE;
use kc_import::{ConfigurationSource, ContextImporter, ImportOptions, ImportResult};
use tracing::info as log_info;

use crate::CliConfig;
use crate::cli::ImportArgs;
use crate::config::OutputFormat;
use crate::error::{CliError, CliResult};
use crate::output::{info, report, success};
use crate::state::StateFile;

/// Result of one `kc import` run.
#[derive(Debug)]
pub struct ImportRun {
    /// Reconciliation report.
    pub result: ImportResult,
    /// Rows written, or `None` if nothing was committed.
    pub committed: Option<usize>,
    /// State file used.
    pub state_file: PathBuf,
}

/// Runs the import command and prints its report.
///
/// ## Errors
///
/// Returns an error if the pass aborts, or if models were rejected and
/// `--force` was not given.
pub async fn run_import(
    args: ImportArgs,
    config: &CliConfig,
    sync: &SyncConfig,
    format: OutputFormat,
) -> CliResult<()> {
    let force = args.force;
    let run = execute(args, config, sync).await?;
    report(&run.result, format)?;

    match run.committed {
        Some(affected) => {
            success(&format!(
                "Committed {affected} row(s) to {}",
                run.state_file.display()
            ));
            Ok(())
        }
        None if run.result.has_errors() && !force => Err(CliError::Rejected(run.result.errors.len())),
        None => {
            info("Verify only: nothing committed.");
            Ok(())
        }
    }
}

/// Effective settings of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Configuration files, layered in order.
    pub files: Vec<PathBuf>,
    /// JSON state file backing the store.
    pub state_file: PathBuf,
    /// Import options.
    pub options: ImportOptions,
}

impl Settings {
    /// Resolves each setting from the command line, then the environment,
    /// then the CLI configuration file, then the built-in default.
    ///
    /// Switches given on the command line can only turn a flag on; an
    /// environment value of either polarity overrides the file.
    ///
    /// ## Errors
    ///
    /// Returns an error if no layer names a configuration file.
    pub fn resolve(args: &ImportArgs, config: &CliConfig, sync: &SyncConfig) -> CliResult<Self> {
        let files = [&args.files, &sync.sources, &config.sources]
            .into_iter()
            .find(|files| !files.is_empty())
            .cloned()
            .ok_or_else(|| CliError::InvalidArgument("no configuration files given".to_string()))?;

        let state_file = args
            .state
            .clone()
            .or_else(|| sync.state_file.clone())
            .or_else(|| config.state_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        let delete_all_others = args.delete_all_others
            || sync.delete_all_others.unwrap_or(config.delete_all_others);
        let verify_only = args.verify_only || sync.verify_only.unwrap_or(false);

        Ok(Self {
            files,
            state_file,
            options: ImportOptions::new()
                .with_delete_all_others(delete_all_others)
                .with_verify_only(verify_only),
        })
    }
}

/// Loads state and configuration, runs both areas on one session and
/// commits unless verify-only or (without `force`) models were rejected.
///
/// Settings are resolved by [`Settings::resolve`].
///
/// ## Errors
///
/// Returns an error if no configuration file is given, a file cannot be
/// loaded, or the pass or commit fails.
pub async fn execute(args: ImportArgs, config: &CliConfig, sync: &SyncConfig) -> CliResult<ImportRun> {
    let Settings {
        files,
        state_file,
        options,
    } = Settings::resolve(&args, config, sync)?;

    let source = ConfigurationSource::load_all(&files)?;
    let db = StateFile::load(&state_file)?.into_database()?;
    log_info!(
        files = files.len(),
        state = %state_file.display(),
        delete_all_others = options.delete_all_others,
        verify_only = options.verify_only,
        "starting import"
    );

    let mut importer = ContextImporter::all(db.session(), options);
    let result = importer.import(&source).await?;

    let committed = if options.verify_only || (result.has_errors() && !args.force) {
        None
    } else {
        let affected = importer.commit().await?;
        StateFile::from_database(&db).save(&state_file)?;
        Some(affected)
    };

    Ok(ImportRun {
        result,
        committed,
        state_file,
    })
}
