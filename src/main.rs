/*!
 * ota-agent CLI - Command Line Interface
 */

use clap::{Parser, Subcommand, ValueEnum};
use ota_agent::{
    cli_style,
    config::{AgentConfig, LogLevel},
    error::{AgentError, Result, EXIT_SUCCESS},
    logging,
    manifest::UrlAlignment,
    output::OutputWriter,
    ManifestIngestor, WorkflowStep,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ota-agent")]
#[command(version, about = "Validate update actions before download or install", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long = "log-level", value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Write JSON logs to this file instead of stderr
    #[arg(long = "log", value_name = "FILE", global = true)]
    log: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an update action and show its identity and files
    Inspect {
        /// Update action JSON file
        #[arg(value_name = "ACTION_JSON")]
        action: PathBuf,

        /// Workflow step the update is ingested for
        #[arg(long, value_enum, default_value = "download")]
        step: StepArg,

        /// Emit JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Reject files whose positional URL is keyed by another file id
        #[arg(long)]
        strict_urls: bool,
    },

    /// Print the update identity of an update action
    UpdateId {
        /// Update action JSON file
        #[arg(value_name = "ACTION_JSON")]
        action: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file with default values
    InitConfig {
        /// Destination path
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StepArg {
    Download,
    Install,
    Apply,
}

impl From<StepArg> for WorkflowStep {
    fn from(arg: StepArg) -> Self {
        match arg {
            StepArg::Download => WorkflowStep::Download,
            StepArg::Install => WorkflowStep::Install,
            StepArg::Apply => WorkflowStep::Apply,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let json = matches!(
        cli.command,
        Commands::Inspect { json: true, .. } | Commands::UpdateId { json: true, .. }
    );
    let output = OutputWriter::new(json);

    let code = match run(cli, &output) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            output.error(&e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli, output: &OutputWriter) -> Result<()> {
    let mut config = match cli.config {
        Some(ref path) => AgentConfig::from_file(path)?,
        None => AgentConfig::default(),
    };

    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if cli.log.is_some() {
        config.log_file = cli.log.clone();
    }
    config.verbose |= cli.verbose;

    match cli.command {
        Commands::Inspect {
            action,
            step,
            json: _,
            strict_urls,
        } => {
            if strict_urls {
                config.url_alignment = UrlAlignment::Strict;
            }
            init_logging(&config);

            let update = ManifestIngestor::new(&config).ingest_file(&action, step.into())?;
            output.update_action(&update);
            Ok(())
        }
        Commands::UpdateId { action, json: _ } => {
            init_logging(&config);

            let update_id = ManifestIngestor::new(&config).update_id_file(&action)?;
            output.update_id(&update_id);
            Ok(())
        }
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                return Err(AgentError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            config.to_file(&path)?;
            cli_style::print_success(&format!("Wrote {}", path.display()));
            Ok(())
        }
    }
}

fn init_logging(config: &AgentConfig) {
    if let Err(e) = logging::init_logging(config) {
        cli_style::print_warning(&format!("Failed to initialize logging: {}", e));
    }
}
