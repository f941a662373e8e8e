// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globalsight_connector::app_config::{self, Config};
use globalsight_connector::database::{DatabaseConnection, Repository};
use globalsight_connector::language_utils::describe_locale;
use globalsight_connector::{
    AbortOutcome, GlobalSightConnector, GlobalSightTranslator, RequestOutcome, StatusResult,
    TranslationJob,
};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the source and target locales of the configured file profile
    Locales,

    /// List every file profile visible to the configured user
    Profiles,

    /// Submit a job described by a JSON file
    Submit {
        /// Job file with job_id, label, target_locale and fields
        #[arg(value_name = "JOB_FILE")]
        job_file: PathBuf,

        /// Use this GlobalSight job name instead of a generated one
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show the remote status of a job
    Status {
        /// Host job id recorded by submit
        #[arg(value_name = "HOST_JOB_ID", required_unless_present = "job_name")]
        host_job_id: Option<String>,

        /// Query a GlobalSight job name directly
        #[arg(long, conflicts_with = "host_job_id")]
        job_name: Option<String>,
    },

    /// Cancel the remote job of a host job
    Cancel {
        #[arg(value_name = "HOST_JOB_ID")]
        host_job_id: String,
    },

    /// Fetch the translated fields of a host job as JSON
    Receive {
        #[arg(value_name = "HOST_JOB_ID")]
        host_job_id: String,

        /// Write the translations to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for gsconnect
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// gsconnect - GlobalSight translation connector
///
/// Sends content to a GlobalSight translation management system and
/// brings the translations back.
#[derive(Parser, Debug)]
#[command(name = "gsconnect")]
#[command(version)]
#[command(about = "GlobalSight translation connector")]
#[command(long_about = "gsconnect submits content fields to a GlobalSight server over its SOAP web service,
tracks the resulting jobs and fetches the translated fields.

EXAMPLES:
    gsconnect locales                           # Check the configured file profile
    gsconnect submit job.json                   # Submit a job, recording its name
    gsconnect status 42                         # Remote status of host job 42
    gsconnect receive 42 -o fr.json             # Save translated fields
    gsconnect cancel 42                         # Cancel and archive host job 42
    gsconnect completions bash > gsconnect.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_colour_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_colour_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the configured level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "gsconnect", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli.config_path, cli.log_level.clone())?;
    config
        .validate()
        .context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let connector = GlobalSightConnector::from_config(config.connector.clone())?;

    match cli.command {
        Commands::Locales => {
            let locales = connector.resolve_locales().await?;
            println!("source: {}", describe_locales(&locales.source));
            println!("target: {}", describe_locales(&locales.target));
        }
        Commands::Profiles => {
            let token = connector.authenticate().await?;
            let listing = connector.list_file_profiles(&token).await?;
            if listing.is_empty() {
                warn!("No file profiles visible to '{}'", config.connector.username);
            }
            for profile in listing.profiles() {
                println!(
                    "{}\t{}\t{} -> {}",
                    profile.id,
                    profile.name,
                    describe_locale(&profile.source_locale),
                    describe_locales(&profile.target_locales)
                );
            }
        }
        Commands::Submit { job_file, name } => {
            let job = read_job(&job_file)?;
            let translator = open_translator(&config, connector)?;
            match translator.request_translation_named(&job, name).await {
                RequestOutcome::Submitted { job_name } => println!("{}", job_name),
                RequestOutcome::Rejected { reason } => {
                    return Err(anyhow!("Job {} rejected: {}", job.job_id, reason));
                }
            }
        }
        Commands::Status {
            host_job_id,
            job_name,
        } => {
            let status = match (job_name, host_job_id) {
                (Some(job_name), _) => connector.poll_status(&job_name).await,
                (None, Some(host_job_id)) => {
                    open_translator(&config, connector)?
                        .job_status(&host_job_id)
                        .await
                }
                (None, None) => return Err(anyhow!("A host job id or --job-name is required")),
            };
            println!("{}", status);
            if let StatusResult::PermanentError = status {
                return Err(anyhow!("Job status unavailable, the job should be canceled"));
            }
        }
        Commands::Cancel { host_job_id } => {
            let translator = open_translator(&config, connector)?;
            match translator.abort_translation(&host_job_id).await {
                AbortOutcome::Aborted => info!("Job {} aborted", host_job_id),
                AbortOutcome::NotAborted { reason } => {
                    return Err(anyhow!("Job {} not aborted: {}", host_job_id, reason));
                }
            }
        }
        Commands::Receive {
            host_job_id,
            output,
        } => {
            let translator = open_translator(&config, connector)?;
            let translations = translator.fetch_translation(&host_job_id).await?;
            let json = serde_json::to_string_pretty(&translations)
                .context("Failed to serialize translations")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write translations to {:?}", path))?;
                    info!("Wrote {} fields to {:?}", translations.len(), path);
                }
                None => println!("{}", json),
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load the configuration, writing a default one when the file is missing
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    debug!("Using GlobalSight endpoint {}", config.connector.endpoint);
    Ok(config)
}

fn describe_locales(locales: &[String]) -> String {
    locales
        .iter()
        .map(|locale| describe_locale(locale))
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_job(path: &Path) -> Result<TranslationJob> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open job file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse job file: {:?}", path))
}

fn open_translator(config: &Config, connector: GlobalSightConnector) -> Result<GlobalSightTranslator> {
    let db = match &config.database_path {
        Some(path) => DatabaseConnection::new(path)?,
        None => DatabaseConnection::new_default()?,
    };
    Ok(GlobalSightTranslator::new(
        connector,
        Arc::new(Repository::new(db)),
    ))
}
