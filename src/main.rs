// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use teachres::app_config::{self, Config};
use teachres::app_controller::Controller;
use teachres::file_utils::{FileManager, to_json};
use teachres::qa_mapping;
use teachres::storage::{Credentials, LocalSource, S3Source};

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate TSX resource files and resources-summary.json from resource documents
    Resources(ResourcesArgs),

    /// Write a per-unit inventory of one document, optionally audited
    Inventory(InventoryArgs),

    /// Turn image file names into questions with answer prompts
    Questions(QuestionsArgs),

    /// Convert a Q&A workbook into the mapping JSON of one book
    QaMapping(QaMappingArgs),

    /// Generate shell completions for teachres
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ResourcesArgs {
    /// Local resource document (repeatable); S3 is used when no local input is given
    #[arg(long = "local-file", value_name = "FILE", conflicts_with = "local_dir")]
    local_files: Vec<PathBuf>,

    /// Directory whose .docx files are processed
    #[arg(long, value_name = "DIR")]
    local_dir: Option<PathBuf>,

    /// Object key to process instead of the configured list (repeatable)
    #[arg(long = "key", value_name = "KEY", conflicts_with_all = ["local_files", "local_dir"])]
    keys: Vec<String>,

    /// Bucket overriding the configured one
    #[arg(long)]
    bucket: Option<String>,

    /// Output directory overriding the configured one
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InventoryArgs {
    /// Local resource document
    #[arg(long, value_name = "FILE", conflicts_with = "key", required_unless_present = "key")]
    local_file: Option<PathBuf>,

    /// Object key of the resource document
    #[arg(long, value_name = "KEY")]
    key: Option<String>,

    /// Bucket overriding the configured one
    #[arg(long)]
    bucket: Option<String>,

    /// Output directory overriding the configured one
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON file of expected counts per unit: {"1": {"videos": 3, "games": 5}}
    #[arg(short, long, value_name = "FILE")]
    expectations: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct QuestionsArgs {
    /// Local directory of images
    #[arg(long, value_name = "DIR", conflicts_with_all = ["bucket", "folder"])]
    local_dir: Option<PathBuf>,

    /// Bucket holding the images
    #[arg(long)]
    bucket: Option<String>,

    /// Folder (key prefix) inside the bucket
    #[arg(long)]
    folder: Option<String>,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Indent the JSON report
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct QaMappingArgs {
    /// Local workbook
    #[arg(long, value_name = "FILE", conflicts_with = "key", required_unless_present = "key")]
    local_file: Option<PathBuf>,

    /// Object key of the workbook
    #[arg(long, value_name = "KEY")]
    key: Option<String>,

    /// Bucket overriding the configured one
    #[arg(long)]
    bucket: Option<String>,

    /// Book id recorded in every entry
    #[arg(short, long)]
    book: String,

    /// Output file (default: qa-mapping-{book}.json)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// teachres - Teaching resource extractor
///
/// Reads teacher resource documents (DOCX), Q&A workbooks (XLSX) and image
/// folders, locally or from S3, and produces the JSON and TSX data used by
/// the lesson web client.
#[derive(Parser, Debug)]
#[command(name = "teachres")]
#[command(version)]
#[command(about = "Extract teaching resources from course documents")]
#[command(long_about = "teachres splits resource documents into units, finds the video and game embeds of each unit, \
and turns image file names into questions.

EXAMPLES:
    teachres resources                                      # Configured S3 documents
    teachres resources --local-file 'VISUAL 1.docx' -o out  # One local document
    teachres inventory --local-file 'VISUAL 1.docx' -e expected.json
    teachres questions --local-dir ./images --pretty
    teachres questions --bucket visualenglishmaterial --folder 'book3/unit2' -o questions.json
    teachres qa-mapping --local-file qa.xlsx --book 3
    teachres completions bash > teachres.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

CREDENTIALS:
    --access-key/--secret-key, else AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY
    (and AWS_SESSION_TOKEN). Without credentials S3 requests are anonymous.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// AWS region overriding the configured one
    #[arg(long, global = true)]
    region: Option<String>,

    /// AWS access key id
    #[arg(long, global = true)]
    access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, global = true)]
    secret_key: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Short tag for log level
    fn tag_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "ERROR",
            Level::Warn => "WARN ",
            Level::Info => "INFO ",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::color_for_level(level),
                now,
                Self::tag_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "teachres", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&level));
    }

    let mut config = load_config(&cli)?;
    apply_bucket_override(&mut config, &cli.command);
    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }
    debug!("Using configuration from {}", cli.config_path);

    let controller = Controller::with_config(config)?;

    match &cli.command {
        Commands::Resources(args) => run_resources(&controller, &cli, args).await,
        Commands::Inventory(args) => run_inventory(&controller, &cli, args).await,
        Commands::Questions(args) => run_questions(&controller, &cli, args).await,
        Commands::QaMapping(args) => run_qa_mapping(&controller, &cli, args).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load `conf.json` (or create it with defaults) and apply CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = &cli.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path).context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(region) = &cli.region {
        config.storage.region = region.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

fn apply_bucket_override(config: &mut Config, command: &Commands) {
    let bucket = match command {
        Commands::Resources(args) => args.bucket.as_ref(),
        Commands::Inventory(args) => args.bucket.as_ref(),
        Commands::Questions(args) => args.bucket.as_ref(),
        Commands::QaMapping(args) => args.bucket.as_ref(),
        Commands::Completions { .. } => None,
    };
    if let Some(bucket) = bucket {
        config.storage.bucket = bucket.clone();
    }
}

fn s3_source(config: &Config, cli: &CommandLineOptions) -> Result<S3Source> {
    let credentials = Credentials::resolve(cli.access_key.clone(), cli.secret_key.clone())
        .context("Invalid AWS credentials")?;
    let source = S3Source::new(
        &config.storage.bucket,
        &config.storage.region,
        config.storage.endpoint.as_deref(),
        config.storage.request_timeout_secs,
        credentials,
    )?;
    Ok(source)
}

/// Local source rooted at the file's directory, plus the key of the file
fn local_file_source(path: &Path) -> Result<(LocalSource, String)> {
    if !FileManager::file_exists(path) {
        return Err(anyhow!("File not found: {}", path.display()));
    }
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("Not a file path: {}", path.display()))?
        .to_string_lossy()
        .into_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((LocalSource::new(parent), name))
}

/// Local source rooted at the deepest directory shared by every file
fn local_files_source(paths: &[PathBuf]) -> Result<(LocalSource, Vec<String>)> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        if !FileManager::file_exists(path) {
            return Err(anyhow!("File not found: {}", path.display()));
        }
        files.push(
            path.canonicalize()
                .with_context(|| format!("Failed to resolve {}", path.display()))?,
        );
    }

    let mut root = files
        .first()
        .and_then(|f| f.parent())
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("No resource documents given"))?;
    while !files.iter().all(|f| f.starts_with(&root)) {
        root = root
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow!("Resource documents share no common directory"))?;
    }

    let mut keys = Vec::with_capacity(files.len());
    for file in &files {
        let relative = file
            .strip_prefix(&root)
            .with_context(|| format!("{} is outside {}", file.display(), root.display()))?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        keys.push(parts.join("/"));
    }
    Ok((LocalSource::new(root), keys))
}

fn output_dir(config: &Config, flag: &Option<PathBuf>) -> PathBuf {
    flag.clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.output_dir))
}

async fn run_resources(controller: &Controller, cli: &CommandLineOptions, args: &ResourcesArgs) -> Result<()> {
    let config = controller.config();
    let output_dir = output_dir(config, &args.output_dir);

    let outcome = if let Some(dir) = &args.local_dir {
        if !FileManager::dir_exists(dir) {
            return Err(anyhow!("Directory not found: {}", dir.display()));
        }
        let source = LocalSource::new(dir);
        let keys: Vec<String> = FileManager::find_files(dir, "docx")?
            .iter()
            .filter_map(|path| path.strip_prefix(dir).ok())
            .filter(|relative| {
                // Skip Word lock files
                !relative.file_name().is_some_and(|n| n.to_string_lossy().starts_with("~$"))
            })
            .map(|relative| {
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect();
        controller.run_resources(&source, &keys, &output_dir).await?
    } else if !args.local_files.is_empty() {
        let (source, keys) = local_files_source(&args.local_files)?;
        controller.run_resources(&source, &keys, &output_dir).await?
    } else {
        let source = s3_source(config, cli)?;
        let keys = if args.keys.is_empty() {
            config.storage.resource_keys.clone()
        } else {
            args.keys.clone()
        };
        controller.run_resources(&source, &keys, &output_dir).await?
    };

    info!(
        "Processed {} document(s) with {} unit(s) into {}",
        outcome.documents_processed,
        outcome.units,
        output_dir.display()
    );
    Ok(())
}

async fn run_inventory(controller: &Controller, cli: &CommandLineOptions, args: &InventoryArgs) -> Result<()> {
    let config = controller.config();
    let output_dir = output_dir(config, &args.output_dir);
    let expectations = args.expectations.as_deref();

    let rows = match (&args.local_file, &args.key) {
        (Some(path), _) => {
            let (source, key) = local_file_source(path)?;
            controller.run_inventory(&source, &key, &output_dir, expectations).await?
        }
        (None, Some(key)) => {
            let source = s3_source(config, cli)?;
            controller.run_inventory(&source, key, &output_dir, expectations).await?
        }
        (None, None) => return Err(anyhow!("Either --local-file or --key is required")),
    };

    if expectations.is_some() {
        let complete = rows
            .iter()
            .filter(|row| row.status == teachres::audit::AuditStatus::Complete)
            .count();
        info!("{} of {} audited unit(s) complete", complete, rows.len());
    }
    Ok(())
}

async fn run_questions(controller: &Controller, cli: &CommandLineOptions, args: &QuestionsArgs) -> Result<()> {
    let report = if let Some(dir) = &args.local_dir {
        if !FileManager::dir_exists(dir) {
            return Err(anyhow!("Directory not found: {}", dir.display()));
        }
        let source = LocalSource::new(dir);
        controller.run_questions(&source, "").await?
    } else {
        let folder = args
            .folder
            .as_deref()
            .ok_or_else(|| anyhow!("Either --local-dir or --folder is required"))?;
        let source = s3_source(controller.config(), cli)?;
        controller.run_questions(&source, folder).await?
    };

    match &args.output {
        Some(path) => {
            FileManager::write_json(path, &report, args.pretty)?;
            info!("Results saved to {}", path.display());
        }
        None => println!("{}", to_json(&report, args.pretty)?),
    }
    Ok(())
}

async fn run_qa_mapping(controller: &Controller, cli: &CommandLineOptions, args: &QaMappingArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(qa_mapping::default_output_name(&args.book)));

    match (&args.local_file, &args.key) {
        (Some(path), _) => {
            let (source, key) = local_file_source(path)?;
            controller.run_qa_mapping(&source, &key, &args.book, &output).await?;
        }
        (None, Some(key)) => {
            let source = s3_source(controller.config(), cli)?;
            controller.run_qa_mapping(&source, key, &args.book, &output).await?;
        }
        (None, None) => return Err(anyhow!("Either --local-file or --key is required")),
    }
    Ok(())
}
