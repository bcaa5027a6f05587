// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use scriptsmith::app_config::{self, AiProvider, Config};
use scriptsmith::app_controller::Controller;
use scriptsmith::contract::{ContractKind, ContractRequest, MarkupStyle};
use scriptsmith::database::GenerationKind;
use scriptsmith::enhancer::{EnhanceContext, EnhanceRequest};
use scriptsmith::file_utils::{FileManager, InputSource};
use scriptsmith::generator::{GeneratedScript, ScriptRequest};

/// CLI Wrapper for AiProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Gemini,
    Groq,
    #[value(name = "openrouter")]
    OpenRouter,
    Mock,
}

impl From<CliProvider> for AiProvider {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Gemini => AiProvider::Gemini,
            CliProvider::Groq => AiProvider::Groq,
            CliProvider::OpenRouter => AiProvider::OpenRouter,
            CliProvider::Mock => AiProvider::Mock,
        }
    }
}

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

/// CLI Wrapper for MarkupStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliMarkupStyle {
    #[value(name = "reportlab")]
    ReportLab,
    Html,
    Plain,
    /// Keep the assembled markdown
    Markdown,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Strip annotations from a script and keep the narration
    Clean(CleanArgs),

    /// Turn a short prompt into several enhanced variations
    Enhance(EnhanceArgs),

    /// Generate a video script and its narration
    Script(ScriptArgs),

    /// Assemble a contract from a JSON data file
    Contract(ContractArgs),

    /// Inspect stored results
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Generate shell completions for scriptsmith
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Script file, directory of scripts, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (or output directory when INPUT is a directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Split the narration into chunks of at most N characters (applies to every file of a directory)
    #[arg(long, value_name = "N")]
    chunk: Option<usize>,

    /// Print what was removed
    #[arg(long)]
    stats: bool,

    /// Keep speaker labels such as "Host:"
    #[arg(long)]
    keep_labels: bool,

    /// Keep timestamps that are not wrapped in parentheses
    #[arg(long)]
    keep_timestamps: bool,

    /// Overwrite existing narration files in directory mode
    #[arg(short, long)]
    force: bool,
}

#[derive(Args, Debug)]
struct EnhanceArgs {
    /// Prompt to enhance
    prompt: String,

    /// Number of variations (1 to 10, config default when unset)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    #[arg(long)]
    tone: Option<String>,

    #[arg(long)]
    audience: Option<String>,

    #[arg(long)]
    platform: Option<String>,

    /// Target video duration in seconds
    #[arg(long, value_name = "SECS")]
    duration: Option<u32>,

    /// Output language code (config language when unset)
    #[arg(long)]
    language: Option<String>,

    /// Print the variations as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ScriptArgs {
    /// Topic of the video
    #[arg(required_unless_present = "batch")]
    topic: Option<String>,

    /// JSON file with an array of script requests to generate concurrently
    #[arg(long, value_name = "FILE", conflicts_with = "topic")]
    batch: Option<PathBuf>,

    /// Target duration in seconds
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    duration: u32,

    #[arg(long)]
    tone: Option<String>,

    /// Output language code (config language when unset)
    #[arg(long)]
    language: Option<String>,

    /// Write the narration to a file (a directory in batch mode)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the raw script instead of the narration
    #[arg(long)]
    raw: bool,
}

#[derive(Args, Debug)]
struct ContractArgs {
    /// JSON file shaped like a contract request
    #[arg(short, long, value_name = "FILE")]
    data: PathBuf,

    /// Override the contract kind of the data file
    #[arg(short, long)]
    kind: Option<String>,

    /// Output markup
    #[arg(short, long, value_enum, default_value = "reportlab")]
    style: CliMarkupStyle,

    /// Use the built-in template body instead of drafting one
    #[arg(long)]
    no_ai: bool,

    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List stored results, newest first
    List {
        /// Only show this kind (script, enhancement, contract)
        #[arg(short, long)]
        kind: Option<String>,

        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Print one stored result
    Show {
        id: String,
    },
    /// Delete one stored result
    Delete {
        id: String,
    },
    /// Show history statistics
    Stats,
}

/// scriptsmith - AI content preparation for speech and print
///
/// Cleans AI video scripts into narration for text-to-speech, enhances prompts,
/// generates scripts and assembles contracts for PDF rendering.
#[derive(Parser, Debug)]
#[command(name = "scriptsmith")]
#[command(version)]
#[command(about = "AI content preparation for speech and print")]
#[command(long_about = "scriptsmith cleans AI-generated video scripts into plain narration, enhances prompts,
generates scripts and assembles contracts using AI providers.

EXAMPLES:
    scriptsmith clean script.txt                    # Print the narration of a script
    scriptsmith clean - < script.txt --stats        # Clean stdin and report what was removed
    scriptsmith clean scripts/ -f                   # Clean every .txt/.md file in a directory
    scriptsmith enhance \"sunrise timelapse\" -n 5    # Five prompt variations
    scriptsmith script \"Why cats purr\" --duration 90
    scriptsmith contract --data nda.json --style html
    scriptsmith history list --kind script
    scriptsmith completions bash > scriptsmith.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    gemini     - Google Gemini API (GEMINI_API_KEY)
    groq       - Groq API (GROQ_API_KEY)
    openrouter - OpenRouter API (OPENROUTER_API_KEY)
    mock       - Offline canned answers")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliProvider>,

    /// Model name to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Do not store results in the history database
    #[arg(long, global = true)]
    no_store: bool,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
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
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Max level is lowered again once the config is loaded
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "scriptsmith", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config)?;
    apply_overrides(&mut config, &cli);
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Clean(args) => run_clean(config, args),
        Commands::Enhance(args) => run_enhance(config, args).await,
        Commands::Script(args) => run_script(config, args).await,
        Commands::Contract(args) => run_contract(config, args).await,
        Commands::History { action } => run_history(config, action).await,
        Commands::Completions { .. } => Ok(()),
    }
}

// @applies: Command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &CommandLineOptions) {
    if let Some(provider) = &cli.provider {
        config.generation.provider = provider.clone().into();
    }

    if let Some(model) = &cli.model {
        config.generation.set_model(model);
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    if cli.no_store {
        config.storage.enabled = false;
    }
}

// @creates: Controller for commands that call the provider
fn provider_controller(config: Config) -> Result<Controller> {
    config.validate().context("Configuration validation failed")?;
    Controller::with_config(config)
}

fn run_clean(mut config: Config, args: CleanArgs) -> Result<()> {
    if args.keep_labels {
        config.cleaner.strip_speaker_labels = false;
    }
    if args.keep_timestamps {
        config.cleaner.strip_bare_timestamps = false;
    }
    // Cleaning is offline and never touches the history
    config.storage.enabled = false;

    let controller = Controller::with_config(config)?;

    match InputSource::resolve(&args.input)? {
        InputSource::Directory(dir) => {
            let summary = controller.clean_directory(&dir, args.output.as_deref(), args.chunk, args.force)?;
            if args.stats {
                info!("Removed: {}", summary.report);
            }
            if summary.failed > 0 {
                return Err(anyhow!("{} file(s) could not be cleaned", summary.failed));
            }
        }
        source => {
            let script = match source {
                InputSource::File(path) => FileManager::read_to_string(path)?,
                _ => FileManager::read_stdin()?,
            };

            let (narration, report) = controller.clean_text(&script);
            if args.stats {
                info!("Removed: {}", report);
            }

            let text = scriptsmith::script::render_chunks(&narration, args.chunk);
            FileManager::write_output(args.output.as_deref(), &text)?;
        }
    }

    Ok(())
}

async fn run_enhance(config: Config, args: EnhanceArgs) -> Result<()> {
    let count = args.count.unwrap_or(config.generation.common.variation_count);
    let context = EnhanceContext {
        tone: args.tone,
        audience: args.audience,
        platform: args.platform,
        duration_secs: args.duration,
        language: Some(args.language.unwrap_or_else(|| config.language.clone())),
    };
    let request = EnhanceRequest::new(args.prompt, count).with_context(context);

    let controller = provider_controller(config)?;
    let variations = controller.enhance(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&variations)?);
    } else {
        for (index, variation) in variations.iter().enumerate() {
            println!("{}. {}\n{}\n", index + 1, variation.title, variation.prompt);
        }
    }

    Ok(())
}

fn script_output(script: &GeneratedScript, raw: bool) -> &str {
    if raw { &script.raw } else { &script.narration }
}

async fn run_script(config: Config, args: ScriptArgs) -> Result<()> {
    let language = args.language.clone().unwrap_or_else(|| config.language.clone());
    let controller = provider_controller(config)?;

    if let Some(batch) = &args.batch {
        let content = FileManager::read_to_string(batch)?;
        let requests: Vec<ScriptRequest> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse script batch: {}", batch.display()))?;
        let topics: Vec<String> = requests.iter().map(|r| r.topic.clone()).collect();

        let results = controller.generate_scripts(requests).await;

        let mut failures = 0;
        for (index, (topic, result)) in topics.iter().zip(results).enumerate() {
            match result {
                Ok(script) => match &args.output {
                    Some(dir) => {
                        let path = dir.join(format!("script_{:02}.txt", index + 1));
                        FileManager::write_to_file(&path, script_output(&script, args.raw))?;
                        info!("'{}' -> {}", topic, path.display());
                    }
                    None => println!("## {}\n\n{}\n", topic, script_output(&script, args.raw)),
                },
                Err(e) => {
                    error!("'{}' failed: {:#}", topic, e);
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            return Err(anyhow!("{} of {} script(s) failed", failures, topics.len()));
        }
        return Ok(());
    }

    let topic = args.topic.clone().ok_or_else(|| anyhow!("TOPIC is required without --batch"))?;
    let mut request = ScriptRequest::new(topic).duration(args.duration).language(language);
    if let Some(tone) = &args.tone {
        request = request.tone(tone.clone());
    }

    let script = controller.generate_script(&request).await?;
    info!(
        "{} words, about {}s of narration in {} chunk(s)",
        script.word_count,
        script.estimated_duration_secs,
        script.chunks.len()
    );

    FileManager::write_output(args.output.as_deref(), script_output(&script, args.raw))
}

async fn run_contract(config: Config, args: ContractArgs) -> Result<()> {
    let content = FileManager::read_to_string(&args.data)?;
    let mut request: ContractRequest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse contract data: {}", args.data.display()))?;

    if let Some(kind) = &args.kind {
        request.kind = kind.parse::<ContractKind>()?;
    }

    let controller = if args.no_ai {
        Controller::with_config(config)?
    } else {
        provider_controller(config)?
    };
    let contract = controller.build_contract(&request, !args.no_ai).await?;

    let text = match args.style {
        CliMarkupStyle::ReportLab => contract.to_markup(MarkupStyle::ReportLab),
        CliMarkupStyle::Html => contract.to_markup(MarkupStyle::Html),
        CliMarkupStyle::Plain => contract.to_markup(MarkupStyle::Plain),
        CliMarkupStyle::Markdown => contract.markdown.clone(),
    };

    FileManager::write_output(args.output.as_deref(), &text)
}

async fn run_history(config: Config, action: HistoryAction) -> Result<()> {
    let controller = Controller::with_config(config)?;

    match action {
        HistoryAction::List { kind, limit } => {
            let kind = kind.map(|k| k.parse::<GenerationKind>()).transpose()?;
            let records = controller.history_list(kind, limit).await?;
            if records.is_empty() {
                info!("No stored results");
            }
            for record in records {
                println!(
                    "{}  {:<11}  {}  {}/{}  {}",
                    record.id,
                    record.kind.to_string(),
                    record.created_at,
                    record.provider,
                    record.model,
                    record.summary(60)
                );
            }
        }
        HistoryAction::Show { id } => {
            let record = controller.history_show(&id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        HistoryAction::Delete { id } => {
            controller.history_delete(&id).await?;
            info!("Deleted {}", id);
        }
        HistoryAction::Stats => {
            println!("{}", controller.history_stats().await?);
        }
    }

    Ok(())
}
