//! compliance-form - terminal client for the compliance procedure generator.
//!
//! Opens the questionnaire TUI by default; subcommands cover scripted
//! submission and inspection of the backend.

#![allow(clippy::single_match_else)]

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tokio::runtime::Runtime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use compliance_form::api::{FormApi, HttpFormApi};
use compliance_form::core::{find_team, Notice, SubmitOutcome, TeamSource};
use compliance_form::{tui, App, Config, UiEvent, WorkflowController};

/// Fill in the compliance questionnaire and generate procedure documents
#[derive(Parser)]
#[command(name = "compliance-form")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Backend base URL (overrides config and COMPLIANCE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the questionnaire (default)
    Run,

    /// List the teams from the team directory
    Teams {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List the questionnaire questions
    Questions {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Submit answers from a file and generate a document
    Submit {
        /// Team id as listed by `teams`
        #[arg(short, long)]
        team: String,

        /// Answers file (.toml or .json) mapping question ids to answers
        #[arg(short, long, value_name = "FILE")]
        answers: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Download a generated document
    Download {
        /// Download URL or document name
        target: String,

        /// Output file (defaults to the document name in the download directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the backend is reachable
    Health,

    /// Show configuration
    Config {
        /// Show config directory path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Run));

    init_logging(cli.verbose, interactive);

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    match cli.command {
        None | Some(Commands::Run) => cmd_run(&config)?,
        Some(Commands::Teams { format }) => cmd_teams(&config, format)?,
        Some(Commands::Questions { format }) => cmd_questions(&config, format)?,
        Some(Commands::Submit { team, answers, format }) => {
            cmd_submit(&config, &team, &answers, format)?;
        }
        Some(Commands::Download { target, output }) => {
            cmd_download(&config, &target, output.as_deref())?;
        }
        Some(Commands::Health) => cmd_health(&config)?,
        Some(Commands::Config { path }) => cmd_config(&config, path)?,
        Some(Commands::Completions { shell }) => cmd_completions(shell),
    }

    Ok(())
}

/// Setup logging: to a file while the TUI owns the terminal, to stderr otherwise.
fn init_logging(verbose: bool, interactive: bool) {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    if interactive {
        let file = Config::data_dir().and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            File::create(dir.join("compliance-form.log")).ok()
        });
        if let Some(file) = file {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_ansi(false).with_writer(std::sync::Mutex::new(file)))
                .with(filter)
                .init();
        }
        return;
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn http_api(config: &Config) -> Result<HttpFormApi> {
    HttpFormApi::new(&config.api.base_url, config.api.timeout())
        .with_context(|| format!("Invalid backend URL '{}'", config.api.base_url))
}

/// Build a controller against the configured backend and load its teams.
fn load_controller(config: &Config, rt: &Runtime) -> Result<WorkflowController> {
    let schema = config.question_schema().context("Failed to load question schema")?;
    let api = http_api(config)?;

    let mut controller = WorkflowController::new(Arc::new(schema), Arc::new(api));
    rt.block_on(controller.load_teams());
    Ok(controller)
}

/// Run the interactive TUI.
fn cmd_run(config: &Config) -> Result<()> {
    let rt = Runtime::new()?;
    let controller = load_controller(config, &rt)?;
    let app = App::new(controller, config, rt.handle().clone());
    tui::run_tui(app)
}

/// List teams.
fn cmd_teams(config: &Config, format: Format) -> Result<()> {
    let rt = Runtime::new()?;
    let controller = load_controller(config, &rt)?;
    let teams = controller.teams();

    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(teams)?);
        }
        Format::Text => {
            for team in teams {
                println!("{:>4}  {}", team.id.to_string(), team.name);
            }
            if controller.team_source() == TeamSource::Fallback {
                println!("\n(team directory unreachable at {}, showing default teams)", config.api.base_url);
            }
        }
    }

    Ok(())
}

/// List questions.
fn cmd_questions(config: &Config, format: Format) -> Result<()> {
    let schema = config.question_schema().context("Failed to load question schema")?;

    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(schema.questions())?);
        }
        Format::Text => {
            for (i, question) in schema.questions().iter().enumerate() {
                let kind = if question.kind.is_multi_line() { "" } else { " (single line)" };
                println!("{:>2}. {}{}", i + 1, question.label, kind);
                println!("    id: {}", question.id);
            }
            println!("\nTotal: {} questions", schema.len());
        }
    }

    Ok(())
}

/// Read a question id to answer map from TOML or JSON.
fn read_answers(path: &Path) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file {}", path.display()))?;

    let answers = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON answers file {}", path.display()))?,
        _ => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML answers file {}", path.display()))?,
    };
    Ok(answers)
}

/// Submit answers through the same workflow as the TUI.
fn cmd_submit(config: &Config, team: &str, answers_path: &Path, format: Format) -> Result<()> {
    let answers = read_answers(answers_path)?;

    let rt = Runtime::new()?;
    let mut controller = load_controller(config, &rt)?;

    if find_team(controller.teams(), team).is_none() {
        bail!("Unknown team '{team}'. Run `compliance-form teams` to list teams");
    }
    controller.handle_event(UiEvent::team(team));

    for (question_id, answer) in &answers {
        if controller.schema().get(question_id).is_none() {
            bail!("Unknown question id '{question_id}' in {}", answers_path.display());
        }
        controller.handle_event(UiEvent::field(question_id.as_str(), answer.as_str()));
    }

    match rt.block_on(controller.submit()) {
        SubmitOutcome::Generated(document) => match format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&document)?),
            Format::Text => {
                println!("Generated {}", document.document_name);
                println!("Download: {}", document.download_url);
            }
        },
        SubmitOutcome::Invalid(e) => bail!("{}", Notice::from(e)),
        SubmitOutcome::Failed(e) => {
            let notice = Notice::from_api_error(&e);
            return Err(anyhow::Error::new(e).context(notice.to_string()));
        }
        SubmitOutcome::Busy => bail!("A submission is already in progress"),
    }

    Ok(())
}

/// Download a document by URL or name.
fn cmd_download(config: &Config, target: &str, output: Option<&Path>) -> Result<()> {
    let api = http_api(config)?;
    let url = if target.contains("://") || target.starts_with('/') {
        api.resolve_url(target)?
    } else {
        api.document_url(target)
    };

    let rt = Runtime::new()?;
    let bytes = rt
        .block_on(api.download_document(&url))
        .with_context(|| format!("Failed to download {url}"))?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let name = url.rsplit('/').next().filter(|n| !n.is_empty()).unwrap_or("document");
            let name = urlencoding::decode(name).map_or_else(|_| name.to_string(), |n| n.into_owned());
            let dir = config.ui.download_dir();
            std::fs::create_dir_all(&dir)?;
            dir.join(name)
        }
    };

    std::fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Saved {} ({} bytes)", path.display(), bytes.len());

    Ok(())
}

/// Check backend health.
fn cmd_health(config: &Config) -> Result<()> {
    let api = http_api(config)?;
    let rt = Runtime::new()?;

    let health = rt
        .block_on(api.health())
        .with_context(|| format!("Backend at {} is not reachable", api.base_url()))?;

    match health.service {
        Some(service) => println!("{}: {} ({})", api.base_url(), health.status, service),
        None => println!("{}: {}", api.base_url(), health.status),
    }

    Ok(())
}

/// Show configuration.
fn cmd_config(config: &Config, show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::config_dir() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let toml = toml::to_string_pretty(config)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "compliance-form", &mut io::stdout());
}
