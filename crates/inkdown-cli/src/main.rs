use inkdown_common::assist::{AssistAction, HttpAssistant};
use inkdown_common::config::{FileStore, InkdownConfig};
use inkdown_common::error::ResourceReadError;
use inkdown_common::telemetry::{self, TelemetryConfig};
use inkdown_editor_core::{
    EditorAction, EditorDocument, PlainEditor, Selection, execute_action, execute_assist,
};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "inkdown - markdown formatting and writing assistant", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a .json or .toml config file
    #[arg(long, global = true, env = "INKDOWN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Target {
    /// Markdown file to operate on
    file: PathBuf,

    /// Write the result back to the file instead of stdout
    #[arg(short, long)]
    in_place: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize heading, list and blank-line spacing
    Beautify {
        #[command(flatten)]
        target: Target,
    },
    /// Pad every pipe table row so the columns line up
    FormatTable {
        #[command(flatten)]
        target: Target,
    },
    /// Pretty-print a file holding a single JSON value
    FormatJson {
        #[command(flatten)]
        target: Target,
    },
    /// Print the heading outline as JSON
    Outline {
        /// Markdown file to read
        file: PathBuf,
    },
    /// Run the document through the remote text assistant
    Assist {
        /// One of: fix-grammar, summarize, expand, make-professional
        action: AssistAction,

        #[command(flatten)]
        target: Target,
    },
    /// Write the default configuration to a file
    InitConfig {
        /// Destination, .json or .toml
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette()?;
    telemetry::init(TelemetryConfig::from_env("inkdown"));

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Beautify { target } => {
            run_action(&target, &config, EditorAction::Beautify).await?;
        }
        Commands::FormatTable { target } => {
            run_action(&target, &config, EditorAction::FormatTable).await?;
        }
        Commands::FormatJson { target } => {
            run_action(&target, &config, EditorAction::FormatJson).await?;
        }
        Commands::Outline { file } => {
            let doc = open_document(&file, &config).await?;
            let outline = serde_json::to_string_pretty(doc.headers()).into_diagnostic()?;
            println!("{outline}");
        }
        Commands::Assist { action, target } => {
            let mut doc = open_document(&target.file, &config).await?;
            let assistant = HttpAssistant::new(&config.assist);
            let changed = execute_assist(&mut doc, &assistant, action).await?;
            emit(&doc, &target, changed).await?;
        }
        Commands::InitConfig { path } => {
            InkdownConfig::default().save(&FileStore::new(&path)).await?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}

async fn load_config(path: Option<&Path>) -> Result<InkdownConfig> {
    match path {
        Some(path) => {
            let config = InkdownConfig::load(&FileStore::new(path)).await?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(InkdownConfig::default()),
    }
}

async fn open_document(path: &Path, config: &InkdownConfig) -> Result<PlainEditor> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ResourceReadError::File {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(PlainEditor::from_text(&text, &config.history))
}

/// Apply `action` with the whole document selected.
async fn run_action(target: &Target, config: &InkdownConfig, action: EditorAction) -> Result<()> {
    let mut doc = open_document(&target.file, config).await?;
    doc.set_selection(Selection::all(doc.len_chars()));
    let changed = execute_action(&mut doc, &action)?;
    tracing::debug!(action = action.label(), changed, "applied action");
    emit(&doc, target, changed).await
}

async fn emit(doc: &PlainEditor, target: &Target, changed: bool) -> Result<()> {
    let content = doc.content_string();
    if !target.in_place {
        print!("{content}");
        return Ok(());
    }
    if changed {
        tokio::fs::write(&target.file, content)
            .await
            .into_diagnostic()?;
        tracing::info!(file = %target.file.display(), "updated");
    } else {
        tracing::info!(file = %target.file.display(), "already formatted");
    }
    Ok(())
}

fn init_miette() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(3)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();
    Ok(())
}
