//! CLI entrypoint for PRD Studio
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prd_application::{
    ChatInput, ChatUseCase, CritiquePrdUseCase, DeepReviewUseCase, SynthesizePrdUseCase,
};
use prd_domain::conversation::{HistoryBudget, RawTurn};
use prd_domain::PrdDocument;
use prd_infrastructure::{ConfigLoader, GeminiGateway};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prd-studio", about = "Conversation-driven PRD synthesis and review")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit results as JSON instead of markdown
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reply to the requirements conversation
    Chat {
        /// JSON file with the conversation turns
        conversation: PathBuf,

        /// Markdown file with the current PRD, used as grounding
        #[arg(long)]
        prd: Option<PathBuf>,

        /// Hidden memory summary carried from earlier turns
        #[arg(long)]
        memory_summary: Option<String>,
    },

    /// Compress a conversation into a memory summary
    Summarize {
        /// JSON file with the conversation turns
        conversation: PathBuf,

        /// Existing summary to fold into the new one
        #[arg(long)]
        memory_summary: Option<String>,
    },

    /// Synthesize a PRD from a conversation
    Synthesize {
        /// JSON file with the conversation turns
        conversation: PathBuf,
    },

    /// Critique an existing PRD
    Critique {
        /// Markdown file with the PRD
        prd: PathBuf,
    },

    /// Run the critique-and-revise loop on a PRD
    DeepReview {
        /// Markdown file with the PRD
        prd: PathBuf,

        /// Maximum critique rounds before stopping
        #[arg(long)]
        max_iterations: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let settings = ConfigLoader::new().load().context("Failed to load configuration")?;
    info!(model = %settings.model, "Starting PRD Studio");

    // === Dependency Injection ===
    let gateway = Arc::new(GeminiGateway::new(&settings)?);
    let budget = HistoryBudget::new(settings.history_max_turns);

    match cli.command {
        Command::Chat {
            conversation,
            prd,
            memory_summary,
        } => {
            let turns = read_conversation(&conversation)?;
            let mut input = ChatInput::new(turns);
            if let Some(path) = prd {
                input = input.with_prd_context(read_prd(&path)?);
            }
            if let Some(summary) = memory_summary {
                input = input.with_memory_summary(summary);
            }

            let use_case = ChatUseCase::new(gateway).with_budget(budget);
            let reply = use_case.execute(input).await?;
            emit_text(cli.json, "reply", &reply)?;
        }

        Command::Summarize {
            conversation,
            memory_summary,
        } => {
            let turns = read_conversation(&conversation)?;
            let use_case = ChatUseCase::new(gateway).with_budget(budget);
            let summary = use_case.summarize(&turns, memory_summary.as_deref()).await?;
            emit_text(cli.json, "summary", &summary)?;
        }

        Command::Synthesize { conversation } => {
            let turns = read_conversation(&conversation)?;
            let use_case = SynthesizePrdUseCase::new(gateway).with_budget(budget);
            let document = use_case.execute(&turns).await?;
            emit_text(cli.json, "document", document.as_str())?;
        }

        Command::Critique { prd } => {
            let document = read_prd(&prd)?;
            let use_case = CritiquePrdUseCase::new(gateway);
            let critique = use_case.execute(&document).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&critique)?);
            } else {
                print!("{}", format_critique(&critique));
            }
        }

        Command::DeepReview {
            prd,
            max_iterations,
        } => {
            let document = read_prd(&prd)?;
            let cap = max_iterations.unwrap_or(settings.iteration_cap);

            let token = CancellationToken::new();
            spawn_ctrl_c_handler(token.clone());

            let use_case = DeepReviewUseCase::new(gateway)
                .with_iteration_cap(cap)
                .with_cancellation(token);

            match use_case.execute(document).await {
                Ok(outcome) => {
                    if cli.json {
                        let payload = serde_json::json!({
                            "document": outcome.document.as_str(),
                            "rounds": outcome.trail.rounds(),
                            "versions": outcome.versions.records(),
                        });
                        println!("{}", serde_json::to_string_pretty(&payload)?);
                    } else {
                        info!(rounds = outcome.trail.len(), "Deep review finished");
                        println!("{}", outcome.document.as_str());
                    }
                }
                Err(failure) => {
                    warn!(
                        completed_rounds = failure.trail.len(),
                        "Deep review did not finish"
                    );
                    return Err(failure.into());
                }
            }
        }
    }

    Ok(())
}

/// Cancel the token on Ctrl-C so an in-flight review stops cleanly.
fn spawn_ctrl_c_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current call");
            token.cancel();
        }
    });
}

fn read_conversation(path: &Path) -> Result<Vec<RawTurn>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read conversation file {}", path.display()))?;
    let turns: Vec<RawTurn> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid conversation JSON in {}", path.display()))?;
    Ok(turns)
}

fn read_prd(path: &Path) -> Result<PrdDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read PRD file {}", path.display()))?;
    Ok(PrdDocument::new(raw))
}

fn emit_text(json: bool, key: &str, value: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ key: value }))?);
    } else {
        println!("{value}");
    }
    Ok(())
}

fn format_critique(critique: &prd_domain::CritiqueResult) -> String {
    let mut out = String::new();
    if let Some(score) = critique.score {
        out.push_str(&format!("Score: {score}/100\n"));
    }
    if !critique.summary.is_empty() {
        out.push_str(&critique.summary);
        out.push('\n');
    }
    if critique.issues.is_empty() {
        out.push_str("No issues found.\n");
    } else {
        out.push_str("\nIssues:\n");
        for issue in &critique.issues {
            out.push_str(&format!("- [{:?}] {}\n", issue.severity, issue.description));
        }
    }
    out
}
