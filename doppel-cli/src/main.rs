//! doppel CLI: import message history, build the vector index, inspect style
//! profiles, and run the reply pipeline once. Config from .env / environment.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use decision::group::GROUP_WINDOW_CAP;
use decision::{GroupTopicEngine, ResponseDecisionEngine};
use doppel_cli::{clients, import};
use doppel_core::{Correspondent, Message, Sender, Settings};
use generation::GenerationOrchestrator;
use history::{MessageHistory, SqliteHistory};
use retrieval::{ProgressFn, RetrievalOrchestrator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use style::StyleProfileBuilder;
use uuid::Uuid;
use vector_index::VectorIndex;

/// Messages read when building a profile for display.
const PROFILE_MESSAGE_LIMIT: usize = 500;
/// Messages shown to the decision engine when replying.
const DECISION_CONTEXT_LIMIT: usize = 200;

#[derive(Parser)]
#[command(name = "doppel")]
#[command(about = "Personal auto-reply engine: import, index, profile, reply, status", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON message export into the history database.
    Import {
        /// JSON array of {id?, correspondent_id?, sender, content, timestamp}.
        #[arg(short, long)]
        file: PathBuf,
        /// Correspondent id for records that do not carry one.
        #[arg(short, long)]
        correspondent: Option<String>,
    },
    /// Embed a correspondent's recent history into the vector index.
    Index {
        #[arg(short, long)]
        correspondent: String,
    },
    /// Build and print the style profile from a correspondent's history.
    Profile {
        #[arg(short, long)]
        correspondent: String,
    },
    /// Run the reply pipeline once for an incoming message.
    Reply {
        #[arg(short, long)]
        correspondent: String,
        #[arg(short, long)]
        message: String,
        /// Treat the correspondent as a group chat.
        #[arg(long)]
        group: bool,
    },
    /// Show history statistics and index counts.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = Settings::from_env().context("Load settings from environment (.env)")?;
    doppel_core::init_tracing(&settings.log_file).context("Initialize tracing (check LOG_FILE)")?;

    match cli.command {
        Commands::Import {
            file,
            correspondent,
        } => handle_import(&settings, &file, correspondent.as_deref()).await,
        Commands::Index { correspondent } => handle_index(&settings, &correspondent).await,
        Commands::Profile { correspondent } => handle_profile(&settings, &correspondent).await,
        Commands::Reply {
            correspondent,
            message,
            group,
        } => handle_reply(&settings, &correspondent, &message, group).await,
        Commands::Status => handle_status(&settings).await,
    }
}

async fn open_history(settings: &Settings) -> Result<Arc<SqliteHistory>> {
    let history = SqliteHistory::new(&settings.database_url)
        .await
        .context("Open history database (check DATABASE_URL)")?;
    Ok(Arc::new(history))
}

async fn handle_import(settings: &Settings, file: &Path, correspondent: Option<&str>) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Read import file {}", file.display()))?;
    let messages = import::parse_export(&raw, correspondent).context("Parse message export")?;

    println!("Importing {} message(s)...", messages.len());

    let history = open_history(settings).await?;
    let inserted = history
        .import(&messages)
        .await
        .context("Write messages to history")?;
    let skipped = messages.len() as u64 - inserted;

    println!("Imported {} new message(s), {} already present.", inserted, skipped);
    Ok(())
}

async fn handle_index(settings: &Settings, correspondent_id: &str) -> Result<()> {
    let Some(embedding) = clients::create_embedding_client(settings) else {
        println!(
            "No embedding backend configured (set OPENAI_API_KEY or BIGMODEL_API_KEY); \
             nothing to index."
        );
        return Ok(());
    };

    let history = open_history(settings).await?;
    let index = Arc::new(VectorIndex::load(settings.index_dir.as_str()));
    let retrieval = RetrievalOrchestrator::new(history, Some(embedding), index.clone());

    println!("Indexing history for {}...", correspondent_id);
    let progress: ProgressFn = Box::new(|phase, done, total| {
        println!("  {}: batch {}/{}", phase, done, total);
    });

    match retrieval
        .generate_embeddings(correspondent_id, Some(progress))
        .await
    {
        Some(report) => {
            let (pairs, threads) = index.count_for(correspondent_id).await;
            println!(
                "Indexed {} thread(s) and {} pair(s) in {:.1}s; {} batch(es) failed.",
                report.threads_indexed,
                report.pairs_indexed,
                report.elapsed_secs,
                report.batches_failed
            );
            println!(
                "Index now holds {} pair(s) and {} thread(s) for {}.",
                pairs, threads, correspondent_id
            );
        }
        None => println!("An index run for {} is already in progress.", correspondent_id),
    }

    Ok(())
}

async fn handle_profile(settings: &Settings, correspondent_id: &str) -> Result<()> {
    let history = open_history(settings).await?;
    let messages = history
        .get_messages(correspondent_id, PROFILE_MESSAGE_LIMIT)
        .await?;

    if messages.is_empty() {
        println!("No history for {}.", correspondent_id);
        return Ok(());
    }

    let profile = StyleProfileBuilder::new().build(&messages);
    println!(
        "Style profile for {} ({} message(s) read, {} self-authored):\n",
        correspondent_id,
        messages.len(),
        profile.message_count
    );
    println!("{}", profile.describe());
    Ok(())
}

async fn handle_reply(
    settings: &Settings,
    correspondent_id: &str,
    text: &str,
    group: bool,
) -> Result<()> {
    settings.validate()?;

    let history = open_history(settings).await?;
    let index = Arc::new(VectorIndex::load(settings.index_dir.as_str()));
    let embedding = clients::create_embedding_client(settings);
    let generation_client = clients::create_generation_client(settings);
    let retrieval = Arc::new(RetrievalOrchestrator::new(
        history.clone(),
        embedding.clone(),
        index.clone(),
    ));

    let correspondent = if group {
        Correspondent::group(correspondent_id, correspondent_id)
    } else {
        Correspondent::contact(correspondent_id, correspondent_id)
    };
    let incoming = Message::new(
        Uuid::new_v4().to_string(),
        correspondent_id,
        Sender::Them,
        text,
        chrono::Utc::now(),
    );

    let recent = history
        .get_messages(correspondent_id, DECISION_CONTEXT_LIMIT)
        .await?;
    let decision = ResponseDecisionEngine::new(settings.user_name.clone()).decide(
        &incoming,
        &correspondent,
        &recent,
    );
    println!(
        "Decision: {} ({} confidence, {})",
        decision.verdict, decision.confidence, decision.reason
    );

    let mut orchestrator = GenerationOrchestrator::new(
        settings.clone(),
        history.clone(),
        retrieval,
        generation_client,
    );

    if group && settings.group_topic_participation {
        let topic = Arc::new(GroupTopicEngine::new(embedding, index));
        // One-shot runs carry no live window; seed it from stored history.
        let start = recent.len().saturating_sub(GROUP_WINDOW_CAP);
        for message in &recent[start..] {
            topic.record(correspondent_id, &message.content).await;
        }
        orchestrator = orchestrator.with_group_topic(topic);
    }

    match orchestrator.generate(&correspondent, &incoming).await? {
        Some(reply) => println!("\n{}", reply),
        None => println!("\nStayed quiet."),
    }

    Ok(())
}

async fn handle_status(settings: &Settings) -> Result<()> {
    let history = open_history(settings).await?;
    let stats = history.get_stats().await.context("Read history statistics")?;
    let index = VectorIndex::load(settings.index_dir.as_str());

    println!("History ({})", settings.database_url);
    println!("  messages:        {}", stats.total_messages);
    println!(
        "  sent / received: {} / {}",
        stats.messages_sent, stats.messages_received
    );
    println!("  correspondents:  {}", stats.correspondents);
    if let (Some(first), Some(last)) = (stats.first_message, stats.last_message) {
        println!(
            "  span:            {} .. {}",
            first.format("%Y-%m-%d %H:%M"),
            last.format("%Y-%m-%d %H:%M")
        );
    }
    println!();
    println!("Vector index ({})", settings.index_dir);
    println!("  pair vectors:    {}", index.message_count().await);
    println!("  thread vectors:  {}", index.conversation_count().await);

    Ok(())
}
