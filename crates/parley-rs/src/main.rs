//! Command-line entry point for the Parley agent.

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;
use parley_rs::config::{AgentSettings, strategy_id_for};
use parley_rs::memory::{
    Content, MemoryStore, PreferenceRecord, SessionKey, preference_namespace, session_namespace,
};
use parley_rs::{build_llm, build_orchestrator, init_logging, open_store};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Command-line options for the agent.
#[derive(Parser)]
#[command(name = "parley", version)]
struct Cli {
    /// Optional path to a parley.json5 config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve /ping and /invocations
    Serve {
        /// Listen address override (host:port)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print stored events and long-term records for an actor
    Inspect {
        #[arg(long)]
        actor: String,
        /// Session whose events and summaries are shown
        #[arg(long)]
        session: Option<String>,
        /// Strategy name holding per-session summaries
        #[arg(long)]
        summary_strategy: Option<String>,
        /// Maximum number of records listed per namespace
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Store a preference record for an actor
    SeedPreference {
        #[arg(long)]
        actor: String,
        #[arg(long)]
        text: String,
    },
}

const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let settings =
        AgentSettings::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Command::Serve { bind } => serve(settings, bind).await,
        Command::Inspect {
            actor,
            session,
            summary_strategy,
            limit,
        } => inspect(&settings, &actor, session.as_deref(), summary_strategy.as_deref(), limit).await,
        Command::SeedPreference { actor, text } => seed_preference(&settings, &actor, text).await,
    }
}

async fn serve(mut settings: AgentSettings, bind: Option<String>) -> anyhow::Result<()> {
    if let Some(bind) = bind {
        settings.server.bind = bind;
    }
    let Ok(api_key) = std::env::var(API_KEY_ENV) else {
        bail!("{API_KEY_ENV} is required to serve");
    };
    let llm = build_llm(&settings, api_key).context("failed to build LLM provider")?;
    let store = Arc::new(open_store(&settings).context("failed to open memory store")?);
    let bind = settings.server.bind.clone();
    info!(
        "starting agent (memory_id={}, model={}, region={})",
        settings.memory_id, settings.model.id, settings.model.region
    );
    let orchestrator = build_orchestrator(settings, store, llm);
    parley_rs::server::serve(orchestrator, &bind)
        .await
        .context("agent server failed")?;
    Ok(())
}

async fn inspect(
    settings: &AgentSettings,
    actor: &str,
    session: Option<&str>,
    summary_strategy: Option<&str>,
    limit: usize,
) -> anyhow::Result<()> {
    let store = open_store(settings).context("failed to open memory store")?;
    let preference_strategy = settings.memory_strategy_id();

    println!("Preferences for actor: {actor}");
    let records = store
        .list_preference_records(
            &settings.memory_id,
            &preference_namespace(&preference_strategy, actor),
            &preference_strategy,
            limit,
        )
        .await
        .context("failed to list preference records")?;
    print_records(&records)?;

    let Some(session) = session else {
        return Ok(());
    };

    println!("Events for actor and session: {actor} / {session}");
    let events = store
        .list_events(SessionKey::new(&settings.memory_id, actor, session))
        .await
        .context("failed to list events")?;
    for event in &events {
        println!("{}", serde_json::to_string(event)?);
    }

    if let Some(name) = summary_strategy {
        let summary_strategy = strategy_id_for(name, &settings.memory_id);
        println!("Summaries for actor and session: {actor} / {session}");
        let records = store
            .list_preference_records(
                &settings.memory_id,
                &session_namespace(&summary_strategy, actor, session),
                &summary_strategy,
                limit,
            )
            .await
            .context("failed to list summary records")?;
        print_records(&records)?;
    }
    Ok(())
}

async fn seed_preference(settings: &AgentSettings, actor: &str, text: String) -> anyhow::Result<()> {
    let store = open_store(settings).context("failed to open memory store")?;
    let strategy_id = settings.memory_strategy_id();
    let record = PreferenceRecord {
        record_id: Uuid::new_v4().to_string(),
        namespace: preference_namespace(&strategy_id, actor),
        strategy_id,
        content: Content::Text(text),
        created_at: Utc::now(),
    };
    let record_id = record.record_id.clone();
    store
        .put_preference_record(&settings.memory_id, record)
        .await
        .context("failed to store preference record")?;
    println!("stored preference record {record_id}");
    Ok(())
}

fn print_records(records: &[PreferenceRecord]) -> anyhow::Result<()> {
    if records.is_empty() {
        println!("  (none)");
    }
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    println!();
    Ok(())
}
