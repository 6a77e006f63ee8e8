//! CLI entrypoint for taskcrew
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, bail};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use taskcrew_application::agents::{
    AnalyticsAgent, CategoryAgent, FocusedAgent, MessagingAgent, PlannerAgent, TaskAgent,
};
use taskcrew_application::{
    BuildContextUseCase, ClassifyIntentUseCase, ConversationLogger, LlmGateway, MessengerPort,
    NoConversationLogger, Orchestrator, SpecializedAgent, TaskStorePort,
};
use taskcrew_domain::{CategoryId, SessionId};
use taskcrew_infrastructure::{
    ConfigLoader, ConsoleMessenger, FileConfig, InMemoryTaskStore, JsonlConversationLogger,
    OpenAiGateway, TwilioMessenger,
};
use taskcrew_presentation::{ChatRepl, Cli, ConsoleFormatter};
use tracing::info;
use tracing_subscriber::EnvFilter;

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

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    info!(model = %config.model.name, "starting taskcrew");

    let (orchestrator, store) = wire(&config)?;
    let orchestrator = Arc::new(orchestrator);

    let session_id = SessionId::new(
        cli.session
            .clone()
            .unwrap_or_else(|| format!("cli-{}", std::process::id())),
    );

    // Chat mode
    if cli.chat {
        let repl = ChatRepl::new(orchestrator, store, session_id);
        repl.run().await?;
        return Ok(());
    }

    // Single message mode
    let message = match cli.message {
        Some(m) => m,
        None => bail!("A message is required. Use --chat for interactive mode."),
    };

    let response = orchestrator.process(&session_id, &message).await;

    let output = if cli.json {
        ConsoleFormatter::format_json(&response)
    } else {
        ConsoleFormatter::format(&response)
    };
    println!("{}", output);

    Ok(())
}

/// Dependency injection: adapters in, orchestrator (plus the shared store,
/// which the REPL also reads) out.
fn wire(config: &FileConfig) -> Result<(Orchestrator, Arc<dyn TaskStorePort>)> {
    let timeout = Duration::from_secs(config.orchestrator.request_timeout_secs);

    let api_key = std::env::var(&config.model.api_key_env).unwrap_or_default();
    let gateway: Arc<dyn LlmGateway> = Arc::new(OpenAiGateway::new(
        &config.model.base_url,
        api_key,
        &config.model.name,
        timeout,
    )?);

    let store: Arc<dyn TaskStorePort> = Arc::new(InMemoryTaskStore::seeded());

    let messenger: Arc<dyn MessengerPort> = match config.messenger.credentials() {
        Some((sid, token, from)) => Arc::new(TwilioMessenger::new(sid, token, from)),
        None => Arc::new(ConsoleMessenger),
    };

    let logger: Arc<dyn ConversationLogger> = match &config.transcript.path {
        Some(path) => Arc::new(JsonlConversationLogger::open(path)?),
        None => Arc::new(NoConversationLogger),
    };

    let fallback_category = CategoryId(config.orchestrator.fallback_category_id);
    let agents: Vec<Arc<dyn SpecializedAgent>> = vec![
        Arc::new(TaskAgent::new(
            store.clone(),
            gateway.clone(),
            timeout,
            fallback_category,
        )),
        Arc::new(PlannerAgent::new(store.clone(), gateway.clone(), timeout)),
        Arc::new(CategoryAgent::new(store.clone(), gateway.clone(), timeout)),
        Arc::new(AnalyticsAgent::new(store.clone(), gateway.clone(), timeout)),
        Arc::new(FocusedAgent::marketing(
            store.clone(),
            gateway.clone(),
            timeout,
        )),
        Arc::new(FocusedAgent::project(
            store.clone(),
            gateway.clone(),
            timeout,
        )),
        Arc::new(MessagingAgent::new(
            store.clone(),
            messenger,
            gateway.clone(),
            timeout,
        )),
    ];

    let classifier = ClassifyIntentUseCase::new(
        gateway,
        config.orchestrator.keyword_accept,
        timeout,
    );
    let context_builder = Arc::new(BuildContextUseCase::new(store.clone()));

    let orchestrator = Orchestrator::new(agents, classifier, context_builder, logger)
        .with_thresholds(
            config.orchestrator.fallback_threshold,
            config.orchestrator.floor_threshold,
        );
    Ok((orchestrator, store))
}
