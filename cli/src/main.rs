//! CLI entrypoint for nutri-chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use nutri_application::{
    ChatSession, ExchangeClient, InMemoryKeyValueStore, KeyValueStore, NoExchangeProgress,
    SessionStore, SubmitOutcome,
};
use nutri_infrastructure::{
    ConfigLoader, FileConfig, FileKeyValueStore, GeminiGateway, JsonlConversationLogger,
};
use nutri_presentation::{ChatRepl, Cli, ConsoleFormatter, ProgressReporter, ReplConfig};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_sources() {
            println!("{}", line);
        }
        return Ok(());
    }

    // --no-config skips discovered files; an explicit --config still applies
    let mut config = match (cli.no_config, &cli.config) {
        (true, None) => ConfigLoader::load_defaults(),
        (true, Some(path)) => ConfigLoader::load_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?,
        (false, path) => ConfigLoader::load(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?,
    };
    if let Some(model) = &cli.model {
        config.gemini.model = model.clone();
    }
    config.validate().context("Invalid configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting nutri-chat");

    // === Dependency Injection ===
    let mut session = build_session(&config, cli.ephemeral)?;

    if let Some(key) = &cli.api_key {
        let credential = session.configure(key)?;
        info!("API key set from command line ({})", credential);
    }

    match cli.question {
        Some(question) => {
            run_single_shot(&mut session, &question, cli.quiet, cli.export.as_deref()).await
        }
        None => {
            let repl_config = ReplConfig {
                show_progress: config.repl.show_progress && !cli.quiet,
                history_file: config.repl.history_file.clone(),
            };
            let mut repl = ChatRepl::new(session).with_config(repl_config);
            repl.run().await?;
            export_transcript(repl.session(), cli.export.as_deref())
        }
    }
}

/// Initialize logging based on verbosity level, to stderr or a file.
fn init_logging(verbose: u8, file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(file) = file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let path = Path::new(file);
    let file_name = path
        .file_name()
        .with_context(|| format!("logging.file must name a file, got '{}'", file))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn build_session(config: &FileConfig, ephemeral: bool) -> Result<ChatSession> {
    let gateway = Arc::new(GeminiGateway::new(config.gemini_config())?);

    let mut client = ExchangeClient::new(gateway, config.generation.clone());
    if let Some(path) = &config.logging.conversation_log
        && let Some(logger) = JsonlConversationLogger::open(path)
    {
        info!("Conversation log: {}", logger.path().display());
        client = client.with_conversation_logger(Arc::new(logger));
    }

    let store: Arc<dyn KeyValueStore> = if ephemeral {
        Arc::new(InMemoryKeyValueStore::new())
    } else {
        let path = config
            .store_path()
            .context("Could not determine a data directory; set [store] path in the config")?;
        let file_store = FileKeyValueStore::new(path);
        info!("Credential store: {}", file_store.path().display());
        Arc::new(file_store)
    };

    ChatSession::start(SessionStore::new(store), client).context("Failed to read the credential store")
}

/// Ask one question, then export whatever the transcript holds, even when
/// the exchange failed. The exchange error wins over an export error.
async fn run_single_shot(
    session: &mut ChatSession,
    question: &str,
    quiet: bool,
    export: Option<&Path>,
) -> Result<()> {
    let asked = ask_once(session, question, quiet).await;
    let exported = export_transcript(session, export);
    asked.and(exported)
}

fn export_transcript(session: &ChatSession, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    std::fs::write(path, ConsoleFormatter::format_json(session.transcript()))
        .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
    info!("Transcript written to {}", path.display());
    Ok(())
}

/// Single-question mode: print the reply to stdout, fail on any error.
async fn ask_once(session: &mut ChatSession, question: &str, quiet: bool) -> Result<()> {
    if !session.state().is_ready() {
        bail!("No API key configured. Run `nutri-chat` to set one up, or pass --api-key.");
    }

    let outcome = if quiet {
        session.submit_with_progress(question, &NoExchangeProgress).await?
    } else {
        session
            .submit_with_progress(question, &ProgressReporter::new())
            .await?
    };

    match outcome {
        SubmitOutcome::Reply(turn) => println!("{}", turn.text()),
        SubmitOutcome::Failed(error) => bail!("{}", error.user_message()),
        SubmitOutcome::Skipped => bail!("Question cannot be empty"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nutri_application::{
        CREDENTIAL_KEY, GatewayError, GenerationGateway, GenerationRequest,
    };
    use nutri_domain::{Credential, GenerationConfig};

    struct StatusGateway(Option<u16>);

    #[async_trait]
    impl GenerationGateway for StatusGateway {
        fn model(&self) -> &str {
            "test-model"
        }

        async fn generate(
            &self,
            _credential: &Credential,
            _request: &GenerationRequest,
        ) -> Result<String, GatewayError> {
            match self.0 {
                Some(status) => Err(GatewayError::Status {
                    status,
                    body: String::new(),
                }),
                None => Ok("Eat more vegetables.".to_string()),
            }
        }
    }

    fn session(gateway: StatusGateway) -> ChatSession {
        let store = InMemoryKeyValueStore::with_entry(CREDENTIAL_KEY, "AIzaSyTestKey1");
        let client = ExchangeClient::new(Arc::new(gateway), GenerationConfig::default());
        ChatSession::start(SessionStore::new(Arc::new(store)), client).unwrap()
    }

    fn exported_turns(path: &Path) -> usize {
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        value.as_array().unwrap().len()
    }

    #[tokio::test]
    async fn test_single_shot_exports_reply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        let mut session = session(StatusGateway(None));

        run_single_shot(&mut session, "What should I eat?", true, Some(&path))
            .await
            .unwrap();
        assert_eq!(exported_turns(&path), 2);
    }

    #[tokio::test]
    async fn test_failed_single_shot_still_exports_user_turn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        let mut session = session(StatusGateway(Some(429)));

        let err = run_single_shot(&mut session, "What should I eat?", true, Some(&path))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Rate limit exceeded"));
        assert_eq!(exported_turns(&path), 1);
    }
}
