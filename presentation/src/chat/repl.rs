//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::ReplCommand;
use crate::ConsoleFormatter;
use crate::ProgressReporter;
use crate::config::ReplConfig;
use colored::Colorize;
use nutri_application::{ChatSession, NoExchangeProgress, SubmitOutcome};
use nutri_domain::PromptTemplate;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

const HISTORY_CAPACITY: usize = 500;

/// What the loop should do after a command
#[derive(Debug, PartialEq, Eq)]
enum CommandResult {
    Continue,
    Exit,
}

/// Interactive chat REPL
///
/// While a message is pending the prompt is not shown, so only one request
/// can be in flight.
pub struct ChatRepl {
    session: ChatSession,
    config: ReplConfig,
}

impl ChatRepl {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Run the interactive REPL until `/quit` or Ctrl-D
    pub async fn run(&mut self) -> io::Result<()> {
        self.print_welcome();

        if !self.session.state().is_ready() && !self.configure_interactively()? {
            println!("Bye!");
            return Ok(());
        }

        let mut editor = self.chat_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("nutri".to_string()),
            DefaultPromptSegment::Empty,
        );

        if self.session.transcript().is_empty() {
            println!("{}", ConsoleFormatter::format_suggestions());
            println!();
        }

        loop {
            match editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ReplCommand::parse(line) {
                        if self.handle_command(command).await == CommandResult::Exit {
                            break;
                        }
                        continue;
                    }

                    println!();
                    println!("{}", self.respond(line).await);
                    println!();
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(Signal::CtrlD) => {
                    println!("Bye!");
                    break;
                }
                #[allow(unreachable_patterns)]
                Ok(_) => continue,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Editor for chat messages, with persistent history when available.
    fn chat_editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = self.config.history_path() else {
            return editor;
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("History disabled ({}): {}", path.display(), e);
                editor
            }
        }
    }

    /// Ask for an API key until a valid one is saved.
    ///
    /// Uses a separate editor without history so the key is never written
    /// to the history file. Returns `false` if the user gave up (Ctrl-D).
    fn configure_interactively(&mut self) -> io::Result<bool> {
        println!("{}", "Setup".bold());
        println!("Enter your Gemini API key. It is stored locally and reused next time.");
        println!("Get one at https://aistudio.google.com/app/apikey");
        println!();

        let mut editor = Reedline::create();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("API key".to_string()),
            DefaultPromptSegment::Empty,
        );

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(input) => match self.session.configure(&input) {
                    Ok(credential) => {
                        println!("{} API key saved ({})", "✓".green(), credential);
                        println!();
                        return Ok(true);
                    }
                    Err(e) if e.is_validation() => println!("{}", e.to_string().yellow()),
                    Err(e) => println!("{} {}", "Could not save API key:".red(), e),
                },
                Signal::CtrlC => continue,
                Signal::CtrlD => return Ok(false),
                #[allow(unreachable_patterns)]
                _ => continue,
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "╭─────────────────────────────────────────────╮".cyan());
        println!("{}", "│     🥗 Nutrition Assistant - Chat Mode      │".cyan());
        println!("{}", "╰─────────────────────────────────────────────╯".cyan());
        println!();
        println!(
            "Ask me anything about nutrition, diet, and healthy eating. Type /help for commands."
        );
        println!();
    }

    /// Handle slash commands.
    async fn handle_command(&mut self, command: ReplCommand) -> CommandResult {
        debug!("REPL command: {:?}", command);
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                CommandResult::Exit
            }
            ReplCommand::Help => {
                println!();
                println!("{}", ConsoleFormatter::format_help());
                println!();
                CommandResult::Continue
            }
            ReplCommand::History => {
                println!();
                println!(
                    "{}",
                    ConsoleFormatter::format_transcript(self.session.transcript())
                );
                println!();
                CommandResult::Continue
            }
            ReplCommand::Suggest => {
                println!();
                println!("{}", ConsoleFormatter::format_suggestions());
                println!();
                CommandResult::Continue
            }
            ReplCommand::Ask(index) => {
                match PromptTemplate::suggestion(index) {
                    Some(question) => {
                        println!();
                        println!(
                            "{}",
                            ConsoleFormatter::format_turn(&nutri_domain::Turn::user(question))
                        );
                        println!();
                        println!("{}", self.respond(question).await);
                        println!();
                    }
                    None => println!("No suggestion #{}. Type /suggest to list them.", index),
                }
                CommandResult::Continue
            }
            ReplCommand::Export(path) => {
                match self.export(&path) {
                    Ok(()) => println!(
                        "Saved {} messages to {}",
                        self.session.transcript().len(),
                        path.display()
                    ),
                    Err(e) => eprintln!("Error: could not write {}: {}", path.display(), e),
                }
                CommandResult::Continue
            }
            ReplCommand::Status => {
                println!();
                println!("{}", self.status_text());
                println!();
                CommandResult::Continue
            }
            ReplCommand::Usage(usage) => {
                println!("Usage: {}", usage);
                CommandResult::Continue
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                CommandResult::Continue
            }
        }
    }

    /// Send one message and return the text to print.
    async fn respond(&mut self, message: &str) -> String {
        let result = if self.config.show_progress {
            let progress = ProgressReporter::new();
            self.session.submit_with_progress(message, &progress).await
        } else {
            self.session
                .submit_with_progress(message, &NoExchangeProgress)
                .await
        };

        match result {
            Ok(SubmitOutcome::Reply(turn)) => ConsoleFormatter::format_turn(&turn),
            Ok(SubmitOutcome::Failed(error)) => ConsoleFormatter::format_error(error.user_message()),
            Ok(SubmitOutcome::Skipped) => String::new(),
            Err(e) => ConsoleFormatter::format_error(&e.to_string()),
        }
    }

    fn status_text(&self) -> String {
        let key = self
            .session
            .credential()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "not set".to_string());
        let config = self.session.client().config();
        format!(
            "State:       {}\nAPI key:     {}\nMessages:    {}\nTemperature: {}  top-k: {}  top-p: {}  max tokens: {}",
            self.session.state(),
            key,
            self.session.transcript().len(),
            config.temperature,
            config.top_k,
            config.top_p,
            config.max_output_tokens
        )
    }

    fn export(&self, path: &Path) -> io::Result<()> {
        std::fs::write(
            path,
            ConsoleFormatter::format_json(self.session.transcript()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nutri_application::{
        CREDENTIAL_KEY, ExchangeClient, GatewayError, GenerationGateway, GenerationRequest,
        InMemoryKeyValueStore, SessionStore,
    };
    use nutri_domain::{Credential, GenerationConfig};
    use std::sync::Arc;

    struct EchoGateway;

    #[async_trait]
    impl GenerationGateway for EchoGateway {
        fn model(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            _credential: &Credential,
            request: &GenerationRequest,
        ) -> Result<String, GatewayError> {
            if request.prompt.contains("fail") {
                Err(GatewayError::Status {
                    status: 429,
                    body: String::new(),
                })
            } else {
                Ok("Eat more vegetables.".to_string())
            }
        }
    }

    fn repl(with_key: bool) -> ChatRepl {
        let store = if with_key {
            InMemoryKeyValueStore::with_entry(CREDENTIAL_KEY, "AIzaSyTestKey1")
        } else {
            InMemoryKeyValueStore::new()
        };
        let client = ExchangeClient::new(Arc::new(EchoGateway), GenerationConfig::default());
        let session = ChatSession::start(SessionStore::new(Arc::new(store)), client).unwrap();
        ChatRepl::new(session).with_config(ReplConfig {
            show_progress: false,
            history_file: None,
        })
    }

    #[tokio::test]
    async fn test_respond_prints_reply_and_records_turns() {
        let mut repl = repl(true);
        let out = repl.respond("What should I eat?").await;
        assert!(out.contains("Eat more vegetables."));
        assert_eq!(repl.session().transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_respond_maps_failure_to_user_message() {
        let mut repl = repl(true);
        let out = repl.respond("please fail").await;
        assert!(out.contains("Rate limit exceeded"));
        assert_eq!(repl.session().transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_respond_without_key_reports_not_configured() {
        let mut repl = repl(false);
        let out = repl.respond("hello").await;
        assert!(out.contains("No API key configured"));
        assert!(repl.session().transcript().is_empty());
    }

    #[tokio::test]
    async fn test_ask_command_sends_suggestion() {
        let mut repl = repl(true);
        let result = repl.handle_command(ReplCommand::Ask(1)).await;
        assert_eq!(result, CommandResult::Continue);
        assert_eq!(
            repl.session().transcript().turns()[0].text(),
            nutri_domain::SUGGESTED_QUESTIONS[0]
        );
    }

    #[tokio::test]
    async fn test_quit_command_exits() {
        let mut repl = repl(true);
        assert_eq!(repl.handle_command(ReplCommand::Quit).await, CommandResult::Exit);
    }

    #[tokio::test]
    async fn test_export_writes_json() {
        let mut repl = repl(true);
        repl.respond("What should I eat?").await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        repl.handle_command(ReplCommand::Export(path.clone())).await;

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_status_masks_key() {
        let repl = repl(true);
        let status = repl.status_text();
        assert!(status.contains("ready"));
        assert!(!status.contains("AIzaSyTestKey1"));
    }
}
