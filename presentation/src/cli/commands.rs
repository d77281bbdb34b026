//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for nutri-chat
#[derive(Parser, Debug)]
#[command(name = "nutri-chat")]
#[command(author, version, about = "Chat with a nutrition and diet assistant powered by Gemini")]
#[command(long_about = r#"
nutri-chat forwards your questions to the Gemini API, framed as questions
to a professional nutritionist, and prints the answers.

Without a question it starts an interactive chat. On first use you are asked
for a Gemini API key, which is saved locally and reused afterwards.

Configuration files are loaded from (in priority order):
1. --config <path>                          Explicit config file
2. NUTRI_CHAT_<SECTION>__<KEY>              Environment variables
3. ./nutri-chat.toml                        Project-level config
4. ~/.config/nutri-chat/config.toml         Global config

Example:
  nutri-chat
  nutri-chat "How much protein do I need per day?"
  nutri-chat --api-key AIza... "Is oatmeal a good breakfast?"
"#)]
pub struct Cli {
    /// Ask a single question and exit (starts interactive chat when omitted)
    pub question: Option<String>,

    /// Save this API key before doing anything else
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Gemini model to use (overrides configuration)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Keep the API key in memory only; nothing is written to disk
    #[arg(long)]
    pub ephemeral: bool,

    /// Write the transcript as JSON to this file when the session ends
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the progress spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_interactive_by_default() {
        let cli = Cli::parse_from(["nutri-chat"]);
        assert!(cli.question.is_none());
        assert!(cli.api_key.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.ephemeral);
    }

    #[test]
    fn test_single_question_with_flags() {
        let cli = Cli::parse_from([
            "nutri-chat",
            "-vv",
            "--api-key",
            "AIza-test",
            "--model",
            "gemini-2.0-flash",
            "--export",
            "out.json",
            "What should I eat?",
        ]);
        assert_eq!(cli.question.as_deref(), Some("What should I eat?"));
        assert_eq!(cli.api_key.as_deref(), Some("AIza-test"));
        assert_eq!(cli.model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(cli.export, Some(PathBuf::from("out.json")));
        assert_eq!(cli.verbose, 2);
    }
}
