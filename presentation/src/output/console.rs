//! Console output formatter

use colored::Colorize;
use nutri_domain::{Role, SUGGESTED_QUESTIONS, Transcript, Turn};

/// Formats turns, errors and transcripts for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Avatar shown in front of a message.
    pub fn avatar(role: Role) -> &'static str {
        match role {
            Role::User => "U",
            Role::Assistant => "🥗",
        }
    }

    /// One turn, prefixed with its avatar.
    pub fn format_turn(turn: &Turn) -> String {
        let avatar = Self::avatar(turn.role());
        match turn.role() {
            Role::User => format!("{} {}", avatar.bold().blue(), turn.text()),
            Role::Assistant => format!("{} {}", avatar, turn.text()),
        }
    }

    /// A failed exchange, shown as an assistant message.
    pub fn format_error(message: &str) -> String {
        format!("{} {}", Self::avatar(Role::Assistant), message.red())
    }

    /// The whole conversation, one turn per paragraph.
    pub fn format_transcript(transcript: &Transcript) -> String {
        if transcript.is_empty() {
            return "No messages yet.".dimmed().to_string();
        }
        transcript
            .iter()
            .map(Self::format_turn)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Transcript as pretty JSON, for `--export` and `/export`.
    pub fn format_json(transcript: &Transcript) -> String {
        serde_json::to_string_pretty(transcript).unwrap_or_else(|_| "[]".to_string())
    }

    /// Numbered list of starter questions.
    pub fn format_suggestions() -> String {
        let mut out = String::from("Try asking:\n");
        for (i, question) in SUGGESTED_QUESTIONS.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, question));
        }
        out.push_str("Use /ask <number> to send one.");
        out
    }

    pub fn format_help() -> String {
        [
            "Commands:",
            "  /help, /h, /?      - Show this help",
            "  /history           - Show the conversation so far",
            "  /suggest           - List starter questions",
            "  /ask <number>      - Send a starter question",
            "  /export <path>     - Save the conversation as JSON",
            "  /status            - Show model and API key status",
            "  /quit, /exit, /q   - Exit chat",
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_turn_uses_avatars() {
        let user = ConsoleFormatter::format_turn(&Turn::user("What should I eat?"));
        assert!(user.contains('U'));
        assert!(user.contains("What should I eat?"));

        let assistant = ConsoleFormatter::format_turn(&Turn::assistant("Eat more vegetables."));
        assert!(assistant.starts_with("🥗"));
        assert!(assistant.contains("Eat more vegetables."));
    }

    #[test]
    fn test_format_error_keeps_message() {
        let out = ConsoleFormatter::format_error("Rate limit exceeded.");
        assert!(out.contains("Rate limit exceeded."));
    }

    #[test]
    fn test_format_transcript() {
        let mut transcript = Transcript::new();
        assert!(ConsoleFormatter::format_transcript(&transcript).contains("No messages"));

        transcript.push(Turn::user("Hi"));
        transcript.push(Turn::assistant("Hello"));
        let out = ConsoleFormatter::format_transcript(&transcript);
        assert!(out.contains("Hi"));
        assert!(out.contains("Hello"));
    }

    #[test]
    fn test_format_json_roundtrips_roles() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::user("Hi"));
        transcript.push(Turn::assistant("Hello"));

        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&transcript)).unwrap();
        assert_eq!(value[0]["role"], "user");
        assert_eq!(value[1]["role"], "model");
        assert_eq!(value[1]["text"], "Hello");
    }

    #[test]
    fn test_suggestions_are_numbered() {
        let out = ConsoleFormatter::format_suggestions();
        assert!(out.contains("  1. "));
        assert!(out.contains(SUGGESTED_QUESTIONS[0]));
    }
}
