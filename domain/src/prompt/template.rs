//! Instructional preamble and message wrapping

/// Preamble that frames every reply as nutrition and diet advice.
pub const DEFAULT_SYSTEM_PREAMBLE: &str = "You are a professional nutritionist and dietician assistant. \
Please provide helpful, accurate, and practical advice about nutrition, diet, and healthy eating.";

/// Starter questions offered before the first message.
pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "What should I eat for a balanced breakfast?",
    "How much protein do I need per day?",
    "What are some healthy snacks for weight loss?",
    "How can I get enough iron on a vegetarian diet?",
    "Is intermittent fasting good for me?",
];

/// Builds the prompt text sent for a user message
pub struct PromptTemplate;

impl PromptTemplate {
    /// Wrap a user message in the instructional preamble.
    pub fn wrap(preamble: &str, message: &str) -> String {
        let preamble = preamble.trim();
        if preamble.is_empty() {
            return message.to_string();
        }
        format!("{} Here's the user's question: {}", preamble, message)
    }

    /// Look up a suggested question by its 1-based index.
    pub fn suggestion(index: usize) -> Option<&'static str> {
        index
            .checked_sub(1)
            .and_then(|i| SUGGESTED_QUESTIONS.get(i))
            .copied()
    }
}
