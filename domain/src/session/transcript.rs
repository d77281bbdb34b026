//! Transcript entity

use super::entities::Turn;
use serde::Serialize;

/// Ordered, append-only history of turns for the current session.
///
/// There is no removal or update: the transcript only grows for the
/// lifetime of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::Role;

    #[test]
    fn test_push_preserves_order() {
        let mut t = Transcript::new();
        t.push(Turn::user("What should I eat?"));
        t.push(Turn::assistant("Eat more vegetables."));
        t.push(Turn::user("And for breakfast?"));

        let roles: Vec<Role> = t.iter().map(|turn| turn.role()).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(t.last().unwrap().text(), "And for breakfast?");
    }

    #[test]
    fn test_empty() {
        let t = Transcript::new();
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
        assert!(t.last().is_none());
    }

    #[test]
    fn test_serializes_as_array() {
        let mut t = Transcript::new();
        t.push(Turn::user("hi"));
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["role"], "user");
    }
}
