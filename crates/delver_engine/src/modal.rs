//! Modal questions.
//!
//! A modal suspends the game until the player answers. Each question keeps
//! its callback as a pending continuation; [`crate::Game::answer`] feeds the
//! player's line to it. A callback returning `false` ends the whole modal
//! early, so "Cancel" skips any follow-up questions.

use std::fmt;

use crate::game::Game;

/// What runs with the player's answer. Returns false to close the modal early.
pub type Callback = Box<dyn FnOnce(&mut Game, &str) -> bool>;

/// How a question is answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free text.
    Text,
    /// One of a fixed set of choices.
    MultipleChoice(Vec<String>),
}

/// One question of a modal.
pub struct Question {
    /// Shown to the player.
    pub prompt: String,

    /// Text or choices.
    pub kind: QuestionKind,

    /// The answer given, or a suggested default before that.
    pub answer: String,

    callback: Option<Callback>,
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("prompt", &self.prompt)
            .field("kind", &self.kind)
            .field("answer", &self.answer)
            .finish_non_exhaustive()
    }
}

impl Question {
    /// A free-text question.
    #[must_use]
    pub fn text(prompt: impl Into<String>, callback: impl FnOnce(&mut Game, &str) -> bool + 'static) -> Self {
        Self {
            prompt: prompt.into(),
            kind: QuestionKind::Text,
            answer: String::new(),
            callback: Some(Box::new(callback)),
        }
    }

    /// A multiple-choice question.
    #[must_use]
    pub fn choice(
        prompt: impl Into<String>,
        choices: Vec<String>,
        callback: impl FnOnce(&mut Game, &str) -> bool + 'static,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            kind: QuestionKind::MultipleChoice(choices),
            answer: String::new(),
            callback: Some(Box::new(callback)),
        }
    }

    /// The choices, empty for text questions.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        match &self.kind {
            QuestionKind::Text => &[],
            QuestionKind::MultipleChoice(choices) => choices,
        }
    }

    /// Maps typed input onto a choice.
    ///
    /// Accepts the choice itself, the label before a colon ("3" for
    /// "3: before the maze"), or an unambiguous prefix ("y" for "Yes"),
    /// all ignoring case. Text questions accept anything.
    #[must_use]
    pub fn interpret(&self, input: &str) -> Option<String> {
        let input = input.trim();
        let QuestionKind::MultipleChoice(choices) = &self.kind else {
            return Some(input.to_string());
        };
        let lower = input.to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if let Some(exact) = choices.iter().find(|c| c.to_lowercase() == lower) {
            return Some(exact.clone());
        }
        if let Some(labelled) = choices
            .iter()
            .find(|c| c.split_once(':').is_some_and(|(label, _)| label.trim().to_lowercase() == lower))
        {
            return Some(labelled.clone());
        }
        let mut prefixed = choices.iter().filter(|c| c.to_lowercase().starts_with(&lower));
        match (prefixed.next(), prefixed.next()) {
            (Some(only), None) => Some(only.clone()),
            _ => None,
        }
    }

    pub(crate) fn take_callback(&mut self) -> Option<Callback> {
        self.callback.take()
    }
}

/// The open questions, asked in order.
#[derive(Debug, Default)]
pub struct Modal {
    questions: Vec<Question>,
    current: usize,

    /// Bumped on every open, so a callback that asks again can be told apart.
    generation: u64,
}

impl Modal {
    /// Creates a closed modal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a question waits for an answer.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current < self.questions.len()
    }

    /// The question waiting for an answer.
    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// A question of the open modal by position, answered or not.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// A question of the open modal by position, to preset its answer.
    pub fn question_mut(&mut self, index: usize) -> Option<&mut Question> {
        self.questions.get_mut(index)
    }

    pub(crate) fn open(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.current = 0;
        self.generation += 1;
    }

    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut Question> {
        self.questions.get_mut(self.current)
    }

    pub(crate) fn advance(&mut self) {
        self.current += 1;
    }

    pub(crate) fn close(&mut self) {
        self.questions.clear();
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> Question {
        Question::choice(
            "Please choose a saved game slot:",
            vec!["1: unused".into(), "10: before the maze".into(), "Cancel".into()],
            |_, _| true,
        )
    }

    #[test]
    fn choices_match_by_label_text_or_prefix() {
        let question = slots();
        assert_eq!(question.interpret("1").as_deref(), Some("1: unused"));
        assert_eq!(question.interpret("10").as_deref(), Some("10: before the maze"));
        assert_eq!(question.interpret("CANCEL").as_deref(), Some("Cancel"));
        assert_eq!(question.interpret("ca").as_deref(), Some("Cancel"));
        assert_eq!(question.interpret("7"), None);
        assert_eq!(question.interpret(""), None);
    }

    #[test]
    fn yes_no_prefixes() {
        let question = Question::choice("Leave?", vec!["Yes".into(), "No".into()], |_, _| true);
        assert_eq!(question.interpret("y").as_deref(), Some("Yes"));
        assert_eq!(question.interpret("n").as_deref(), Some("No"));
    }

    #[test]
    fn text_takes_anything() {
        let question = Question::text("Say what?", |_, _| true);
        assert_eq!(question.interpret("  hello there ").as_deref(), Some("hello there"));
        assert!(question.choices().is_empty());
    }

    #[test]
    fn modal_walks_questions() {
        let mut modal = Modal::new();
        assert!(!modal.is_open());
        modal.open(vec![slots(), Question::text("Describe it:", |_, _| true)]);
        assert!(modal.is_open());
        assert_eq!(modal.current().map(|q| q.prompt.as_str()), Some("Please choose a saved game slot:"));
        modal.advance();
        assert_eq!(modal.current().map(|q| q.prompt.as_str()), Some("Describe it:"));
        modal.advance();
        assert!(!modal.is_open());
    }

    #[test]
    fn reopening_bumps_the_generation() {
        let mut modal = Modal::new();
        modal.open(vec![slots()]);
        let first = modal.generation();
        modal.close();
        modal.open(vec![slots()]);
        assert!(modal.generation() > first);
    }
}
