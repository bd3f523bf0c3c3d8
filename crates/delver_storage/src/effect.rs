//! Numbered narrative effects.

use std::collections::BTreeMap;

use delver_foundation::{EffectId, Style};
use serde::{Deserialize, Serialize};

/// A pre-authored block of narration, optionally chained to more effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Effect {
    /// Unique id.
    pub id: EffectId,

    /// The narration.
    pub text: String,

    /// Style to print in; defaults to normal.
    #[serde(default)]
    pub style: Option<Style>,

    /// Effect printed on its own line afterwards.
    #[serde(default)]
    pub next: Option<EffectId>,

    /// Effect appended to the same line afterwards.
    #[serde(default)]
    pub next_inline: Option<EffectId>,

    /// Token substitutions applied when printing.
    #[serde(default)]
    pub replacements: BTreeMap<String, String>,

    /// Text contains markup.
    #[serde(default)]
    pub is_markdown: bool,

    /// Has been printed at least once.
    #[serde(default)]
    pub seen: bool,
}

impl Effect {
    /// Creates an unstyled effect.
    #[must_use]
    pub fn new(id: EffectId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            style: None,
            next: None,
            next_inline: None,
            replacements: BTreeMap::new(),
            is_markdown: false,
            seen: false,
        }
    }

    /// The text with every replacement token substituted.
    #[must_use]
    pub fn rendered_text(&self) -> String {
        self.replacements
            .iter()
            .fold(self.text.clone(), |text, (token, value)| {
                text.replace(token.as_str(), value)
            })
    }
}
