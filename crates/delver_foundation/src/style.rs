//! Narrative output styles.

use std::fmt;

/// Presentation hint attached to each line of narrative output.
///
/// The engine never renders; front ends map these to colors or markup.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Style {
    /// Ordinary narration.
    #[default]
    Normal,
    /// Scripted effect text and other highlighted narration.
    Special,
    /// Good news for the player.
    Success,
    /// Something is going wrong.
    Warning,
    /// Something has gone badly wrong.
    Danger,
}

impl Style {
    /// All styles, in increasing order of urgency.
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::Special,
        Self::Success,
        Self::Warning,
        Self::Danger,
    ];

    /// Returns the lowercase name of the style.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Special => "special",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
