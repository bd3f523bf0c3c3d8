//! Text helpers for names and narration.

/// Uppercases the first character of `text`.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds a plural from a singular noun phrase.
///
/// Only the last word is inflected, so "gold key" becomes "gold keys".
#[must_use]
pub fn pluralize(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.ends_with("man") {
        return format!("{}en", &name[..name.len() - 2]);
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
        return format!("{name}es");
    }
    if lower.ends_with('y') && !lower.ends_with("ay") && !lower.ends_with("ey") && !lower.ends_with("oy") {
        return format!("{}ies", &name[..name.len() - 1]);
    }
    if lower.ends_with("lf") {
        return format!("{}ves", &name[..name.len() - 1]);
    }
    format!("{name}s")
}

/// Name data used when matching player input against a world object.
#[derive(Clone, Copy, Debug)]
pub struct Names<'a> {
    /// The canonical name.
    pub name: &'a str,
    /// Optional article shown before the name ("a", "the", "some").
    pub article: Option<&'a str>,
    /// Optional plural form.
    pub plural: Option<&'a str>,
    /// Alternate names.
    pub aliases: &'a [String],
}

impl Names<'_> {
    /// Returns the name with its article, if any.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.article {
            Some(article) if !article.is_empty() => format!("{article} {}", self.name),
            _ => self.name.to_string(),
        }
    }

    /// Case-insensitive match of `query` against these names.
    ///
    /// Matches the name, the display name, the plural, or an alias exactly,
    /// or a name that starts or ends with the query: "gold key" matches "go"
    /// and "key" but not "ke".
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        let mut names = vec![self.name.to_lowercase(), self.display_name().to_lowercase()];
        if let Some(plural) = self.plural {
            names.push(plural.to_lowercase());
        }
        if names.iter().any(|n| *n == query) {
            return true;
        }
        if self.aliases.iter().any(|a| a.to_lowercase() == query) {
            return true;
        }
        names
            .iter()
            .any(|n| n.starts_with(&query) || n.ends_with(&query))
    }
}

/// Joins items as "a", "a and b" or "a, b and c".
#[must_use]
pub fn join_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(name: &'a str, aliases: &'a [String]) -> Names<'a> {
        Names {
            name,
            article: None,
            plural: None,
            aliases,
        }
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize("the guard is here."), "The guard is here.");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éclair"), "Éclair");
    }

    #[test]
    fn plurals() {
        assert_eq!(pluralize("kobold"), "kobolds");
        assert_eq!(pluralize("torch"), "torches");
        assert_eq!(pluralize("fairy"), "fairies");
        assert_eq!(pluralize("guardsman"), "guardsmen");
        assert_eq!(pluralize("wolf"), "wolves");
        assert_eq!(pluralize("monkey"), "monkeys");
    }

    #[test]
    fn prefix_and_suffix_match() {
        let n = names("gold key", &[]);
        assert!(n.matches("gold key"));
        assert!(n.matches("go"));
        assert!(n.matches("key"));
        assert!(n.matches("KEY"));
        assert!(!n.matches("ke"));
        assert!(!n.matches(""));
    }

    #[test]
    fn alias_match_is_exact() {
        let aliases = vec!["freddy".to_string()];
        let n = names("alfred", &aliases);
        assert!(n.matches("freddy"));
        assert!(!n.matches("fre"));
    }

    #[test]
    fn display_name_uses_article() {
        let n = Names {
            name: "lamp",
            article: Some("a"),
            plural: None,
            aliases: &[],
        };
        assert_eq!(n.display_name(), "a lamp");
        assert!(n.matches("a lamp"));
    }

    #[test]
    fn join_lists() {
        let items: Vec<String> = ["a", "b", "c"].iter().map(ToString::to_string).collect();
        assert_eq!(join_and(&items), "a, b and c");
        assert_eq!(join_and(&items[..1]), "a");
    }
}
