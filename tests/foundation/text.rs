//! Integration tests for name matching and narration helpers

use delver_foundation::text::{Names, capitalize, join_and, pluralize};

fn names<'a>(name: &'a str, article: Option<&'a str>, aliases: &'a [String]) -> Names<'a> {
    Names {
        name,
        article,
        plural: None,
        aliases,
    }
}

#[test]
fn capitals_and_plurals() {
    assert_eq!(capitalize("the guard"), "The guard");
    assert_eq!(capitalize(""), "");
    assert_eq!(pluralize("rat"), "rats");
    assert_eq!(pluralize("torch"), "torches");
    assert_eq!(pluralize("guardsman"), "guardsmen");
    assert_eq!(pluralize("fly"), "flies");
    assert_eq!(pluralize("wolf"), "wolves");
}

#[test]
fn names_match_by_prefix_suffix_and_alias() {
    let aliases = vec!["potion".to_string()];
    let potion = names("healing potion", Some("a"), &aliases);
    assert!(potion.matches("Healing Potion"));
    assert!(potion.matches("a healing potion"));
    assert!(potion.matches("heal"));
    assert!(potion.matches("potion"));
    assert!(!potion.matches("otio"));
    assert!(!potion.matches("  "));
    assert_eq!(potion.display_name(), "a healing potion");
}

#[test]
fn lists_read_naturally() {
    let items: Vec<String> = ["torch", "spear", "chest"].map(String::from).to_vec();
    assert_eq!(join_and(&items[..1]), "torch");
    assert_eq!(join_and(&items[..2]), "torch and spear");
    assert_eq!(join_and(&items), "torch, spear and chest");
    assert_eq!(join_and(&[]), "");
}
