//! Dispatch through a recording host

use delver_foundation::{Error, ErrorKind};
use delver_parser::{CommandError, CommandHost, CommandParser, Dispatch, FnCommand, Resolution};
use proptest::prelude::*;

#[derive(Default)]
struct Host {
    entries: Vec<String>,
    lines: Vec<String>,
    ticks: u32,
    turns_ended: u32,
    ran: Vec<String>,
}

impl CommandHost for Host {
    fn begin_entry(&mut self, label: &str) {
        self.entries.push(label.to_string());
    }

    fn narrate(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }

    fn end_turn(&mut self) {
        self.turns_ended += 1;
    }

    fn flush(&mut self) {}
}

fn parser() -> CommandParser<Host> {
    let mut parser = CommandParser::new();
    for (name, verbs) in [
        ("look", &["look", "examine"][..]),
        ("light", &["light"][..]),
        ("get", &["get"][..]),
        ("give", &["give"][..]),
    ] {
        parser
            .register(FnCommand::new(name, verbs, move |verb, arg, host: &mut Host| {
                host.ran.push(format!("{verb}:{arg}"));
                Ok(())
            }))
            .unwrap();
    }
    parser
        .register(FnCommand::new("jump", &["jump"], |_, _, _: &mut Host| {
            Err(CommandError::refused("You jump on the spot."))
        }))
        .unwrap();
    parser
        .register(FnCommand::new("break", &["break"], |_, _, _: &mut Host| {
            Err(Error::internal("the floor gave way").into())
        }))
        .unwrap();
    parser
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn prefixes_resolve_to_the_full_verb() {
    let parser = parser();
    let mut host = Host::default();
    let dispatch = parser.run("EXAM  the torch ", &mut host, true);
    assert_eq!(
        dispatch,
        Dispatch::Ran {
            command: "look".to_string(),
            verb: "examine".to_string()
        }
    );
    assert_eq!(host.ran, ["examine:the torch"]);
    assert_eq!(host.entries, ["examine the torch"]);
    assert_eq!(host.ticks, 1);
}

#[test]
fn ambiguous_prefixes_run_nothing() {
    let parser = parser();
    let mut host = Host::default();
    let dispatch = parser.run("l", &mut host, true);
    assert_eq!(
        dispatch,
        Dispatch::Ambiguous(vec!["look".to_string(), "light".to_string()])
    );
    assert_eq!(host.lines, ["Did you mean 'look' or 'light'?"]);
    assert!(host.ran.is_empty());
    assert_eq!(host.ticks, 0);
}

#[test]
fn resolving_twice_gives_the_same_answer() {
    let parser = parser();
    let host = Host::default();
    for typed in ["g", "gi", "look", "zzz"] {
        assert_eq!(parser.resolve(typed, &host), parser.resolve(typed, &host));
    }
    assert_eq!(parser.resolve("gi", &host), Resolution::Verb("give".to_string()));
    assert_eq!(parser.resolve("zzz", &host), Resolution::Unknown);
}

#[test]
fn unknown_verbs_are_reported() {
    let parser = parser();
    let mut host = Host::default();
    let dispatch = parser.run("dance wildly", &mut host, true);
    assert_eq!(dispatch, Dispatch::Unknown("dance".to_string()));
    assert_eq!(host.lines, ["I don't know the command 'dance'!"]);
}

#[test]
fn blank_lines_do_nothing() {
    let parser = parser();
    let mut host = Host::default();
    assert_eq!(parser.run("   ", &mut host, true), Dispatch::Empty);
    assert!(host.entries.is_empty());
}

// =============================================================================
// Outcomes
// =============================================================================

#[test]
fn refusals_end_the_turn_without_ticking() {
    let parser = parser();
    let mut host = Host::default();
    let dispatch = parser.run("jump", &mut host, true);
    assert!(matches!(dispatch, Dispatch::Refused { ref message, .. } if message == "You jump on the spot."));
    assert_eq!(host.lines, ["You jump on the spot."]);
    assert_eq!((host.ticks, host.turns_ended), (0, 1));
}

#[test]
fn faults_are_narrated_as_errors() {
    let parser = parser();
    let mut host = Host::default();
    let dispatch = parser.run("break", &mut host, true);
    assert!(matches!(dispatch, Dispatch::Faulted { .. }));
    assert_eq!(host.lines, ["Error: internal error: the floor gave way"]);
}

#[test]
fn nested_runs_do_not_tick() {
    let parser = parser();
    let mut host = Host::default();
    parser.run("get torch", &mut host, false);
    assert_eq!(host.ticks, 0);
    assert!(host.entries.is_empty());
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn later_commands_take_over_verbs() {
    let mut parser = parser();
    parser
        .register(FnCommand::new("fetch", &["get"], |_, _, host: &mut Host| {
            host.ran.push("fetched".to_string());
            Ok(())
        }))
        .unwrap();
    let mut host = Host::default();
    parser.run("get torch", &mut host, true);
    assert_eq!(host.ran, ["fetched"]);
    assert_eq!(parser.verbs().filter(|v| *v == "get").count(), 1);
}

#[test]
fn malformed_verbs_are_rejected() {
    let mut parser = parser();
    let err = parser
        .register(FnCommand::new("bad", &["pick up"], |_, _, _: &mut Host| Ok(())))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CommandRegistration(_)));
    assert!(
        parser
            .register(FnCommand::new("none", &[], |_, _, _: &mut Host| Ok(())))
            .is_err()
    );
}

proptest! {
    #[test]
    fn every_verb_resolves_to_itself(index in 0usize..5) {
        let parser = parser();
        let host = Host::default();
        let verbs: Vec<String> = parser.verbs().map(str::to_string).collect();
        let verb = &verbs[index % verbs.len()];
        prop_assert_eq!(parser.resolve(verb, &host), Resolution::Verb(verb.clone()));
    }

    #[test]
    fn unknown_words_never_run(word in "[q-z]{3,8}") {
        let parser = parser();
        let mut host = Host::default();
        let dispatch = parser.run(&word, &mut host, true);
        prop_assert!(matches!(dispatch, Dispatch::Unknown(_)));
        prop_assert!(host.ran.is_empty());
    }
}
