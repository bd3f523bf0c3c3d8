//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use delver_foundation::{ArtifactId, Error, ErrorContext, ErrorKind, RoomId};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn duplicate_ids_name_the_entity() {
    let err = Error::duplicate_id("room", RoomId(4));
    assert!(matches!(err.kind, ErrorKind::DuplicateId { entity: "room", .. }));
    assert_eq!(err.to_string(), "duplicate room id: 4");
}

#[test]
fn missing_references() {
    let err = Error::missing_reference("artifact", ArtifactId(17));
    assert!(matches!(err.kind, ErrorKind::MissingReference { .. }));
    assert_eq!(err.to_string(), "artifact not found: 17");
}

#[test]
fn slot_errors() {
    assert_eq!(
        Error::new(ErrorKind::InvalidSlot(11)).to_string(),
        "invalid save slot: 11"
    );
    assert_eq!(
        Error::new(ErrorKind::EmptySlot(3)).to_string(),
        "no saved game in slot 3"
    );
}

#[test]
fn invalid_data_and_internal() {
    assert!(Error::invalid_data("bad exit").to_string().contains("bad exit"));
    assert!(matches!(Error::internal("oops").kind, ErrorKind::Internal(_)));
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_is_carried() {
    let err = Error::invalid_data("no rooms").with_context(
        ErrorContext::new()
            .with_source("castle.json")
            .with_frame("loading rooms"),
    );
    let context = err.context.as_ref().unwrap();
    assert_eq!(context.source.as_deref(), Some("castle.json"));
    let shown = context.to_string();
    assert!(shown.contains("in castle.json"));
    assert!(shown.contains("while loading rooms"));
}

#[test]
fn errors_work_with_question_mark() {
    fn failing() -> Result<(), Box<dyn std::error::Error>> {
        Err(Error::new(ErrorKind::EmptySlot(1)))?;
        Ok(())
    }
    assert!(failing().is_err());
}
