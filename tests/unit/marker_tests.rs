//! Unit tests for reaction marker mapping.

use tracker_intercom::models::command::Command;
use tracker_intercom::models::marker::Marker;

#[test]
fn reaction_names_are_distinct() {
    let names: Vec<_> = Marker::ALL.iter().map(|m| m.reaction_name()).collect();
    assert_eq!(names.len(), 3);
    for (i, name) in names.iter().enumerate() {
        assert!(!names[i + 1..].contains(name), "{name} duplicated");
    }
}

#[test]
fn reaction_name_roundtrips() {
    for marker in Marker::ALL {
        assert_eq!(Marker::from_reaction_name(marker.reaction_name()), Some(marker));
    }
}

#[test]
fn unknown_reaction_is_not_a_marker() {
    assert_eq!(Marker::from_reaction_name("eyes"), None);
}

#[test]
fn commands_map_to_expected_markers() {
    assert_eq!(Marker::for_command(&Command::Start), Some(Marker::InProgress));
    assert_eq!(Marker::for_command(&Command::Restart), Some(Marker::InProgress));
    assert_eq!(Marker::for_command(&Command::Done), Some(Marker::Done));
    assert_eq!(Marker::for_command(&Command::Cancel), Some(Marker::Canceled));
}

#[test]
fn create_and_invalid_set_no_marker() {
    assert_eq!(Marker::for_command(&Command::Create), None);
    assert_eq!(Marker::for_command(&Command::Invalid("x".into())), None);
}
