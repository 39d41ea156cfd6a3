// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! JSON parsing for Trello board exports.
//!
//! This module handles deserialization of the JSON format produced by
//! Trello's board export feature. The format is one large object holding the
//! board metadata plus flat collections of lists, cards, and members.
//!
//! # Format Overview
//!
//! A Trello board export contains:
//! - Board metadata (name, short URL, last-activity timestamp)
//! - The board's lists, each either open or archived ("closed")
//! - The board's cards, each referencing its list by ID and its members by ID
//! - The board's members, used to resolve member IDs to display names
//!
//! Cards embed their labels directly; members are only referenced by ID and
//! must be dereferenced through [`Board::members`].
//!
//! # Example
//!
//! ```
//! use trello2md::parser::parse_board;
//!
//! let json = r#"{
//!     "name": "Roadmap",
//!     "lists": [{ "id": "l1", "name": "Doing", "closed": false }],
//!     "cards": [],
//!     "members": []
//! }"#;
//!
//! let board = parse_board(json).unwrap();
//! assert_eq!(board.lists.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use snafu::prelude::*;

/// Error type for JSON parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// Failed to parse JSON content.
    #[snafu(display("failed to parse JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },
}

/// The root structure of a Trello board export.
///
/// This represents one whole board as exported from Trello, including every
/// collection the renderer needs for dereferencing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// The board's display name.
    pub name: String,

    /// The board's short URL (e.g., `https://trello.com/b/abc123`).
    ///
    /// May be `None` in exports trimmed by other tools.
    #[serde(default)]
    pub short_url: Option<String>,

    /// When the board was last changed.
    ///
    /// May be `None` in exports trimmed by other tools.
    #[serde(default)]
    pub date_last_activity: Option<DateTime<Utc>>,

    /// The board's lists (columns), in board order.
    pub lists: Vec<List>,

    /// Every card on the board, across all lists.
    pub cards: Vec<Card>,

    /// The people on the board, used to resolve card member IDs.
    pub members: Vec<Member>,
}

/// A list (column) on a board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct List {
    /// Unique identifier, referenced by cards via their `idList` field.
    pub id: String,

    /// The list's display name.
    pub name: String,

    /// Whether the list is archived.
    pub closed: bool,
}

/// A single card, belonging to exactly one list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier within the export.
    pub id: String,

    /// The card's title.
    pub name: String,

    /// The card's description: multi-line text, possibly empty.
    ///
    /// Descriptions may contain heading lines and bare URLs; no other markup
    /// is assumed.
    pub desc: String,

    /// Whether the card is archived.
    pub closed: bool,

    /// The `id` of the list this card belongs to.
    pub id_list: String,

    /// IDs of the members assigned to this card, in assignment order.
    pub id_members: Vec<String>,

    /// The labels attached to this card, in attachment order.
    pub labels: Vec<Label>,
}

/// A colored label attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    /// The label's display name.
    ///
    /// Trello allows unnamed labels; the name is then the empty string and
    /// the color stands in for it when rendering.
    pub name: String,

    /// The label's color name (e.g., "red"). Always present.
    pub color: String,
}

/// A person on the board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique identifier, referenced by cards via their `idMembers` field.
    pub id: String,

    /// The member's full display name.
    pub full_name: String,
}

/// Parses a JSON string into a [`Board`] structure.
///
/// This is the main entry point for parsing Trello board exports.
///
/// # Arguments
///
/// * `json_str` - The raw JSON content from a Trello board export file
///
/// # Errors
///
/// Returns an error if the JSON is malformed or doesn't match the expected
/// Trello board export schema, including when a required field (card name,
/// description, labels, ...) is absent.
///
/// # Example
///
/// ```
/// use trello2md::parser::parse_board;
///
/// let json = r#"{
///     "name": "Roadmap",
///     "lists": [],
///     "cards": [],
///     "members": []
/// }"#;
///
/// let board = parse_board(json).unwrap();
/// assert_eq!(board.name, "Roadmap");
/// ```
pub fn parse_board(json_str: &str) -> Result<Board, ParseError> {
    serde_json::from_str(json_str).context(JsonSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_JSON: &str = r#"{ "id": "l1", "name": "Doing", "closed": false }"#;
    const MEMBER_JSON: &str = r#"{ "id": "m1", "fullName": "Grace Hopper" }"#;

    fn board_json(lists: &str, cards: &str, members: &str) -> String {
        format!(
            r#"{{
                "name": "Roadmap",
                "shortUrl": "https://trello.com/b/abc123",
                "dateLastActivity": "2024-12-05T00:00:00.000Z",
                "lists": [{lists}],
                "cards": [{cards}],
                "members": [{members}]
            }}"#
        )
    }

    fn card_json(name: &str, desc: &str) -> String {
        format!(
            r#"{{
                "id": "c1",
                "name": "{name}",
                "desc": "{desc}",
                "closed": false,
                "idList": "l1",
                "idMembers": ["m1"],
                "labels": [{{ "name": "bug", "color": "red" }}]
            }}"#
        )
    }

    #[test]
    fn parses_minimal_board() {
        let json = board_json(LIST_JSON, &card_json("Ship it", "Soon."), MEMBER_JSON);
        let board = parse_board(&json).unwrap();

        assert_eq!(board.name, "Roadmap");
        assert_eq!(board.short_url.as_deref(), Some("https://trello.com/b/abc123"));
        assert_eq!(board.lists.len(), 1);
        assert_eq!(board.cards.len(), 1);
        assert_eq!(board.members.len(), 1);
    }

    #[test]
    fn parses_card_fields() {
        let json = board_json(LIST_JSON, &card_json("Ship it", "Soon."), MEMBER_JSON);
        let board = parse_board(&json).unwrap();

        let card = &board.cards[0];
        assert_eq!(card.id, "c1");
        assert_eq!(card.name, "Ship it");
        assert_eq!(card.desc, "Soon.");
        assert!(!card.closed);
        assert_eq!(card.id_list, "l1");
        assert_eq!(card.id_members, ["m1"]);
        assert_eq!(card.labels.len(), 1);
        assert_eq!(card.labels[0].name, "bug");
        assert_eq!(card.labels[0].color, "red");
    }

    #[test]
    fn parses_member_full_name() {
        let json = board_json(LIST_JSON, "", MEMBER_JSON);
        let board = parse_board(&json).unwrap();

        assert_eq!(board.members[0].id, "m1");
        assert_eq!(board.members[0].full_name, "Grace Hopper");
    }

    #[test]
    fn parses_unnamed_label() {
        let card = r#"{
            "id": "c1",
            "name": "Untagged",
            "desc": "",
            "closed": false,
            "idList": "l1",
            "idMembers": [],
            "labels": [{ "name": "", "color": "sky" }]
        }"#;
        let json = board_json(LIST_JSON, card, "");
        let board = parse_board(&json).unwrap();

        assert_eq!(board.cards[0].labels[0].name, "");
        assert_eq!(board.cards[0].labels[0].color, "sky");
    }

    #[test]
    fn parses_archived_list() {
        let list = r#"{ "id": "l2", "name": "Done", "closed": true }"#;
        let json = board_json(list, "", "");
        let board = parse_board(&json).unwrap();

        assert!(board.lists[0].closed);
    }

    #[test]
    fn parses_last_activity_timestamp() {
        let json = board_json("", "", "");
        let board = parse_board(&json).unwrap();

        let expected: DateTime<Utc> = "2024-12-05T00:00:00Z".parse().unwrap();
        assert_eq!(board.date_last_activity, Some(expected));
    }

    #[test]
    fn parses_board_without_optional_metadata() {
        let json = r#"{
            "name": "Bare",
            "lists": [],
            "cards": [],
            "members": []
        }"#;
        let board = parse_board(json).unwrap();

        assert!(board.short_url.is_none());
        assert!(board.date_last_activity.is_none());
    }

    #[test]
    fn ignores_unknown_fields() {
        let card = r#"{
            "id": "c1",
            "name": "Ship it",
            "desc": "",
            "closed": false,
            "idList": "l1",
            "idMembers": [],
            "labels": [],
            "pos": 16384,
            "idBoard": "b1",
            "dateLastActivity": "2024-12-05T00:00:00.000Z"
        }"#;
        let json = board_json(LIST_JSON, card, "");

        assert!(parse_board(&json).is_ok());
    }

    #[test]
    fn returns_error_for_invalid_json() {
        let result = parse_board("not valid json");
        assert!(result.is_err());
    }

    #[test]
    fn returns_error_for_missing_collections() {
        let result = parse_board(r#"{"name": "Roadmap"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn returns_error_for_card_missing_required_fields() {
        // No "labels" on the card: malformed input, surfaced here rather
        // than papered over with a default.
        let card = r#"{
            "id": "c1",
            "name": "Ship it",
            "desc": "",
            "closed": false,
            "idList": "l1",
            "idMembers": []
        }"#;
        let json = board_json(LIST_JSON, card, "");

        assert!(parse_board(&json).is_err());
    }

    #[test]
    fn error_display_names_the_json_failure() {
        let err = parse_board("{").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse JSON:"));
    }
}
