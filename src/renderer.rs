// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown table rendering for parsed Trello board exports.
//!
//! This module transforms a [`Board`] into a Markdown document with one
//! table per list and one row per card. Card descriptions are flattened onto
//! a single table line: the first bare URL on each line becomes an inline
//! link, heading lines are pushed two levels down so they nest under the
//! list headings, and line breaks become `<br>` so the cell stays on one
//! physical line.
//!
//! # Output Format
//!
//! The rendered Markdown includes:
//! - An optional board summary (name, short URL, counts, last change)
//! - A `# List Name #` heading per list
//! - A four-column table per list: card, description, labels, members
//!
//! # Example
//!
//! ```
//! use trello2md::parser::{Board, Card, List};
//! use trello2md::renderer::{RenderOptions, render_board};
//!
//! let board = Board {
//!     name: "Roadmap".into(),
//!     short_url: None,
//!     date_last_activity: None,
//!     lists: vec![List {
//!         id: "l1".into(),
//!         name: "Doing".into(),
//!         closed: false,
//!     }],
//!     cards: vec![Card {
//!         id: "c1".into(),
//!         name: "Ship the release".into(),
//!         desc: "# Notes #\nSee https://example.com for details".into(),
//!         closed: false,
//!         id_list: "l1".into(),
//!         id_members: vec![],
//!         labels: vec![],
//!     }],
//!     members: vec![],
//! };
//!
//! let markdown = render_board(&board, &RenderOptions::default()).unwrap();
//!
//! assert!(markdown.contains("# Doing #"));
//! assert!(markdown.contains("### Notes ###"));
//! assert!(markdown.contains("[https://example.com](https://example.com)"));
//! ```

use crate::parser::{Board, Card, Label, Member};
use regex::Regex;
use snafu::prelude::*;
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::OnceLock;

/// Error type for rendering failures.
#[derive(Debug, Snafu)]
pub enum RenderError {
    /// A card is assigned a member ID that the export doesn't contain.
    #[snafu(display("card {card:?} references unknown member {member_id:?}"))]
    UnknownMember {
        /// The name of the card holding the dangling reference.
        card: String,
        /// The member ID that could not be resolved.
        member_id: String,
    },
}

/// Configuration options for Markdown rendering.
///
/// Controls which parts of the export are included in the rendered output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Whether to open the document with a board summary block.
    ///
    /// The summary shows the board name, its short URL, the list and card
    /// counts, and when the board last changed.
    pub include_header: bool,

    /// Whether to include archived ("closed") lists and cards.
    ///
    /// When disabled, archived lists are skipped entirely and archived cards
    /// are skipped inside open lists.
    pub include_archived: bool,
}

/// Pattern for a bare URL inside a description line.
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

/// Returns the compiled URL pattern.
///
/// Anchored over the whole line: an optional prefix ending right before the
/// URL, a protocol-qualified token (3-5 letter scheme, `://`, then everything
/// up to the next space), and the rest of the line. The lazy prefix makes the
/// first URL-looking token win; later ones on the same line are left alone.
fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| {
        Regex::new(r"^(.*? )?([A-Za-z]{3,5}://[^ ]*)(.*)$").expect("Failed to compile URL regex")
    })
}

/// Replaces every line-break character (`\n`, `\r`) with a single space.
///
/// All other characters pass through unchanged, including any leading or
/// trailing spaces the substitution produces. Idempotent; the output never
/// contains a line break.
#[must_use]
pub fn collapse_newlines(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// Rewrites the first bare URL in a line as an inline Markdown link.
///
/// A URL must start the line or follow a space; its text runs to the next
/// space. Lines without a URL come back unchanged.
fn link_bare_url(line: &str) -> String {
    match url_regex().captures(line) {
        Some(caps) => {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let url = &caps[2];
            let suffix = &caps[3];
            format!("{prefix}[{url}]({url}){suffix}")
        }
        None => line.to_owned(),
    }
}

/// Renders a card description as the content of a single table cell.
///
/// Works line by line: the first bare URL on a line becomes an inline link,
/// heading lines (starting *and* ending with `#`) are pushed two levels down
/// so they nest under the list headings, and the processed lines are joined
/// with `<br>` to keep the whole description on one table line.
///
/// # Example
///
/// ```
/// use trello2md::renderer::render_content;
///
/// assert_eq!(
///     render_content("See https://example.com/x for info"),
///     "See [https://example.com/x](https://example.com/x) for info",
/// );
/// assert_eq!(render_content("# Details #\nplain"), "### Details ###<br>plain");
/// ```
#[must_use]
pub fn render_content(content: &str) -> String {
    // `str::lines` splits on `\n` and `\r\n` but not lone `\r`, which is
    // legal in JSON strings and must break a segment like any other line end.
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut segments = Vec::new();
    for line in content.lines() {
        let line = link_bare_url(line);
        // The heading test runs on the rewritten line; lines with only a
        // leading or only a trailing `#` are not headings.
        if line.starts_with('#') && line.ends_with('#') {
            segments.push(format!("##{}##", collapse_newlines(&line)));
        } else {
            segments.push(line);
        }
    }
    segments.join("<br>")
}

/// An index of board members by ID, built once per export.
///
/// Cards reference members by ID only; the index makes each dereference a
/// single lookup and a dangling reference an explicit miss.
#[derive(Debug)]
pub struct MemberIndex<'a> {
    by_id: HashMap<&'a str, &'a Member>,
}

impl<'a> MemberIndex<'a> {
    /// Builds the index over a board's member collection.
    #[must_use]
    pub fn new(members: &'a [Member]) -> Self {
        Self {
            by_id: members.iter().map(|m| (m.id.as_str(), m)).collect(),
        }
    }

    /// Resolves a member ID to the member's full display name.
    #[must_use]
    pub fn full_name(&self, id: &str) -> Option<&'a str> {
        self.by_id.get(id).map(|member| member.full_name.as_str())
    }
}

/// Formats one card as a Markdown table row.
///
/// The row has four columns: the card name flattened to one line, the
/// rendered description, the labels, and the assigned members. Labels render
/// as color-tagged emphasis, with the color name standing in for unnamed
/// labels; a card with nobody assigned gets the literal `_Unassigned_`.
/// Pipe characters inside any column pass through unescaped.
///
/// # Errors
///
/// Returns [`RenderError::UnknownMember`] if the card references a member ID
/// missing from the index. Callers decide whether to abort or skip the card;
/// the bundled CLI aborts the whole run.
pub fn format_row(card: &Card, members: &MemberIndex<'_>) -> Result<String, RenderError> {
    let name = collapse_newlines(&card.name);
    let content = render_content(&card.desc);

    let labels = card
        .labels
        .iter()
        .map(label_markup)
        .collect::<Vec<_>>()
        .join(", ");

    let assigned = if card.id_members.is_empty() {
        "_Unassigned_".to_owned()
    } else {
        let mut names = Vec::with_capacity(card.id_members.len());
        for id in &card.id_members {
            let full_name = members.full_name(id).context(UnknownMemberSnafu {
                card: card.name.as_str(),
                member_id: id.as_str(),
            })?;
            names.push(full_name);
        }
        names.join(", ")
    };

    // TODO: escape `|` inside cell text to protect table integrity.
    Ok(format!("| {name} | {content} | {labels} | {assigned} |\n"))
}

/// Renders one label as color-tagged emphasis, falling back to the color
/// name for unnamed labels.
fn label_markup(label: &Label) -> String {
    let text = if label.name.is_empty() {
        &label.color
    } else {
        &label.name
    };
    format!(r#"<font color="{}">_{}_</font>"#, label.color, text)
}

/// Renders a parsed board export as Markdown.
///
/// This is the main entry point for rendering. It walks the board's lists in
/// export order and produces a heading plus one table per included list,
/// with the cards kept in export order. Archived lists and cards are skipped
/// unless [`RenderOptions::include_archived`] is set.
///
/// # Errors
///
/// Returns [`RenderError::UnknownMember`] if any included card references a
/// member ID missing from the export.
pub fn render_board(board: &Board, opts: &RenderOptions) -> Result<String, RenderError> {
    let members = MemberIndex::new(&board.members);
    let mut out = String::new();

    if opts.include_header {
        render_header(&mut out, board);
    }

    for list in &board.lists {
        if list.closed && !opts.include_archived {
            continue;
        }

        writeln!(out, "# {} #\n", collapse_newlines(&list.name)).unwrap();

        // No real header row: Confluence drops it when the generated HTML is
        // pasted, so a bold first data row stands in for one.
        writeln!(out, "|  |  |  |  |").unwrap();
        writeln!(out, "| -- | ---------- | :-----: | :----: |").unwrap();
        writeln!(out, "| **Card** | **Description** | **Labels** | **Members** |").unwrap();

        for card in board.cards.iter().filter(|c| c.id_list == list.id) {
            if card.closed && !opts.include_archived {
                continue;
            }
            out.push_str(&format_row(card, &members)?);
        }

        out.push('\n');
    }

    Ok(out)
}

/// Appends the board summary block: name, short URL, list and card counts,
/// and the last-activity timestamp.
fn render_header(out: &mut String, board: &Board) {
    writeln!(out, "**Board name: {}**\n", collapse_newlines(&board.name)).unwrap();
    if let Some(url) = &board.short_url {
        writeln!(out, "Short URL: [{url}]({url})  ").unwrap();
    }
    writeln!(out, "Number of lists: {}  ", board.lists.len()).unwrap();
    writeln!(out, "Number of cards in lists: {}  ", board.cards.len()).unwrap();
    if let Some(stamp) = board.date_last_activity {
        writeln!(out, "Last change: {}", stamp.format("%Y-%m-%d %H:%M UTC")).unwrap();
    }
    out.push_str("\n\n");
}
