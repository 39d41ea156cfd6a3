// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert Trello board exports to Markdown tables.
//!
//! This crate provides parsing and rendering functionality for transforming
//! Trello's JSON board export format into readable Markdown documents built
//! around one table per list.
//!
//! # Overview
//!
//! Trello exports a whole board as a single JSON file. This crate:
//!
//! 1. Parses the JSON structure into typed Rust representations
//! 2. Renders each list as a Markdown table with one row per card
//!
//! # Example
//!
//! ```no_run
//! use trello2md::{parser, renderer};
//!
//! let json = std::fs::read_to_string("board.json").unwrap();
//! let board = parser::parse_board(&json).unwrap();
//!
//! let opts = renderer::RenderOptions {
//!     include_header: true,
//!     ..Default::default()
//! };
//!
//! let markdown = renderer::render_board(&board, &opts).unwrap();
//! println!("{markdown}");
//! ```
//!
//! # Modules
//!
//! - [`parser`]: JSON parsing and type definitions for Trello board exports
//! - [`renderer`]: Markdown table generation with configurable output options

#![deny(missing_docs)]

pub mod parser;
pub mod renderer;
