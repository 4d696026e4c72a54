//! Book quiz: match a book to a snippet of its opening sentence.
//!
//! - [`services::catalog`] searches the catalog, filters and projects the
//!   results, and keeps the `books` cache.
//! - [`services::language`] decides whether an opening sentence is English.
//! - [`services::rounds`] deals a round: one correct book, two distractors.
//! - [`services::game`] is the Loading / InRound / GameOver state machine.
//! - [`services::reading_list`] keeps the "want to read" bookmarks.
//! - [`storage`] is the key-value port the cache and reading list sit on.
//!
//! The binary in `main.rs` is a terminal front-end over [`services::game::Game`].

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use error::{QuizError, Result};
pub use services::game::Game;
