use serde::{Deserialize, Serialize};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const NO_COVER: &str = "No cover available";

/// A book as the game sees it. `title` doubles as the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover: String,
}

/// Raw search response from the catalog. Only the fields the game uses.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Vec<CatalogDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogDoc {
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub first_sentence: Vec<String>,
    pub cover_i: Option<i64>,
}

/// Output of the round generator: the book to guess and the shuffled answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub correct_book: BookRecord,
    pub options: Vec<String>,
}

/// What the presentation layer renders for the round in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundState {
    pub correct_book: BookRecord,
    pub options: Vec<String>,
    pub round_index: u32,
    pub total_rounds: u32,
    pub score: u32,
    pub is_game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Loading,
    InRound,
    GameOver,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub round: Option<RoundState>,
    pub round_index: u32,
    pub total_rounds: u32,
    pub score: u32,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkOutcome {
    Added,
    AlreadyPresent,
}
