use crate::error::{QuizError, Result};
use std::path::PathBuf;

pub const DEFAULT_SEARCH_URL: &str = "https://openlibrary.org/search.json";
pub const DEFAULT_TOPIC: &str = "fantasy";
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org/b/id";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_ROUNDS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub search_url: String,
    pub topic: String,
    pub covers_url: String,
    pub data_dir: PathBuf,
    pub rounds: u32,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            covers_url: DEFAULT_COVERS_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            rounds: DEFAULT_ROUNDS,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup. Unset variables
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let rounds = match lookup("BOOK_QUIZ_ROUNDS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) | Err(_) => {
                    return Err(QuizError::Config(format!(
                        "BOOK_QUIZ_ROUNDS must be a positive integer, got {raw:?}"
                    )));
                }
                Ok(n) => n,
            },
            None => defaults.rounds,
        };

        let seed = match lookup("BOOK_QUIZ_SEED") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                QuizError::Config(format!("BOOK_QUIZ_SEED must be an unsigned integer, got {raw:?}"))
            })?),
            None => None,
        };

        Ok(Self {
            search_url: lookup("BOOK_QUIZ_SEARCH_URL").unwrap_or(defaults.search_url),
            topic: lookup("BOOK_QUIZ_TOPIC").unwrap_or(defaults.topic),
            covers_url: lookup("BOOK_QUIZ_COVERS_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.covers_url),
            data_dir: lookup("BOOK_QUIZ_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            rounds,
            seed,
        })
    }
}
