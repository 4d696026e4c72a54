//! The quiz state machine.
//!
//! A [`Game`] starts in [`GamePhase::Loading`], moves to
//! [`GamePhase::InRound`] once a pool of books is available and a round has
//! been generated, and ends in [`GamePhase::GameOver`] after the configured
//! number of answers. `restart` takes it back through `Loading`.
//!
//! Every transition takes `&mut self`, so at most one catalog fetch can be in
//! flight for a game at any time.

use crate::error::{QuizError, Result};
use crate::models::{
    AnswerOutcome, BookRecord, BookmarkOutcome, GamePhase, GameSnapshot, Round, RoundState,
};
use crate::services::catalog::{self, BookCache, BookSource};
use crate::services::reading_list::ReadingList;
use crate::services::rounds::{OPTION_COUNT, next_round};
use crate::storage::KeyValueStore;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct Game<S, B>
where
    S: KeyValueStore + Clone,
    B: BookSource,
{
    session_id: Uuid,
    cache: BookCache<S>,
    reading_list: ReadingList<S>,
    source: B,
    rng: StdRng,
    total_rounds: u32,
    pool: Vec<BookRecord>,
    phase: GamePhase,
    current: Option<Round>,
    round_index: u32,
    score: u32,
    last_error: Option<String>,
}

impl<S, B> Game<S, B>
where
    S: KeyValueStore + Clone,
    B: BookSource,
{
    pub fn new(store: S, source: B, total_rounds: u32, rng: StdRng) -> Result<Self> {
        if total_rounds == 0 {
            return Err(QuizError::Config(
                "a game needs at least one round".to_string(),
            ));
        }

        let reading_list = ReadingList::load(store.clone())?;
        Ok(Self {
            session_id: Uuid::new_v4(),
            cache: BookCache::new(store),
            reading_list,
            source,
            rng,
            total_rounds,
            pool: Vec::new(),
            phase: GamePhase::Loading,
            current: None,
            round_index: 0,
            score: 0,
            last_error: None,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    pub fn pool(&self) -> &[BookRecord] {
        &self.pool
    }

    pub fn current_round(&self) -> Option<RoundState> {
        let round = self.current.as_ref()?;
        Some(RoundState {
            correct_book: round.correct_book.clone(),
            options: round.options.clone(),
            round_index: self.round_index,
            total_rounds: self.total_rounds,
            score: self.score,
            is_game_over: self.phase == GamePhase::GameOver,
        })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            round: self.current_round(),
            round_index: self.round_index,
            total_rounds: self.total_rounds,
            score: self.score,
            last_error: self.last_error.clone(),
        }
    }

    /// Loads the pool (cache first) and deals the first round.
    #[tracing::instrument(skip(self), fields(session = %self.session_id))]
    pub async fn start(&mut self) -> Result<()> {
        if self.phase != GamePhase::Loading {
            return Err(QuizError::InvalidTransition(
                "start is only valid while loading".to_string(),
            ));
        }
        self.begin(false).await
    }

    /// Starts over from game over, or retries after a failed load.
    #[tracing::instrument(skip(self), fields(session = %self.session_id))]
    pub async fn restart(&mut self) -> Result<()> {
        if self.phase == GamePhase::InRound {
            return Err(QuizError::InvalidTransition(
                "cannot restart while a round is in progress".to_string(),
            ));
        }
        self.begin(false).await
    }

    /// Like `restart`, but always fetches a fresh pool and replaces the cache.
    #[tracing::instrument(skip(self), fields(session = %self.session_id))]
    pub async fn refresh(&mut self) -> Result<()> {
        if self.phase == GamePhase::InRound {
            return Err(QuizError::InvalidTransition(
                "cannot refresh while a round is in progress".to_string(),
            ));
        }
        self.begin(true).await
    }

    #[tracing::instrument(skip(self), fields(session = %self.session_id))]
    pub fn submit_answer(&mut self, selected: &str) -> Result<AnswerOutcome> {
        if self.phase != GamePhase::InRound {
            return Err(QuizError::InvalidTransition(
                "no round is in progress".to_string(),
            ));
        }
        let Some(round) = self.current.as_ref() else {
            return Err(QuizError::InvalidTransition(
                "no round is in progress".to_string(),
            ));
        };

        let correct_answer = round.correct_book.description.clone();
        let correct = selected == correct_answer;
        let game_over = self.round_index + 1 >= self.total_rounds;

        // Deal the next round before touching the score so a failure leaves
        // the current round intact.
        let next = if game_over {
            None
        } else {
            Some(next_round(&self.pool, &mut self.rng)?)
        };

        if correct {
            self.score += 1;
        }
        self.round_index += 1;
        // At game over the last round stays visible, flagged as finished.
        if next.is_some() {
            self.current = next;
        }
        if game_over {
            self.phase = GamePhase::GameOver;
            info!(score = self.score, rounds = self.total_rounds, "game over");
        } else {
            debug!(round = self.round_index, score = self.score, correct, "next round");
        }

        Ok(AnswerOutcome {
            correct,
            correct_answer,
            game_over,
        })
    }

    pub fn reading_list(&self) -> &[BookRecord] {
        self.reading_list.entries()
    }

    pub fn add_to_reading_list(&mut self, book: BookRecord) -> Result<BookmarkOutcome> {
        self.reading_list.add(book)
    }

    /// Bookmarks the book being asked about in the current round.
    pub fn add_current_to_reading_list(&mut self) -> Result<BookmarkOutcome> {
        let Some(round) = self.current.as_ref() else {
            return Err(QuizError::InvalidTransition(
                "no book is on screen".to_string(),
            ));
        };
        let book = round.correct_book.clone();
        self.reading_list.add(book)
    }

    pub fn remove_from_reading_list(&mut self, title: &str) -> Result<usize> {
        self.reading_list.remove(title)
    }

    async fn begin(&mut self, force_fetch: bool) -> Result<()> {
        self.phase = GamePhase::Loading;
        self.current = None;
        self.score = 0;
        self.round_index = 0;
        self.last_error = None;

        let result = self.load_pool(force_fetch).await.and_then(|pool| {
            self.pool = pool;
            self.deal_first_round()
        });

        if let Err(e) = &result {
            warn!(error = %e, pool = self.pool.len(), "game stays in loading");
            self.last_error = Some(e.to_string());
        }
        result
    }

    async fn load_pool(&mut self, force_fetch: bool) -> Result<Vec<BookRecord>> {
        if !force_fetch {
            if let Some(books) = self.cache.load()? {
                info!(count = books.len(), "serving pool from cache");
                return Ok(books);
            }
        }

        match catalog::load(&self.source, &self.cache).await {
            Ok(books) => Ok(books),
            Err(e) => {
                self.pool.clear();
                Err(e)
            }
        }
    }

    fn deal_first_round(&mut self) -> Result<()> {
        if self.pool.is_empty() {
            return Err(QuizError::InsufficientData {
                needed: OPTION_COUNT,
                found: 0,
            });
        }

        let round = next_round(&self.pool, &mut self.rng)?;
        info!(pool = self.pool.len(), rounds = self.total_rounds, "first round dealt");
        self.current = Some(round);
        self.phase = GamePhase::InRound;
        Ok(())
    }
}
