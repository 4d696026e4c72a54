use anyhow::{Context, Result};
use book_quiz::models::{BookmarkOutcome, GamePhase};
use book_quiz::services::catalog::CatalogClient;
use book_quiz::storage::FileStore;
use book_quiz::{Config, Game};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

type TerminalGame = Game<FileStore, CatalogClient>;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Answer(usize),
    Bookmark,
    List,
    Remove(String),
    Restart,
    Refresh,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "w" | "want" => Some(Command::Bookmark),
            "l" | "list" => Some(Command::List),
            "r" | "remove" if !rest.is_empty() => Some(Command::Remove(rest.to_string())),
            "restart" => Some(Command::Restart),
            "refresh" => Some(Command::Refresh),
            "h" | "help" => Some(Command::Help),
            "q" | "quit" => Some(Command::Quit),
            n => n.parse::<usize>().ok().filter(|n| *n >= 1).map(Command::Answer),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("reading configuration")?;
    let client = CatalogClient::new(&config).context("building catalog client")?;
    let store = FileStore::new(&config.data_dir);
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new(store, client, config.rounds, rng).context("opening game")?;
    info!(
        session = %game.session_id(),
        data_dir = %config.data_dir.display(),
        topic = %config.topic,
        "starting book quiz"
    );

    println!("Book Matching Game! Match each book to its opening line.");
    if let Err(e) = game.start().await {
        warn!(error = %e, "initial load failed");
    }
    render(&game);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            println!("Unknown command. Type `help` for the list of commands.");
            continue;
        };

        match command {
            Command::Quit => break,
            Command::Help => print_help(),
            Command::List => print_reading_list(&game),
            Command::Answer(n) => answer(&mut game, n)?,
            Command::Bookmark => match game.add_current_to_reading_list() {
                Ok(BookmarkOutcome::Added) => println!("Added to your reading list."),
                Ok(BookmarkOutcome::AlreadyPresent) => {
                    println!("That book is already on your reading list.")
                }
                Err(e) => println!("{e}"),
            },
            Command::Remove(title) => match game.remove_from_reading_list(&title)? {
                0 => println!("\"{title}\" is not on your reading list."),
                _ => println!("Removed \"{title}\"."),
            },
            Command::Restart => {
                if let Err(e) = game.restart().await {
                    println!("{e}");
                }
                render(&game);
            }
            Command::Refresh => {
                if let Err(e) = game.refresh().await {
                    println!("{e}");
                }
                render(&game);
            }
        }
    }

    Ok(())
}

fn answer(game: &mut TerminalGame, choice: usize) -> Result<()> {
    let Some(round) = game.current_round().filter(|round| !round.is_game_over) else {
        println!("There is no question to answer right now.");
        return Ok(());
    };
    let Some(selected) = round.options.get(choice - 1) else {
        println!("Pick a number between 1 and {}.", round.options.len());
        return Ok(());
    };

    let outcome = game.submit_answer(selected)?;
    if outcome.correct {
        println!("Correct!");
    } else {
        println!("Not quite. It was: {}", outcome.correct_answer);
    }
    render(game);
    Ok(())
}

fn render(game: &TerminalGame) {
    let snapshot = game.snapshot();
    match snapshot.phase {
        GamePhase::Loading => {
            println!("Loading...");
            if let Some(error) = snapshot.last_error {
                println!("Could not load books: {error}");
                println!("Type `restart` to try again or `refresh` to fetch a new catalog.");
            }
        }
        GamePhase::InRound => {
            let Some(round) = snapshot.round else {
                return;
            };
            println!();
            println!(
                "Round {} / {}    Score: {}",
                round.round_index + 1,
                round.total_rounds,
                round.score
            );
            println!("{}", round.correct_book.title);
            println!("By: {}", round.correct_book.author);
            println!("Cover: {}", round.correct_book.cover);
            for (i, option) in round.options.iter().enumerate() {
                println!("  {}. {}", i + 1, option);
            }
        }
        GamePhase::GameOver => {
            println!();
            println!("Game Over");
            println!(
                "Your final score is: {} / {}",
                snapshot.score, snapshot.total_rounds
            );
            println!("Type `restart` to play again!");
        }
    }
}

fn print_reading_list(game: &TerminalGame) {
    println!("My Reading List");
    let books = game.reading_list();
    if books.is_empty() {
        println!("  No books added yet!");
    }
    for book in books {
        println!("  {} by {}", book.title, book.author);
    }
}

fn print_help() {
    println!("  1-3            pick an answer");
    println!("  want, w        add the current book to your reading list");
    println!("  list, l        show your reading list");
    println!("  remove <title> remove a book from your reading list");
    println!("  restart        play again after a game ends");
    println!("  refresh        fetch a new catalog and play again");
    println!("  quit, q        leave");
}
