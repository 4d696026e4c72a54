use crate::config::Config;
use crate::error::Result;
use crate::models::{BookRecord, CatalogDoc, NO_COVER, SearchResponse, UNKNOWN_AUTHOR};
use crate::services::language::is_english;
use crate::storage::{BOOKS_KEY, KeyValueStore, load_json, save_json};
use crate::utils::{SNIPPET_WORDS, snippet};
use tracing::{debug, info, warn};

const SEARCH_FIELDS: &str = "title,author_name,first_sentence,cover_i";

/// Anything that can produce a fresh set of books for the pool.
pub trait BookSource {
    fn fetch_books(&self) -> impl Future<Output = Result<Vec<BookRecord>>>;
}

pub struct CatalogClient {
    client: reqwest::Client,
    search_url: String,
    topic: String,
    covers_url: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("book-quiz/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(CatalogClient {
            client,
            search_url: config.search_url.clone(),
            topic: config.topic.clone(),
            covers_url: config.covers_url.clone(),
        })
    }

    pub async fn search(&self) -> Result<Vec<BookRecord>> {
        info!(url = %self.search_url, topic = %self.topic, "searching catalog");

        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", self.topic.as_str()), ("fields", SEARCH_FIELDS)])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        Ok(project_docs(body.docs, &self.covers_url))
    }
}

impl BookSource for CatalogClient {
    async fn fetch_books(&self) -> Result<Vec<BookRecord>> {
        self.search().await
    }
}

/// Turns raw catalog entries into game records. Entries without a title, without
/// an opening sentence, or with a non-English one are dropped.
pub fn project_docs(docs: Vec<CatalogDoc>, covers_url: &str) -> Vec<BookRecord> {
    let total = docs.len();
    let books: Vec<BookRecord> = docs
        .into_iter()
        .filter_map(|doc| project_doc(doc, covers_url))
        .collect();
    debug!(total, kept = books.len(), "projected catalog entries");
    books
}

fn project_doc(doc: CatalogDoc, covers_url: &str) -> Option<BookRecord> {
    let title = doc.title?;
    if title.trim().is_empty() {
        return None;
    }

    let sentence = doc.first_sentence.first()?.trim();
    if sentence.is_empty() || !is_english(sentence) {
        return None;
    }

    let author = if doc.author_name.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        doc.author_name.join(", ")
    };

    let cover = match doc.cover_i {
        Some(id) => format!("{covers_url}/{id}-M.jpg"),
        None => NO_COVER.to_string(),
    };

    Some(BookRecord {
        title,
        author,
        description: snippet(sentence, SNIPPET_WORDS),
        cover,
    })
}

/// The `books` cache slot.
pub struct BookCache<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> BookCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Cached books, or `None` when the slot is absent, unreadable or empty.
    pub fn load(&self) -> Result<Option<Vec<BookRecord>>> {
        let books: Option<Vec<BookRecord>> = load_json(&self.store, BOOKS_KEY)?;
        Ok(books.filter(|books| !books.is_empty()))
    }

    pub fn save(&self, books: &[BookRecord]) -> Result<()> {
        save_json(&self.store, BOOKS_KEY, books)
    }
}

/// Fetches a fresh set of books and replaces the cache with it. On failure the
/// cache is left alone and the error is returned.
pub async fn load<B, S>(source: &B, cache: &BookCache<S>) -> Result<Vec<BookRecord>>
where
    B: BookSource,
    S: KeyValueStore,
{
    match source.fetch_books().await {
        Ok(books) => {
            cache.save(&books)?;
            info!(count = books.len(), "catalog cache replaced");
            Ok(books)
        }
        Err(e) => {
            warn!(error = %e, "catalog fetch failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuizError;
    use crate::storage::MemoryStore;
    use axum::{Router, http::StatusCode, routing::get};
    use tokio::net::TcpListener;

    const FIXTURE: &str = r#"{
        "numFound": 5,
        "docs": [
            {
                "title": "The Hobbit",
                "author_name": ["J.R.R. Tolkien"],
                "first_sentence": ["In a hole in the ground there lived a hobbit. Not a nasty, dirty, wet hole."],
                "cover_i": 6979861
            },
            {
                "title": "Good Omens",
                "author_name": ["Terry Pratchett", "Neil Gaiman"],
                "first_sentence": ["It was a nice day."]
            },
            {
                "title": "No Sentence Here",
                "author_name": ["Anon"]
            },
            {
                "title": "Le Petit Prince",
                "first_sentence": ["Lorsque j'avais six ans j'ai vu, une fois, une magnifique image."]
            },
            {
                "first_sentence": ["It was the best of times."]
            }
        ]
    }"#;

    fn fixture_docs() -> Vec<CatalogDoc> {
        serde_json::from_str::<SearchResponse>(FIXTURE).unwrap().docs
    }

    #[test]
    fn projection_keeps_only_usable_english_entries() {
        let books = project_docs(fixture_docs(), "https://covers.example/b/id");
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["The Hobbit", "Good Omens"]);
    }

    #[test]
    fn projection_shapes_each_field() {
        let books = project_docs(fixture_docs(), "https://covers.example/b/id");

        let hobbit = &books[0];
        assert_eq!(hobbit.author, "J.R.R. Tolkien");
        assert_eq!(
            hobbit.description,
            "In a hole in the ground there lived a hobbit...."
        );
        assert_eq!(hobbit.cover, "https://covers.example/b/id/6979861-M.jpg");

        let omens = &books[1];
        assert_eq!(omens.author, "Terry Pratchett, Neil Gaiman");
        assert_eq!(omens.description, "It was a nice day.");
        assert_eq!(omens.cover, NO_COVER);
    }

    #[test]
    fn missing_authors_fall_back() {
        let doc = CatalogDoc {
            title: Some("Beowulf".to_string()),
            first_sentence: vec!["So. The Spear-Danes in days gone by and the kings who ruled them".to_string()],
            ..Default::default()
        };
        let books = project_docs(vec![doc], "http://c");
        assert_eq!(books[0].author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn blank_titles_are_dropped() {
        let doc = CatalogDoc {
            title: Some("   ".to_string()),
            first_sentence: vec!["It was a dark and stormy night.".to_string()],
            ..Default::default()
        };
        assert!(project_docs(vec![doc], "http://c").is_empty());
    }

    #[test]
    fn titles_are_kept_verbatim() {
        let doc = CatalogDoc {
            title: Some("  The Left Hand of Darkness ".to_string()),
            first_sentence: vec!["I'll make my report as if I told a story.".to_string()],
            ..Default::default()
        };
        let books = project_docs(vec![doc], "http://c");
        assert_eq!(books[0].title, "  The Left Hand of Darkness ");
    }

    #[test]
    fn empty_cache_reads_as_miss() {
        let store = MemoryStore::new();
        let cache = BookCache::new(store.clone());
        assert!(cache.load().unwrap().is_none());

        cache.save(&[]).unwrap();
        assert!(cache.load().unwrap().is_none());

        store.set(BOOKS_KEY, "not json").unwrap();
        assert!(cache.load().unwrap().is_none());
    }

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}/search.json")
    }

    fn client_for(search_url: String) -> CatalogClient {
        let config = Config {
            search_url,
            covers_url: "https://covers.example/b/id".to_string(),
            ..Config::default()
        };
        CatalogClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn load_fetches_and_overwrites_cache() {
        let url = serve(Router::new().route("/search.json", get(|| async { FIXTURE }))).await;
        let client = client_for(url);

        let store = MemoryStore::new();
        let cache = BookCache::new(store.clone());
        let stale = vec![BookRecord {
            title: "Stale".to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            description: "old".to_string(),
            cover: NO_COVER.to_string(),
        }];
        cache.save(&stale).unwrap();

        let books = load(&client, &cache).await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(cache.load().unwrap(), Some(books));
    }

    #[tokio::test]
    async fn error_status_is_a_network_error_and_keeps_cache() {
        let url = serve(Router::new().route(
            "/search.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;
        let client = client_for(url);

        let store = MemoryStore::new();
        let cache = BookCache::new(store.clone());
        store.set(BOOKS_KEY, "[]").unwrap();

        let err = load(&client, &cache).await.unwrap_err();
        assert!(matches!(err, QuizError::Network(_)));
        assert_eq!(store.get(BOOKS_KEY).unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}/search.json"));
        let err = client.search().await.unwrap_err();
        assert!(matches!(err, QuizError::Network(_)));
    }
}
