use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use url::Url;

use super::bestfightodds::parse_fighter_page;
use super::traits::{FighterPage, OddsSource, SearchCandidate};
use crate::error::SourceError;
use crate::linking::normalize_name;

const MOCK_BASE_URL: &str = "https://odds.test";

/// Canned search hits and fighter pages, loadable from JSON.
///
/// ```json
/// {
///   "base_url": "https://www.bestfightodds.com",
///   "searches": { "Jon Jones": [{ "display_name": "Jon Jones", "locator": "..." }] },
///   "pages": { "https://www.bestfightodds.com/fighters/Jon-Jones-819": "<html>...</html>" }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MockFixture {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub searches: HashMap<String, Vec<SearchCandidate>>,
    /// Raw page HTML keyed by page URL
    #[serde(default)]
    pub pages: HashMap<String, String>,
}

impl MockFixture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read fixture from {:?}", path.as_ref()))?;
        serde_json::from_str(&content).context("Failed to parse fixture JSON")
    }
}

enum MockPage {
    Parsed(FighterPage),
    Html(String),
}

/// In-memory odds source for tests and offline runs
pub struct MockSource {
    name: String,
    base_url: Url,
    searches: HashMap<String, Vec<SearchCandidate>>,
    pages: HashMap<String, MockPage>,
    failing: HashSet<String>,
    search_log: Mutex<Vec<String>>,
    page_log: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: Url::parse(MOCK_BASE_URL).expect("mock base url"),
            searches: HashMap::new(),
            pages: HashMap::new(),
            failing: HashSet::new(),
            search_log: Mutex::new(Vec::new()),
            page_log: Mutex::new(Vec::new()),
        }
    }

    pub fn from_fixture(fixture: MockFixture) -> Result<Self> {
        let mut source = Self::new("fixture");
        if let Some(base) = &fixture.base_url {
            source.base_url = Url::parse(base).with_context(|| format!("Invalid fixture base URL: {}", base))?;
        }
        for (query, hits) in fixture.searches {
            source = source.with_search(&query, hits);
        }
        for (url, html) in fixture.pages {
            source = source.with_html_page(&url, &html);
        }
        Ok(source)
    }

    /// Search hits for a query, matched case- and whitespace-insensitively
    pub fn with_search(mut self, query: &str, hits: Vec<SearchCandidate>) -> Self {
        self.searches.insert(normalize_name(query), hits);
        self
    }

    pub fn with_page(mut self, page: FighterPage) -> Self {
        self.pages.insert(page.url.clone(), MockPage::Parsed(page));
        self
    }

    /// Page served as HTML and parsed on each request
    pub fn with_html_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), MockPage::Html(html.to_string()));
        self
    }

    /// Make searches for `key` (a query) or fetches of `key` (a URL) fail
    pub fn fail_on(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self.failing.insert(normalize_name(key));
        self
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn page_calls(&self) -> Vec<String> {
        self.page_log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn record(log: &Mutex<Vec<String>>, entry: &str) {
        if let Ok(mut log) = log.lock() {
            log.push(entry.to_string());
        }
    }
}

#[async_trait]
impl OddsSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SourceError> {
        Self::record(&self.search_log, query);
        let key = normalize_name(query);
        if self.failing.contains(&key) {
            return Err(SourceError::fetch(&format!("mock://search/{}", query), "injected failure"));
        }
        Ok(self.searches.get(&key).cloned().unwrap_or_default())
    }

    async fn fighter_page(&self, url: &str) -> Result<FighterPage, SourceError> {
        Self::record(&self.page_log, url);
        if self.failing.contains(url) {
            return Err(SourceError::fetch(url, "injected failure"));
        }
        match self.pages.get(url) {
            Some(MockPage::Parsed(page)) => Ok(page.clone()),
            Some(MockPage::Html(html)) => parse_fighter_page(html, url, &self.base_url),
            None => Err(SourceError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linking::TableRow;
    use std::io::Write;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_mock_search() {
        let source = MockSource::new("test").with_search(
            "Jon Jones",
            vec![SearchCandidate::new("Jon Jones", "https://odds.test/fighters/jj")],
        );
        let hits = source.search("jon  JONES").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(source.search("Nobody").await.unwrap().is_empty());
        assert_eq!(source.search_calls(), vec!["jon  JONES", "Nobody"]);
    }

    #[tokio::test]
    async fn test_mock_pages_and_failures() {
        let page = FighterPage {
            url: "https://odds.test/fighters/a".to_string(),
            subject: Some("A".to_string()),
            rows: vec![TableRow::default()],
        };
        let source = MockSource::new("test")
            .with_page(page.clone())
            .with_html_page("https://odds.test/fighters/empty", "<p>gone</p>")
            .fail_on("https://odds.test/fighters/down");

        assert_eq!(source.fighter_page("https://odds.test/fighters/a").await.unwrap(), page);

        let err = source.fighter_page("https://odds.test/fighters/empty").await.unwrap_err();
        assert!(err.is_structure());

        let err = source.fighter_page("https://odds.test/fighters/missing").await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 404, .. }));

        assert!(source.fighter_page("https://odds.test/fighters/down").await.is_err());
        assert_eq!(source.page_calls().len(), 4);
    }

    #[tokio::test]
    async fn test_fixture_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fixture.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
  "base_url": "https://www.bestfightodds.com",
  "searches": {{ "Jon Jones": [{{ "display_name": "Jon Jones", "locator": "https://www.bestfightodds.com/fighters/Jon-Jones-819" }}] }},
  "pages": {{ "https://www.bestfightodds.com/fighters/Jon-Jones-819": "<h1>Jon Jones</h1><table><tr class=\"main-row\"><td><a href=\"/events/ufc-295\">x</a></td></tr></table>" }}
}}"#
        )
        .unwrap();

        let source = MockSource::from_fixture(MockFixture::load(&path).unwrap()).unwrap();
        let hits = source.search("Jon Jones").await.unwrap();
        let page = source.fighter_page(&hits[0].locator).await.unwrap();
        assert_eq!(page.subject.as_deref(), Some("Jon Jones"));
        assert_eq!(page.rows[0].links, vec!["https://www.bestfightodds.com/events/ufc-295"]);

        assert!(MockFixture::load(temp_dir.path().join("missing.json")).is_err());
    }
}
