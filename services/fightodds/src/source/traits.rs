use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::linking::TableRow;

/// One hit from the odds site's fighter search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub display_name: String,
    pub locator: String,
}

impl SearchCandidate {
    pub fn new(display_name: &str, locator: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            locator: locator.to_string(),
        }
    }
}

/// A fighter's odds history page reduced to its table rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FighterPage {
    pub url: String,
    /// Fighter name from the page heading
    pub subject: Option<String>,
    pub rows: Vec<TableRow>,
}

#[async_trait]
pub trait OddsSource: Send + Sync {
    fn name(&self) -> &str;

    /// Search fighters by free-text name; no hits is `Ok(vec![])`
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SourceError>;

    async fn fighter_page(&self, url: &str) -> Result<FighterPage, SourceError>;
}
