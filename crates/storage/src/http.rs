use async_trait::async_trait;
use quiz_core::model::{Category, Question};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::record::parse_category;
use crate::repository::{QuestionSource, SourceError};

/// Fetches `<base_url>/<category>.json` from a static file host.
///
/// Static hosts cannot list directories, so the category list is configured
/// up front.
#[derive(Clone, Debug)]
pub struct HttpQuestionSource {
    client: Client,
    base_url: Url,
    categories: Vec<Category>,
}

impl HttpQuestionSource {
    #[must_use]
    pub fn new(base_url: Url, categories: impl IntoIterator<Item = Category>) -> Self {
        Self::with_client(Client::new(), base_url, categories)
    }

    #[must_use]
    pub fn with_client(
        client: Client,
        mut base_url: Url,
        categories: impl IntoIterator<Item = Category>,
    ) -> Self {
        // `Url::join` replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let mut categories: Vec<Category> = categories.into_iter().collect();
        categories.sort();
        categories.dedup();
        Self {
            client,
            base_url,
            categories,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resource URL for a category.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the URL cannot be built.
    pub fn url_for(&self, category: &Category) -> Result<Url, SourceError> {
        self.base_url
            .join(&format!("{}.json", category.as_str()))
            .map_err(|e| SourceError::unavailable(category, e))
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn categories(&self) -> Result<Vec<Category>, SourceError> {
        Ok(self.categories.clone())
    }

    async fn fetch_category(&self, category: &Category) -> Result<Vec<Question>, SourceError> {
        let url = self.url_for(category)?;
        debug!(%url, "fetching question set");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::unavailable(category, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::unavailable(category, format!("http status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::unavailable(category, e))?;
        parse_category(category, &body)
    }
}
