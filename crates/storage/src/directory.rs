use async_trait::async_trait;
use quiz_core::model::{Category, Question};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::record::parse_category;
use crate::repository::{QuestionSource, SourceError};

const EXTENSION: &str = "json";

/// Serves `<root>/<category>.json` files from a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryQuestionSource {
    root: PathBuf,
}

impl DirectoryQuestionSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, category: &Category) -> PathBuf {
        self.root.join(format!("{}.{EXTENSION}", category.as_str()))
    }
}

#[async_trait]
impl QuestionSource for DirectoryQuestionSource {
    async fn categories(&self) -> Result<Vec<Category>, SourceError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| SourceError::Listing(format!("{}: {e}", self.root.display())))?;

        let mut categories = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SourceError::Listing(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match Category::new(stem) {
                Ok(category) => categories.push(category),
                Err(err) => warn!(path = %path.display(), error = %err, "ignoring question file"),
            }
        }
        categories.sort();
        Ok(categories)
    }

    async fn fetch_category(&self, category: &Category) -> Result<Vec<Question>, SourceError> {
        let path = self.path_for(category);
        debug!(path = %path.display(), "reading question file");
        let body = tokio::fs::read(&path)
            .await
            .map_err(|e| SourceError::unavailable(category, format!("{}: {e}", path.display())))?;
        parse_category(category, &body)
    }
}
