use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reserved filter name meaning "every real category".
pub const ALL_CATEGORIES: &str = "ALL";

/// Category used when the player does not pick one.
pub const DEFAULT_CATEGORY: &str = "sample";

/// Validated category name (trimmed, non-empty, usable as a resource name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Create a validated category name.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyName` if the name is empty after trimming,
    /// `CategoryError::Reserved` for the `ALL` pseudo-category, and
    /// `CategoryError::InvalidCharacter` for path separators or dots at the start.
    pub fn new(value: impl Into<String>) -> Result<Self, CategoryError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CategoryError::EmptyName);
        }
        if trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return Err(CategoryError::Reserved);
        }
        if let Some(ch) = trimmed.chars().find(|ch| matches!(ch, '/' | '\\')) {
            return Err(CategoryError::InvalidCharacter { ch });
        }
        if trimmed.starts_with('.') {
            return Err(CategoryError::InvalidCharacter { ch: '.' });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The implicit category of the single-set quiz.
    #[must_use]
    pub fn default_category() -> Self {
        Self(DEFAULT_CATEGORY.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

/// Which questions a fetch should cover.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Union of every real category.
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Name used in routes and logs (`ALL` or the category name).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL_CATEGORIES) {
            return Ok(Self::All);
        }
        Category::new(s).map(Self::Only)
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        Self::Only(value)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category name cannot be empty")]
    EmptyName,
    #[error("category name `ALL` is reserved")]
    Reserved,
    #[error("category name contains invalid character {ch:?}")]
    InvalidCharacter { ch: char },
}
