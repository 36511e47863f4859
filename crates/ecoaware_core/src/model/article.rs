//! Article, category and comment models.
//!
//! # Invariants
//! - `slug` values are lowercase ASCII words joined by single `-`.
//! - `tags` are normalized: trimmed, lowercase, deduplicated, sorted.
//! - `views` never goes negative.

use super::user::UserId;
use super::{now_epoch_ms, require_max_chars, require_non_blank, require_non_nil, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

pub type ArticleId = Uuid;
pub type CategoryId = Uuid;
pub type CommentId = Uuid;

const TITLE_MAX_CHARS: usize = 200;
const CATEGORY_NAME_MAX_CHARS: usize = 100;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));
static NON_SLUG_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));

/// Publication state of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Published,
}

/// Article grouping used by the list filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

impl Category {
    /// Creates a category whose slug is derived from `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_nil("category.id", self.id)?;
        require_non_blank("category.name", &self.name)?;
        require_max_chars("category.name", &self.name, CATEGORY_NAME_MAX_CHARS)?;
        validate_slug(&self.slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category_id: Option<CategoryId>,
    pub author_id: UserId,
    pub status: ArticleStatus,
    pub is_featured: bool,
    pub views: i64,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Article {
    /// Creates a draft article with a slug derived from `title`.
    pub fn new(author_id: UserId, title: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        let slug = slugify(&title);
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            content: content.into(),
            category_id: None,
            author_id,
            status: ArticleStatus::Draft,
            is_featured: false,
            views: 0,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_nil("article.id", self.id)?;
        require_non_nil("article.author_id", self.author_id)?;
        require_non_blank("article.title", &self.title)?;
        require_max_chars("article.title", &self.title, TITLE_MAX_CHARS)?;
        validate_slug(&self.slug)?;
        if self.views < 0 {
            return Err(ValidationError::NegativeCounter {
                field: "article.views",
                value: self.views,
            });
        }
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub author_id: UserId,
    pub body: String,
    pub is_active: bool,
    pub created_at: i64,
}

impl Comment {
    pub fn new(article_id: ArticleId, author_id: UserId, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            article_id,
            author_id,
            body: body.into(),
            is_active: true,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_nil("comment.id", self.id)?;
        require_non_blank("comment.body", &self.body)
    }
}

/// Derives a URL slug: lowercase ASCII alphanumerics joined by `-`.
///
/// Returns an empty string when nothing slug-worthy remains; callers fall
/// back to a generated slug in that case.
pub fn slugify(value: &str) -> String {
    let lowered = value.trim().to_ascii_lowercase();
    NON_SLUG_CHARS_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(slug) {
        return Ok(());
    }
    Err(ValidationError::InvalidSlug(slug.to_string()))
}

/// Normalizes one tag value: trimmed, lowercase, `None` when blank.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}
