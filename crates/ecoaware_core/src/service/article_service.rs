//! Article use-case service.
//!
//! # Responsibility
//! - Paginated article list with optional category filter.
//! - Staff-only article creation and category management.
//! - Author-only article/comment edits and deletions.
//! - View counting on detail reads.
//!
//! # Invariants
//! - Article and category slugs are derived once at creation and never
//!   change afterwards.
//! - Slug collisions are resolved with `-2`, `-3`, ... suffixes.

use crate::model::article::{
    normalize_tags, Article, ArticleStatus, Category, Comment, CommentId,
};
use crate::model::user::Actor;
use crate::repo::article_repo::{ArticleListQuery, ArticleRepository};
use crate::repo::RepoResult;
use crate::service::access::{require_login, require_owner, require_staff};
use crate::service::pagination::PageWindow;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Articles shown per list page.
pub const ARTICLES_PER_PAGE: u32 = 9;
const FALLBACK_ARTICLE_SLUG: &str = "article";
const FALLBACK_CATEGORY_SLUG: &str = "category";

/// Editable article fields as submitted by a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
    pub category_slug: Option<String>,
    pub status: ArticleStatus,
    pub is_featured: bool,
    pub tags: Vec<String>,
}

impl Default for ArticleForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            category_slug: None,
            status: ArticleStatus::Draft,
            is_featured: false,
            tags: Vec::new(),
        }
    }
}

/// One page of the article list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub window: PageWindow,
    pub categories: Vec<Category>,
    pub current_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDetail {
    pub article: Article,
    /// Active comments, newest first.
    pub comments: Vec<Comment>,
}

/// Article service facade over repository implementations.
pub struct ArticleService<R: ArticleRepository> {
    repo: R,
    per_page: u32,
}

impl<R: ArticleRepository> ArticleService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_page_size(repo, ARTICLES_PER_PAGE)
    }

    pub fn with_page_size(repo: R, per_page: u32) -> Self {
        Self {
            repo,
            per_page: per_page.max(1),
        }
    }

    /// Lists one page of articles, optionally restricted to a category.
    ///
    /// `raw_page` is the unparsed page parameter; see `PageWindow::resolve`.
    pub fn list_articles(
        &self,
        actor: &Actor,
        category_slug: Option<&str>,
        raw_page: Option<&str>,
    ) -> ServiceResult<ArticlePage> {
        require_login(actor)?;
        let current_category = category_slug
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let mut query = ArticleListQuery {
            category_slug: current_category.clone(),
            ..ArticleListQuery::default()
        };

        let total = self.repo.count_articles(&query)?;
        let window = PageWindow::resolve(raw_page, total, self.per_page);
        query.limit = Some(window.per_page);
        query.offset = window.offset();

        Ok(ArticlePage {
            articles: self.repo.list_articles(&query)?,
            window,
            categories: self.repo.list_categories()?,
            current_category,
        })
    }

    pub fn create_article(&self, actor: &Actor, form: &ArticleForm) -> ServiceResult<Article> {
        require_staff(actor)?;
        let mut article = Article::new(actor.user_id, form.title.trim(), form.content.clone());
        article.slug = unique_slug(&article.slug, FALLBACK_ARTICLE_SLUG, |slug| {
            self.repo.article_slug_exists(slug)
        })?;
        self.apply_form(&mut article, form)?;

        self.repo.create_article(&article)?;
        info!(
            "event=article_create module=service status=ok article_id={} tags={}",
            article.id,
            article.tags.len()
        );
        self.reload_article(&article.slug, "created article not found in read-back")
    }

    /// Counts one view, then returns the article with its active comments.
    pub fn article_detail(&self, actor: &Actor, slug: &str) -> ServiceResult<ArticleDetail> {
        require_login(actor)?;
        let mut article = self.load_article(slug)?;
        article.views = self.repo.increment_views(article.id)?;
        let comments = self.repo.list_comments(article.id, true)?;
        Ok(ArticleDetail { article, comments })
    }

    pub fn add_comment(&self, actor: &Actor, slug: &str, body: &str) -> ServiceResult<Comment> {
        require_login(actor)?;
        let article = self.load_article(slug)?;
        let comment = Comment::new(article.id, actor.user_id, body.trim());
        self.repo.create_comment(&comment)?;
        info!(
            "event=comment_create module=service status=ok article_id={} comment_id={}",
            article.id, comment.id
        );
        Ok(comment)
    }

    pub fn update_article(
        &self,
        actor: &Actor,
        slug: &str,
        form: &ArticleForm,
    ) -> ServiceResult<Article> {
        let mut article = self.load_article(slug)?;
        require_owner(actor, article.author_id)?;
        article.title = form.title.trim().to_string();
        article.content = form.content.clone();
        self.apply_form(&mut article, form)?;

        self.repo.update_article(&article)?;
        info!(
            "event=article_update module=service status=ok article_id={}",
            article.id
        );
        self.reload_article(&article.slug, "updated article not found in read-back")
    }

    pub fn delete_article(&self, actor: &Actor, slug: &str) -> ServiceResult<()> {
        let article = self.load_article(slug)?;
        require_owner(actor, article.author_id)?;
        self.repo.delete_article(article.id)?;
        info!(
            "event=article_delete module=service status=ok article_id={}",
            article.id
        );
        Ok(())
    }

    /// Deletes a comment and returns the slug of its article.
    pub fn delete_comment(&self, actor: &Actor, id: CommentId) -> ServiceResult<String> {
        let comment = self
            .repo
            .get_comment(id)?
            .ok_or_else(|| ServiceError::not_found("comment", id))?;
        require_owner(actor, comment.author_id)?;
        let article = self
            .repo
            .get_article(comment.article_id)?
            .ok_or(ServiceError::InconsistentState("comment article missing"))?;
        self.repo.delete_comment(id)?;
        Ok(article.slug)
    }

    pub fn list_categories(&self, actor: &Actor) -> ServiceResult<Vec<Category>> {
        require_staff(actor)?;
        Ok(self.repo.list_categories()?)
    }

    pub fn create_category(&self, actor: &Actor, name: &str) -> ServiceResult<Category> {
        require_staff(actor)?;
        let mut category = Category::new(name.trim());
        category.slug = unique_slug(&category.slug, FALLBACK_CATEGORY_SLUG, |slug| {
            self.repo.category_slug_exists(slug)
        })?;
        self.repo.create_category(&category)?;
        info!(
            "event=category_create module=service status=ok category_id={}",
            category.id
        );
        Ok(category)
    }

    pub fn rename_category(&self, actor: &Actor, slug: &str, name: &str) -> ServiceResult<Category> {
        require_staff(actor)?;
        let mut category = self.load_category(slug)?;
        category.name = name.trim().to_string();
        self.repo.update_category(&category)?;
        info!(
            "event=category_rename module=service status=ok category_id={}",
            category.id
        );
        Ok(category)
    }

    pub fn delete_category(&self, actor: &Actor, slug: &str) -> ServiceResult<Category> {
        require_staff(actor)?;
        let category = self.load_category(slug)?;
        self.repo.delete_category(category.id)?;
        info!(
            "event=category_delete module=service status=ok category_id={}",
            category.id
        );
        Ok(category)
    }

    fn apply_form(&self, article: &mut Article, form: &ArticleForm) -> ServiceResult<()> {
        article.category_id = match form
            .category_slug
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            Some(slug) => Some(self.load_category(slug)?.id),
            None => None,
        };
        article.status = form.status;
        article.is_featured = form.is_featured;
        article.tags = normalize_tags(&form.tags);
        Ok(())
    }

    fn load_article(&self, slug: &str) -> ServiceResult<Article> {
        self.repo
            .get_article_by_slug(slug)?
            .ok_or_else(|| ServiceError::not_found("article", slug))
    }

    fn reload_article(&self, slug: &str, details: &'static str) -> ServiceResult<Article> {
        self.repo
            .get_article_by_slug(slug)?
            .ok_or(ServiceError::InconsistentState(details))
    }

    fn load_category(&self, slug: &str) -> ServiceResult<Category> {
        self.repo
            .get_category_by_slug(slug)?
            .ok_or_else(|| ServiceError::not_found("category", slug))
    }
}

/// Picks `base`, or `base-2`, `base-3`, ... until `exists` says it is free.
fn unique_slug(
    base: &str,
    fallback: &str,
    exists: impl Fn(&str) -> RepoResult<bool>,
) -> RepoResult<String> {
    let base = if base.is_empty() { fallback } else { base };
    if !exists(base)? {
        return Ok(base.to_string());
    }
    let mut suffix = 2_u32;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !exists(&candidate)? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}
