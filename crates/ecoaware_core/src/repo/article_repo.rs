//! Article, category and comment repository with SQLite implementation.
//!
//! # Responsibility
//! - Persist articles together with their normalized tag set.
//! - Own category and comment storage used by the article pages.
//!
//! # Invariants
//! - Article writes replace the whole tag set in the same transaction.
//! - `increment_views` is a single atomic `UPDATE`.
//! - Slugs are unique per table; duplicates surface as `Conflict`.

use super::{bool_to_int, clamp_count, map_write_error, parse_bool, parse_uuid};
use super::{RepoError, RepoResult};
use crate::model::article::{
    normalize_tags, Article, ArticleId, ArticleStatus, Category, CategoryId, Comment, CommentId,
};
use crate::model::user::UserId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ARTICLE_SELECT_SQL: &str = "SELECT
    articles.id,
    articles.title,
    articles.slug,
    articles.content,
    articles.category_id,
    articles.author_id,
    articles.status,
    articles.is_featured,
    articles.views,
    articles.created_at,
    articles.updated_at
FROM articles";

/// Filter and pagination options for article lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleListQuery {
    /// Exact category slug match.
    pub category_slug: Option<String>,
    pub author_id: Option<UserId>,
    pub published_only: bool,
    pub featured_only: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Aggregated numbers for one author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorStats {
    pub total_articles: u64,
    pub total_views: u64,
}

/// Repository interface for articles, categories and comments.
pub trait ArticleRepository {
    fn create_article(&self, article: &Article) -> RepoResult<ArticleId>;
    /// Full replacement, including tags. Bumps `updated_at`.
    fn update_article(&self, article: &Article) -> RepoResult<()>;
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    fn get_article_by_slug(&self, slug: &str) -> RepoResult<Option<Article>>;
    fn article_slug_exists(&self, slug: &str) -> RepoResult<bool>;
    /// Sorted by `created_at DESC, id ASC`.
    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>>;
    /// Counts rows matching the filters of `query`; pagination is ignored.
    fn count_articles(&self, query: &ArticleListQuery) -> RepoResult<u64>;
    fn delete_article(&self, id: ArticleId) -> RepoResult<()>;
    /// Returns the view count after incrementing.
    fn increment_views(&self, id: ArticleId) -> RepoResult<i64>;
    fn author_stats(&self, author_id: UserId) -> RepoResult<AuthorStats>;

    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn update_category(&self, category: &Category) -> RepoResult<()>;
    fn get_category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>>;
    fn category_slug_exists(&self, slug: &str) -> RepoResult<bool>;
    /// Sorted by name, case-insensitive.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;

    fn create_comment(&self, comment: &Comment) -> RepoResult<CommentId>;
    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>>;
    /// Newest first.
    fn list_comments(&self, article_id: ArticleId, active_only: bool) -> RepoResult<Vec<Comment>>;
    fn delete_comment(&self, id: CommentId) -> RepoResult<()>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_articles(&self, sql: &str, bind: Vec<Value>) -> RepoResult<Vec<Article>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind))?;
        let mut articles = Vec::new();
        while let Some(row) = rows.next()? {
            let mut article = parse_article_row(row)?;
            article.tags = load_tags_for_article(self.conn, &article.id.to_string())?;
            articles.push(article);
        }
        Ok(articles)
    }

    fn exists(&self, sql: &str, key: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(sql, [key], |row| row.get(0))?;
        Ok(exists == 1)
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn create_article(&self, article: &Article) -> RepoResult<ArticleId> {
        article.validate()?;
        let id_text = article.id.to_string();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO articles (
                id,
                title,
                slug,
                content,
                category_id,
                author_id,
                status,
                is_featured,
                views,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                id_text.as_str(),
                article.title.as_str(),
                article.slug.as_str(),
                article.content.as_str(),
                article.category_id.map(|id| id.to_string()),
                article.author_id.to_string(),
                article_status_to_db(article.status),
                bool_to_int(article.is_featured),
                article.views,
                article.created_at,
                article.updated_at,
            ],
        )
        .map_err(|err| map_write_error(err, || format!("article slug `{}` is taken", article.slug)))?;
        replace_article_tags(&tx, id_text.as_str(), &article.tags)?;
        tx.commit()?;

        Ok(article.id)
    }

    fn update_article(&self, article: &Article) -> RepoResult<()> {
        article.validate()?;
        let id_text = article.id.to_string();

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx
            .execute(
                "UPDATE articles
                 SET
                    title = ?1,
                    slug = ?2,
                    content = ?3,
                    category_id = ?4,
                    status = ?5,
                    is_featured = ?6,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?7;",
                params![
                    article.title.as_str(),
                    article.slug.as_str(),
                    article.content.as_str(),
                    article.category_id.map(|id| id.to_string()),
                    article_status_to_db(article.status),
                    bool_to_int(article.is_featured),
                    id_text.as_str(),
                ],
            )
            .map_err(|err| {
                map_write_error(err, || format!("article slug `{}` is taken", article.slug))
            })?;
        if changed == 0 {
            return Err(RepoError::not_found("article", article.id));
        }
        replace_article_tags(&tx, id_text.as_str(), &article.tags)?;
        tx.commit()?;

        Ok(())
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        let articles = self.query_articles(
            &format!("{ARTICLE_SELECT_SQL} WHERE articles.id = ?;"),
            vec![Value::Text(id.to_string())],
        )?;
        Ok(articles.into_iter().next())
    }

    fn get_article_by_slug(&self, slug: &str) -> RepoResult<Option<Article>> {
        let articles = self.query_articles(
            &format!("{ARTICLE_SELECT_SQL} WHERE articles.slug = ?;"),
            vec![Value::Text(slug.to_string())],
        )?;
        Ok(articles.into_iter().next())
    }

    fn article_slug_exists(&self, slug: &str) -> RepoResult<bool> {
        self.exists("SELECT EXISTS(SELECT 1 FROM articles WHERE slug = ?1);", slug)
    }

    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>> {
        let (filter_sql, mut bind_values) = article_filter(query);
        let mut sql = format!("{ARTICLE_SELECT_SQL}{filter_sql}");
        sql.push_str(" ORDER BY articles.created_at DESC, articles.id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        self.query_articles(&sql, bind_values)
    }

    fn count_articles(&self, query: &ArticleListQuery) -> RepoResult<u64> {
        let (filter_sql, bind_values) = article_filter(query);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM articles{filter_sql};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        Ok(clamp_count(count))
    }

    fn delete_article(&self, id: ArticleId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM articles WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found("article", id));
        }
        Ok(())
    }

    fn increment_views(&self, id: ArticleId) -> RepoResult<i64> {
        let views: Option<i64> = self
            .conn
            .query_row(
                "UPDATE articles SET views = views + 1 WHERE id = ?1 RETURNING views;",
                [id.to_string()],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        views.ok_or_else(|| RepoError::not_found("article", id))
    }

    fn author_stats(&self, author_id: UserId) -> RepoResult<AuthorStats> {
        let (total_articles, total_views): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(views), 0) FROM articles WHERE author_id = ?1;",
            [author_id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(AuthorStats {
            total_articles: clamp_count(total_articles),
            total_views: clamp_count(total_views),
        })
    }

    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        category.validate()?;
        self.conn
            .execute(
                "INSERT INTO categories (id, name, slug) VALUES (?1, ?2, ?3);",
                params![
                    category.id.to_string(),
                    category.name.as_str(),
                    category.slug.as_str()
                ],
            )
            .map_err(|err| {
                map_write_error(err, || format!("category slug `{}` is taken", category.slug))
            })?;
        Ok(category.id)
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        category.validate()?;
        let changed = self
            .conn
            .execute(
                "UPDATE categories SET name = ?1, slug = ?2 WHERE id = ?3;",
                params![
                    category.name.as_str(),
                    category.slug.as_str(),
                    category.id.to_string()
                ],
            )
            .map_err(|err| {
                map_write_error(err, || format!("category slug `{}` is taken", category.slug))
            })?;
        if changed == 0 {
            return Err(RepoError::not_found("category", category.id));
        }
        Ok(())
    }

    fn get_category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, slug FROM categories WHERE slug = ?1;")?;
        let mut rows = stmt.query([slug])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn category_slug_exists(&self, slug: &str) -> RepoResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = ?1);",
            slug,
        )
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, slug FROM categories ORDER BY name COLLATE NOCASE ASC;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found("category", id));
        }
        Ok(())
    }

    fn create_comment(&self, comment: &Comment) -> RepoResult<CommentId> {
        comment.validate()?;
        self.conn.execute(
            "INSERT INTO comments (id, article_id, author_id, body, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                comment.id.to_string(),
                comment.article_id.to_string(),
                comment.author_id.to_string(),
                comment.body.as_str(),
                bool_to_int(comment.is_active),
                comment.created_at,
            ],
        )?;
        Ok(comment.id)
    }

    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, article_id, author_id, body, is_active, created_at
             FROM comments
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_comment_row(row)?));
        }
        Ok(None)
    }

    fn list_comments(&self, article_id: ArticleId, active_only: bool) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, article_id, author_id, body, is_active, created_at
             FROM comments
             WHERE article_id = ?1
               AND (?2 = 0 OR is_active = 1)
             ORDER BY created_at DESC, id ASC;",
        )?;
        let mut rows = stmt.query(params![article_id.to_string(), bool_to_int(active_only)])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }
        Ok(comments)
    }

    fn delete_comment(&self, id: CommentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found("comment", id));
        }
        Ok(())
    }
}

fn article_filter(query: &ArticleListQuery) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1 = 1");
    let mut bind_values = Vec::new();

    if let Some(slug) = query.category_slug.as_ref() {
        sql.push_str(
            " AND articles.category_id IN (SELECT id FROM categories WHERE slug = ?)",
        );
        bind_values.push(Value::Text(slug.clone()));
    }
    if let Some(author_id) = query.author_id {
        sql.push_str(" AND articles.author_id = ?");
        bind_values.push(Value::Text(author_id.to_string()));
    }
    if query.published_only {
        sql.push_str(" AND articles.status = 'published'");
    }
    if query.featured_only {
        sql.push_str(" AND articles.is_featured = 1");
    }

    (sql, bind_values)
}

fn replace_article_tags(conn: &Connection, article_id: &str, tags: &[String]) -> RepoResult<()> {
    conn.execute(
        "DELETE FROM article_tags WHERE article_id = ?1;",
        [article_id],
    )?;

    for tag in normalize_tags(tags) {
        conn.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1);", [tag.as_str()])?;
        conn.execute(
            "INSERT OR IGNORE INTO article_tags (article_id, tag_id)
             SELECT ?1, id
             FROM tags
             WHERE name = ?2 COLLATE NOCASE;",
            params![article_id, tag.as_str()],
        )?;
    }
    Ok(())
}

fn load_tags_for_article(conn: &Connection, article_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM article_tags atg
         INNER JOIN tags t ON t.id = atg.tag_id
         WHERE atg.article_id = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([article_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}

fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let id_text: String = row.get("id")?;
    let author_text: String = row.get("author_id")?;
    let category_id = match row.get::<_, Option<String>>("category_id")? {
        Some(value) => Some(parse_uuid(&value, "articles.category_id")?),
        None => None,
    };
    let status_text: String = row.get("status")?;
    let status = parse_article_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid article status `{status_text}` in articles.status"
        ))
    })?;

    let article = Article {
        id: parse_uuid(&id_text, "articles.id")?,
        title: row.get("title")?,
        slug: row.get("slug")?,
        content: row.get("content")?,
        category_id,
        author_id: parse_uuid(&author_text, "articles.author_id")?,
        status,
        is_featured: parse_bool(row.get("is_featured")?, "articles.is_featured")?,
        views: row.get("views")?,
        tags: Vec::new(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    article.validate()?;
    Ok(article)
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id_text: String = row.get("id")?;
    let category = Category {
        id: parse_uuid(&id_text, "categories.id")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
    };
    category.validate()?;
    Ok(category)
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    let id_text: String = row.get("id")?;
    let article_text: String = row.get("article_id")?;
    let author_text: String = row.get("author_id")?;
    let comment = Comment {
        id: parse_uuid(&id_text, "comments.id")?,
        article_id: parse_uuid(&article_text, "comments.article_id")?,
        author_id: parse_uuid(&author_text, "comments.author_id")?,
        body: row.get("body")?,
        is_active: parse_bool(row.get("is_active")?, "comments.is_active")?,
        created_at: row.get("created_at")?,
    };
    comment.validate()?;
    Ok(comment)
}

fn article_status_to_db(status: ArticleStatus) -> &'static str {
    match status {
        ArticleStatus::Draft => "draft",
        ArticleStatus::Published => "published",
    }
}

fn parse_article_status(value: &str) -> Option<ArticleStatus> {
    match value {
        "draft" => Some(ArticleStatus::Draft),
        "published" => Some(ArticleStatus::Published),
        _ => None,
    }
}
