// articles.rs — Article inspection: paginated list.

use anyhow::Context;
use clap::Subcommand;
use ecoaware_core::service::article_service::ArticlePage;
use ecoaware_core::{
    open_db, AppConfig, ArticleService, SqliteArticleRepository, SqliteUserRepository,
    UserRepository,
};
use rusqlite::Connection;

#[derive(Subcommand)]
pub enum ArticlesCommands {
    /// Print one page of the article list as seen by a member.
    List {
        /// Username whose view of the list is printed.
        #[arg(long = "as")]
        username: String,
        /// Restrict to one category slug.
        #[arg(long)]
        category: Option<String>,
        /// Page number (out-of-range values land on the last page).
        #[arg(long)]
        page: Option<String>,
    },
}

pub fn execute(cmd: &ArticlesCommands, config: &AppConfig) -> anyhow::Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("cannot open database {}", config.db_path.display()))?;

    match cmd {
        ArticlesCommands::List {
            username,
            category,
            page,
        } => {
            let listing = list_page(
                &conn,
                config.articles_per_page,
                username,
                category.as_deref(),
                page.as_deref(),
            )?;
            print_page(&listing);
            Ok(())
        }
    }
}

fn list_page(
    conn: &Connection,
    per_page: u32,
    username: &str,
    category: Option<&str>,
    page: Option<&str>,
) -> anyhow::Result<ArticlePage> {
    let user = SqliteUserRepository::new(conn)
        .get_user_by_username(username.trim())?
        .with_context(|| format!("user `{username}` not found"))?;
    let service = ArticleService::with_page_size(SqliteArticleRepository::new(conn), per_page);
    service
        .list_articles(&user.actor(), category, page)
        .context("cannot list articles")
}

fn print_page(listing: &ArticlePage) {
    let window = &listing.window;
    println!(
        "page {}/{} ({} articles, {} per page)",
        window.number, window.num_pages, window.total, window.per_page
    );
    for article in &listing.articles {
        println!(
            "{}  {:<9}  views={:<5} {}",
            article.slug,
            format!("{:?}", article.status).to_lowercase(),
            article.views,
            article.title
        );
    }
}
