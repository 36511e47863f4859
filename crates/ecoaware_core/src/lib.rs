//! Core domain logic for EcoAware.
//! This crate is the single source of truth for business invariants:
//! campaign goals, articles, members and their SQLite persistence.

pub mod config;
pub mod db;
pub mod goals;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use goals::{parse_goals, render_goals, GoalRecord, DEFAULT_GOAL_ICONS};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::article::{Article, ArticleId, ArticleStatus, Category, Comment};
pub use model::campaign::{Campaign, CampaignId, CampaignSuggestion, SuggestionStatus};
pub use model::user::{Actor, User, UserId};
pub use model::ValidationError;
pub use repo::article_repo::{ArticleListQuery, ArticleRepository, SqliteArticleRepository};
pub use repo::campaign_repo::{CampaignRepository, SqliteCampaignRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::article_service::{ArticleForm, ArticleService};
pub use service::campaign_service::{CampaignForm, CampaignService, ParticipationChange};
pub use service::dashboard_service::DashboardService;
pub use service::user_service::{StaffBootstrap, UserService};
pub use service::{AccessError, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
