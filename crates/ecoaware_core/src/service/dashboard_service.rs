//! Read-only dashboard, home page and profile aggregations.
//!
//! # Invariants
//! - Impact points are `total_views + total_articles`.
//! - Every aggregation propagates repository failures; none of them
//!   degrades to an empty page.

use crate::model::article::Article;
use crate::model::campaign::{Campaign, CampaignSuggestion};
use crate::model::user::{Actor, User};
use crate::repo::article_repo::{ArticleListQuery, ArticleRepository, AuthorStats};
use crate::repo::campaign_repo::CampaignRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::access::{require_login, require_staff};
use crate::service::{ServiceError, ServiceResult};

const HOME_FEATURED_ARTICLES: u32 = 3;
const HOME_FEATURED_CAMPAIGNS: u32 = 3;
const HOME_RECENT_ARTICLES: u32 = 6;
const DASHBOARD_RECENT_ITEMS: u32 = 5;
const DASHBOARD_RECENT_SUGGESTIONS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePage {
    pub featured_articles: Vec<Article>,
    pub featured_campaigns: Vec<Campaign>,
    pub recent_articles: Vec<Article>,
}

/// Aggregated contribution numbers for one member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpactStats {
    pub total_articles: u64,
    pub total_views: u64,
    pub impact_points: u64,
}

impl From<AuthorStats> for ImpactStats {
    fn from(stats: AuthorStats) -> Self {
        Self {
            total_articles: stats.total_articles,
            total_views: stats.total_views,
            impact_points: stats.total_views.saturating_add(stats.total_articles),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDashboard {
    pub recent_articles: Vec<Article>,
    pub stats: ImpactStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDashboard {
    pub total_users: u64,
    pub total_articles: u64,
    pub total_campaigns: u64,
    pub admin_users: u64,
    pub recent_articles: Vec<Article>,
    pub recent_campaigns: Vec<Campaign>,
    pub recent_users: Vec<User>,
    pub suggestions: Vec<CampaignSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: User,
    pub stats: ImpactStats,
}

/// Aggregation service spanning users, articles and campaigns.
pub struct DashboardService<U, A, C>
where
    U: UserRepository,
    A: ArticleRepository,
    C: CampaignRepository,
{
    users: U,
    articles: A,
    campaigns: C,
}

impl<U, A, C> DashboardService<U, A, C>
where
    U: UserRepository,
    A: ArticleRepository,
    C: CampaignRepository,
{
    pub fn new(users: U, articles: A, campaigns: C) -> Self {
        Self {
            users,
            articles,
            campaigns,
        }
    }

    /// Public landing page content.
    pub fn home(&self) -> ServiceResult<HomePage> {
        let featured_articles = self.articles.list_articles(&ArticleListQuery {
            published_only: true,
            featured_only: true,
            limit: Some(HOME_FEATURED_ARTICLES),
            ..ArticleListQuery::default()
        })?;
        let recent_articles = self.articles.list_articles(&ArticleListQuery {
            published_only: true,
            limit: Some(HOME_RECENT_ARTICLES),
            ..ArticleListQuery::default()
        })?;
        Ok(HomePage {
            featured_articles,
            featured_campaigns: self
                .campaigns
                .list_featured_campaigns(HOME_FEATURED_CAMPAIGNS)?,
            recent_articles,
        })
    }

    pub fn user_dashboard(&self, actor: &Actor) -> ServiceResult<UserDashboard> {
        require_login(actor)?;
        let recent_articles = self.articles.list_articles(&ArticleListQuery {
            author_id: Some(actor.user_id),
            limit: Some(DASHBOARD_RECENT_ITEMS),
            ..ArticleListQuery::default()
        })?;
        let stats = self.articles.author_stats(actor.user_id)?;
        Ok(UserDashboard {
            recent_articles,
            stats: stats.into(),
        })
    }

    pub fn admin_dashboard(&self, actor: &Actor) -> ServiceResult<AdminDashboard> {
        require_staff(actor)?;
        let all_articles = ArticleListQuery::default();
        Ok(AdminDashboard {
            total_users: self.users.count_users(false)?,
            total_articles: self.articles.count_articles(&all_articles)?,
            total_campaigns: self.campaigns.count_campaigns()?,
            admin_users: self.users.count_users(true)?,
            recent_articles: self.articles.list_articles(&ArticleListQuery {
                limit: Some(DASHBOARD_RECENT_ITEMS),
                ..all_articles
            })?,
            recent_campaigns: self.campaigns.recent_campaigns(DASHBOARD_RECENT_ITEMS)?,
            recent_users: self.users.recent_users(DASHBOARD_RECENT_ITEMS)?,
            suggestions: self
                .campaigns
                .recent_suggestions(DASHBOARD_RECENT_SUGGESTIONS)?,
        })
    }

    pub fn user_profile(&self, actor: &Actor, username: &str) -> ServiceResult<UserProfile> {
        require_login(actor)?;
        let user = self
            .users
            .get_user_by_username(username)?
            .ok_or_else(|| ServiceError::not_found("user", username))?;
        let stats = self.articles.author_stats(user.id)?;
        Ok(UserProfile {
            user,
            stats: stats.into(),
        })
    }
}
