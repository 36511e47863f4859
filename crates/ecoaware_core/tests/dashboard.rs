use ecoaware_core::service::campaign_service::SuggestionForm;
use ecoaware_core::{
    open_db_in_memory, AccessError, Actor, ArticleForm, ArticleService, ArticleStatus,
    CampaignForm, CampaignService, DashboardService, ServiceError, SqliteArticleRepository,
    SqliteCampaignRepository, SqliteUserRepository, User, UserRepository,
};
use rusqlite::Connection;

type Dashboard<'conn> = DashboardService<
    SqliteUserRepository<'conn>,
    SqliteArticleRepository<'conn>,
    SqliteCampaignRepository<'conn>,
>;

fn dashboard(conn: &Connection) -> Dashboard<'_> {
    DashboardService::new(
        SqliteUserRepository::new(conn),
        SqliteArticleRepository::new(conn),
        SqliteCampaignRepository::new(conn),
    )
}

fn create_user(conn: &Connection, username: &str, is_staff: bool) -> Actor {
    let mut user = User::new(username, "");
    user.is_staff = is_staff;
    SqliteUserRepository::new(conn).create_user(&user).unwrap();
    user.actor()
}

fn article(title: &str, status: ArticleStatus, is_featured: bool) -> ArticleForm {
    ArticleForm {
        title: title.to_string(),
        content: "Body".to_string(),
        status,
        is_featured,
        ..ArticleForm::default()
    }
}

#[test]
fn profile_reports_impact_points() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "author", true);
    let reader = create_user(&conn, "reader", false);
    let articles = ArticleService::new(SqliteArticleRepository::new(&conn));

    let first = articles
        .create_article(&author, &article("First", ArticleStatus::Published, false))
        .unwrap();
    articles
        .create_article(&author, &article("Second", ArticleStatus::Draft, false))
        .unwrap();
    for _ in 0..3 {
        articles.article_detail(&reader, &first.slug).unwrap();
    }

    let profile = dashboard(&conn).user_profile(&reader, "author").unwrap();
    assert_eq!(profile.user.username, "author");
    assert_eq!(profile.stats.total_articles, 2);
    assert_eq!(profile.stats.total_views, 3);
    assert_eq!(profile.stats.impact_points, 5);

    let err = dashboard(&conn).user_profile(&reader, "ghost").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "user", .. }));
}

#[test]
fn user_dashboard_shows_own_articles_only() {
    let conn = open_db_in_memory().unwrap();
    let author = create_user(&conn, "author", true);
    let other = create_user(&conn, "other", true);
    let articles = ArticleService::new(SqliteArticleRepository::new(&conn));
    for index in 0..6 {
        articles
            .create_article(
                &author,
                &article(&format!("Mine {index}"), ArticleStatus::Draft, false),
            )
            .unwrap();
    }
    articles
        .create_article(&other, &article("Theirs", ArticleStatus::Published, false))
        .unwrap();

    let view = dashboard(&conn).user_dashboard(&author).unwrap();
    assert_eq!(view.recent_articles.len(), 5);
    assert!(view
        .recent_articles
        .iter()
        .all(|article| article.author_id == author.user_id));
    assert_eq!(view.stats.total_articles, 6);
    assert_eq!(view.stats.impact_points, 6);
}

#[test]
fn admin_dashboard_counts_everything_and_is_staff_only() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true);
    let member = create_user(&conn, "member", false);

    ArticleService::new(SqliteArticleRepository::new(&conn))
        .create_article(&staff, &article("News", ArticleStatus::Published, false))
        .unwrap();
    let campaigns = CampaignService::new(SqliteCampaignRepository::new(&conn));
    campaigns
        .create_campaign(
            &staff,
            &CampaignForm {
                title: "Trees".to_string(),
                start_date: 0,
                end_date: 1,
                is_active: true,
                ..CampaignForm::default()
            },
        )
        .unwrap();
    campaigns
        .suggest_campaign(
            &member,
            &SuggestionForm {
                title: "Bike lanes".to_string(),
                ..SuggestionForm::default()
            },
        )
        .unwrap();

    let err = dashboard(&conn).admin_dashboard(&member).unwrap_err();
    assert!(matches!(err, ServiceError::Access(AccessError::StaffOnly)));

    let admin = dashboard(&conn).admin_dashboard(&staff).unwrap();
    assert_eq!(admin.total_users, 2);
    assert_eq!(admin.admin_users, 1);
    assert_eq!(admin.total_articles, 1);
    assert_eq!(admin.total_campaigns, 1);
    assert_eq!(admin.recent_articles.len(), 1);
    assert_eq!(admin.recent_campaigns.len(), 1);
    assert_eq!(admin.recent_users.len(), 2);
    assert_eq!(admin.suggestions.len(), 1);
}

#[test]
fn home_shows_published_content_only() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true);
    let articles = ArticleService::new(SqliteArticleRepository::new(&conn));
    articles
        .create_article(&staff, &article("Featured", ArticleStatus::Published, true))
        .unwrap();
    articles
        .create_article(&staff, &article("Hidden draft", ArticleStatus::Draft, true))
        .unwrap();
    articles
        .create_article(&staff, &article("Plain", ArticleStatus::Published, false))
        .unwrap();

    let home = dashboard(&conn).home().unwrap();
    assert_eq!(home.featured_articles.len(), 1);
    assert_eq!(home.featured_articles[0].title, "Featured");
    assert_eq!(home.recent_articles.len(), 2);
    assert!(home.recent_articles.iter().all(|article| article.is_published()));
    assert!(home.featured_campaigns.is_empty());
}
