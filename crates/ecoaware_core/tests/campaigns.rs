use ecoaware_core::repo::campaign_repo::CampaignRepository;
use ecoaware_core::service::campaign_service::SuggestionForm;
use ecoaware_core::{
    open_db_in_memory, AccessError, Actor, CampaignForm, CampaignService, GoalRecord,
    ParticipationChange, ServiceError, SqliteCampaignRepository, SqliteUserRepository,
    SuggestionStatus, User, UserRepository, DEFAULT_GOAL_ICONS,
};
use rusqlite::Connection;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const NOW: i64 = 1_700_000_000_000;

fn create_user(conn: &Connection, username: &str, is_staff: bool) -> User {
    let mut user = User::new(username, "");
    user.is_staff = is_staff;
    SqliteUserRepository::new(conn).create_user(&user).unwrap();
    user
}

fn service(conn: &Connection) -> CampaignService<SqliteCampaignRepository<'_>> {
    CampaignService::new(SqliteCampaignRepository::new(conn))
}

fn form(title: &str, start_date: i64, end_date: i64, goals_text: &str) -> CampaignForm {
    CampaignForm {
        title: title.to_string(),
        description: "Community campaign".to_string(),
        start_date,
        end_date,
        is_active: true,
        goals_text: goals_text.to_string(),
        ..CampaignForm::default()
    }
}

#[test]
fn created_campaign_persists_normalized_goals_in_order() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true).actor();
    let service = service(&conn);

    let created = service
        .create_campaign(
            &staff,
            &form(
                "Clean Rivers",
                NOW,
                NOW + DAY_MS,
                "plant 100 native trees along the river bank\n\nreduce plastic\n🎯 | Custom | Keep verbatim",
            ),
        )
        .unwrap();

    assert_eq!(
        created.goals,
        vec![
            GoalRecord::new(
                DEFAULT_GOAL_ICONS[0],
                "Plant 100 native trees along...",
                "plant 100 native trees along the river bank",
            ),
            GoalRecord::new(DEFAULT_GOAL_ICONS[2], "Reduce plastic", "reduce plastic"),
            GoalRecord::new("🎯", "Custom", "Keep verbatim"),
        ]
    );

    let stored = SqliteCampaignRepository::new(&conn)
        .get_campaign(created.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.goals, created.goals);
}

#[test]
fn edit_form_round_trips_goals_without_change() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true).actor();
    let service = service(&conn);

    let created = service
        .create_campaign(
            &staff,
            &form("Solar", NOW, NOW + DAY_MS, "install rooftop solar panels on every school"),
        )
        .unwrap();

    let edit = service.edit_form(&staff, created.id).unwrap();
    assert_eq!(
        edit.goals_text,
        format!(
            "{} | Install rooftop solar panels on... | install rooftop solar panels on every school",
            DEFAULT_GOAL_ICONS[0]
        )
    );

    let updated = service.update_campaign(&staff, created.id, &edit).unwrap();
    assert_eq!(updated.goals, created.goals);
}

#[test]
fn update_replaces_goals_wholesale() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true).actor();
    let service = service(&conn);

    let created = service
        .create_campaign(&staff, &form("Bees", NOW, NOW + DAY_MS, "one\ntwo\nthree"))
        .unwrap();
    assert_eq!(created.goals.len(), 3);

    let updated = service
        .update_campaign(&staff, created.id, &form("Bees", NOW, NOW + DAY_MS, "  \n"))
        .unwrap();
    assert!(updated.goals.is_empty());
}

#[test]
fn campaign_management_is_staff_only() {
    let conn = open_db_in_memory().unwrap();
    let member = create_user(&conn, "member", false).actor();
    let service = service(&conn);

    let err = service
        .create_campaign(&member, &form("Nope", NOW, NOW, ""))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Access(AccessError::StaffOnly)));

    let anonymous = Actor {
        user_id: uuid::Uuid::nil(),
        is_staff: false,
        is_active: false,
    };
    let err = service.list_campaigns(&anonymous, NOW).unwrap_err();
    assert!(matches!(err, ServiceError::Access(AccessError::LoginRequired)));
}

#[test]
fn end_before_start_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true).actor();

    let err = service(&conn)
        .create_campaign(&staff, &form("Backwards", NOW, NOW - DAY_MS, ""))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn listing_splits_active_and_archived_by_end_date() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true).actor();
    let service = service(&conn);

    let later = service
        .create_campaign(&staff, &form("Later", NOW - DAY_MS, NOW + 2 * DAY_MS, ""))
        .unwrap();
    let sooner = service
        .create_campaign(&staff, &form("Sooner", NOW - DAY_MS, NOW + DAY_MS, ""))
        .unwrap();
    let ended = service
        .create_campaign(&staff, &form("Ended", NOW - 3 * DAY_MS, NOW - DAY_MS, ""))
        .unwrap();

    let listing = service.list_campaigns(&staff, NOW).unwrap();
    let active_ids = listing.active.iter().map(|c| c.id).collect::<Vec<_>>();
    assert_eq!(active_ids, vec![sooner.id, later.id]);
    assert_eq!(listing.archived.len(), 1);
    assert_eq!(listing.archived[0].id, ended.id);
    assert!(listing.has_archived);
    assert!(listing.is_admin);
}

#[test]
fn toggle_participation_joins_then_leaves() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true).actor();
    let member = create_user(&conn, "member", false).actor();
    let service = service(&conn);
    let campaign = service
        .create_campaign(&staff, &form("Join me", NOW, NOW + DAY_MS, ""))
        .unwrap();

    assert_eq!(
        service.toggle_participation(&member, campaign.id).unwrap(),
        ParticipationChange::Joined
    );
    let (_, participants) = service.participants(&member, campaign.id).unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].id, member.user_id);

    assert_eq!(
        service.toggle_participation(&member, campaign.id).unwrap(),
        ParticipationChange::Left
    );
    let (_, participants) = service.participants(&member, campaign.id).unwrap();
    assert!(participants.is_empty());
}

#[test]
fn detail_lists_actor_first_and_caps_recent_participants() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true).actor();
    let service = service(&conn);
    let campaign = service
        .create_campaign(&staff, &form("Crowd", NOW, NOW + DAY_MS, ""))
        .unwrap();

    let viewer = create_user(&conn, "viewer", false).actor();
    service.toggle_participation(&viewer, campaign.id).unwrap();
    for index in 0..6 {
        let member = create_user(&conn, &format!("member{index}"), false).actor();
        service.toggle_participation(&member, campaign.id).unwrap();
    }

    let detail = service.campaign_detail(&viewer, campaign.id).unwrap();
    assert!(detail.is_participant);
    assert!(!detail.is_admin);
    assert_eq!(detail.recent_participants.len(), 5);
    assert_eq!(detail.recent_participants[0].id, viewer.user_id);

    let outsider = create_user(&conn, "outsider", false).actor();
    let detail = service.campaign_detail(&outsider, campaign.id).unwrap();
    assert!(!detail.is_participant);
}

#[test]
fn suggestion_conversion_creates_campaign_and_approves() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true).actor();
    let member = create_user(&conn, "member", false).actor();
    let service = service(&conn);

    let suggestion = service
        .suggest_campaign(
            &member,
            &SuggestionForm {
                title: "Beach cleanup".to_string(),
                description: "Monthly cleanup of the bay".to_string(),
                reason: "Plastic everywhere".to_string(),
            },
        )
        .unwrap();
    assert_eq!(suggestion.status, SuggestionStatus::Pending);

    let err = service.convert_prefill(&member, suggestion.id).unwrap_err();
    assert!(matches!(err, ServiceError::Access(AccessError::StaffOnly)));

    let mut prefill = service.convert_prefill(&staff, suggestion.id).unwrap();
    assert_eq!(prefill.title, "Beach cleanup");
    assert_eq!(prefill.description, "Monthly cleanup of the bay");
    prefill.goals_text = "collect 500 kg of litter".to_string();

    let campaign = service
        .convert_suggestion(&staff, suggestion.id, &prefill)
        .unwrap();
    assert_eq!(campaign.title, "Beach cleanup");
    assert_eq!(campaign.goals.len(), 1);

    let stored = SqliteCampaignRepository::new(&conn)
        .get_suggestion(suggestion.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SuggestionStatus::Approved);

    let err = service
        .convert_suggestion(&staff, suggestion.id, &prefill)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    let repo = SqliteCampaignRepository::new(&conn);
    let stored_campaigns = repo
        .list_active_campaigns(NOW)
        .unwrap()
        .into_iter()
        .chain(repo.list_archived_campaigns(NOW).unwrap())
        .count();
    assert_eq!(stored_campaigns, 1);
}

#[test]
fn rejecting_suggestion_is_staff_only_and_persists_status() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true).actor();
    let member = create_user(&conn, "member", false).actor();
    let service = service(&conn);

    let suggestion = service
        .suggest_campaign(
            &member,
            &SuggestionForm {
                title: "Car-free Sunday".to_string(),
                description: "Close the main street once a month".to_string(),
                reason: "Cleaner air".to_string(),
            },
        )
        .unwrap();

    let err = service.reject_suggestion(&member, suggestion.id).unwrap_err();
    assert!(matches!(err, ServiceError::Access(AccessError::StaffOnly)));

    service.reject_suggestion(&staff, suggestion.id).unwrap();
    let stored = SqliteCampaignRepository::new(&conn)
        .get_suggestion(suggestion.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SuggestionStatus::Rejected);

    let err = service
        .convert_suggestion(&staff, suggestion.id, &form("Car-free Sunday", NOW, NOW + DAY_MS, ""))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[test]
fn deleting_missing_campaign_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let staff = create_user(&conn, "staff_test", true).actor();

    let err = service(&conn)
        .delete_campaign(&staff, uuid::Uuid::new_v4())
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "campaign", .. }));
}
