//! Campaign repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist campaigns with their goal list stored as JSON.
//! - Own participant membership and campaign suggestion storage.
//!
//! # Invariants
//! - `goals_json` always holds a JSON array of goal records.
//! - A user participates in a campaign at most once.
//! - Active/archived split is `end_date >= now` vs `end_date < now`.

use super::user_repo::{parse_user_row, USER_COLUMNS};
use super::{bool_to_int, clamp_count, parse_bool, parse_uuid};
use super::{RepoError, RepoResult};
use crate::goals::GoalRecord;
use crate::model::campaign::{
    Campaign, CampaignId, CampaignSuggestion, SuggestionId, SuggestionStatus,
};
use crate::model::now_epoch_ms;
use crate::model::user::{User, UserId};
use rusqlite::{params, Connection, Row};

const CAMPAIGN_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    image,
    start_date,
    end_date,
    is_active,
    goals_json,
    created_at
FROM campaigns";

const SUGGESTION_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    reason,
    status,
    created_at
FROM campaign_suggestions";

/// Repository interface for campaigns, participants and suggestions.
pub trait CampaignRepository {
    fn create_campaign(&self, campaign: &Campaign) -> RepoResult<CampaignId>;
    /// Full replacement, goals included.
    fn update_campaign(&self, campaign: &Campaign) -> RepoResult<()>;
    fn get_campaign(&self, id: CampaignId) -> RepoResult<Option<Campaign>>;
    fn delete_campaign(&self, id: CampaignId) -> RepoResult<()>;
    /// Campaigns with `end_date >= now`, soonest ending first.
    fn list_active_campaigns(&self, now_epoch_ms: i64) -> RepoResult<Vec<Campaign>>;
    /// Campaigns with `end_date < now`, most recently ended first.
    fn list_archived_campaigns(&self, now_epoch_ms: i64) -> RepoResult<Vec<Campaign>>;
    /// Campaigns flagged `is_active`, newest first.
    fn list_featured_campaigns(&self, limit: u32) -> RepoResult<Vec<Campaign>>;
    fn recent_campaigns(&self, limit: u32) -> RepoResult<Vec<Campaign>>;
    fn count_campaigns(&self) -> RepoResult<u64>;

    /// Returns `false` when the user already participates.
    fn add_participant(&self, campaign_id: CampaignId, user_id: UserId) -> RepoResult<bool>;
    /// Returns `false` when the user was not participating.
    fn remove_participant(&self, campaign_id: CampaignId, user_id: UserId) -> RepoResult<bool>;
    fn is_participant(&self, campaign_id: CampaignId, user_id: UserId) -> RepoResult<bool>;
    /// Most recently joined first.
    fn list_participants(&self, campaign_id: CampaignId) -> RepoResult<Vec<User>>;

    fn create_suggestion(&self, suggestion: &CampaignSuggestion) -> RepoResult<SuggestionId>;
    fn get_suggestion(&self, id: SuggestionId) -> RepoResult<Option<CampaignSuggestion>>;
    fn set_suggestion_status(&self, id: SuggestionId, status: SuggestionStatus)
        -> RepoResult<()>;
    fn recent_suggestions(&self, limit: u32) -> RepoResult<Vec<CampaignSuggestion>>;
}

/// SQLite-backed campaign repository.
pub struct SqliteCampaignRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCampaignRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_campaigns(&self, sql: &str, bind: impl rusqlite::Params) -> RepoResult<Vec<Campaign>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut campaigns = Vec::new();
        while let Some(row) = rows.next()? {
            campaigns.push(parse_campaign_row(row)?);
        }
        Ok(campaigns)
    }

    fn query_suggestions(
        &self,
        sql: &str,
        bind: impl rusqlite::Params,
    ) -> RepoResult<Vec<CampaignSuggestion>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut suggestions = Vec::new();
        while let Some(row) = rows.next()? {
            suggestions.push(parse_suggestion_row(row)?);
        }
        Ok(suggestions)
    }

    fn campaign_exists(&self, id: CampaignId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM campaigns WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl CampaignRepository for SqliteCampaignRepository<'_> {
    fn create_campaign(&self, campaign: &Campaign) -> RepoResult<CampaignId> {
        campaign.validate()?;
        let goals_json = encode_goals(&campaign.goals)?;

        self.conn.execute(
            "INSERT INTO campaigns (
                id,
                title,
                description,
                image,
                start_date,
                end_date,
                is_active,
                goals_json,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                campaign.id.to_string(),
                campaign.title.as_str(),
                campaign.description.as_str(),
                campaign.image.as_deref(),
                campaign.start_date,
                campaign.end_date,
                bool_to_int(campaign.is_active),
                goals_json,
                campaign.created_at,
            ],
        )?;

        Ok(campaign.id)
    }

    fn update_campaign(&self, campaign: &Campaign) -> RepoResult<()> {
        campaign.validate()?;
        let goals_json = encode_goals(&campaign.goals)?;

        let changed = self.conn.execute(
            "UPDATE campaigns
             SET
                title = ?1,
                description = ?2,
                image = ?3,
                start_date = ?4,
                end_date = ?5,
                is_active = ?6,
                goals_json = ?7
             WHERE id = ?8;",
            params![
                campaign.title.as_str(),
                campaign.description.as_str(),
                campaign.image.as_deref(),
                campaign.start_date,
                campaign.end_date,
                bool_to_int(campaign.is_active),
                goals_json,
                campaign.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("campaign", campaign.id));
        }
        Ok(())
    }

    fn get_campaign(&self, id: CampaignId) -> RepoResult<Option<Campaign>> {
        let campaigns = self.query_campaigns(
            &format!("{CAMPAIGN_SELECT_SQL} WHERE id = ?1;"),
            [id.to_string()],
        )?;
        Ok(campaigns.into_iter().next())
    }

    fn delete_campaign(&self, id: CampaignId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM campaigns WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found("campaign", id));
        }
        Ok(())
    }

    fn list_active_campaigns(&self, now_epoch_ms: i64) -> RepoResult<Vec<Campaign>> {
        self.query_campaigns(
            &format!("{CAMPAIGN_SELECT_SQL} WHERE end_date >= ?1 ORDER BY end_date ASC, id ASC;"),
            [now_epoch_ms],
        )
    }

    fn list_archived_campaigns(&self, now_epoch_ms: i64) -> RepoResult<Vec<Campaign>> {
        self.query_campaigns(
            &format!("{CAMPAIGN_SELECT_SQL} WHERE end_date < ?1 ORDER BY end_date DESC, id ASC;"),
            [now_epoch_ms],
        )
    }

    fn list_featured_campaigns(&self, limit: u32) -> RepoResult<Vec<Campaign>> {
        self.query_campaigns(
            &format!(
                "{CAMPAIGN_SELECT_SQL} WHERE is_active = 1 ORDER BY created_at DESC, id ASC LIMIT ?1;"
            ),
            [i64::from(limit)],
        )
    }

    fn recent_campaigns(&self, limit: u32) -> RepoResult<Vec<Campaign>> {
        self.query_campaigns(
            &format!("{CAMPAIGN_SELECT_SQL} ORDER BY created_at DESC, id ASC LIMIT ?1;"),
            [i64::from(limit)],
        )
    }

    fn count_campaigns(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM campaigns;", [], |row| row.get(0))?;
        Ok(clamp_count(count))
    }

    fn add_participant(&self, campaign_id: CampaignId, user_id: UserId) -> RepoResult<bool> {
        if !self.campaign_exists(campaign_id)? {
            return Err(RepoError::not_found("campaign", campaign_id));
        }
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO campaign_participants (campaign_id, user_id, joined_at)
             VALUES (?1, ?2, ?3);",
            params![campaign_id.to_string(), user_id.to_string(), now_epoch_ms()],
        )?;
        Ok(inserted == 1)
    }

    fn remove_participant(&self, campaign_id: CampaignId, user_id: UserId) -> RepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM campaign_participants WHERE campaign_id = ?1 AND user_id = ?2;",
            params![campaign_id.to_string(), user_id.to_string()],
        )?;
        Ok(removed == 1)
    }

    fn is_participant(&self, campaign_id: CampaignId, user_id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM campaign_participants
                WHERE campaign_id = ?1 AND user_id = ?2
            );",
            params![campaign_id.to_string(), user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_participants(&self, campaign_id: CampaignId) -> RepoResult<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {USER_COLUMNS}
             FROM campaign_participants cp
             INNER JOIN users ON users.id = cp.user_id
             WHERE cp.campaign_id = ?1
             ORDER BY cp.joined_at DESC, users.username ASC;"
        ))?;
        let mut rows = stmt.query([campaign_id.to_string()])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn create_suggestion(&self, suggestion: &CampaignSuggestion) -> RepoResult<SuggestionId> {
        suggestion.validate()?;
        self.conn.execute(
            "INSERT INTO campaign_suggestions (
                id,
                user_id,
                title,
                description,
                reason,
                status,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                suggestion.id.to_string(),
                suggestion.user_id.to_string(),
                suggestion.title.as_str(),
                suggestion.description.as_str(),
                suggestion.reason.as_str(),
                suggestion_status_to_db(suggestion.status),
                suggestion.created_at,
            ],
        )?;
        Ok(suggestion.id)
    }

    fn get_suggestion(&self, id: SuggestionId) -> RepoResult<Option<CampaignSuggestion>> {
        let suggestions = self.query_suggestions(
            &format!("{SUGGESTION_SELECT_SQL} WHERE id = ?1;"),
            [id.to_string()],
        )?;
        Ok(suggestions.into_iter().next())
    }

    fn set_suggestion_status(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE campaign_suggestions SET status = ?1 WHERE id = ?2;",
            params![suggestion_status_to_db(status), id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("campaign suggestion", id));
        }
        Ok(())
    }

    fn recent_suggestions(&self, limit: u32) -> RepoResult<Vec<CampaignSuggestion>> {
        self.query_suggestions(
            &format!("{SUGGESTION_SELECT_SQL} ORDER BY created_at DESC, id ASC LIMIT ?1;"),
            [i64::from(limit)],
        )
    }
}

fn encode_goals(goals: &[GoalRecord]) -> RepoResult<String> {
    serde_json::to_string(goals)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode campaign goals: {err}")))
}

fn decode_goals(value: &str) -> RepoResult<Vec<GoalRecord>> {
    serde_json::from_str(value).map_err(|err| {
        RepoError::InvalidData(format!("invalid goal list in campaigns.goals_json: {err}"))
    })
}

fn parse_campaign_row(row: &Row<'_>) -> RepoResult<Campaign> {
    let id_text: String = row.get("id")?;
    let goals_json: String = row.get("goals_json")?;
    let campaign = Campaign {
        id: parse_uuid(&id_text, "campaigns.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        image: row.get("image")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        is_active: parse_bool(row.get("is_active")?, "campaigns.is_active")?,
        goals: decode_goals(&goals_json)?,
        created_at: row.get("created_at")?,
    };
    campaign.validate()?;
    Ok(campaign)
}

fn parse_suggestion_row(row: &Row<'_>) -> RepoResult<CampaignSuggestion> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let status_text: String = row.get("status")?;
    let status = parse_suggestion_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid suggestion status `{status_text}` in campaign_suggestions.status"
        ))
    })?;
    let suggestion = CampaignSuggestion {
        id: parse_uuid(&id_text, "campaign_suggestions.id")?,
        user_id: parse_uuid(&user_text, "campaign_suggestions.user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        reason: row.get("reason")?,
        status,
        created_at: row.get("created_at")?,
    };
    suggestion.validate()?;
    Ok(suggestion)
}

fn suggestion_status_to_db(status: SuggestionStatus) -> &'static str {
    match status {
        SuggestionStatus::Pending => "PENDING",
        SuggestionStatus::Approved => "APPROVED",
        SuggestionStatus::Rejected => "REJECTED",
    }
}

fn parse_suggestion_status(value: &str) -> Option<SuggestionStatus> {
    match value {
        "PENDING" => Some(SuggestionStatus::Pending),
        "APPROVED" => Some(SuggestionStatus::Approved),
        "REJECTED" => Some(SuggestionStatus::Rejected),
        _ => None,
    }
}
