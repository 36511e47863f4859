//! Campaign and campaign suggestion models.
//!
//! # Invariants
//! - `end_date >= start_date`.
//! - `goals` is replaced wholesale; order is the order of the source text.
//! - A campaign is archived once `end_date` is in the past.

use super::user::UserId;
use super::{now_epoch_ms, require_max_chars, require_non_blank, require_non_nil, ValidationError};
use crate::goals::{parse_goals, render_goals, GoalRecord, DEFAULT_GOAL_ICONS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CampaignId = Uuid;
pub type SuggestionId = Uuid;

const TITLE_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    /// Stored media path; file storage itself lives outside core.
    pub image: Option<String>,
    pub start_date: i64,
    pub end_date: i64,
    pub is_active: bool,
    pub goals: Vec<GoalRecord>,
    pub created_at: i64,
}

impl Campaign {
    /// Creates an active campaign without goals.
    pub fn new(title: impl Into<String>, start_date: i64, end_date: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            image: None,
            start_date,
            end_date,
            is_active: true,
            goals: Vec::new(),
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_nil("campaign.id", self.id)?;
        require_non_blank("campaign.title", &self.title)?;
        require_max_chars("campaign.title", &self.title, TITLE_MAX_CHARS)?;
        if self.end_date < self.start_date {
            return Err(ValidationError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Replaces all goals with the normalized form of `text`.
    pub fn set_goals_from_text(&mut self, text: &str) {
        self.goals = parse_goals(text, &DEFAULT_GOAL_ICONS);
    }

    /// Editable text form of the stored goals.
    pub fn goals_text(&self) -> String {
        render_goals(&self.goals)
    }

    pub fn is_archived_at(&self, now_epoch_ms: i64) -> bool {
        self.end_date < now_epoch_ms
    }
}

/// Review state of a user-submitted campaign idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSuggestion {
    pub id: SuggestionId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub reason: String,
    pub status: SuggestionStatus,
    pub created_at: i64,
}

impl CampaignSuggestion {
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: description.into(),
            reason: reason.into(),
            status: SuggestionStatus::Pending,
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_nil("suggestion.id", self.id)?;
        require_non_nil("suggestion.user_id", self.user_id)?;
        require_non_blank("suggestion.title", &self.title)?;
        require_max_chars("suggestion.title", &self.title, TITLE_MAX_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::{Campaign, SuggestionStatus};
    use crate::goals::DEFAULT_GOAL_ICONS;
    use crate::model::ValidationError;

    #[test]
    fn validate_rejects_reversed_date_range() {
        let campaign = Campaign::new("Coastal cleanup", 2_000, 1_000);
        assert_eq!(
            campaign.validate(),
            Err(ValidationError::InvalidDateRange {
                start: 2_000,
                end: 1_000
            })
        );
    }

    #[test]
    fn goals_text_round_trips_through_editing() {
        let mut campaign = Campaign::new("Coastal cleanup", 1_000, 2_000);
        campaign.set_goals_from_text("collect plastic\n\nplant mangroves");
        assert_eq!(campaign.goals.len(), 2);
        assert_eq!(campaign.goals[1].icon, DEFAULT_GOAL_ICONS[2]);

        let before = campaign.goals.clone();
        let text = campaign.goals_text();
        campaign.set_goals_from_text(&text);
        assert_eq!(campaign.goals, before);
    }

    #[test]
    fn archived_once_end_date_passes() {
        let campaign = Campaign::new("Earth hour", 1_000, 2_000);
        assert!(!campaign.is_archived_at(2_000));
        assert!(campaign.is_archived_at(2_001));
    }

    #[test]
    fn suggestion_status_uses_uppercase_wire_names() {
        let json = serde_json::to_value(SuggestionStatus::Approved).unwrap();
        assert_eq!(json, "APPROVED");
    }
}
