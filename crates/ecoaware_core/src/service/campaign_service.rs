//! Campaign use-case service.
//!
//! # Responsibility
//! - Campaign listing, detail, create/update/delete.
//! - Goal text binding: parse on save, render on edit.
//! - Participation toggling and campaign suggestions.
//!
//! # Invariants
//! - Create/update/delete and suggestion conversion are staff-only.
//! - Only pending suggestions can be converted or rejected.
//! - Goals are replaced wholesale on every save.
//! - Detail shows at most 5 recent participants, the actor first when
//!   participating.

use crate::model::campaign::{
    Campaign, CampaignId, CampaignSuggestion, SuggestionId, SuggestionStatus,
};
use crate::model::now_epoch_ms;
use crate::model::user::{Actor, User};
use crate::repo::campaign_repo::CampaignRepository;
use crate::service::access::{require_login, require_staff};
use crate::service::{ServiceError, ServiceResult};
use log::info;

const RECENT_PARTICIPANTS_LIMIT: usize = 5;

/// Editable campaign fields as submitted by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignForm {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub start_date: i64,
    pub end_date: i64,
    pub is_active: bool,
    /// One goal per line; see `crate::goals::parse_goals`.
    pub goals_text: String,
}

impl CampaignForm {
    /// Prefills a form from a stored campaign, rendering goals to text.
    pub fn from_campaign(campaign: &Campaign) -> Self {
        Self {
            title: campaign.title.clone(),
            description: campaign.description.clone(),
            image: campaign.image.clone(),
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            is_active: campaign.is_active,
            goals_text: campaign.goals_text(),
        }
    }

    fn apply_to(&self, campaign: &mut Campaign) {
        campaign.title = self.title.trim().to_string();
        campaign.description = self.description.clone();
        campaign.image = self
            .image
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        campaign.start_date = self.start_date;
        campaign.end_date = self.end_date;
        campaign.is_active = self.is_active;
        campaign.set_goals_from_text(&self.goals_text);
    }
}

/// Campaign idea submitted by a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionForm {
    pub title: String,
    pub description: String,
    pub reason: String,
}

/// Campaign list split by end date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignListing {
    pub active: Vec<Campaign>,
    pub archived: Vec<Campaign>,
    pub has_archived: bool,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignDetail {
    pub campaign: Campaign,
    pub recent_participants: Vec<User>,
    pub is_participant: bool,
    pub is_admin: bool,
}

/// Outcome of `toggle_participation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipationChange {
    Joined,
    Left,
}

/// Campaign service facade over repository implementations.
pub struct CampaignService<R: CampaignRepository> {
    repo: R,
}

impl<R: CampaignRepository> CampaignService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists campaigns split into active and archived relative to `now`.
    pub fn list_campaigns(&self, actor: &Actor, now_epoch_ms: i64) -> ServiceResult<CampaignListing> {
        require_login(actor)?;
        let active = self.repo.list_active_campaigns(now_epoch_ms)?;
        let archived = self.repo.list_archived_campaigns(now_epoch_ms)?;
        Ok(CampaignListing {
            has_archived: !archived.is_empty(),
            active,
            archived,
            is_admin: actor.is_admin(),
        })
    }

    pub fn campaign_detail(&self, actor: &Actor, id: CampaignId) -> ServiceResult<CampaignDetail> {
        require_login(actor)?;
        let campaign = self.load_campaign(id)?;
        let mut participants = self.repo.list_participants(id)?;

        let position = participants
            .iter()
            .position(|user| user.id == actor.user_id);
        if let Some(position) = position {
            let current = participants.remove(position);
            participants.insert(0, current);
        }
        participants.truncate(RECENT_PARTICIPANTS_LIMIT);

        Ok(CampaignDetail {
            campaign,
            recent_participants: participants,
            is_participant: position.is_some(),
            is_admin: actor.is_admin(),
        })
    }

    pub fn create_campaign(&self, actor: &Actor, form: &CampaignForm) -> ServiceResult<Campaign> {
        require_staff(actor)?;
        let campaign = self.insert_campaign(form)?;
        info!(
            "event=campaign_create module=service status=ok campaign_id={} goals={}",
            campaign.id,
            campaign.goals.len()
        );
        Ok(campaign)
    }

    /// Returns the edit form with goals rendered back to text.
    pub fn edit_form(&self, actor: &Actor, id: CampaignId) -> ServiceResult<CampaignForm> {
        require_staff(actor)?;
        let campaign = self.load_campaign(id)?;
        Ok(CampaignForm::from_campaign(&campaign))
    }

    pub fn update_campaign(
        &self,
        actor: &Actor,
        id: CampaignId,
        form: &CampaignForm,
    ) -> ServiceResult<Campaign> {
        require_staff(actor)?;
        let mut campaign = self.load_campaign(id)?;
        form.apply_to(&mut campaign);
        self.repo.update_campaign(&campaign)?;
        info!(
            "event=campaign_update module=service status=ok campaign_id={} goals={}",
            campaign.id,
            campaign.goals.len()
        );
        self.reload_campaign(id, "updated campaign not found in read-back")
    }

    pub fn delete_campaign(&self, actor: &Actor, id: CampaignId) -> ServiceResult<()> {
        require_staff(actor)?;
        self.repo.delete_campaign(id)?;
        info!("event=campaign_delete module=service status=ok campaign_id={id}");
        Ok(())
    }

    /// Joins the campaign, or leaves it when already participating.
    pub fn toggle_participation(
        &self,
        actor: &Actor,
        id: CampaignId,
    ) -> ServiceResult<ParticipationChange> {
        require_login(actor)?;
        self.load_campaign(id)?;

        let change = if self.repo.is_participant(id, actor.user_id)? {
            self.repo.remove_participant(id, actor.user_id)?;
            ParticipationChange::Left
        } else {
            self.repo.add_participant(id, actor.user_id)?;
            ParticipationChange::Joined
        };
        info!(
            "event=campaign_participation module=service status=ok campaign_id={id} change={change:?}"
        );
        Ok(change)
    }

    pub fn participants(&self, actor: &Actor, id: CampaignId) -> ServiceResult<(Campaign, Vec<User>)> {
        require_login(actor)?;
        let campaign = self.load_campaign(id)?;
        let participants = self.repo.list_participants(id)?;
        Ok((campaign, participants))
    }

    pub fn suggest_campaign(
        &self,
        actor: &Actor,
        form: &SuggestionForm,
    ) -> ServiceResult<CampaignSuggestion> {
        require_login(actor)?;
        let suggestion = CampaignSuggestion::new(
            actor.user_id,
            form.title.trim(),
            form.description.clone(),
            form.reason.clone(),
        );
        self.repo.create_suggestion(&suggestion)?;
        info!(
            "event=campaign_suggest module=service status=ok suggestion_id={}",
            suggestion.id
        );
        Ok(suggestion)
    }

    /// Campaign form prefilled from a suggestion's title and description.
    pub fn convert_prefill(
        &self,
        actor: &Actor,
        suggestion_id: SuggestionId,
    ) -> ServiceResult<CampaignForm> {
        require_staff(actor)?;
        let suggestion = self.load_suggestion(suggestion_id)?;
        let now = now_epoch_ms();
        Ok(CampaignForm {
            title: suggestion.title,
            description: suggestion.description,
            start_date: now,
            end_date: now,
            is_active: true,
            ..CampaignForm::default()
        })
    }

    /// Creates a campaign from a suggestion and marks it approved.
    pub fn convert_suggestion(
        &self,
        actor: &Actor,
        suggestion_id: SuggestionId,
        form: &CampaignForm,
    ) -> ServiceResult<Campaign> {
        require_staff(actor)?;
        self.load_pending_suggestion(suggestion_id)?;
        let campaign = self.insert_campaign(form)?;
        self.repo
            .set_suggestion_status(suggestion_id, SuggestionStatus::Approved)?;
        info!(
            "event=campaign_convert module=service status=ok suggestion_id={suggestion_id} campaign_id={}",
            campaign.id
        );
        Ok(campaign)
    }

    pub fn reject_suggestion(&self, actor: &Actor, suggestion_id: SuggestionId) -> ServiceResult<()> {
        require_staff(actor)?;
        self.load_pending_suggestion(suggestion_id)?;
        self.repo
            .set_suggestion_status(suggestion_id, SuggestionStatus::Rejected)?;
        info!("event=campaign_suggestion_reject module=service status=ok suggestion_id={suggestion_id}");
        Ok(())
    }

    fn insert_campaign(&self, form: &CampaignForm) -> ServiceResult<Campaign> {
        let mut campaign = Campaign::new("", form.start_date, form.end_date);
        form.apply_to(&mut campaign);
        let id = self.repo.create_campaign(&campaign)?;
        self.reload_campaign(id, "created campaign not found in read-back")
    }

    fn load_campaign(&self, id: CampaignId) -> ServiceResult<Campaign> {
        self.repo
            .get_campaign(id)?
            .ok_or_else(|| ServiceError::not_found("campaign", id))
    }

    fn reload_campaign(&self, id: CampaignId, details: &'static str) -> ServiceResult<Campaign> {
        self.repo
            .get_campaign(id)?
            .ok_or(ServiceError::InconsistentState(details))
    }

    fn load_suggestion(&self, id: SuggestionId) -> ServiceResult<CampaignSuggestion> {
        self.repo
            .get_suggestion(id)?
            .ok_or_else(|| ServiceError::not_found("campaign suggestion", id))
    }

    /// Only pending suggestions may be converted or rejected.
    fn load_pending_suggestion(&self, id: SuggestionId) -> ServiceResult<CampaignSuggestion> {
        let suggestion = self.load_suggestion(id)?;
        if suggestion.status != SuggestionStatus::Pending {
            return Err(ServiceError::Conflict(format!(
                "campaign suggestion {id} is already {:?}",
                suggestion.status
            )));
        }
        Ok(suggestion)
    }
}
