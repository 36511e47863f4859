// campaigns.rs — Campaign inspection: list, show.

use anyhow::Context;
use clap::Subcommand;
use ecoaware_core::model::now_epoch_ms;
use ecoaware_core::{
    open_db, AppConfig, Campaign, CampaignId, CampaignRepository, SqliteCampaignRepository,
};

#[derive(Subcommand)]
pub enum CampaignsCommands {
    /// List active campaigns, then archived ones.
    List {
        /// Include campaigns whose end date has passed.
        #[arg(long)]
        archived: bool,
    },
    /// Print one campaign with its goals as editable text.
    Show {
        /// Campaign ID.
        id: String,
    },
}

pub fn execute(cmd: &CampaignsCommands, config: &AppConfig) -> anyhow::Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("cannot open database {}", config.db_path.display()))?;
    let repo = SqliteCampaignRepository::new(&conn);

    match cmd {
        CampaignsCommands::List { archived } => list_campaigns(&repo, *archived),
        CampaignsCommands::Show { id } => show_campaign(&repo, id),
    }
}

fn list_campaigns(repo: &impl CampaignRepository, include_archived: bool) -> anyhow::Result<()> {
    let now = now_epoch_ms();
    let active = repo.list_active_campaigns(now)?;
    if active.is_empty() {
        println!("No active campaigns.");
    }
    for campaign in &active {
        println!("{}", summary_line(campaign, "active"));
    }

    if include_archived {
        for campaign in &repo.list_archived_campaigns(now)? {
            println!("{}", summary_line(campaign, "archived"));
        }
    }
    Ok(())
}

fn show_campaign(repo: &impl CampaignRepository, raw_id: &str) -> anyhow::Result<()> {
    let id = CampaignId::parse_str(raw_id.trim())
        .with_context(|| format!("invalid campaign id `{raw_id}`"))?;
    let campaign = repo
        .get_campaign(id)?
        .with_context(|| format!("campaign {id} not found"))?;

    println!("{}", campaign.title);
    if !campaign.description.is_empty() {
        println!("{}", campaign.description);
    }
    println!();
    println!("{}", campaign.goals_text());
    Ok(())
}

fn summary_line(campaign: &Campaign, state: &str) -> String {
    format!(
        "{}  {:<8}  goals={:<3} {}",
        campaign.id,
        state,
        campaign.goals.len(),
        campaign.title
    )
}

#[cfg(test)]
mod tests {
    use super::summary_line;
    use ecoaware_core::Campaign;

    #[test]
    fn summary_line_shows_state_goal_count_and_title() {
        let mut campaign = Campaign::new("River Watch", 0, 10);
        campaign.set_goals_from_text("test water\nreport litter");
        let line = summary_line(&campaign, "active");
        assert!(line.starts_with(&campaign.id.to_string()));
        assert!(line.contains("active"));
        assert!(line.contains("goals=2"));
        assert!(line.ends_with("River Watch"));
    }
}
