// staff.rs — Staff account bootstrap.

use anyhow::Context;
use clap::Subcommand;
use ecoaware_core::{open_db, AppConfig, SqliteUserRepository, StaffBootstrap, UserService};

#[derive(Subcommand)]
pub enum StaffCommands {
    /// Create a staff account, or promote an existing user to staff.
    Ensure {
        /// Account username.
        username: String,
        /// Email used only when the account is created.
        #[arg(long, default_value = "")]
        email: String,
    },
}

pub fn execute(cmd: &StaffCommands, config: &AppConfig) -> anyhow::Result<()> {
    match cmd {
        StaffCommands::Ensure { username, email } => ensure_staff(config, username, email),
    }
}

fn ensure_staff(config: &AppConfig, username: &str, email: &str) -> anyhow::Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("cannot open database {}", config.db_path.display()))?;
    let service = UserService::new(SqliteUserRepository::new(&conn));

    let outcome = service
        .ensure_staff(username, email)
        .with_context(|| format!("cannot ensure staff account `{username}`"))?;
    let message = match &outcome {
        StaffBootstrap::Created(_) => "created staff account",
        StaffBootstrap::Promoted(_) => "promoted existing account to staff",
        StaffBootstrap::AlreadyStaff(_) => "account is already staff",
    };
    println!("{message}: {} ({})", outcome.user().username, outcome.user().id);
    Ok(())
}
