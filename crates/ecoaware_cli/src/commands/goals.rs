// goals.rs — Goal list subcommands: parse, render.

use std::io::Read;

use anyhow::Context;
use clap::Subcommand;
use ecoaware_core::{parse_goals, render_goals, GoalRecord, DEFAULT_GOAL_ICONS};

#[derive(Subcommand)]
pub enum GoalsCommands {
    /// Read goal text from stdin and print the normalized records as JSON.
    Parse {
        /// Comma-separated icon rotation (defaults to the built-in set).
        #[arg(long, value_delimiter = ',')]
        icons: Option<Vec<String>>,
        /// Emit single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Read a JSON array of goal records from stdin and print editable text.
    Render,
}

pub fn execute(cmd: &GoalsCommands) -> anyhow::Result<()> {
    let input = read_stdin()?;
    match cmd {
        GoalsCommands::Parse { icons, compact } => {
            println!("{}", parse_to_json(&input, icons.as_deref(), *compact)?);
        }
        GoalsCommands::Render => println!("{}", render_from_json(&input)?),
    }
    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(input)
}

fn parse_to_json(text: &str, icons: Option<&[String]>, compact: bool) -> anyhow::Result<String> {
    let goals = match icons {
        Some(icons) => parse_goals(text, icons),
        None => parse_goals(text, &DEFAULT_GOAL_ICONS),
    };
    let json = if compact {
        serde_json::to_string(&goals)?
    } else {
        serde_json::to_string_pretty(&goals)?
    };
    Ok(json)
}

fn render_from_json(json: &str) -> anyhow::Result<String> {
    let goals: Vec<GoalRecord> =
        serde_json::from_str(json).context("stdin is not a JSON array of goal records")?;
    Ok(render_goals(&goals))
}
