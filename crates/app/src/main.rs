use std::{collections::BTreeSet, path::PathBuf};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use engine::{
    ExpenseSource, Invite, MemoryStore, NewEvent, ProfileDirectory, SettlementEngine,
    apply_transfers, build_recommendations, contributions,
};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    input::ExpenseInput,
    settings::{OutputFormat, Settings, SplitMode},
};

mod error;
mod input;
mod render;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "asadito")]
#[command(about = "Split group event expenses and work out who owes whom")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override log level (e.g. debug, info, warn).
    #[arg(long, global = true)]
    level: Option<String>,
    /// Override output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute balances and the transfers that settle them.
    Settle(SettleArgs),
    /// Show the shopping checklist grouped by category.
    Checklist(ChecklistArgs),
    /// Suggest purchase quantities for a head count.
    Recommend(RecommendArgs),
    /// Issue a short invite code for an event.
    Invite(InviteArgs),
}

#[derive(Args, Debug)]
struct SettleArgs {
    /// Expenses file: CSV (`paid_by,amount[,note]`) or JSON store rows.
    expenses: PathBuf,
    /// JSON profile rows used to label participants.
    #[arg(long)]
    profiles: Option<PathBuf>,
    /// Event to settle when the rows span several events.
    #[arg(long)]
    event: Option<Uuid>,
    /// Override the split policy.
    #[arg(long, value_enum)]
    split: Option<SplitMode>,
    /// Override the participant roster (comma separated ids).
    #[arg(long, value_delimiter = ',')]
    participants: Option<Vec<String>>,
    /// Override the settled-balance tolerance, in cents.
    #[arg(long)]
    tolerance_cents: Option<i64>,
}

#[derive(Args, Debug)]
struct ChecklistArgs {
    /// JSON item rows.
    items: PathBuf,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// JSON event row; its head counts are used unless overridden.
    #[arg(long)]
    event: Option<PathBuf>,
    #[arg(long)]
    adults: Option<u32>,
    #[arg(long)]
    minors: Option<u32>,
}

#[derive(Args, Debug)]
struct InviteArgs {
    /// Event the invite joins.
    #[arg(long)]
    event: Uuid,
    /// Lifetime in minutes.
    #[arg(long, default_value_t = engine::DEFAULT_INVITE_MINUTES)]
    minutes: i64,
    /// Issue an invite that never expires.
    #[arg(long, conflicts_with = "minutes")]
    no_expiry: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = settings::load(cli.config.as_deref())?;
    if let Some(level) = cli.level {
        settings.level = level;
    }
    if let Some(format) = cli.format {
        settings.format = format;
    }

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "asadito={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Settle(args) => settle(settings, args),
        Command::Checklist(args) => checklist(&settings, &args),
        Command::Recommend(args) => recommend(&settings, &args),
        Command::Invite(args) => invite(&settings, &args),
    }
}

fn settle(mut settings: Settings, args: SettleArgs) -> Result<()> {
    if let Some(split) = args.split {
        settings.split = split;
    }
    if let Some(participants) = args.participants {
        settings.participants = participants;
    }
    if let Some(tolerance) = args.tolerance_cents {
        settings.tolerance_cents = tolerance;
    }

    let rows = input::load_expenses(&args.expenses)?;
    let event_id = pick_event(&rows, args.event)?;
    tracing::info!(rows = rows.len(), %event_id, "loaded expenses");

    let store = MemoryStore::new();
    for row in &rows {
        store.add_expense(
            row.event_id.unwrap_or(event_id),
            &row.payer,
            row.amount,
            row.note.as_deref(),
        )?;
    }
    let expenses = store.expenses(event_id)?;
    let options = settings.settlement_options();
    let tolerance = options.tolerance;
    let engine = SettlementEngine::new(options);
    let plan = engine.settle(&expenses);

    for (participant, residual) in apply_transfers(&plan.balances, &plan.transfers) {
        if residual.abs() > tolerance {
            tracing::warn!(%participant, %residual, "balance left unsettled");
        }
    }
    tracing::info!(
        participants = plan.balances.len(),
        transfers = plan.transfers.len(),
        total = %plan.total,
        "settlement computed"
    );

    let directory = match &args.profiles {
        Some(path) => input::load_profiles(path)?,
        None => ProfileDirectory::new(),
    };
    let view = render::settlement_view(&plan, &directory);
    match settings.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => print!(
            "{}",
            render::settlement_text(&view, &contributions(&expenses), &directory)
        ),
    }
    Ok(())
}

/// Rows without an event id belong to the local event (nil UUID).
fn pick_event(rows: &[ExpenseInput], requested: Option<Uuid>) -> Result<Uuid> {
    if let Some(event_id) = requested {
        return Ok(event_id);
    }
    let events: BTreeSet<Uuid> = rows
        .iter()
        .map(|row| row.event_id.unwrap_or(Uuid::nil()))
        .collect();
    match events.len() {
        0 => Ok(Uuid::nil()),
        1 => Ok(events.into_iter().next().unwrap_or(Uuid::nil())),
        n => Err(AppError::Input(format!(
            "expenses span {n} events; pass --event to pick one"
        ))),
    }
}

fn checklist(settings: &Settings, args: &ChecklistArgs) -> Result<()> {
    let items = input::load_items(&args.items)?;
    tracing::info!(items = items.len(), "loaded checklist");
    match settings.format {
        OutputFormat::Json => {
            let groups: Vec<(String, Vec<&str>)> = engine::group_by_category(&items)
                .into_iter()
                .map(|(category, group)| {
                    (
                        category.to_string(),
                        group.iter().map(|it| it.name.as_str()).collect(),
                    )
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        OutputFormat::Text => print!("{}", render::checklist_text(&items)),
    }
    Ok(())
}

fn recommend(settings: &Settings, args: &RecommendArgs) -> Result<()> {
    let event = args.event.as_deref().map(input::load_event).transpose()?;
    let adults = args
        .adults
        .or(event.as_ref().map(|e| e.adults_count))
        .unwrap_or(0);
    let minors = args
        .minors
        .or(event.as_ref().map(|e| e.minors_count))
        .unwrap_or(0);

    let (title, recommendations) = match &event {
        Some(row) => {
            let draft = NewEvent::new(&row.title, adults, minors)?;
            (Some(draft.title.clone()), draft.recommendations())
        }
        None => (None, build_recommendations(adults, minors)),
    };
    tracing::debug!(adults, minors, "recommendations built");

    match settings.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recommendations)?),
        OutputFormat::Text => print!(
            "{}",
            render::recommendations_text(title.as_deref(), &recommendations)
        ),
    }
    Ok(())
}

fn invite(settings: &Settings, args: &InviteArgs) -> Result<()> {
    let minutes = (!args.no_expiry).then_some(args.minutes);
    let invite = Invite::issue(args.event, Utc::now(), minutes)?;
    tracing::info!(event_id = %invite.event_id, code = %invite.code, "invite issued");

    match settings.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&render::invite_row(&invite))?
        ),
        OutputFormat::Text => {
            println!("Código: {}", invite.code);
            println!("Link: {}", invite.join_path());
            if let Some(expires_at) = invite.expires_at {
                println!("Expira: {}", expires_at.to_rfc3339());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use engine::MoneyCents;

    use super::*;

    fn row(event_id: Option<Uuid>) -> ExpenseInput {
        ExpenseInput {
            event_id,
            payer: "ana".to_string(),
            amount: MoneyCents::new(100),
            note: None,
        }
    }

    #[test]
    fn local_rows_settle_the_nil_event() {
        assert_eq!(pick_event(&[row(None), row(None)], None).unwrap(), Uuid::nil());
        assert_eq!(pick_event(&[], None).unwrap(), Uuid::nil());
    }

    #[test]
    fn mixed_events_need_an_explicit_pick() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(pick_event(&[row(Some(a)), row(Some(b))], None).is_err());
        assert_eq!(pick_event(&[row(Some(a)), row(Some(b))], Some(b)).unwrap(), b);
        assert_eq!(pick_event(&[row(Some(a)), row(Some(a))], None).unwrap(), a);
    }
}
