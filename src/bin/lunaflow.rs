use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use lunaflow_backend::{
    client::{ClientError, HttpGateway, Session, DEFAULT_SERVER, SERVER_ENV, SESSION_ENV},
    cycle::{day, project_profile},
    models::{Account, CycleUpdate, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_DURATION},
};

#[derive(Parser)]
#[command(name = "lunaflow", about = "Track your cycle against a LunaFlow server")]
struct Cli {
    #[arg(long, env = SERVER_ENV, default_value = DEFAULT_SERVER)]
    server: String,

    #[arg(long, env = SESSION_ENV)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in
    Register { email: String, password: String },
    /// Sign in to an existing account
    Login { email: String, password: String },
    /// Save the current cycle and log it in the history
    Save {
        #[arg(long, value_parser = parse_day)]
        start: NaiveDate,
        #[arg(long, default_value_t = DEFAULT_CYCLE_LENGTH, value_parser = clap::value_parser!(i32).range(1..))]
        cycle_length: i32,
        #[arg(long, default_value_t = DEFAULT_PERIOD_DURATION, value_parser = clap::value_parser!(i32).range(1..))]
        period_duration: i32,
    },
    /// Show the projected next cycle from the cached session
    Status,
    /// List logged cycles, newest first
    History,
    /// Forget the cached session
    Logout,
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    day::parse_calendar_day(raw).map_err(|e| e.to_string())
}

fn display_day(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

fn signed_in(session: &Session) -> Result<&Account, ClientError> {
    session.account().ok_or(ClientError::NotLoggedIn)
}

fn status_lines(account: &Account, today: NaiveDate) -> Vec<String> {
    let mut lines = vec![format!("Signed in as {}", account.email)];

    match project_profile(&account.cycle_data, today) {
        Some(p) => {
            lines.push(format!(
                "Next period:     {} ({} days)",
                display_day(p.next_period),
                p.days_until_next_period
            ));
            lines.push(format!("Ovulation:       {}", display_day(p.ovulation)));
            lines.push(format!(
                "Fertile window:  {} - {}",
                display_day(p.fertile_window.start),
                display_day(p.fertile_window.end)
            ));
        }
        None => lines.push("No cycle saved yet, run `lunaflow save --start YYYY-MM-DD`".to_string()),
    }
    lines
}

fn print_status(account: &Account) {
    for line in status_lines(account, Local::now().date_naive()) {
        println!("{line}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gateway = HttpGateway::new(&cli.server);
    let mut session = Session::load(cli.session.unwrap_or_else(Session::default_path))?;

    match cli.command {
        Command::Register { email, password } => {
            let account = gateway.register(&email, &password).await?;
            session.refresh(account)?;
            println!("Account created.");
            print_status(signed_in(&session)?);
        }
        Command::Login { email, password } => {
            let account = gateway.login(&email, &password).await?;
            session.refresh(account)?;
            print_status(signed_in(&session)?);
        }
        Command::Save { start, cycle_length, period_duration } => {
            let email = signed_in(&session)?.email.clone();
            let update = CycleUpdate { last_period_start: start, cycle_length, period_duration };
            let account = gateway.update(&email, update).await?;
            session.refresh(account)?;
            println!("Cycle details saved & added to history!");
            print_status(signed_in(&session)?);
        }
        Command::Status => print_status(signed_in(&session)?),
        Command::History => {
            let account = signed_in(&session)?;
            if account.history.is_empty() {
                println!("No history recorded yet.");
            }
            for entry in &account.history {
                println!(
                    "{}  cycle {} days, period {} days",
                    entry.start_date.format("%b %d, %Y"),
                    entry.cycle_length,
                    entry.period_duration
                );
            }
        }
        Command::Logout => {
            session.invalidate()?;
            println!("Signed out.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunaflow_backend::models::CycleProfile;

    #[test]
    fn status_prints_every_date_the_same_way() {
        let mut account = Account::new("luna@example.com".into(), String::new());
        account.cycle_data = CycleProfile {
            last_period_start: NaiveDate::from_ymd_opt(2024, 1, 1),
            cycle_length: 28,
            period_duration: 5,
        };

        let lines = status_lines(&account, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

        assert_eq!(lines[1], "Next period:     Mon Jan 29 2024 (19 days)");
        assert_eq!(lines[2], "Ovulation:       Mon Jan 15 2024");
        assert_eq!(lines[3], "Fertile window:  Wed Jan 10 2024 - Tue Jan 16 2024");
    }

    #[test]
    fn status_without_a_start_date_prompts_for_one() {
        let account = Account::new("luna@example.com".into(), String::new());
        let lines = status_lines(&account, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("No cycle saved yet"));
    }
}
