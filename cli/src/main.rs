mod month;
mod tui;
mod validate;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use timechart_core::api::{LoginRequest, RegisterRequest};
use timechart_core::input;
use timechart_core::{
    summarize_batch, ApiClient, ApiError, AuthContext, BatchOutcome, ClientConfig,
    FileSessionStore, InsertLogRequest,
};

#[derive(Parser)]
#[command(name = "timechart")]
#[command(about = "Terminal client for the timechart time-tracking service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        email: String,
        password: String,
        nickname: String,
    },
    /// Log in and store the session token
    Login { email: String, password: String },
    /// Drop the stored session
    Logout,
    /// Record today's hours (usage: add sleep:7h30m exercise:45m ...)
    Add {
        /// category:duration pairs; category keys may be abbreviated
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print one month's totals and averages
    Month {
        /// YYYY-MM, defaults to the current month
        year_month: Option<String>,
    },
    /// Open the dashboard
    Tui,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load(None)?;
    let api = ApiClient::new(&config);
    let mut auth = AuthContext::load(FileSessionStore::new(None)?)?;

    match cli.command {
        Some(Commands::Signup {
            email,
            password,
            nickname,
        }) => {
            validate::validate_signup(&email, &password, &nickname)?;
            let request = RegisterRequest {
                email,
                password,
                nickname,
            };
            match api.register(&request).await {
                Ok(()) => println!("Account created. Log in with `timechart login`."),
                Err(err) if err.is_duplicate_email() => {
                    println!("That e-mail is already registered.");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Some(Commands::Login { email, password }) => {
            validate::validate_login(&email, &password)?;
            let request = LoginRequest { email, password };
            match api.login(&request).await {
                Ok(token) => {
                    auth.record_login(token)?;
                    println!("Logged in.");
                }
                // A rejected login never touches the session.
                Err(ApiError::Rejected(_)) => println!("Check your e-mail or password."),
                Err(err) => return Err(err.into()),
            }
        }
        Some(Commands::Logout) => {
            auth.invalidate()?;
            println!("Logged out.");
        }
        Some(Commands::Add { args }) => {
            if args.is_empty() {
                println!("Nothing to record. Usage: timechart add sleep:7h30m exercise:45m");
                return Ok(());
            }
            let token = auth.require_token()?;
            let parsed = input::parse_log_args(&args)?;
            let requests: Vec<InsertLogRequest> = parsed
                .iter()
                .filter(|(_, duration)| !duration.is_zero())
                .map(|(category, duration)| {
                    InsertLogRequest::new(*category, duration.hour, duration.minutes)
                })
                .collect();
            if requests.is_empty() {
                println!("Every duration was zero; nothing to save.");
                return Ok(());
            }
            let results = api.insert_batch(token, requests).await;
            match summarize_batch(&results) {
                BatchOutcome::Saved { count } => println!("Saved {} record(s).", count),
                BatchOutcome::Failed {
                    message,
                    duplicate_day,
                } => {
                    if duplicate_day {
                        println!("Today's records already exist. ({})", message);
                    } else {
                        println!("Save failed: {}", message);
                    }
                }
            }
        }
        Some(Commands::Month { year_month }) => {
            let token = auth.require_token()?;
            let (year, month) = match year_month {
                Some(input) => input::parse_year_month(&input)?,
                None => input::current_year_month(),
            };
            let entries = api.fetch_month(token, year, month).await?;
            month::print_month_report(year, month, &entries);
        }
        Some(Commands::Tui) | None => {
            let token = auth.require_token()?.to_string();
            tui::run(api, token).await?;
        }
    }
    Ok(())
}
