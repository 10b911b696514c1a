use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use pos_dashboard::api::{ApiClient, DashboardApi};
use pos_dashboard::config::{Config, get_config_path};
use pos_dashboard::consts::cli_consts::polling::SNAPSHOT_INTERVAL_SECS;
use pos_dashboard::environment::Environment;
use pos_dashboard::models::DateRange;
use pos_dashboard::navigation::{NavigationAction, NavigationState, Role, catalog};
use pos_dashboard::report;
use pos_dashboard::session::{HeadlessOptions, run_headless_mode, setup_session};
use pos_dashboard::{print_cmd_error, print_cmd_info, print_cmd_success};
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Backend base URL. Overrides the config file and POS_DASHBOARD_ENV.
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll every widget and print activity until Ctrl+C or `quit`.
    /// Reads commands from stdin; type `help` for the list.
    Watch {
        /// Viewer role (cashier, manager, admin); defaults to the saved role
        #[arg(long)]
        role: Option<Role>,

        /// Seconds between dashboard snapshots; 0 disables them
        #[arg(long, default_value_t = SNAPSHOT_INTERVAL_SECS)]
        snapshot_secs: u64,

        /// Emit JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
    /// Fetch integration health once
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Fetch the cashier roster once
    Cashiers {
        #[arg(long)]
        json: bool,
    },
    /// Fetch KPI metrics once (defaults to the trailing 30 days)
    Metrics {
        #[arg(long, value_name = "YYYY-MM-DD")]
        start_date: Option<NaiveDate>,

        #[arg(long, value_name = "YYYY-MM-DD")]
        end_date: Option<NaiveDate>,

        #[arg(long)]
        json: bool,
    },
    /// Show the navigation visible to a role
    Nav {
        /// Viewer role; defaults to the saved role
        #[arg(long)]
        role: Option<Role>,

        /// Current location, highlighted when it matches an item
        #[arg(long, default_value = "/")]
        location: String,

        /// Show the collapsed navigation
        #[arg(long)]
        collapsed: bool,

        #[arg(long)]
        json: bool,
    },
    /// Save the viewer role
    SetRole {
        /// cashier, manager or admin
        role: Role,
    },
    /// Clear the dashboard configuration.
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let environment_str = std::env::var("POS_DASHBOARD_ENV").unwrap_or_default();
    let environment = environment_str
        .parse::<Environment>()
        .unwrap_or(Environment::default());

    let config_path = get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Watch {
            role,
            snapshot_secs,
            json,
        } => {
            let mut config = Config::load_or_default(&config_path)?;
            if role.is_some() {
                config.role = role;
            }
            let api_url = resolve_api_url(args.api_url, &config, environment);
            let session = setup_session(config, api_url).await?;
            run_headless_mode(
                session,
                HeadlessOptions {
                    snapshot_interval: Duration::from_secs(snapshot_secs),
                    json,
                },
            )
            .await
        }
        Command::Status { json } => {
            let api = connect(args.api_url, &config_path, environment)?;
            match api.integration_status().await {
                Ok(statuses) => print_output(&statuses, json, report::status_lines(&statuses)),
                Err(e) => {
                    print_cmd_error!("Failed to fetch integration status", &e.to_string());
                    Err(e.into())
                }
            }
        }
        Command::Cashiers { json } => {
            let api = connect(args.api_url, &config_path, environment)?;
            match api.list_cashiers().await {
                Ok(cashiers) => print_output(&cashiers, json, report::cashier_lines(&cashiers)),
                Err(e) => {
                    print_cmd_error!("Failed to fetch cashiers", &e.to_string());
                    Err(e.into())
                }
            }
        }
        Command::Metrics {
            start_date,
            end_date,
            json,
        } => {
            let range = metrics_range(start_date, end_date, Local::now().date_naive())?;
            let api = connect(args.api_url, &config_path, environment)?;
            match api.kpi_report(&range).await {
                Ok(kpis) => print_output(&kpis, json, report::kpi_lines(&kpis)),
                Err(e) => {
                    print_cmd_error!("Failed to fetch metrics", &e.to_string());
                    Err(e.into())
                }
            }
        }
        Command::Nav {
            role,
            location,
            collapsed,
            json,
        } => {
            let config = Config::load_or_default(&config_path)?;
            let sections = match &config.navigation_file {
                Some(path) => catalog::load_sections(path)?,
                None => catalog::default_sections(),
            };
            let view = NavigationState::new()
                .reduce(NavigationAction::SetCollapsed(collapsed))
                .view(&sections, role.or(config.role), &location);
            print_output(&view, json, report::navigation_lines(&view))
        }
        Command::SetRole { role } => {
            let mut config = Config::load_or_default(&config_path)?;
            config.role = Some(role);
            config
                .save(&config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            print_cmd_success!("Role saved", "{}", role);
            Ok(())
        }
        Command::Logout => {
            println!("Logging out and clearing dashboard configuration file...");
            if !Config::clear(&config_path)? {
                print_cmd_info!("Nothing to clear", "no config file at {}", config_path.display());
            }
            Ok(())
        }
    }
}

/// `--api-url`, then the config file, then the environment's default.
fn resolve_api_url(flag: Option<String>, config: &Config, environment: Environment) -> String {
    flag.or_else(|| config.api_url.clone())
        .unwrap_or_else(|| environment.api_url())
}

fn connect(
    flag: Option<String>,
    config_path: &Path,
    environment: Environment,
) -> Result<ApiClient, Box<dyn Error>> {
    let config = Config::load_or_default(config_path)?;
    Ok(ApiClient::new(resolve_api_url(flag, &config, environment))?)
}

/// Missing bounds default to a 30-day window ending today (or on `end_date`).
fn metrics_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateRange, Box<dyn Error>> {
    let end_date = end_date.unwrap_or(today);
    match start_date {
        Some(start_date) => Ok(DateRange::new(start_date, end_date)?),
        None => Ok(DateRange::default_window(end_date)),
    }
}

fn print_output<T: Serialize>(
    value: &T,
    json: bool,
    lines: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}
