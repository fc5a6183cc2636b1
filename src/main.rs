use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::env;
use std::path::Path;

use life_dashboard::{config, load_finance_csv, setup_database, Dashboard, LogReporter, Settings};

const USAGE: &str = "Usage:
  life-dashboard import <user_id> <finance.csv>
  life-dashboard summary <user_id>";

fn main() -> Result<()> {
    let settings = config::init()?;
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("import") if args.len() == 4 => run_import(&settings, parse_user(&args[2])?, Path::new(&args[3])),
        Some("summary") if args.len() == 3 => run_summary(&settings, parse_user(&args[2])?),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

fn parse_user(raw: &str) -> Result<i64> {
    let user = raw
        .parse::<i64>()
        .with_context(|| format!("'{}' is not a user id", raw))?;
    if user <= 0 {
        bail!("user id must be positive, got {}", user);
    }
    Ok(user)
}

fn open_database(settings: &Settings) -> Result<Connection> {
    let conn = Connection::open(&settings.db_path)
        .with_context(|| format!("Failed to open database {}", settings.db_path))?;
    setup_database(&conn)?;
    Ok(conn)
}

fn run_import(settings: &Settings, user: i64, csv_path: &Path) -> Result<()> {
    println!("📥 Finance Import - CSV → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📂 Loading CSV...");
    let entries = load_finance_csv(csv_path)?;
    println!("✓ Loaded {} rows from {}", entries.len(), csv_path.display());

    println!("\n🔧 Opening database...");
    let conn = open_database(settings)?;
    println!("✓ {} ready (WAL mode)", settings.db_path);

    println!("\n💾 Inserting entries...");
    let dashboard = Dashboard::new(&conn, settings, &LogReporter);
    let report = dashboard.import_finance_entries(user, &entries)?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ New entries: {}", report.inserted);
    println!("✓ Duplicates skipped: {}", report.duplicates);

    Ok(())
}

fn run_summary(settings: &Settings, user: i64) -> Result<()> {
    let conn = open_database(settings)?;
    let dashboard = Dashboard::new(&conn, settings, &LogReporter);
    let overview = dashboard.overview(user)?;

    println!("📊 Life Dashboard - user {} - {}", user, overview.date);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let habits = &overview.habits;
    println!("\n🎯 Habits");
    println!("   Active: {} of {}", habits.active_habits, habits.total_habits);
    println!(
        "   Done today: {} ({:.1}%)",
        habits.completed_today, habits.completion_rate
    );
    println!(
        "   Average streak: {:.1} days, longest: {} days",
        habits.average_streak, habits.longest_streak
    );

    let water = &overview.water;
    println!("\n💧 Water");
    println!(
        "   Today: {} / {} ml ({:.1}%)",
        water.today_total, water.daily_goal, water.progress_percentage
    );
    println!(
        "   Goal streak: {} days, 7-day average: {:.1} ml",
        water.streak_days, water.weekly_average
    );

    println!("\n💰 Finance");
    for (label, stats) in [
        ("Today", &overview.finance.today),
        ("This month", &overview.finance.this_month),
        ("This year", &overview.finance.this_year),
    ] {
        println!(
            "   {:<10} income {:>10.2}  expenses {:>10.2}  net {:>10.2}  savings {:>6.1}%",
            label, stats.total_income, stats.total_expenses, stats.net_balance, stats.savings_rate
        );
    }
    if let Some(budget) = &overview.finance.current_budget {
        println!(
            "   Budget {}-{:02}: {:.2} left",
            budget.budget_year, budget.budget_month, overview.finance.this_month.monthly_budget_remaining
        );
    }

    Ok(())
}
