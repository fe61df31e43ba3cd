//! Print the dashboard of a running tally server as plain text.
//!
//! Usage: `tally-report [YYYY-MM] [FROM [TO]]`

use std::process::ExitCode;

use tally::client::{Dashboard, HttpApi};
use tally::client::dashboard::{NO_BUDGET_CAPTION, NO_DATA_CAPTION};
use tally::config::ClientConfig;
use tally::date_utils::{parse_input_date, DateRange, MonthKey};
use tally::services::analytics::format_cents;
use tally::services::insights::InsightReport;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn parse_args(args: &[String]) -> Result<(MonthKey, DateRange), String> {
    let month = match args.first() {
        Some(m) => m.parse::<MonthKey>().map_err(|e| e.to_string())?,
        None => MonthKey::current(),
    };
    let date = |s: &String| parse_input_date(s).ok_or_else(|| format!("invalid date '{}'", s));
    let range = DateRange {
        from: args.get(1).map(date).transpose()?,
        to: args.get(2).map(date).transpose()?,
    };
    Ok((month, range))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (month, range) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {}\nusage: tally-report [YYYY-MM] [FROM [TO]]", e);
            return ExitCode::FAILURE;
        }
    };

    let config = ClientConfig::from_env();
    let api = match HttpApi::new(&config.api_url) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut dashboard = Dashboard::new(month);
    dashboard.set_date_range(range);
    let complete = dashboard.refresh(&api).await;
    for notification in dashboard.take_notifications() {
        eprintln!("{}", notification.message);
    }

    let summary = dashboard.summary();
    println!("Dashboard for {}", month.long_label());
    println!(
        "Total lifetime expenses: ${}  ({} transactions)",
        format_cents(summary.total_cents),
        summary.transaction_count
    );

    println!("\nSpending by category ({})", range.label());
    let categories = dashboard.category_totals();
    if categories.is_empty() {
        println!("  {}", NO_DATA_CAPTION);
    }
    for row in categories {
        println!("  {:<15} ${:>10}", row.category, row.total_display());
    }

    println!("\nMonthly expenses ({})", range.label());
    let months = dashboard.monthly_totals();
    if months.is_empty() {
        println!("  {}", NO_DATA_CAPTION);
    }
    for row in months {
        println!("  {:<15} ${:>10}", row.label, row.total_display());
    }

    println!("\nBudget vs actual for {}", month.label());
    let comparison = dashboard.budget_comparison();
    if comparison.is_empty() {
        println!("  {}", NO_BUDGET_CAPTION);
    }
    for row in &comparison {
        println!(
            "  {:<15} budget ${:>10}  actual ${:>10}",
            row.category,
            row.budget_display(),
            row.actual_display()
        );
    }

    println!("\nInsights");
    match dashboard.insights() {
        InsightReport::AllGood => {
            println!("  {}", InsightReport::ALL_GOOD_TITLE);
            println!("  {}", InsightReport::ALL_GOOD_DESCRIPTION);
        }
        InsightReport::Alerts(insights) => {
            for insight in insights {
                println!("  {}: {}", insight.title(), insight.description());
            }
        }
    }

    if complete {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
