//! Rollup reports: multi-window aggregation and vehicle×month totals.

use crate::calendar::WindowLabel;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::aggregate::{self, AggregateRequest};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::report::GroupBy;
use crate::ui::messages::warning;
use crate::utils::date::parse_month;
use crate::utils::formatting::{mins2readable, pad_right};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let tz = cfg.tz()?;
    let now = super::resolve_now(cli.at.as_ref(), tz)?;

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    match &cli.command {
        Commands::Report {
            windows,
            group_by,
            vehicles,
            json,
        } => {
            let labels = windows
                .iter()
                .map(|w| WindowLabel::parse(w))
                .collect::<AppResult<Vec<_>>>()?;
            let group_by = GroupBy::from_code(group_by)
                .ok_or_else(|| AppError::InvalidGroupBy(group_by.to_string()))?;

            let req = AggregateRequest {
                windows: labels,
                group_by,
                vehicle_filter: if vehicles.is_empty() {
                    None
                } else {
                    Some(vehicles.clone())
                },
            };

            let report = aggregate::aggregate(
                &pool.conn,
                &req,
                &cfg.categories,
                now,
                tz,
                cfg.implausible_open_minutes,
            )?;

            if *json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report)
                        .map_err(|e| AppError::Other(e.to_string()))?
                );
                return Ok(());
            }

            for (window_key, buckets) in &report.windows {
                println!("\n=== {} (by {}) ===", window_key, group_by.as_str());
                if buckets.is_empty() {
                    println!("  (no sessions)");
                }
                for b in buckets {
                    let flags = match (b.cross_day, b.cross_month) {
                        (_, true) => " [cross-month]",
                        (true, false) => " [cross-day]",
                        _ => "",
                    };
                    println!(
                        "  {} {} ({} session(s), avg {}){}",
                        pad_right(&b.group_key, 16),
                        mins2readable(b.total_minutes, false),
                        b.count,
                        mins2readable(b.average_minutes(), true),
                        flags
                    );
                }
            }

            for w in &report.warnings {
                warning(w);
            }
        }

        Commands::VehicleMonth { month, json } => {
            let (year, m) = parse_month(month)?;
            let rows = aggregate::vehicle_month_totals(&pool.conn, year, m, now, tz)?;

            if *json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&rows)
                        .map_err(|e| AppError::Other(e.to_string()))?
                );
                return Ok(());
            }

            println!("\n=== vehicles, {} ===", month);
            if rows.is_empty() {
                println!("  (no sessions)");
            }
            for r in &rows {
                let flag = if r.is_cross_month { " [cross-month]" } else { "" };
                println!(
                    "  {} {} ({} session(s)){}",
                    pad_right(&r.vehicle_id, 16),
                    mins2readable(r.total_minutes, false),
                    r.count,
                    flag
                );
            }
        }

        _ => {}
    }

    Ok(())
}
