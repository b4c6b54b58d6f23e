use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::migrate::check_schema;
use crate::db::pool::DbPool;
use crate::db::stats::print_db_info;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Database maintenance: integrity check, vacuum, info.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        check,
        vacuum,
        info,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        if *check {
            let result: String =
                pool.conn
                    .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
            if result == "ok" {
                success("Integrity check: ok");
            } else {
                warning(format!("Integrity check: {}", result));
            }

            for (table, present) in check_schema(&pool.conn)? {
                if present {
                    success(format!("table {} present", table));
                } else {
                    warning(format!("table {} MISSING", table));
                }
            }
        }

        if *vacuum {
            pool.conn.execute_batch("VACUUM;")?;
            success("Database vacuumed");
        }

        if *info {
            print_db_info(&mut pool, &cfg.database)?;
        }
    }

    Ok(())
}
