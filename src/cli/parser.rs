use clap::{Parser, Subcommand};

/// Command-line interface definition for shiftledger
/// Work-time ledger and attendance reconciliation for the shop floor
#[derive(Parser)]
#[command(
    name = "shiftledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Work-time ledger: track work sessions and attendance, reconcile daily totals",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Override "now" (RFC3339, or "YYYY-MM-DD HH:MM" in the civil timezone).
    /// Every time-dependent operation is evaluated against this instant.
    #[arg(global = true, long = "at")]
    pub at: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Inspect the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "path", help = "Print the configuration file path")]
        path: bool,
    },

    /// Start a work session for a worker on a vehicle/process
    Start {
        /// Worker id
        worker: String,

        /// Vehicle id (opaque key; validated by the vehicle registry upstream)
        vehicle: String,

        /// Process id (opaque key)
        process: String,

        #[arg(long = "desc", help = "Free-text description")]
        desc: Option<String>,
    },

    /// Stop an open work session
    Stop {
        /// Session id
        session_id: i64,
    },

    /// List open work sessions with live durations
    Active,

    /// Clock a worker in for the current civil day
    ClockIn {
        worker: String,

        #[arg(long, help = "Device the punch came from", default_value = "cli")]
        device: String,
    },

    /// Clock a worker out
    ClockOut {
        worker: String,

        #[arg(long, help = "Device the punch came from", default_value = "cli")]
        device: String,
    },

    /// Show a worker's attendance status for the current civil day
    Status { worker: String },

    /// List sessions and attendance for a civil day
    Day {
        /// Date (YYYY-MM-DD); defaults to today
        date: Option<String>,

        #[arg(long, help = "Show only work sessions")]
        sessions: bool,

        #[arg(long, help = "Show only attendance periods")]
        attendance: bool,
    },

    /// Multi-window rollup report
    Report {
        /// Window spec: today, yesterday, day-before, week, N (days ago), YYYY-MM.
        /// Repeatable.
        #[arg(long = "window", short = 'w', required = true)]
        windows: Vec<String>,

        #[arg(
            long = "group-by",
            default_value = "vehicle",
            help = "Grouping axis: category, vehicle, or process"
        )]
        group_by: String,

        /// Restrict to these vehicle ids (repeatable)
        #[arg(long = "vehicle")]
        vehicles: Vec<String>,

        #[arg(long, help = "Emit JSON instead of a table")]
        json: bool,
    },

    /// Vehicle totals for one month, with cross-month flags
    VehicleMonth {
        /// Month (YYYY-MM)
        month: String,

        #[arg(long, help = "Emit JSON instead of a table")]
        json: bool,
    },

    /// Administrator edit of an attendance period (audited)
    AdminSet {
        /// Attendance period id
        period_id: i64,

        #[arg(long = "in", help = "New clock-in (RFC3339 or civil \"YYYY-MM-DD HH:MM\")")]
        new_in: Option<String>,

        #[arg(long = "out", help = "New clock-out")]
        new_out: Option<String>,

        #[arg(long, help = "Editor id recorded in the audit trail")]
        editor: String,
    },

    /// Print the audit trail of an attendance period
    Audit {
        /// Attendance period id
        period_id: i64,
    },

    /// Soft-delete a work session (attendance periods cannot be deleted)
    Del {
        #[arg(long, help = "Work session id to soft-delete")]
        session: Option<i64>,

        #[arg(long, help = "Attendance period id (always rejected)")]
        period: Option<i64>,
    },

    /// Run the auto-close safety net
    Sweep {
        #[arg(long, help = "Stay resident and sweep on a recurring tick")]
        watch: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the database (integrity checks, etc.)
    Db {
        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },
}
