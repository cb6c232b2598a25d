use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::messages::Locale;

/// Admin console for the eBPF intrusion-detection backend.
///
/// Shows the active ruleset, alerts, and callable syscalls; edits the
/// ruleset; and triggers test attacks. All data comes from the backend's
/// REST API.
#[derive(Parser, Debug)]
#[command(name = "ips-admin", about = "Admin console for the eBPF intrusion-detection backend")]
pub struct CliArgs {
    /// Backend URL, e.g. http://ips-admin:8080 (overrides IPS_API_URL and config file)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Path to config file (default: ~/.config/ips-admin/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Display language
    #[arg(long, global = true, value_enum)]
    pub locale: Option<Locale>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the active ruleset
    Rules {
        /// Print the raw JSON document instead of the summary
        #[arg(long)]
        raw: bool,
    },

    /// Edit the ruleset interactively
    Edit,

    /// Show recent alerts
    Alerts {
        /// Maximum number of alerts (default from config)
        #[arg(long)]
        limit: Option<u32>,

        /// Only alerts at or after this RFC 3339 instant
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Keep refreshing until Ctrl+C
        #[arg(long)]
        watch: bool,
    },

    /// List syscalls the cluster can call
    Syscalls {
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
    },

    /// List testable rules, or trigger a test attack for one
    TestAttack {
        /// Rule to exercise; omit to list available rules
        rule_id: Option<String>,
    },

    /// Show the cluster architecture diagram
    Diagram,
}
