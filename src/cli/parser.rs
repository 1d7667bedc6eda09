use clap::{Parser, Subcommand};

/// Command-line interface definition for shiftpay
#[derive(Parser)]
#[command(
    name = "shiftpay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track work shifts, unpaid breaks and pay rates, and estimate what they earn",
    long_about = None
)]
pub struct Cli {
    /// Override the cache database path (useful for tests or a custom cache)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the local cache
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration values")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Record a shift
    Add {
        /// Date the shift starts on (YYYY-MM-DD)
        date: String,

        #[arg(long, short = 'w', help = "Workplace name")]
        workplace: Option<String>,

        #[arg(long, short = 'r', help = "Pay rate per hour")]
        rate: Option<f64>,

        #[arg(long, help = "Start time (HH:MM)")]
        start: Option<String>,

        #[arg(long, help = "End time (HH:MM); at or before --start means the next day")]
        end: Option<String>,

        #[arg(long = "break", value_name = "H:M", help = "Unpaid break (repeatable)")]
        breaks: Vec<String>,

        #[arg(long, short = 't', help = "Take the missing values from a saved template")]
        template: Option<String>,

        #[arg(long = "save-template", value_name = "NAME", help = "Also save the shift as a template")]
        save_template: Option<String>,
    },

    /// Change a recorded shift
    Update {
        /// Shift id
        id: String,

        #[arg(long, short = 'w')]
        workplace: Option<String>,

        #[arg(long, short = 'r')]
        rate: Option<f64>,

        #[arg(long, help = "Move the shift to another date (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long, help = "New start time (HH:MM)")]
        start: Option<String>,

        #[arg(long, help = "New end time (HH:MM)")]
        end: Option<String>,

        #[arg(long = "break", value_name = "H:M", help = "Replace the unpaid breaks (repeatable)")]
        breaks: Vec<String>,

        #[arg(long = "clear-breaks", conflicts_with = "breaks", help = "Remove all unpaid breaks")]
        clear_breaks: bool,
    },

    /// Delete shifts by id, or all of them
    Del {
        /// Shift ids
        ids: Vec<String>,

        #[arg(long, conflicts_with = "ids", help = "Delete every shift")]
        all: bool,
    },

    /// List shifts with totals
    List {
        #[arg(long, help = "Day to show (YYYY-MM-DD, default today)")]
        day: Option<String>,

        #[arg(long, conflicts_with_all = ["day", "period"], help = "Week (Mon-Sun) containing this date")]
        week: Option<String>,

        #[arg(long, short, conflicts_with = "day", help = "Date range FROM:TO (YYYY-MM-DD:YYYY-MM-DD)")]
        period: Option<String>,
    },

    /// Manage saved shift templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Manage remembered workplaces and pay rates
    Workinfo {
        #[command(subcommand)]
        action: WorkInfoAction,
    },

    /// Start a shift now (or at --at)
    Checkin {
        #[arg(long, help = "Check-in time today (HH:MM)")]
        at: Option<String>,
    },

    /// Finish the running shift and record it
    Checkout {
        #[arg(long, short = 'w')]
        workplace: Option<String>,

        #[arg(long, short = 'r')]
        rate: Option<f64>,

        #[arg(long = "break", value_name = "H:M")]
        breaks: Vec<String>,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum TemplateAction {
    /// List saved templates
    List,
    /// Print one template as JSON
    Show { name: String },
    /// Delete a template
    Del { name: String },
}

#[derive(Subcommand)]
pub enum WorkInfoAction {
    /// List workplaces and their pay rates
    List,
    /// Remember a pay rate for a workplace
    Add { workplace: String, rate: f64 },
    /// Forget one pay rate, or the whole workplace
    Del {
        workplace: String,
        rate: Option<f64>,
    },
}
