//! Command-line arguments.

use clap::Args;
use clap::Parser;
use clap::Subcommand;

/// Browse and manage a Dispatcharr stream catalog
#[derive(Debug, Parser)]
#[command(name = "dispatcharr", version, about, long_about = None)]
pub struct Cli {
    /// Server URL, overriding `server.url`
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API token, overriding `server.token`
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output width in columns
    #[arg(long, global = true, default_value_t = 100)]
    pub width: u16,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// 1-based page to show
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page; remembered for the next run
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Filter as key=value; repeatable
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List one page of the stream catalog
    Streams {
        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Click a column header; repeat to cycle asc, desc, none
        #[arg(long = "sort", value_name = "FIELD")]
        sorts: Vec<String>,

        /// Select every matching stream across all pages
        #[arg(long)]
        select_all: bool,
    },

    /// List the streams assigned to a channel, optionally reordering them
    ChannelStreams {
        /// Channel id
        channel: i64,

        #[command(flatten)]
        page: PageArgs,

        /// Drag the row at FROM to TO (1-based positions on the page)
        #[arg(long = "move", num_args = 2, value_names = ["FROM", "TO"])]
        move_rows: Option<Vec<usize>>,
    },

    /// Delete every stream matching the filters
    DeleteSelected {
        #[command(flatten)]
        filter: FilterArgs,

        /// Actually delete; without it only the count is shown
        #[arg(long)]
        yes: bool,
    },

    /// Preview an M3U profile search/replace on a sample
    Preview {
        text: String,
        pattern: String,
        replacement: String,
    },

    /// Read and write settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Store a value
    Set { key: String, value: String },
    /// Show a value
    Get { key: String },
    /// Remove a value
    Unset { key: String },
    /// Show every stored value
    List,
}
