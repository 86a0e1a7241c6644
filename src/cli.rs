use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line host for debugging an Inkarr server connection
#[derive(Parser)]
#[command(name = "inkarr")]
#[command(about = "Browse an Inkarr server the way a reader app would", long_about = None)]
pub struct Cli {
    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Preferences file (defaults to $INKARR_CONFIG or the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show or edit server preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List every series on the server
    Popular,
    /// Latest updates (same listing as popular)
    Latest,
    /// Filter series by title
    Search {
        /// Query to search for
        query: String,
    },
    /// Series details
    Details {
        /// Series id
        id: i64,
    },
    /// Chapters of a series, newest first
    Chapters {
        /// Series id
        id: i64,
    },
    /// Pages of a chapter
    Pages {
        /// Chapter url as printed by `chapters`, e.g. /api/v1/chapter/12
        chapter_url: String,
    },
    /// Download one page image
    Image {
        /// Absolute image url as printed by `pages`
        url: String,
        /// Where to write the image
        output: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print current settings
    Show,
    /// Set the server address, e.g. http://192.168.1.100:3000
    SetAddress { url: String },
    /// Set the API key (empty to clear)
    SetApiKey { key: String },
}
