use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "deck", about = concat!("[♥] blogdeck v", env!("CARGO_PKG_VERSION"), " - browse and like blog posts from the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: $DECK_CONFIG, then ./deck.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Page address to open instead of the configured post list
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Read the page from a saved HTML file instead of fetching it
    #[arg(long = "page-file", global = true)]
    pub page_file: Option<PathBuf>,

    /// Cookies to send, as `name=value; name2=value2`
    #[arg(long, global = true)]
    pub cookie: Option<String>,

    /// Log debug detail to stderr (TUI: to the log file)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List posts, optionally filtered by a search query
    Posts(PostsArgs),
    /// Toggle the like on a post
    Like(LikeArgs),
    /// Show which anti-forgery token the page provides
    Token,
}

#[derive(Args)]
pub struct PostsArgs {
    /// Search text (default: the `q` parameter of the page address)
    pub query: Option<String>,
}

#[derive(Args)]
pub struct LikeArgs {
    /// Post slug, like-control index, or like address
    pub post: String,
}
