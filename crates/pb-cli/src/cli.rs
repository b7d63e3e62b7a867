use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pb",
    about = "Postboard: posts from your own store, merged with a public feed",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Base URL of the Postboard API
    #[arg(long, global = true, env = "POSTBOARD_SERVER", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Credential sent as `x-api-key` on create, edit, and delete
    #[arg(long, global = true, env = "POSTBOARD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the Postboard API server
    Serve(ServeArgs),
    /// List posts, one page at a time
    List(ListArgs),
    /// Show a post with its word count
    Show(ShowArgs),
    /// Create a post
    Create(CreateArgs),
    /// Change a post's title and/or body
    Edit(EditArgs),
    /// Permanently delete a post
    Delete(DeleteArgs),
    /// Count words in text
    Count(CountArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the bind address from the configuration
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long, default_value = "1")]
    pub page: usize,
    #[arg(long, default_value = "10")]
    pub per_page: usize,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(short, long)]
    pub title: String,
    #[arg(short, long)]
    pub body: String,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub body: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Args)]
pub struct CountArgs {
    pub text: Vec<String>,
}
