use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "warden",
    about = "Warden: permissioned blob store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Identity to act as
    #[arg(short, long, global = true, env = "WARDEN_USER")]
    pub user: Option<String>,

    /// Storage directory (overrides the config file)
    #[arg(long, global = true, env = "WARDEN_ROOT")]
    pub root: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "WARDEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a local file as a new object
    Upload(UploadArgs),
    /// List objects you can read
    List,
    /// Show an object's metadata
    Meta(IdArgs),
    /// Fetch an object's content
    Download(DownloadArgs),
    /// Replace an object's content with a local file
    Replace(ReplaceArgs),
    /// Change an object's name
    Rename(RenameArgs),
    /// Show who can read an object
    Readers(IdArgs),
    /// Replace the whole reader list
    SetReaders(SetReadersArgs),
    /// Grant read access to one identity
    AddReader(ReaderArgs),
    /// Revoke read access from one identity
    RemoveReader(ReaderArgs),
    /// Delete an object
    Delete(IdArgs),
}

#[derive(Args)]
pub struct UploadArgs {
    pub name: String,
    pub path: PathBuf,
    #[arg(short, long = "reader")]
    pub readers: Vec<String>,
    /// Reader list as a JSON array, e.g. '["bob","carol"]'
    #[arg(long, conflicts_with = "readers")]
    pub readers_json: Option<String>,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct DownloadArgs {
    pub id: String,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReplaceArgs {
    pub id: String,
    pub path: PathBuf,
}

#[derive(Args)]
pub struct RenameArgs {
    pub id: String,
    pub name: String,
}

#[derive(Args)]
pub struct SetReadersArgs {
    pub id: String,
    pub users: Vec<String>,
    /// Reader list as a JSON array
    #[arg(long, conflicts_with = "users")]
    pub json: Option<String>,
}

#[derive(Args)]
pub struct ReaderArgs {
    pub id: String,
    pub target: String,
}
