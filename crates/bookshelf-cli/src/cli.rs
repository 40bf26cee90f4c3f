//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::account::{LoginArgs, RegisterArgs};
use crate::commands::books::BooksCommand;
use crate::commands::catalogue::CatalogueArgs;
use crate::commands::lists::ListsCommand;
use crate::commands::profile::ProfileCommand;

/// Catalogue books and manage reading lists from the terminal.
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(author, version = env!("BOOKSHELF_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the API lives and where the session is kept.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// API base URL, e.g. http://127.0.0.1:8000/api
    #[arg(long, env = "BOOKSHELF_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Base URL for cover and avatar images (defaults to the API origin)
    #[arg(long, env = "BOOKSHELF_MEDIA_URL", global = true)]
    pub media_url: Option<String>,

    /// Session file (defaults to <data dir>/bookshelf/session.json)
    #[arg(long, env = "BOOKSHELF_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account
    Register(RegisterArgs),

    /// Log in and store the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage your own books
    Books(BooksCommand),

    /// Browse every book in the catalogue
    Catalogue(CatalogueArgs),

    /// View or edit your profile
    Profile(ProfileCommand),

    /// Manage reading lists
    Lists(ListsCommand),
}
