//! bookshelf - command line client for the bookshelf reading-list service.
//!
//! A thin front end over `bookshelf-http`: every command maps to one or two
//! API calls, and the session is kept in a file between invocations.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{account, books, catalogue, lists, profile};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let conn = &cli.connection;
    match cli.command {
        Commands::Register(args) => account::register(conn, args).await,
        Commands::Login(args) => account::login(conn, args).await,
        Commands::Logout => account::logout(conn),
        Commands::Whoami => account::whoami(conn),
        Commands::Books(cmd) => books::handle(conn, cmd).await,
        Commands::Catalogue(args) => catalogue::run(conn, args).await,
        Commands::Profile(cmd) => profile::handle(conn, cmd).await,
        Commands::Lists(cmd) => lists::handle(conn, cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output stays pipeable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
