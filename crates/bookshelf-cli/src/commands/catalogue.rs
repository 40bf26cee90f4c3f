//! Catalogue command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct CatalogueArgs {
    /// Only show books whose title, authors or genre contain this text
    #[arg(long, short)]
    pub search: Option<String>,

    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,
}

pub async fn run(conn: &ConnectionArgs, args: CatalogueArgs) -> Result<()> {
    let client = session::connect_authenticated(conn)?;
    let books = client
        .catalogue()
        .await
        .context("Failed to fetch the catalogue")?;

    let term = args.search.unwrap_or_default();
    let matching: Vec<_> = books.iter().filter(|b| b.matches(&term)).collect();

    if matching.is_empty() {
        eprintln!("{}", "No books found.".dimmed());
        return Ok(());
    }

    for book in matching {
        if args.json {
            output::json(book)?;
        } else {
            output::book_line(book);
        }
    }
    Ok(())
}
