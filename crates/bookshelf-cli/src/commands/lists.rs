//! Reading list commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use bookshelf_core::{BookId, ReadingListId};
use bookshelf_http::BookshelfClient;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ListsCommand {
    #[command(subcommand)]
    pub command: ListsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ListsSubcommand {
    /// Show your reading lists
    List {
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Create a reading list
    Create { name: String },

    /// Delete a reading list
    Delete { id: ReadingListId },

    /// Add a book to a reading list
    Add { list: ReadingListId, book: BookId },

    /// Remove a book from a reading list
    Remove { list: ReadingListId, book: BookId },

    /// Move an entry to a new position (positions start at 1)
    Move {
        list: ReadingListId,
        from: usize,
        to: usize,
    },
}

pub async fn handle(conn: &ConnectionArgs, cmd: ListsCommand) -> Result<()> {
    let client = session::connect_authenticated(conn)?;

    match cmd.command {
        ListsSubcommand::List { json } => {
            let lists = client
                .reading_lists()
                .await
                .context("Failed to fetch reading lists")?;
            if lists.is_empty() {
                eprintln!("{}", "No reading lists yet.".dimmed());
            }
            for list in &lists {
                if json {
                    output::json(list)?;
                } else {
                    output::reading_list(list);
                }
            }
        }
        ListsSubcommand::Create { name } => {
            if name.trim().is_empty() {
                anyhow::bail!("Reading list name cannot be empty");
            }
            client
                .create_reading_list(name.trim())
                .await
                .context("Failed to create reading list")?;
            output::success(&format!("Created reading list '{}'", name.trim()));
        }
        ListsSubcommand::Delete { id } => {
            client
                .delete_reading_list(id)
                .await
                .with_context(|| format!("Failed to delete reading list {}", id))?;
            output::success(&format!("Deleted reading list {}", id));
        }
        ListsSubcommand::Add { list, book } => {
            client
                .add_to_reading_list(list, book)
                .await
                .with_context(|| format!("Failed to add book {} to list {}", book, list))?;
            output::success(&format!("Added book {} to list {}", book, list));
        }
        ListsSubcommand::Remove { list, book } => {
            client
                .remove_from_reading_list(list, book)
                .await
                .with_context(|| format!("Failed to remove book {} from list {}", book, list))?;
            output::success(&format!("Removed book {} from list {}", book, list));
        }
        ListsSubcommand::Move { list, from, to } => move_entry(&client, list, from, to).await?,
    }
    Ok(())
}

async fn move_entry(
    client: &BookshelfClient,
    id: ReadingListId,
    from: usize,
    to: usize,
) -> Result<()> {
    if from == 0 || to == 0 {
        anyhow::bail!("Positions start at 1");
    }

    let mut list = client
        .reading_lists()
        .await
        .context("Failed to fetch reading lists")?
        .into_iter()
        .find(|l| l.id == id)
        .with_context(|| format!("Reading list {} not found", id))?;

    list.move_entry(from - 1, to - 1)?;
    client
        .reorder_reading_list(id, &list.reorder_request())
        .await
        .context("Failed to save book order")?;

    output::success("Book order saved");
    output::reading_list(&list);
    Ok(())
}
