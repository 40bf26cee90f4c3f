//! Book commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::Colorize;

use bookshelf_core::BookId;
use bookshelf_core::models::{Book, BookForm};
use bookshelf_http::BookshelfClient;

use super::read_upload;
use crate::cli::ConnectionArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct BooksCommand {
    #[command(subcommand)]
    pub command: BooksSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BooksSubcommand {
    /// List your books
    List {
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Show a single book
    Show { id: BookId },

    /// Add a book
    Create(BookFields),

    /// Edit a book; omitted fields keep their current value
    Edit {
        id: BookId,

        #[command(flatten)]
        fields: BookFields,
    },

    /// Delete a book
    Delete { id: BookId },
}

#[derive(Args, Debug, Default)]
pub struct BookFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub authors: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    /// Publication date (YYYY-MM-DD)
    #[arg(long)]
    pub published: Option<NaiveDate>,

    #[arg(long)]
    pub description: Option<String>,

    /// Cover image to upload
    #[arg(long)]
    pub cover: Option<PathBuf>,
}

impl BookFields {
    /// Overlay the given fields onto `form`.
    fn apply(self, form: &mut BookForm) -> Result<()> {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(authors) = self.authors {
            form.authors = authors;
        }
        if let Some(genre) = self.genre {
            form.genre = genre;
        }
        if let Some(date) = self.published {
            form.publication_date = Some(date);
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(path) = self.cover {
            form.cover_image = Some(read_upload(&path)?);
        }
        Ok(())
    }
}

pub async fn handle(conn: &ConnectionArgs, cmd: BooksCommand) -> Result<()> {
    let client = session::connect_authenticated(conn)?;

    match cmd.command {
        BooksSubcommand::List { json } => list(&client, json).await,
        BooksSubcommand::Show { id } => show(&client, id).await,
        BooksSubcommand::Create(fields) => create(&client, fields).await,
        BooksSubcommand::Edit { id, fields } => edit(&client, id, fields).await,
        BooksSubcommand::Delete { id } => {
            client
                .delete_book(id)
                .await
                .with_context(|| format!("Failed to delete book {}", id))?;
            output::success(&format!("Deleted book {}", id));
            Ok(())
        }
    }
}

async fn list(client: &BookshelfClient, json: bool) -> Result<()> {
    let books = client.my_books().await.context("Failed to list books")?;

    if books.is_empty() {
        eprintln!("{}", "No books yet. Add one with 'bookshelf books create'.".dimmed());
        return Ok(());
    }

    for book in &books {
        if json {
            output::json(book)?;
        } else {
            output::book_line(book);
        }
    }
    Ok(())
}

/// Fetch a book, turning a 404 into a readable message.
async fn fetch(client: &BookshelfClient, id: BookId) -> Result<Book> {
    match client.book_detail(id).await {
        Ok(book) => Ok(book),
        Err(e) if e.is_not_found() => anyhow::bail!("Book {} not found", id),
        Err(e) => Err(e).with_context(|| format!("Failed to fetch book {}", id)),
    }
}

fn print_book(client: &BookshelfClient, book: &Book) {
    output::field("ID", &book.id.to_string());
    output::field("Title", &book.title);
    output::field("Authors", &book.authors);
    output::field("Genre", &book.genre);
    output::optional_field(
        "Published",
        book.publication_date.map(|d| d.to_string()).as_deref(),
    );
    output::optional_field("Description", book.description.as_deref());
    output::optional_field("Cover", book.cover_url(client.media_base()).as_deref());
    output::optional_field("Added by", book.created_by.as_deref());
}

async fn show(client: &BookshelfClient, id: BookId) -> Result<()> {
    let book = fetch(client, id).await?;
    print_book(client, &book);
    Ok(())
}

async fn create(client: &BookshelfClient, fields: BookFields) -> Result<()> {
    let mut form = BookForm::default();
    fields.apply(&mut form)?;
    if form.title.trim().is_empty() {
        anyhow::bail!("--title is required");
    }

    let book = client
        .create_book(&form)
        .await
        .context("Failed to create book")?;

    output::success(&format!("Added '{}'", book.title));
    println!();
    print_book(client, &book);
    Ok(())
}

async fn edit(client: &BookshelfClient, id: BookId, fields: BookFields) -> Result<()> {
    let current = fetch(client, id).await?;
    let mut form = BookForm::from_book(&current);
    fields.apply(&mut form)?;

    let book = client
        .update_book(id, &form)
        .await
        .with_context(|| format!("Failed to update book {}", id))?;

    output::success(&format!("Updated '{}'", book.title));
    Ok(())
}
