//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use bookshelf_core::models::{Book, ReadingList};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a labeled field, or a dash when it is empty.
pub fn optional_field(label: &str, value: Option<&str>) {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => field(label, value),
        None => field(label, "-"),
    }
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// One-line summary of a book.
pub fn book_line(book: &Book) {
    println!(
        "{:>5}  {}  {}  {}",
        book.id.to_string().dimmed(),
        book.title.bold(),
        book.authors,
        format!("[{}]", book.genre).dimmed()
    );
}

/// A reading list with its entries in order.
pub fn reading_list(list: &ReadingList) {
    println!(
        "{:>5}  {} {}",
        list.id.to_string().dimmed(),
        list.name.bold(),
        format!("({} books)", list.books.len()).dimmed()
    );
    for (position, entry) in list.books.iter().enumerate() {
        let book = entry
            .book_id()
            .map(|id| format!("#{}", id))
            .unwrap_or_default();
        println!(
            "       {:>2}. {} {}",
            position + 1,
            entry.title(),
            book.dimmed()
        );
    }
}
