//! Profile commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use bookshelf_core::models::{Profile, ProfileUpdate};
use bookshelf_http::BookshelfClient;

use super::read_upload;
use crate::cli::ConnectionArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Show your profile
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update your profile; omitted fields keep their current value
    Update {
        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        #[arg(long)]
        favorite_genre: Option<String>,

        /// Avatar image to upload
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
}

pub async fn handle(conn: &ConnectionArgs, cmd: ProfileCommand) -> Result<()> {
    let client = session::connect_authenticated(conn)?;

    match cmd.command {
        ProfileSubcommand::Show { json } => {
            let profile = client.profile().await.context("Failed to fetch profile")?;
            if json {
                output::json_pretty(&profile)?;
            } else {
                print_profile(&client, &profile);
            }
        }
        ProfileSubcommand::Update {
            phone,
            bio,
            favorite_genre,
            avatar,
        } => {
            let current = client.profile().await.context("Failed to fetch profile")?;
            let mut update = ProfileUpdate::from_profile(&current);
            if let Some(phone) = phone {
                update.phone = phone;
            }
            if let Some(bio) = bio {
                update.bio = bio;
            }
            if let Some(genre) = favorite_genre {
                update.favorite_genre = genre;
            }
            if let Some(path) = avatar {
                update.avatar = Some(read_upload(&path)?);
            }

            let profile = client
                .update_profile(&update)
                .await
                .context("Failed to update profile")?;
            output::success("Profile updated");
            println!();
            print_profile(&client, &profile);
        }
    }
    Ok(())
}

fn print_profile(client: &BookshelfClient, profile: &Profile) {
    output::field("Username", &profile.username);
    output::optional_field("Email", profile.email.as_deref());
    output::optional_field("Phone", profile.phone.as_deref());
    output::optional_field("Bio", profile.bio.as_deref());
    output::optional_field("Favorite genre", profile.favorite_genre.as_deref());
    output::optional_field("Avatar", profile.avatar_url(client.media_base()).as_deref());
}
