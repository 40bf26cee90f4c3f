//! Account commands: register, login, logout, whoami.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use bookshelf_core::Credentials;
use bookshelf_core::models::Registration;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long)]
    pub password: String,

    /// Must match --password
    #[arg(long)]
    pub confirm_password: String,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,
}

pub async fn register(conn: &ConnectionArgs, args: RegisterArgs) -> Result<()> {
    let client = session::connect(conn)?;
    let registration = Registration {
        username: args.username,
        email: args.email,
        phone: args.phone,
        password: args.password,
        confirm_password: args.confirm_password,
    };

    client
        .register(&registration)
        .await
        .context("Registration failed")?;

    output::success(&format!("Account '{}' created", registration.username));
    eprintln!("{}", "Run 'bookshelf login' to sign in.".dimmed());
    Ok(())
}

pub async fn login(conn: &ConnectionArgs, args: LoginArgs) -> Result<()> {
    let client = session::connect(conn)?;
    let credentials = Credentials::new(&args.username, &args.password);

    eprintln!("{}", "Logging in...".dimmed());
    client.login(&credentials).await.context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("User", &args.username);
    output::field("API", client.base_url().as_str());
    Ok(())
}

pub fn logout(conn: &ConnectionArgs) -> Result<()> {
    let client = session::connect(conn)?;
    client.logout().context("Failed to clear session")?;
    output::success("Logged out");
    Ok(())
}

pub fn whoami(conn: &ConnectionArgs) -> Result<()> {
    let client = session::connect_authenticated(conn)?;
    let username = client.session().username()?;

    output::optional_field("User", username.as_deref());
    output::field("API", client.base_url().as_str());
    Ok(())
}
