//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! ecofinds register -e alice@example.com -p hunter2 -u alice
//! ecofinds login -e alice@example.com -p hunter2
//! ecofinds profile --name "Alice A." --phone 555-0100
//! ecofinds whoami
//! ecofinds logout
//! ```

use clap::Args;

use ecofinds_storefront::models::{ProfileUpdate, User};
use ecofinds_storefront::state::AppState;

use super::CliError;

/// Profile fields to change. Omitted flags are left as they are.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Avatar image URL
    #[arg(long)]
    pub avatar: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
}

impl From<ProfileArgs> for ProfileUpdate {
    fn from(args: ProfileArgs) -> Self {
        Self {
            email: args.email,
            username: args.username,
            name: args.name,
            phone: args.phone,
            address: args.address,
            avatar: args.avatar,
        }
    }
}

/// Register and sign in.
///
/// # Errors
///
/// Returns the storefront error if registration is rejected.
#[allow(clippy::print_stdout)]
pub fn register(
    state: &mut AppState,
    email: &str,
    password: &str,
    username: &str,
) -> Result<(), CliError> {
    let user = state.register(email, password, username)?;
    println!("Welcome, {}! You are signed in.", user.display_name());
    Ok(())
}

/// Sign in.
///
/// # Errors
///
/// Returns the storefront error if the credentials do not match.
#[allow(clippy::print_stdout)]
pub fn login(state: &mut AppState, email: &str, password: &str) -> Result<(), CliError> {
    let user = state.login(email, password)?;
    println!("Signed in as {}.", user.display_name());
    Ok(())
}

/// Sign out.
///
/// # Errors
///
/// Returns the storefront error if the session cannot be cleared.
#[allow(clippy::print_stdout)]
pub fn logout(state: &mut AppState) -> Result<(), CliError> {
    state.logout()?;
    println!("Signed out.");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn whoami(state: &AppState) {
    match state.current_user() {
        Some(user) => print_user(user),
        None => println!("Not signed in."),
    }
}

/// Update the signed-in user's profile.
///
/// # Errors
///
/// Returns the storefront error if the update is rejected.
#[allow(clippy::print_stdout)]
pub fn profile(state: &mut AppState, args: ProfileArgs) -> Result<(), CliError> {
    let update = ProfileUpdate::from(args);
    if update.is_empty() {
        whoami(state);
        return Ok(());
    }

    match state.update_profile(&update)? {
        Some(user) => {
            println!("Profile updated.");
            print_user(&user);
        }
        None => println!("Not signed in; nothing to update."),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_user(user: &User) {
    println!("{} <{}>", user.display_name(), user.email);
    println!("  id:       {}", user.id);
    println!("  username: {}", user.username);
    if !user.phone.is_empty() {
        println!("  phone:    {}", user.phone);
    }
    if !user.address.is_empty() {
        println!("  address:  {}", user.address);
    }
    if let Some(avatar) = &user.avatar {
        println!("  avatar:   {avatar}");
    }
}
