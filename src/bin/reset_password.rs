use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use outlay_rs::{
    PasswordHash, ValidatedPassword,
    user::{User, get_user_by_username, update_password},
};

/// A utility for changing the password for a registered user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The username of the account to reset.
    #[arg(long)]
    username: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let connection = Connection::open(db_path)?;
    let user = get_user(&args.username, &connection);
    println!("Resetting password for {} <{}>", user.username, user.email);

    let password_hash = match get_new_password_hash() {
        Some(password_hash) => password_hash,
        None => return Ok(()),
    };

    update_password(user.id, &password_hash, &connection)?;
    println!("Password updated.");

    Ok(())
}

fn get_user(username: &str, connection: &Connection) -> User {
    match get_user_by_username(username, connection) {
        Ok(user) => user,
        Err(error) => {
            eprintln!("Could not load user {username:?}: {error}");
            exit(1);
        }
    }
}

fn validate_db_path(db_path: &Path) {
    if !db_path.is_file() {
        eprintln!("File does not exist at {db_path:#?}!");
        exit(1);
    }
}

/// Prompt for a new password twice and hash it.
///
/// Returns `None` if the user aborts by entering mismatched passwords.
fn get_new_password_hash() -> Option<PasswordHash> {
    let password = rpassword::prompt_password("New password: ").ok()?;
    let confirmation = rpassword::prompt_password("Confirm new password: ").ok()?;

    if password != confirmation {
        eprintln!("Passwords do not match, aborting.");
        return None;
    }

    let validated = match ValidatedPassword::new(&password) {
        Ok(validated) => validated,
        Err(error) => {
            eprintln!("{error}");
            return None;
        }
    };

    match PasswordHash::new(validated, PasswordHash::DEFAULT_COST) {
        Ok(password_hash) => Some(password_hash),
        Err(error) => {
            eprintln!("Could not hash the password: {error}");
            None
        }
    }
}
