use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use outlay_rs::{
    PasswordHash, ValidatedPassword,
    category::{CategoryName, create_category},
    expense::{NewExpense, create_expense},
    initialize_db,
    user::create_user,
};

/// A utility for creating a test database for the REST API server of
/// outlay_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("test", "test@example.com", password_hash, &connection)?;

    println!("Creating test categories and expenses...");

    let category_names = ["Office", "Travel", "Meals", "Software"];
    let mut categories = Vec::new();
    for name in category_names {
        let category = create_category(
            user.id,
            CategoryName::new(name)?,
            None,
            &connection,
        )?;
        categories.push(category);
    }

    let samples: [(&str, &str, usize, i64); 8] = [
        ("Coffee with client", "4.50", 2, 3),
        ("Desk chair", "120.00", 0, 10),
        ("Flight to conference", "300.00", 1, 25),
        ("Team lunch", "56.80", 2, 40),
        ("IDE licence", "89.00", 3, 80),
        ("Hotel", "410.25", 1, 120),
        ("Monitor", "229.99", 0, 200),
        ("Train tickets", "37.40", 1, 320),
    ];

    let today = OffsetDateTime::now_utc().date();
    for (title, amount, category_index, days_ago) in samples {
        let new_expense = NewExpense::new(title, amount.parse::<Decimal>()?, today - Duration::days(days_ago))?
            .with_category(Some(categories[category_index].id));
        create_expense(user.id, new_expense, None, Path::new("uploads"), &connection)?;
    }

    println!("Success!");

    Ok(())
}
