use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime, macros::format_description};

use slipbook::{NewRecord, RecordType, count_records, create_record, initialize_db};

/// A utility for creating a database with sample records for slipbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user ID to create the sample records for.
    #[arg(long, short, default_value = "u1")]
    user_id: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample records for {:?}...", args.user_id);

    let date_format = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let now = OffsetDateTime::now_utc();

    let samples = [
        (0, 3200.0, RecordType::Income, "salary"),
        (2, 45.5, RecordType::Expense, "groceries"),
        (5, 120.0, RecordType::Expense, "power bill"),
        (31, 3200.0, RecordType::Income, "salary"),
        (33, 18.0, RecordType::Expense, "coffee beans"),
        (40, 950.0, RecordType::Expense, "rent"),
    ];

    for (days_ago, amount, record_type, notes) in samples {
        let date = (now - Duration::days(days_ago)).format(date_format)?;

        create_record(
            NewRecord {
                amount,
                date,
                record_type,
                notes: notes.to_owned(),
                user_id: args.user_id.clone(),
            },
            &conn,
        )?;
    }

    println!("Created {} records.", count_records(&conn)?);
    println!("Success!");

    Ok(())
}
