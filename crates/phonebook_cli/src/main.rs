//! CLI smoke entry point.
//!
//! Opens the database given as the first argument (or an in-memory one),
//! seeds it and prints the active contact list.

use phonebook_core::db::{open_db, open_db_in_memory};
use phonebook_core::PhoneBookRepository;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("phonebook_core ping={}", phonebook_core::ping());
    println!("phonebook_core version={}", phonebook_core::core_version());

    let opened = match std::env::args().nth(1) {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let repo = match opened
        .map_err(|err| err.to_string())
        .and_then(|conn| PhoneBookRepository::try_new(conn).map_err(|err| err.to_string()))
    {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("open failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = repo.initialize() {
        eprintln!("initialize failed: {err}");
        return ExitCode::FAILURE;
    }

    for contact in repo.active_contacts() {
        println!(
            "{:>4}  {:<24} {:<12} {:<8} {}",
            contact.id,
            contact.display_name(),
            contact.phone_number,
            contact.tag,
            contact.color.hex
        );
    }
    println!("trashed={}", repo.trashed_contacts().len());
    ExitCode::SUCCESS
}
