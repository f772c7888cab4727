//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_core::db::Database;
use tally_core::models::NewExpense;

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn add_expense(db: &Database, user_id: i64, amount: &str, date: &str, description: &str) {
    db.insert_expense(
        user_id,
        &NewExpense {
            amount: Decimal::from_str_exact(amount).unwrap(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: description.to_string(),
        },
    )
    .unwrap();
}

// ========== User Command Tests ==========

#[test]
fn test_cmd_user_add() {
    let db = setup_test_db();
    let result = commands::cmd_user_add(&db, "alice", Some("a-strong-password"));
    assert!(result.is_ok());

    let user = db.get_user_by_username("alice").unwrap();
    assert!(user.is_some());
}

#[test]
fn test_cmd_user_add_duplicate_fails() {
    let db = setup_test_db();
    commands::cmd_user_add(&db, "alice", Some("a-strong-password")).unwrap();

    let result = commands::cmd_user_add(&db, "alice", Some("another-password"));
    assert!(result.is_err());
}

#[test]
fn test_cmd_user_add_short_password_fails() {
    let db = setup_test_db();
    let result = commands::cmd_user_add(&db, "alice", Some("short"));
    assert!(result.is_err());
    assert!(db.get_user_by_username("alice").unwrap().is_none());
}

#[test]
fn test_cmd_user_list() {
    let db = setup_test_db();
    commands::cmd_user_add(&db, "alice", Some("a-strong-password")).unwrap();

    let result = commands::cmd_user_list(&db);
    assert!(result.is_ok());
}

// ========== Expense Command Tests ==========

#[test]
fn test_cmd_expenses_list() {
    let db = setup_test_db();
    commands::cmd_user_add(&db, "alice", Some("a-strong-password")).unwrap();
    let user = db.get_user_by_username("alice").unwrap().unwrap();

    add_expense(&db, user.id, "10.00", "2024-01-01", "food");
    add_expense(&db, user.id, "3.00", "2024-01-02", "transport");

    let result = commands::cmd_expenses_list(&db, "alice", 20);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_expenses_list_unknown_user_fails() {
    let db = setup_test_db();
    let result = commands::cmd_expenses_list(&db, "nobody", 20);
    assert!(result.is_err());
}

#[test]
fn test_cmd_expenses_list_empty_is_ok() {
    let db = setup_test_db();
    commands::cmd_user_add(&db, "alice", Some("a-strong-password")).unwrap();

    let result = commands::cmd_expenses_list(&db, "alice", 20);
    assert!(result.is_ok());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly-10", 10), "exactly-10");
    assert_eq!(truncate("a-longer-description", 10), "a-longe...");
}
