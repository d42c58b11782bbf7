//! Sample-data seeding tool
//!
//! Resets the `users` and `tasks` tables and fills them with demo content.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serde_json::{json, Value};
use taskdeck::models::{TaskModel, UserFields, UserModel};
use taskdeck::store::{JsonStore, Record};

/// Reset the data directory with sample users and tasks
#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Seed the Taskdeck data directory with sample content")]
struct Args {
    /// Directory holding the JSON table files
    #[arg(long, default_value = "data")]
    data_dir: String,
}

fn record(value: Value) -> Record {
    value.as_object().cloned().expect("record literal")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let store = Arc::new(JsonStore::new(args.data_dir.as_str())?);

    // Clear existing data
    store.write_table("users", &[])?;
    store.write_table("tasks", &[])?;

    let users = UserModel::new(store.clone());
    let samples = [
        ("Admin User", "admin@example.com", "password", "admin"),
        ("John Doe", "john@example.com", "password123", "user"),
        ("Jane Smith", "jane@example.com", "password123", "user"),
    ];
    for (name, email, password, role) in samples {
        users.create(UserFields {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        })?;
    }

    let tasks = TaskModel::new(store);
    let board = [
        (
            "Set up development environment",
            "Install the toolchain and prepare the project structure",
            "done",
            0,
        ),
        (
            "Create user authentication",
            "Implement the login flow with session management",
            "done",
            1,
        ),
        (
            "Build dashboard UI",
            "Design the dashboard pages",
            "in_progress",
            0,
        ),
        (
            "Implement drag & drop",
            "Wire the kanban board to the status-update endpoint",
            "todo",
            0,
        ),
        (
            "Add user management",
            "CRUD operations for the administration panel",
            "todo",
            1,
        ),
        (
            "Security hardening",
            "Add CSRF protection and input validation",
            "todo",
            2,
        ),
    ];
    for (title, description, status, position) in board {
        tasks.create(record(json!({
            "title": title,
            "description": description,
            "status": status,
            "position": position,
            "user_id": 1,
        })))?;
    }

    println!("Sample data created successfully!");
    println!("Users created: {}", samples.len());
    println!("Tasks created: {}", board.len());
    println!();
    println!("Default login credentials:");
    println!("E-mail: admin@example.com");
    println!("Password: password");

    Ok(())
}
