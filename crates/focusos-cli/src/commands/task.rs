//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use focusos_core::storage::{Config, LocalStorage};
use focusos_core::store::{NewTask, Priority, TaskStatus};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List tasks
    List {
        /// todo, in-progress or completed
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        no_due: bool,
        #[arg(long)]
        category: Option<String>,
    },
    /// Set a task's status
    Status {
        /// Task ID
        id: String,
        /// todo, in-progress or completed
        status: TaskStatus,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let storage = LocalStorage::open()?;
    let config = Config::load()?;
    let mut store = open_store(&storage, &config)?;

    match action {
        TaskAction::Add {
            title,
            description,
            priority,
            due,
            category,
        } => {
            let task = store.add_task(NewTask {
                title,
                description: description.unwrap_or_default(),
                priority,
                status: TaskStatus::Todo,
                due_date: due,
                category: category.unwrap_or_default(),
            })?;
            print_json(&task)?;
        }
        TaskAction::List { status, priority } => {
            let tasks: Vec<_> = store
                .state()
                .tasks
                .iter()
                .filter(|t| status.is_none_or(|s| t.status == s))
                .filter(|t| priority.is_none_or(|p| t.priority == p))
                .collect();
            print_json(&tasks)?;
        }
        TaskAction::Update {
            id,
            title,
            description,
            priority,
            due,
            no_due,
            category,
        } => {
            let mut task = store.task(&id)?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = description;
            }
            if let Some(priority) = priority {
                task.priority = priority;
            }
            if no_due {
                task.due_date = None;
            } else if due.is_some() {
                task.due_date = due;
            }
            if let Some(category) = category {
                task.category = category;
            }
            let task = store.update_task(task)?;
            print_json(&task)?;
        }
        TaskAction::Status { id, status } => {
            let task = store.set_task_status(&id, status)?;
            print_json(&task)?;
        }
        TaskAction::Delete { id } => {
            store.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
