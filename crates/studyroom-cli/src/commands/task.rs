//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use studyroom_core::calendar::week_start;
use studyroom_core::task::TaskStats;
use studyroom_core::time_utils::local_today;
use studyroom_core::{
    Priority, Task, TaskCategory, TaskDraft, TaskFilter, TaskPatch, TaskStatus, TimeOfDay,
};

use super::{open_app, print_json};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// study, personal-growth, entertainment or family
        #[arg(long, default_value = "study")]
        category: TaskCategory,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Start time (HH:MM); requires --end
        #[arg(long)]
        start: Option<TimeOfDay>,
        /// End time (HH:MM); must be after --start
        #[arg(long)]
        end: Option<TimeOfDay>,
    },
    /// List tasks
    List {
        #[arg(long)]
        category: Option<TaskCategory>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
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
        category: Option<TaskCategory>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<NaiveDate>,
        #[arg(long, conflicts_with = "clear_time")]
        start: Option<TimeOfDay>,
        #[arg(long, conflicts_with = "clear_time")]
        end: Option<TimeOfDay>,
        /// Remove the deadline
        #[arg(long)]
        clear_deadline: bool,
        /// Remove start and end time
        #[arg(long)]
        clear_time: bool,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Flip between completed and todo
    Toggle {
        /// Task ID
        id: String,
    },
    /// Set status explicitly
    Status {
        /// Task ID
        id: String,
        /// todo, miss or completed
        status: TaskStatus,
    },
    /// Tasks due today
    Today,
    /// High-priority tasks
    Important,
    /// Find a task whose time slot overlaps the given one
    Conflict {
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
        /// Start time (HH:MM)
        start: TimeOfDay,
        /// End time (HH:MM)
        end: TimeOfDay,
        /// Task ID to ignore (the one being edited)
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Tasks grouped by day for one week
    Week {
        /// Any date in the week (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Search with filters and pagination
    Search {
        /// Text to find in title or description
        #[arg(default_value = "")]
        query: String,
        /// todo, miss, completed or all
        #[arg(long, default_value = "todo")]
        status: String,
        /// low, medium, high or all
        #[arg(long, default_value = "all")]
        priority: String,
        /// a category or all
        #[arg(long, default_value = "all")]
        category: String,
        /// 1-based page
        #[arg(long, default_value = "1")]
        page: usize,
    },
}

/// `"all"` means no constraint.
fn parse_criterion<T>(value: &str) -> Result<Option<T>, T::Err>
where
    T: std::str::FromStr,
{
    if value.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    match action {
        TaskAction::Create {
            title,
            description,
            category,
            priority,
            deadline,
            start,
            end,
        } => {
            let task = app.create_task(TaskDraft {
                title,
                description,
                category,
                priority,
                deadline,
                start_time: start,
                end_time: end,
            })?;
            eprintln!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List {
            category,
            status,
            priority,
        } => {
            let filter = TaskFilter {
                search: String::new(),
                status,
                priority,
                category,
            };
            print_json(&filter.apply(app.tasks().tasks()))?;
        }
        TaskAction::Get { id } => match app.tasks().get(&id) {
            Some(task) => print_json(task)?,
            None => {
                eprintln!("Task not found: {id}");
                std::process::exit(1);
            }
        },
        TaskAction::Update {
            id,
            title,
            description,
            category,
            priority,
            status,
            deadline,
            start,
            end,
            clear_deadline,
            clear_time,
        } => {
            let patch = TaskPatch {
                title,
                description,
                category,
                priority,
                status,
                deadline: if clear_deadline { Some(None) } else { deadline.map(Some) },
                start_time: if clear_time { Some(None) } else { start.map(Some) },
                end_time: if clear_time { Some(None) } else { end.map(Some) },
            };
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            let task = app.update_task(&id, patch)?;
            print_json(&task)?;
        }
        TaskAction::Delete { id } => {
            let task = app.delete_task(&id)?;
            println!("Task deleted: {}", task.id);
        }
        TaskAction::Toggle { id } => {
            let task = app.toggle_task(&id)?;
            print_json(&task)?;
        }
        TaskAction::Status { id, status } => {
            let task = app.set_task_status(&id, status)?;
            print_json(&task)?;
        }
        TaskAction::Today => {
            print_json(&app.tasks().today_tasks(local_today()))?;
        }
        TaskAction::Important => {
            print_json(&app.tasks().important_tasks())?;
        }
        TaskAction::Conflict {
            date,
            start,
            end,
            exclude,
        } => {
            let found: Option<&Task> =
                app.tasks()
                    .check_time_conflict(date, start, end, exclude.as_deref());
            print_json(&serde_json::json!({
                "conflict": found.is_some(),
                "task": found,
            }))?;
        }
        TaskAction::Week { date } => {
            let start = week_start(date.unwrap_or_else(local_today));
            print_json(&app.tasks().tasks_for_week(start))?;
        }
        TaskAction::Search {
            query,
            status,
            priority,
            category,
            page,
        } => {
            let filter = TaskFilter {
                search: query,
                status: parse_criterion(&status)?,
                priority: parse_criterion(&priority)?,
                category: parse_criterion(&category)?,
            };
            let all = app.tasks().tasks();
            let stats = TaskStats::from_tasks(all.iter().copied());
            print_json(&serde_json::json!({
                "stats": stats,
                "results": app.search(&filter, page),
            }))?;
        }
    }
    Ok(())
}
