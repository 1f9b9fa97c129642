use std::path::PathBuf;

use crate::cli::commands::{AddArgs, Cli, Commands, GroupArg, ListArgs, SortArg};
use crate::cli::output::{format_task_line, format_view, task_to_json, view_to_json};
use crate::io::config_io::read_config;
use crate::io::store::JsonTaskStore;
use crate::model::task::{Priority, Task, TaskId};
use crate::ops::filter::{FileViewMode, FilterState, StatusFilter};
use crate::ops::group::{GroupField, GroupState};
use crate::ops::sort::{SortField, SortState};
use crate::ops::view::{DerivedView, recompute};
use crate::tui::components::text_input::validate_date;

/// Resolve the task directory: `-C <dir>` or the current directory
pub fn task_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(d) => {
            let path = PathBuf::from(d);
            if !path.is_dir() {
                return Err(format!("not a directory: {}", d).into());
            }
            Ok(path)
        }
        None => Ok(std::env::current_dir()?),
    }
}

/// Run a subcommand
pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let dir = task_dir(cli.dir.as_deref())?;
    match cli.command {
        Some(Commands::List(args)) => cmd_list(&dir, args, json),
        Some(Commands::Add(args)) => cmd_add(&dir, args, json),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn cmd_list(
    dir: &std::path::Path,
    args: ListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = JsonTaskStore::open(dir).load()?;
    let view = list_view(&tasks, &args);

    if json {
        println!("{}", serde_json::to_string_pretty(&view_to_json(&view))?);
    } else {
        for line in format_view(&view) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Build the derived view the `list` flags describe
fn list_view(tasks: &[Task], args: &ListArgs) -> DerivedView {
    let mut filter = FilterState {
        search: args.search.clone().unwrap_or_default(),
        projects: args.project.iter().cloned().collect(),
        contexts: args.context.iter().cloned().collect(),
        ..FilterState::default()
    };
    filter.status = if args.done {
        StatusFilter::Done
    } else if args.all {
        StatusFilter::Any
    } else {
        StatusFilter::Open
    };

    let sort = SortState {
        field: match args.sort {
            None => SortField::None,
            Some(SortArg::Due) => SortField::DueDate,
            Some(SortArg::Project) => SortField::Project,
            Some(SortArg::Priority) => SortField::Priority,
            Some(SortArg::Context) => SortField::Context,
        },
        ascending: !args.desc,
    };

    let field = if args.flat {
        None
    } else {
        Some(match args.group.unwrap_or(GroupArg::File) {
            GroupArg::Due => GroupField::DueDate,
            GroupArg::Project => GroupField::Project,
            GroupArg::Priority => GroupField::Priority,
            GroupArg::Context => GroupField::Context,
            GroupArg::File => GroupField::File,
        })
    };
    let group = GroupState {
        field,
        ascending: !args.desc,
    };

    recompute(tasks, &filter, FileViewMode::All, &sort, &group)
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

fn cmd_add(
    dir: &std::path::Path,
    args: AddArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config(dir)?;
    let task = build_task(args, &config.default_file)?;
    JsonTaskStore::open(dir).upsert(&task)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(&task))?);
    } else {
        println!("{}  {}", task.id, format_task_line(&task));
    }
    Ok(())
}

fn build_task(args: AddArgs, file: &str) -> Result<Task, Box<dyn std::error::Error>> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err("task name cannot be empty".into());
    }
    let mut task = Task::new(TaskId::generate(), name, file);
    task.set_projects(args.project);
    task.set_contexts(args.context);
    if let Some(c) = args.priority {
        task.priority =
            Priority::from_letter(c).ok_or_else(|| format!("invalid priority: {}", c))?;
    }
    if let Some(due) = args.due.as_deref() {
        task.set_due_date(validate_date(due)?);
    }
    Ok(task)
}
