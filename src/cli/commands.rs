use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tl", about = concat!("tasklane v", env!("CARGO_PKG_VERSION"), " - a keyboard-driven task list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different task directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,

    /// Write the debug log here instead of `tasklane.log` in the task directory
    #[arg(long, global = true)]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the task list with filters, sorting and grouping applied
    List(ListArgs),
    /// Add a task to the default file
    Add(AddArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Due,
    Project,
    Priority,
    Context,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GroupArg {
    Due,
    Project,
    Priority,
    Context,
    File,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks in this project (repeatable)
    #[arg(long)]
    pub project: Vec<String>,
    /// Only tasks with this context (repeatable)
    #[arg(long)]
    pub context: Vec<String>,
    /// Case-insensitive substring match on name, projects, contexts and tags
    #[arg(long)]
    pub search: Option<String>,
    /// Sort field
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
    /// Group field (defaults to file)
    #[arg(long, value_enum)]
    pub group: Option<GroupArg>,
    /// Reverse the sort and group order
    #[arg(long)]
    pub desc: bool,
    /// Show a flat list without group headers
    #[arg(long, conflicts_with = "group")]
    pub flat: bool,
    /// Include completed tasks
    #[arg(long, conflicts_with = "done")]
    pub all: bool,
    /// Show only completed tasks
    #[arg(long)]
    pub done: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task name
    pub name: String,
    /// Project to attach (repeatable)
    #[arg(long)]
    pub project: Vec<String>,
    /// Context to attach (repeatable)
    #[arg(long)]
    pub context: Vec<String>,
    /// Priority letter A-F
    #[arg(long)]
    pub priority: Option<char>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}
