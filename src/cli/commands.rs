use clap::{Args, Parser, Subcommand};

/// Launch arguments for the `tre` binary
#[derive(Parser)]
#[command(name = "tre", about = concat!("[=] trellis v", env!("CARGO_PKG_VERSION"), " - tasks for the session at hand"), version)]
pub struct Cli {
    /// Path to a trellis.toml config file
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Print command results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One line of session input. `multicall` makes the first word the command
/// name, so lines parse without a binary-name placeholder.
#[derive(Parser)]
#[command(multicall = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Add a task. Plain words are the text; #tag, pri:, list:, date:,
    /// every:, dep:, and remind: tokens may appear anywhere
    Add(AddArgs),
    /// Show the current view as a list
    List,
    /// Show the kanban board
    Board,
    /// Redraw whichever of list/board was shown last
    View,
    /// Show the current view grouped by date
    Planned,
    /// Show today's completion dashboard
    Dashboard,
    /// Change the active scope
    Scope(ScopeArgs),
    /// Set the search text (no argument clears it)
    Search(SearchArgs),
    /// Toggle structured search filters
    Filter(FilterArgs),
    /// Toggle a task's completion
    Done(IdArg),
    /// Move a task to a kanban column
    Move(MoveArgs),
    /// Toggle a task's important flag
    Important(IdArg),
    /// Subtask operations
    Sub(SubArgs),
    /// Delete a task
    Rm(IdArg),
    /// Show one task in full
    Show(IdArg),
    /// Show all lists
    Lists,
    /// Create a list
    Newlist(NameArg),
    /// Delete a list (its tasks move to the default list)
    Rmlist(NameArg),
    /// Show every tag in use
    Tags,
    /// Set a reminder on a task
    Remind(RemindArgs),
    /// Run a scheduler pass now
    Tick(TickArgs),
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Args)]
pub struct AddArgs {
    /// Quick-add tokens
    #[arg(required = true, trailing_var_arg = true)]
    pub tokens: Vec<String>,
}

#[derive(Args)]
pub struct ScopeArgs {
    /// all | today | important | planned | assigned | list <name> |
    /// range <start> <end>
    #[arg(required = true)]
    pub parts: Vec<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search text; omit to clear the search
    pub words: Vec<String>,
}

#[derive(Subcommand)]
pub enum FilterCmd {
    /// Toggle a priority filter
    Pri { value: String },
    /// Toggle a list filter
    List { name: String },
    /// Toggle a tag filter
    Tag { tag: String },
    /// Toggle the completed tri-state
    Done { value: String },
    /// Toggle the recurring tri-state
    Recurring { value: String },
    /// Clear every structured filter
    Clear,
}

#[derive(Args)]
pub struct FilterArgs {
    #[command(subcommand)]
    pub which: FilterCmd,
}

#[derive(Args)]
pub struct IdArg {
    /// Task id
    pub id: u64,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Task id
    pub id: u64,
    /// todo | inprogress | done
    pub column: String,
}

#[derive(Args)]
pub struct SubArgs {
    #[command(subcommand)]
    pub which: SubCmd,
}

#[derive(Subcommand)]
pub enum SubCmd {
    /// Add a subtask
    Add {
        /// Parent task id
        id: u64,
        /// Subtask text
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Toggle a subtask's completion
    Done {
        /// Parent task id
        id: u64,
        /// Subtask id
        sub_id: u64,
    },
    /// Delete a subtask
    Rm {
        /// Parent task id
        id: u64,
        /// Subtask id
        sub_id: u64,
    },
}

#[derive(Args)]
pub struct NameArg {
    /// List name
    pub name: String,
}

#[derive(Args)]
pub struct RemindArgs {
    /// Task id
    pub id: u64,
    /// Reminder instant, YYYY-MM-DDTHH:MM
    pub when: String,
}

#[derive(Args)]
pub struct TickArgs {
    /// Pretend the pass runs at this instant (YYYY-MM-DDTHH:MM)
    #[arg(long)]
    pub now: Option<String>,
}
