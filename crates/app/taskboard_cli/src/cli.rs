use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use taskboard_client::models::{ProjectStatus, TaskStatus, UserRole};

#[derive(Parser, Debug)]
#[command(name = "taskboard", version, about = "Task board API client")]
pub struct Cli {
    /// API base URL [env: TASKBOARD_API_URL]
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file [env: TASKBOARD_SESSION_FILE]
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Request timeout in seconds [env: TASKBOARD_REQUEST_TIMEOUT_SECS]
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Log request and session lifecycle to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an admin account and sign in as it.
    RegisterAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the session on the server and forget it locally.
    Logout,

    /// Print the stored session without contacting the API.
    Whoami,

    Team {
        #[command(subcommand)]
        command: TeamCommand,
    },

    Projects {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    Tasks {
        #[command(subcommand)]
        command: TaskCommand,
    },

    Users {
        #[command(subcommand)]
        command: UserCommand,
    },

    Version,
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// Look up the team you own and make it the active team.
    Show,
    Create {
        #[arg(long)]
        name: String,
    },
}

/// Cursor controls shared by every list command.
#[derive(Args, Debug)]
pub struct PageArgs {
    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    #[arg(long, default_value = "")]
    pub cursor: String,

    /// Keep following the next cursor and print every item.
    #[arg(long)]
    pub all: bool,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    List {
        /// Defaults to the active team.
        #[arg(long)]
        team_id: Option<String>,
        #[arg(long)]
        manager_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        with_stats: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        #[arg(long)]
        name: String,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// OnHold, InProgress or Completed.
        #[arg(long)]
        status: ProjectStatus,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    List {
        #[arg(long)]
        project_id: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// ToDo, InProgress or Done.
        #[arg(long)]
        status: TaskStatus,
        /// Assignee; empty leaves the task unassigned.
        #[arg(long, default_value = "")]
        user_id: String,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    List {
        /// Defaults to the active team.
        #[arg(long)]
        team_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Admin, Manager or Member.
        #[arg(long)]
        role: Option<UserRole>,
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKBOARD_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        role: UserRole,
        /// Defaults to the active team.
        #[arg(long)]
        team_id: Option<String>,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Check whether an email is already registered.
    Exists {
        #[arg(long)]
        email: String,
    },
}
