//! Command handlers. Each prints JSON on stdout or fails with the banner
//! text the dashboard would have shown.

use std::io::Write;

use serde::Serialize;
use serde_json::json;
use taskboard_client::messages::{self, Action};
use taskboard_client::models::{
    CreateProject, CreateTask, CreateUser, Pagination, ProjectFilter, TaskFilter, UpdateProject,
    UpdateTask, UpdateUser, UserFilter,
};
use taskboard_client::store::{PagedCollectionStore, RequestState};
use taskboard_client::{ApiClient, RequestOutcome, ResourceService};

use crate::cli::{Commands, PageArgs, ProjectCommand, TaskCommand, TeamCommand, UserCommand};
use crate::{Error, Result};

#[derive(Serialize)]
struct Listing<'a, T> {
    data: &'a [T],
    pagination: Pagination,
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Turn a recorded failure into an error carrying its banner.
fn ensure(request: RequestState, action: Action) -> Result<()> {
    match request.banner(action) {
        Some(message) => Err(Error::Api {
            status: request.last_status_code.unwrap_or(500),
            message: message.to_string(),
        }),
        None => Ok(()),
    }
}

fn active_team(client: &ApiClient, explicit: Option<String>) -> Result<String> {
    explicit
        .or_else(|| client.credentials().active_team_id())
        .ok_or_else(|| {
            Error::Custom("no active team; pass --team-id or run `taskboard team show`".into())
        })
}

pub fn print_version() {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}

pub async fn dispatch(client: &ApiClient, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let auth = client.auth();
            auth.log_in(&email, &password).await;
            ensure(auth.request_state(), Action::Login)?;
            print(&json!({"loggedIn": auth.is_logged_in(), "user": auth.user()}))
        }
        Commands::RegisterAdmin {
            username,
            email,
            password,
        } => {
            let auth = client.auth();
            auth.register_admin(&username, &email, &password).await;
            ensure(auth.request_state(), Action::Register)?;
            print(&json!({"loggedIn": auth.is_logged_in(), "user": auth.user()}))
        }
        Commands::Logout => {
            let status = client.auth().log_out().await;
            print(&json!({"loggedIn": false, "statusCode": status}))
        }
        Commands::Whoami => {
            let credential = client.credentials().credential();
            print(&json!({
                "loggedIn": credential.is_logged_in,
                "user": credential.user,
                "activeTeamId": credential.active_team_id,
            }))
        }
        Commands::Team { command } => team(client, command).await,
        Commands::Projects { command } => projects(client, command).await,
        Commands::Tasks { command } => tasks(client, command).await,
        Commands::Users { command } => users(client, command).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

async fn team(client: &ApiClient, command: TeamCommand) -> Result<()> {
    let teams = client.teams();
    if let TeamCommand::Create { name } = command {
        teams.create(&name).await;
        ensure(teams.snapshot().request, Action::Create)?;
    }
    teams.fetch_by_owner().await;
    let state = teams.snapshot();
    ensure(state.request, Action::Load)?;
    print(&json!({"exists": state.exists, "team": state.team}))
}

/// Fetch one page, or every page with `--all`, and print it.
async fn list<S>(store: &PagedCollectionStore<S>, filters: S::Filter, all: bool) -> Result<()>
where
    S: ResourceService,
    S::Item: Serialize,
{
    store.fetch(filters).await;
    ensure(store.request_state(), Action::Load)?;
    if all {
        while store.load_more().await {
            ensure(store.request_state(), Action::Load)?;
        }
    }

    let page = store.page();
    print(&Listing {
        data: &page.items,
        pagination: Pagination {
            prev_cursor: page.prev_cursor.clone(),
            next_cursor: page.next_cursor.clone(),
        },
    })
}

fn mutated(request: RequestState, action: Action, status: u16) -> Result<()> {
    ensure(request, action)?;
    print(&json!({"statusCode": status}))
}

async fn projects(client: &ApiClient, command: ProjectCommand) -> Result<()> {
    let store = client.projects();
    let (status, action) = match command {
        ProjectCommand::List {
            team_id,
            manager_id,
            name,
            with_stats,
            page: PageArgs { limit, cursor, all },
        } => {
            let filters = ProjectFilter {
                team_id: team_id.or_else(|| client.credentials().active_team_id()),
                manager_id,
                name,
                with_stats: with_stats.then_some(true),
                limit,
                cursor,
            };
            return list(store, filters, all).await;
        }
        ProjectCommand::Create { name } => {
            (store.create(&CreateProject { name }).await, Action::Create)
        }
        ProjectCommand::Update { id, name, status } => (
            store.update(&UpdateProject { id, name, status }).await,
            Action::Update,
        ),
        ProjectCommand::Delete { id } => (store.delete(&id).await, Action::Delete),
    };
    mutated(store.request_state(), action, status)
}

async fn tasks(client: &ApiClient, command: TaskCommand) -> Result<()> {
    let store = client.tasks();
    let (status, action) = match command {
        TaskCommand::List {
            project_id,
            title,
            page: PageArgs { limit, cursor, all },
        } => {
            let filters = TaskFilter {
                project_id,
                title,
                limit,
                cursor,
            };
            return list(store, filters, all).await;
        }
        TaskCommand::Create {
            project_id,
            title,
            description,
        } => {
            let body = CreateTask {
                title,
                description,
                project_id,
            };
            (store.create(&body).await, Action::Create)
        }
        TaskCommand::Update {
            id,
            title,
            description,
            status,
            user_id,
        } => {
            let body = UpdateTask {
                id,
                title,
                description,
                status,
                user_id,
            };
            (store.update(&body).await, Action::Update)
        }
        TaskCommand::Delete { id } => (store.delete(&id).await, Action::Delete),
    };
    mutated(store.request_state(), action, status)
}

async fn users(client: &ApiClient, command: UserCommand) -> Result<()> {
    let store = client.users();
    let (status, action) = match command {
        UserCommand::List {
            team_id,
            email,
            role,
            page: PageArgs { limit, cursor, all },
        } => {
            let filters = UserFilter {
                email,
                team_id: active_team(client, team_id)?,
                role,
                limit,
                cursor,
            };
            return list(store, filters, all).await;
        }
        UserCommand::Create {
            username,
            email,
            password,
            role,
            team_id,
        } => {
            let body = CreateUser {
                username,
                email,
                password,
                role,
                team_id: active_team(client, team_id)?,
            };
            (store.create(&body).await, Action::Create)
        }
        UserCommand::Update {
            id,
            username,
            email,
        } => {
            let body = UpdateUser {
                id,
                username,
                email,
            };
            (store.update(&body).await, Action::Update)
        }
        UserCommand::Delete { id } => (store.delete(&id).await, Action::Delete),
        UserCommand::Exists { email } => {
            return match client.users_service().email_exists(&email).await {
                RequestOutcome::Success { data, .. } => print(&data),
                RequestOutcome::Failure { status_code, .. } => Err(Error::Api {
                    status: status_code,
                    message: messages::banner(Action::Load, status_code).to_string(),
                }),
            };
        }
    };
    mutated(store.request_state(), action, status)
}
