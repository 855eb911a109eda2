//! `openerp-admin`: drives the admin core without a UI.
//!
//! Usage:
//!   openerp-admin [--no-seed] [--role NAME]... [--dump]
//!
//! Mounts every view, walks one user through create → edit → delete and
//! logs what the cache holds after each step.

use anyhow::bail;
use clap::Parser;
use tracing::info;

use openerp_admin::{AdminConfig, Dashboard, FormData, Role, User, View};

/// Users and roles admin core.
#[derive(Parser, Debug)]
#[command(name = "openerp-admin", about = "Users and roles admin core")]
struct Cli {
    /// Start with empty collections instead of the sample records.
    #[arg(long = "no-seed")]
    no_seed: bool,

    /// Role offered on the user form (repeatable; first is the default).
    #[arg(long = "role")]
    roles: Vec<String>,

    /// Print the final cache state as JSON.
    #[arg(long = "dump")]
    dump: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AdminConfig {
        seed: !cli.no_seed,
        role_options: cli.roles,
    };
    info!(seed = config.seed, roles = ?config.role_options, "starting");

    let dashboard = Dashboard::new(&config);
    for view in View::ALL {
        dashboard.mount(view).await;
    }
    let start = dashboard.summary();
    info!(users = start.users, active = start.active_users, roles = start.roles, "loaded");

    // Create.
    let role = dashboard.options().roles[0].clone();
    dashboard.add::<User>().await;
    dashboard
        .submit::<User>(
            FormData::new()
                .field("name", "Ada")
                .field("email", "ada@x.com")
                .field("role", role)
                .field("status", "Active"),
        )
        .await;
    let Some(ada) = dashboard.list::<User>().into_iter().find(|u| u.name == "Ada") else {
        bail!("created user is missing from the cache");
    };
    info!(id = %ada.id, "created Ada");

    // Edit.
    dashboard.edit::<User>(ada.id).await;
    let values = dashboard.form_values::<User>().field("status", "Inactive");
    dashboard.submit::<User>(values).await;
    info!(status = ?dashboard.list::<User>().iter().find(|u| u.id == ada.id).map(|u| u.status), "edited Ada");

    // Delete.
    dashboard.delete::<User>(ada.id).await;
    let end = dashboard.summary();
    info!(users = end.users, "deleted Ada");
    if end.users != start.users {
        bail!("user count drifted: {} -> {}", start.users, end.users);
    }

    for role in dashboard.list::<Role>() {
        info!(name = %role.name, permissions = %role.permission_summary(), "role");
    }

    if let Some(notice) = dashboard.notice() {
        info!(code = %notice.code, message = %notice.message, "pending notice");
    }

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&dashboard.export())?);
    }

    Ok(())
}
