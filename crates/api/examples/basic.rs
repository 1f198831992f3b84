//! Example: Listing projects and secrets
//!
//! Builds a client from `ENVASE_*` environment variables and walks the
//! first project's secrets.
//!
//! # Setup
//!
//! ```bash
//! export ENVASE_API_URL=https://api.envase.dev
//! export ENVASE_TOKEN=...
//! export ENVASE_REFRESH_TOKEN=...   # optional, enables auto refresh
//! export ENVASE_AUTO_REFRESH=true
//! cargo run -p envase --example basic
//! ```

use envase::logging::{init_tracing, LogFormat};
use envase::{EnvaseClient, ListEnvironmentsParams, ListProjectsParams, ListSecretsParams};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("envase=info", LogFormat::Pretty);

    let client = EnvaseClient::builder(envase::config::load_from_env()?)
        .on_token_refresh(|_, rotated| {
            println!("access token refreshed (refresh token rotated: {})", rotated.is_some());
        })
        .build()?;

    if !client.auth().verify_token().await {
        println!("token rejected by {}", client.base_url());
        return Ok(());
    }

    let projects = client.projects().list(&ListProjectsParams::default()).await?;
    println!("{} project(s)", projects.len());
    for project in &projects {
        println!("  {} ({})", project.name, project.id);
    }

    let Some(first) = projects.first() else {
        return Ok(());
    };

    let environments =
        client.environments().list(&ListEnvironmentsParams::for_project(&first.id)).await?;
    println!("\n{} environment(s) in {}", environments.len(), first.name);

    let secrets = client
        .secrets()
        .list(&ListSecretsParams { project_id: first.id.clone(), ..Default::default() })
        .await?;
    for secret in secrets {
        println!("  {} = [hidden, {} bytes]", secret.key, secret.value.map_or(0, |v| v.len()));
    }

    Ok(())
}
