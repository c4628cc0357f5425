use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use dunk::config::Config;
use dunk::demo::{self, DemoContext, RootState, Theme, Todo, User};
use dunk::logging::init_tracing;

/// Run the demo store scenario and print the resulting state as JSON.
#[derive(Debug, Parser)]
#[command(name = "dunk", version, about)]
struct Args {
    /// Config file to load instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Theme to switch to before the scenario runs.
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// Username to sign in with.
    #[arg(long)]
    username: Option<String>,

    /// Log filter directive (overridden by DUNK_LOG).
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,

    /// Do not install the action-logging middleware.
    #[arg(long)]
    quiet_actions: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(theme) = self.theme {
            config.demo.theme = theme;
        }
        if let Some(username) = &self.username {
            config.demo.username = username.clone();
        }
        if let Some(filter) = &self.log_filter {
            config.logging.filter = filter.clone();
        }
        if self.quiet_actions {
            config.logging.log_actions = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    args.apply(&mut config);
    config.validate()?;

    init_tracing(&config.logging.filter);

    let (store, interface) = demo::init_store(DemoContext::default(), config.logging.log_actions)
        .context("Failed to build demo store")?;
    tracing::info!(modules = interface.module_count(), "store ready");

    let set_theme = interface.action_creator::<Theme>("set_theme")?;
    let set_is_browser = interface.action_creator::<bool>("set_is_browser")?;
    store.dispatch(set_theme(config.demo.theme))?;
    store.dispatch(set_is_browser(config.demo.is_browser))?;

    let todos = interface.at(&["todos"])?;
    let fetch_todos = todos.thunk::<(), Result<Vec<Todo>, demo::DemoError>>("fetch_todos")?;
    let fetched = store.run(fetch_todos(())).await?;
    let completed = todos.selector::<usize>("completed_count")?;
    tracing::info!(
        fetched = fetched.len(),
        completed = store.select(&completed),
        "todos loaded"
    );

    let auth = interface.at(&["auth"])?;
    let sign_in = auth.thunk::<String, Result<User, demo::DemoError>>("sign_in")?;
    let user = store
        .run(sign_in(config.demo.username.clone()))
        .await
        .with_context(|| format!("Failed to sign in as '{}'", config.demo.username))?;
    tracing::info!(email = %user.email, "sign-in complete");

    let state = interface.selector::<RootState>("root")?;
    println!("{}", serde_json::to_string_pretty(&store.select(&state))?);
    Ok(())
}
