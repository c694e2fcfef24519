use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::path::PathBuf;
use tokio::sync::mpsc;

use homedeck::admin;
use homedeck::app::{AppEvent, Dashboard};
use homedeck::config::Config;
use homedeck::links::decode_categories;
use homedeck::store::{DocumentStore, MemoryStore, RemoteStore, CATEGORIES_COLLECTION};
use homedeck::theme::ThemeVariant;
use homedeck::ui;
use homedeck::widgets::bookmarks::bookmarks_collection;
use homedeck::widgets::notepad::notes_collection;

/// Get the config directory path (~/.config/homedeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("homedeck"))
}

#[derive(Parser, Debug)]
#[command(name = "homedeck", about = "Terminal start page backed by a hosted document store")]
struct Args {
    /// Run against an in-memory store with demo data (no network)
    #[arg(long)]
    offline: bool,

    /// Override the store base URL from the config file
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Management subcommands (the admin panel of the original start page).
#[derive(Subcommand, Debug)]
enum Command {
    /// Add a bookmark to a category
    AddLink {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        category: String,
    },
    /// Update an existing bookmark (all fields required)
    EditLink {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        category: String,
    },
    /// Delete a bookmark
    RemoveLink { id: String },
    /// List all bookmarks
    Links,
    /// Add a category
    AddCategory { name: String },
    /// Delete a category
    RemoveCategory { id: String },
    /// List all categories
    Categories,
    /// List registered users
    Users,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // User-only access on Unix: the config file may hold the API key
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let mut config = Config::load(&config_dir.join("config.toml"))
        .context("Failed to load configuration")?;
    if let Some(base_url) = &args.base_url {
        config.store_base_url = base_url.clone();
    }

    if args.offline {
        tracing::info!("Running offline against an in-memory store");
        run_with(MemoryStore::seeded(), args, config).await
    } else {
        let api_key = config.resolved_api_key().map(SecretString::from);
        let store = RemoteStore::new(&config.store_base_url, api_key)
            .context("Failed to create store client")?;
        run_with(store, args, config).await
    }
}

async fn run_with<S: DocumentStore>(store: S, args: Args, config: Config) -> Result<()> {
    match args.command {
        Some(command) => run_admin(&store, command).await,
        None => run_dashboard(store, config).await,
    }
}

/// Execute a management subcommand and print the outcome.
async fn run_admin<S: DocumentStore>(store: &S, command: Command) -> Result<()> {
    match command {
        Command::AddLink {
            name,
            url,
            category,
        } => {
            let id = admin::add_link(store, &name, &url, &category).await?;
            println!("Added link {} ({})", name, id);
        }
        Command::EditLink {
            id,
            name,
            url,
            category,
        } => {
            admin::update_link(store, &id, &name, &url, &category).await?;
            println!("Updated link {}", id);
        }
        Command::RemoveLink { id } => {
            admin::remove_link(store, &id).await?;
            println!("Removed link {}", id);
        }
        Command::Links => {
            let links = admin::list_links(store).await?;
            if links.is_empty() {
                println!("No links.");
            }
            for link in links {
                println!("{}  [{}] {}  {}", link.id, link.category, link.name, link.url);
            }
        }
        Command::AddCategory { name } => {
            let id = admin::add_category(store, &name).await?;
            println!("Added category {} ({})", name.trim(), id);
        }
        Command::RemoveCategory { id } => {
            admin::remove_category(store, &id).await?;
            println!("Removed category {}", id);
        }
        Command::Categories => {
            let docs = admin::list_categories(store).await?;
            if docs.is_empty() {
                println!("No categories.");
            }
            for doc in docs {
                println!("{}  {}", doc.id, doc.field_str("name").unwrap_or("(blank)"));
            }
        }
        Command::Users => {
            let users = admin::list_users(store).await?;
            if users.is_empty() {
                println!("No users.");
            }
            for user in users {
                println!("{}  {}  {}  ({})", user.id, user.display_name, user.email, user.role);
            }
        }
    }
    Ok(())
}

/// Load initial data and run the TUI.
async fn run_dashboard<S: DocumentStore>(store: S, config: Config) -> Result<()> {
    let category_docs = store
        .get_all(CATEGORIES_COLLECTION)
        .await
        .context("Failed to load categories")?;
    let categories = decode_categories(&category_docs);
    if categories.is_empty() {
        println!("No categories yet. Add one with: homedeck add-category <name>");
    }

    let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or(ThemeVariant::Dark);
    let today = chrono::Local::now().date_naive();
    let mut app = Dashboard::new(categories, theme, today);

    // Per-user widget data; failures here degrade to empty widgets
    // rather than blocking the dashboard.
    match store.get_all(&notes_collection(&config.user_id)).await {
        Ok(docs) => app.notepad.set_notes(&docs),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load notes");
            app.notepad.error = Some(e.to_string());
        }
    }
    match store.get_all(&bookmarks_collection(&config.user_id)).await {
        Ok(docs) => app.bookmarks.set_user_bookmarks(&docs),
        Err(e) => tracing::warn!(error = %e, "Failed to load quick bookmarks"),
    }

    // Event channel for background store tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, store, config.user_id.clone(), event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
