//! postsync CLI entry point.
//!
//! Drives the post store against a running service, the way the blog form and list would.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use postsync::infra::app_config::{self, ClientConfig};
use postsync::infra::http::HttpPostsApi;
use postsync::{OperationError, Post, PostDraft, Store};

#[derive(Parser, Debug)]
#[command(name = "postsync")]
#[command(version)]
#[command(about = "Synchronize blog posts with a remote service", long_about = None)]
struct Cli {
    /// Service root (overrides the config file and POSTSYNC_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Posts(PostCommand),

    /// Print the effective configuration
    Config {
        /// Write it back to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PostCommand {
    /// Fetch and print all posts
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a post
    Create {
        #[command(flatten)]
        fields: PostFields,
    },

    /// Edit an existing post; unspecified fields keep their current value
    Update {
        id: String,
        #[command(flatten)]
        fields: PostOverrides,
    },

    /// Delete a post
    Delete { id: String },
}

#[derive(Args, Debug)]
struct PostFields {
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    featured_image: String,
    #[arg(long, default_value = "")]
    publish_date: String,
    #[arg(long)]
    published: bool,
}

#[derive(Args, Debug)]
struct PostOverrides {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    featured_image: Option<String>,
    #[arg(long)]
    publish_date: Option<String>,
    #[arg(long)]
    published: Option<bool>,
}

impl From<PostFields> for PostDraft {
    fn from(fields: PostFields) -> Self {
        PostDraft {
            title: fields.title,
            description: fields.description,
            featured_image: fields.featured_image,
            publish_date: fields.publish_date,
            published: fields.published,
        }
    }
}

impl PostOverrides {
    fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(description) = self.description {
            post.description = description;
        }
        if let Some(featured_image) = self.featured_image {
            post.featured_image = featured_image;
        }
        if let Some(publish_date) = self.publish_date {
            post.publish_date = publish_date;
        }
        if let Some(published) = self.published {
            post.published = published;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = app_config::load_config();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Commands::Posts(command) => run(command, &config).await,
        Commands::Config { save } => show_config(&config, save),
    }
}

async fn run(command: PostCommand, config: &ClientConfig) -> Result<()> {
    let api = HttpPostsApi::new(config).context("Failed to build HTTP client")?;
    log::debug!("Using service at {}", api.base_url());
    let store = Store::new(Arc::new(api), Vec::new());
    watch_state(&store);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Interrupted, cancelling request");
                cancel.cancel();
            }
        });
    }

    match command {
        PostCommand::List { json } => {
            let posts = store.list(&cancel).await.map_err(report)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
            } else {
                for post in &posts {
                    print_post(post);
                }
                log::info!("{} post(s)", posts.len());
            }
        }
        PostCommand::Create { fields } => {
            let post = store.create(fields.into(), &cancel).await.map_err(report)?;
            log::info!("Created post {}", post.id);
            print_post(&post);
        }
        PostCommand::Update { id, fields } => {
            store.list(&cancel).await.map_err(report)?;
            store.start_editing(id.clone());
            let Some(mut form) = store.snapshot().editing_post else {
                return Err(anyhow!("Post {id} not found"));
            };
            fields.apply(&mut form);
            let post = store
                .update(form.id.clone(), form, &cancel)
                .await
                .map_err(|err| {
                    store.cancel_editing();
                    report(err)
                })?;
            log::info!("Updated post {}", post.id);
            print_post(&post);
        }
        PostCommand::Delete { id } => {
            store.delete(id.clone(), &cancel).await.map_err(report)?;
            log::info!("Deleted post {id}");
        }
    }

    Ok(())
}

fn show_config(config: &ClientConfig, save: bool) -> Result<()> {
    println!("config file: {}", app_config::config_path().display());
    println!("{}", toml::to_string_pretty(config)?);
    if save {
        app_config::save_config(config).context("Failed to save config")?;
        log::info!("Saved config");
    }
    Ok(())
}

/// Logs every state transition at debug level.
fn watch_state(store: &Store) {
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update();
            log::debug!(
                "state: {} post(s), busy={}, editing={}",
                state.post_list.len(),
                state.busy,
                state
                    .editing_post
                    .as_ref()
                    .map(|p| p.id.as_str())
                    .unwrap_or("-")
            );
        }
    });
}

fn report(err: OperationError) -> anyhow::Error {
    match err {
        OperationError::Rejected(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
            anyhow!("The service rejected the post")
        }
        OperationError::Failed(err) => match err.status() {
            Some(status) => anyhow!("The service answered with status {status}: {err}"),
            None => anyhow!(err),
        },
        OperationError::Cancelled => anyhow!("Request cancelled"),
    }
}

fn print_post(post: &Post) {
    let marker = if post.published { "*" } else { " " };
    println!(
        "{marker} {:<24} {:<40} {}",
        post.id, post.title, post.publish_date
    );
}
