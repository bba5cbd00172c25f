use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use dashboard_proxy::config::{load_or_default, ProxyConfig};
use dashboard_proxy::routing::RuleTable;
use dashboard_proxy::spa::{AuthSession, Navigation, Navigator};
use dashboard_proxy::store::{self, FileSlotStore, NewComment, NewPost, SlotStore};

#[derive(Parser)]
#[command(name = "dashboard-cli")]
#[command(about = "Inspect proxy rules, navigation and community posts", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in dashboard tables are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and report shadowed rules
    Check,
    /// Show which rule a request path hits and where it is sent
    Match { path: String },
    /// Resolve a client-side navigation with the stored session
    Navigate { path: String },
    /// Store a session token
    Login { token: String },
    /// Clear the stored session token
    Logout,
    /// Community posts
    #[command(subcommand)]
    Posts(PostCommands),
}

#[derive(Subcommand)]
enum PostCommands {
    /// List posts, newest first
    List,
    /// Publish a post
    Add {
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "")]
        image: String,
        #[arg(long, default_value = "")]
        user_id: String,
        #[arg(long, default_value = "")]
        user_name: String,
        #[arg(long, default_value = "")]
        user_code: String,
    },
    /// Delete a post
    Delete { id: String },
    /// Like a post
    Like { id: String },
    /// List comments on a post
    Comments { post_id: String },
    /// Comment on a post
    Comment {
        post_id: String,
        content: String,
        #[arg(long, default_value = "")]
        user_id: String,
        #[arg(long, default_value = "")]
        user_name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    let slots: Arc<dyn SlotStore> = Arc::new(FileSlotStore::new(config.storage.data_dir.clone()));

    match cli.command {
        Commands::Check => check(&config)?,
        Commands::Match { path } => {
            let rules = RuleTable::from_config(&config.rules)?;
            match rules.match_path(&path) {
                Ok(rule) => {
                    let upstream_path = rule.upstream_path(&path);
                    println!("rule:     {}", rule.prefix());
                    println!("upstream: {}", rule.upstream_url(&upstream_path));
                    println!("host:     {}", if rule.preserve_host() { "preserved" } else { "rewritten" });
                    for (name, value) in rule.response_headers() {
                        println!("header:   {}: {}", name, value.to_str().unwrap_or("<binary>"));
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        Commands::Navigate { path } => {
            let navigator = Navigator::from_config(&config.routes)?;
            let session = AuthSession::load(slots.as_ref())?;
            match navigator.resolve(&path, &session) {
                Navigation::Resolved { route, params } => {
                    println!("resolved {} ({})", route.name, route.path);
                    for (key, value) in params {
                        println!("  {} = {}", key, value);
                    }
                }
                Navigation::NotFound { route } => println!("not found, rendering {}", route.name),
                Navigation::Redirect { route, from } => {
                    println!("redirect {} -> {} (not logged in)", from, route.path)
                }
                Navigation::Unmatched => println!("no route matches {}", path),
            }
        }
        Commands::Login { token } => {
            AuthSession::login(slots.as_ref(), &token)?;
            println!("Logged in");
        }
        Commands::Logout => {
            AuthSession::logout(slots.as_ref())?;
            println!("Logged out");
        }
        Commands::Posts(command) => posts(&config, slots, command).await?,
    }

    Ok(())
}

fn check(config: &ProxyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rules = RuleTable::from_config(&config.rules)?;
    println!("{} rules, {} routes: OK", rules.len(), config.routes.len());

    let table = rules.rules();
    for entry in rules.shadowed() {
        println!(
            "warning: rule #{} ({}) is unreachable behind rule #{} ({})",
            entry.rule,
            table[entry.rule].prefix(),
            entry.by,
            table[entry.by].prefix()
        );
    }
    if let Some(catch_all) = rules.catch_all() {
        println!("catch-all: {} -> {}", catch_all.prefix(), catch_all.target());
    }
    Ok(())
}

async fn posts(
    config: &ProxyConfig,
    slots: Arc<dyn SlotStore>,
    command: PostCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = store::open(&config.posts, slots)?;

    match command {
        PostCommands::List => print_json(&store.list().await?)?,
        PostCommands::Add {
            content,
            image,
            user_id,
            user_name,
            user_code,
        } => {
            let post = store
                .save(NewPost {
                    user_id,
                    user_name,
                    user_code,
                    content,
                    image,
                })
                .await?;
            print_json(&post)?;
        }
        PostCommands::Delete { id } => {
            store.delete(&id).await?;
            println!("Deleted {}", id);
        }
        PostCommands::Like { id } => println!("{} likes", store.like(&id).await?),
        PostCommands::Comments { post_id } => print_json(&store.comments(&post_id).await?)?,
        PostCommands::Comment {
            post_id,
            content,
            user_id,
            user_name,
        } => {
            let comment = store
                .comment(NewComment {
                    post_id,
                    user_id,
                    user_name,
                    content,
                })
                .await?;
            print_json(&comment)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
