//! Board CLI - a terminal front end for the board service.
//!
//! Each invocation is one boot of the client: the stored session is checked
//! against the server first, then the requested command runs.

mod surface;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use board_client_core::models::{CommentDraft, PostDraft};
use board_client_core::utils::{format_timestamp, truncate_string};
use board_client_core::{ApiClient, Config, FileStorage, SessionController, VerifyOutcome};

use surface::TerminalSurface;

// ============================================================================
// Constants
// ============================================================================

/// Width of the title column in post listings
const TITLE_COLUMN_WIDTH: usize = 40;

const USAGE: &str = "\
Usage: board <command>

Commands:
  login [username]            Sign in (password is prompted)
  register [username]         Create an account
  logout                      Forget the stored session
  whoami                      Show the signed-in user
  verify                      Check the stored session against the server
  list [page]                 List posts (pages start at 1)
  show <id>                   Show a post
  post <title> <content>      Create a post
  delete <id>                 Delete a post
  comments <post-id>          List comments on a post
  comment <post-id> <text>    Comment on a post";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Login(Option<String>),
    Register(Option<String>),
    Logout,
    WhoAmI,
    Verify,
    List(u32),
    Show(i64),
    Post { title: String, content: String },
    Delete(i64),
    Comments(i64),
    Comment { post_id: i64, content: String },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let name = args.first().map(String::as_str).unwrap_or("");
        let rest = &args[args.len().min(1)..];
        let arg = |i: usize, what: &str| -> Result<String> {
            rest.get(i)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Missing {}\n\n{}", what, USAGE))
        };
        let id = |i: usize, what: &str| -> Result<i64> {
            let raw = arg(i, what)?;
            raw.parse()
                .with_context(|| format!("Invalid {}: {}", what, raw))
        };

        let command = match name {
            "login" => Command::Login(rest.first().cloned()),
            "register" => Command::Register(rest.first().cloned()),
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "verify" => Command::Verify,
            "list" => {
                let page = match rest.first() {
                    Some(raw) => raw
                        .parse::<u32>()
                        .ok()
                        .filter(|p| *p >= 1)
                        .ok_or_else(|| anyhow::anyhow!("Invalid page: {}", raw))?,
                    None => 1,
                };
                Command::List(page - 1)
            }
            "show" => Command::Show(id(0, "post id")?),
            "post" => Command::Post {
                title: arg(0, "title")?,
                content: rest.get(1..).map(|r| r.join(" ")).unwrap_or_default(),
            },
            "delete" => Command::Delete(id(0, "post id")?),
            "comments" => Command::Comments(id(0, "post id")?),
            "comment" => Command::Comment {
                post_id: id(0, "post id")?,
                content: {
                    arg(1, "comment text")?;
                    rest[1..].join(" ")
                },
            },
            _ => anyhow::bail!("{}", USAGE),
        };
        Ok(command)
    }

    /// Commands that are themselves the login screen
    fn is_login_surface(&self) -> bool {
        matches!(self, Command::Login(_) | Command::Register(_))
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let mut config = Config::load().context("Failed to load config")?;
    let base_url = config.api_base_url();
    let storage = Arc::new(FileStorage::open(config.session_path()?));
    let surface = Arc::new(TerminalSurface::new(command.is_login_surface()));
    let session = Arc::new(SessionController::new(storage, surface));
    let client = ApiClient::new(&base_url, session)?;
    info!(base_url = %base_url, "Board client starting");

    let outcome = client.verify_on_start().await;
    info!(?outcome, "Startup session check finished");

    run(&client, &mut config, command, outcome).await
}

async fn run(
    client: &ApiClient,
    config: &mut Config,
    command: Command,
    outcome: VerifyOutcome,
) -> Result<()> {
    match command {
        Command::Login(username) => {
            let username = resolve_username(username, config.last_username.as_deref())?;
            let password = rpassword::prompt_password("Password: ")?;
            client.login(&username, &password).await?;
            config.last_username = Some(username.clone());
            config.save()?;
            println!("Signed in as {}", username);
        }
        Command::Register(username) => {
            let username = resolve_username(username, None)?;
            let password = rpassword::prompt_password("Password: ")?;
            client.register(&username, &password).await?;
            println!("Account created. Run `board login {}` to sign in.", username);
        }
        Command::Logout => {
            client.session().logout();
            println!("Signed out");
        }
        Command::WhoAmI => match client.session().current_username() {
            Some(name) => println!("{}", name),
            None if client.session().is_logged_in() => {
                let identity = client.me().await?;
                println!("{}", identity.username);
            }
            None => println!("Not signed in"),
        },
        Command::Verify => println!("{}", describe_outcome(outcome)),
        Command::List(page) => {
            let page = client.list_posts(page).await?;
            for post in &page.content {
                println!(
                    "{:>6}  {:<width$}  {:<12}  {}",
                    post.id,
                    truncate_string(&post.title, TITLE_COLUMN_WIDTH),
                    post.author_display(),
                    format_timestamp(post.created_at.as_deref().unwrap_or_default()),
                    width = TITLE_COLUMN_WIDTH,
                );
            }
            println!("({}, {} posts)", page.position_display(), page.total_elements);
        }
        Command::Show(id) => {
            let post = client.get_post(id).await?;
            println!("#{} {}", post.id, post.title);
            println!(
                "by {}  {}",
                post.author_display(),
                format_timestamp(post.created_at.as_deref().unwrap_or_default())
            );
            println!();
            println!("{}", post.content);
        }
        Command::Post { title, content } => {
            let post = client.create_post(&PostDraft { title, content }).await?;
            println!("Created post #{}", post.id);
        }
        Command::Delete(id) => {
            client.delete_post(id).await?;
            println!("Deleted post #{}", id);
        }
        Command::Comments(post_id) => {
            for comment in client.list_comments(post_id).await? {
                println!(
                    "[{}] {} ({}): {}",
                    comment.id,
                    comment.author.as_deref().unwrap_or("(unknown)"),
                    format_timestamp(comment.created_at.as_deref().unwrap_or_default()),
                    comment.content
                );
            }
        }
        Command::Comment { post_id, content } => {
            let comment = client
                .create_comment(post_id, &CommentDraft { content })
                .await?;
            println!("Added comment #{}", comment.id);
        }
    }
    Ok(())
}

fn resolve_username(given: Option<String>, remembered: Option<&str>) -> Result<String> {
    if let Some(name) = given {
        return Ok(name);
    }
    match remembered {
        Some(name) => print!("Username [{}]: ", name),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    match (line.is_empty(), remembered) {
        (false, _) => Ok(line.to_string()),
        (true, Some(name)) => Ok(name.to_string()),
        (true, None) => anyhow::bail!("Username is required"),
    }
}

fn describe_outcome(outcome: VerifyOutcome) -> &'static str {
    match outcome {
        VerifyOutcome::NoToken => "Not signed in",
        VerifyOutcome::SkipRequested => "Signed in (just logged in, check skipped)",
        VerifyOutcome::Confirmed => "Signed in (session confirmed by server)",
        VerifyOutcome::InvalidatedSilent | VerifyOutcome::InvalidatedNoisy => {
            "Session expired; signed out"
        }
        VerifyOutcome::Indeterminate => "Signed in (server could not confirm the session)",
    }
}

// ============================================================================
// Tests
// ============================================================================
