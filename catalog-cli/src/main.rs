use std::path::PathBuf;
use std::process::ExitCode;

use catalog_core::config::config_dir;
use catalog_core::{
    fetch_artist, fetch_gallery, paginate, sample_artifacts, ApiClient, AppConfig, ArtifactFilter,
    Session, SessionStore,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "artifact-catalog")]
#[command(about = "Browse the artifact collection and manage favorites", long_about = None)]
struct Cli {
    /// Config file; defaults to ~/.config/artifact-catalog/config.json
    #[arg(short = 'c', long = "config")]
    config_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        email: String,
        password: String,
    },
    Signup {
        name: String,
        email: String,
        password: String,
        #[arg(long)]
        birth_date: Option<String>,
    },
    Logout,
    Whoami,
    /// List artifacts, one page at a time
    Artifacts {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        displayed: bool,
    },
    Artist {
        name: String,
    },
    Gallery {
        name: String,
    },
    /// Show the logged-in user's favorites
    Favorites,
    /// Flip an artifact's favorite state and resync
    Toggle {
        art_id: String,
    },
    Add {
        art_id: String,
    },
    Remove {
        art_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config_path {
        Some(path) => match AppConfig::load_from(path) {
            Ok(config) => config.with_env_overrides(),
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "failed to load config file");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::load(),
    };

    let client = match ApiClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build API client");
            return ExitCode::FAILURE;
        }
    };
    let store = SessionStore::load_from(session_path()).await;
    let mut session = Session::restore(client, store).await;

    match run(cli.command, &mut session, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn session_path() -> PathBuf {
    let dir = config_dir().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to the working directory for session data");
        PathBuf::from(".")
    });
    dir.join("session.json")
}

async fn run(command: Command, session: &mut Session, config: &AppConfig) -> Result<(), String> {
    match command {
        Command::Login { email, password } => {
            let user = session
                .login(&email, &password)
                .await
                .map_err(|e| e.to_string())?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }
        Command::Signup {
            name,
            email,
            password,
            birth_date,
        } => {
            let user = session
                .signup(&name, &email, &password, birth_date.as_deref())
                .await
                .map_err(|e| e.to_string())?;
            println!("Welcome, {}", user.name);
        }
        Command::Logout => {
            session.logout().await.map_err(|e| e.to_string())?;
            println!("Logged out");
        }
        Command::Whoami => match session.user() {
            Some(user) => {
                println!("[{}] {} <{}>", user.initial(), user.name, user.email);
                if let Some(since) = session.logged_in_at().await {
                    println!("Logged in since {}", since.format("%Y-%m-%d %H:%M"));
                }
            }
            None => println!("Not logged in"),
        },
        Command::Artifacts {
            page,
            genre,
            theme,
            query,
            displayed,
        } => {
            let artifacts = sample_artifacts();
            let filter = ArtifactFilter {
                query,
                genre,
                theme,
                displayed_only: displayed,
            };
            let matching: Vec<_> = filter.apply(&artifacts).into_iter().cloned().collect();
            let current = paginate(&matching, page, config.catalog.items_per_page);
            for artifact in current.items {
                let heart = if session.is_favorite(&artifact.art_id()) { "♥" } else { " " };
                println!(
                    "{heart} {:>4}  {}  ({}, {})  displayed: {}",
                    artifact.id,
                    artifact.display_name(),
                    artifact.age.as_deref().unwrap_or("Unknown"),
                    artifact.genre.as_deref().unwrap_or("Unknown"),
                    if artifact.display { "O" } else { "X" },
                );
            }
            println!("page {} of {}", current.page, current.total_pages.max(1));
        }
        Command::Artist { name } => {
            match fetch_artist(session.client(), &name).await.map_err(|e| e.to_string())? {
                Some(artist) => {
                    print_field("Artist ID", artist.artist_id.as_deref());
                    print_field("Name", artist.name.as_deref());
                    print_field("Theme", artist.theme.as_deref());
                    print_field("Nationality", artist.nationality.as_deref());
                }
                None => println!("No artist found"),
            }
        }
        Command::Gallery { name } => {
            match fetch_gallery(session.client(), &name).await.map_err(|e| e.to_string())? {
                Some(gallery) => {
                    print_field("Gallery ID", gallery.gallery_id.as_deref());
                    print_field("Name", gallery.name.as_deref());
                    print_field("Address", gallery.address.as_deref());
                    print_field("Opens", gallery.open_time.as_deref());
                    print_field("Closes", gallery.closed_time.as_deref());
                    if let Some(fee) = gallery.fee {
                        println!("Fee: {fee} KRW");
                    }
                    print_field("Phone", gallery.phone.as_deref());
                }
                None => println!("No gallery found"),
            }
        }
        Command::Favorites => {
            let entries = session.refresh_favorites().await.map_err(|e| e.to_string())?;
            if entries.is_empty() {
                println!("No favorites yet");
            }
            for entry in entries {
                let name = entry.art.as_ref().and_then(|art| art.name.as_deref());
                match (entry.resolved_art_id(), name) {
                    (Some(id), Some(name)) => println!("{id}  {name}"),
                    (Some(id), None) => println!("{id}"),
                    (None, _) => {}
                }
            }
        }
        Command::Toggle { art_id } => {
            let now_favorite = session
                .toggle_favorite(&art_id)
                .await
                .map_err(|e| e.to_string())?;
            if now_favorite {
                println!("{art_id} added to favorites");
            } else {
                println!("{art_id} removed from favorites");
            }
        }
        Command::Add { art_id } => {
            session.add_favorite(&art_id).await.map_err(|e| e.to_string())?;
            println!("{art_id} added to favorites");
        }
        Command::Remove { art_id } => {
            session
                .remove_favorite(&art_id)
                .await
                .map_err(|e| e.to_string())?;
            println!("{art_id} removed from favorites");
        }
    }
    Ok(())
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("{label}: {value}");
    }
}
