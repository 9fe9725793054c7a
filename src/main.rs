use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod backend;
mod config;
mod dispatch;
mod link;
mod media;
mod session;
mod view;

use backend::{BackendClient, LiveResolution};
use dispatch::{Action, Dispatcher, Outcome, SystemNavigator};
use link::LinkField;
use media::manifest::QualityManifest;
use media::{derive_filename, DeriveContext, ResolvedMedia};
use session::Session;
use view::{manifest_listing, media_listing, DetailPanel};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Backend base URL (overrides the config file)
    #[arg(short, long)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a single work (video or gallery) and list its links
    Single {
        url: String,
        /// Ask the backend to download the work server-side in the background
        #[arg(long)]
        download: bool,
        /// Proxy-download the main link with a derived filename
        #[arg(long)]
        save: bool,
        /// Open the main link in a new browsing context
        #[arg(long)]
        open: bool,
    },
    /// Resolve a live stream and list its quality variants
    Live {
        url: String,
        /// Open the backend-reported best stream
        #[arg(long)]
        open_best: bool,
    },
    /// Proxy-download an arbitrary media URL through the backend
    Download {
        url: String,
        /// Filename to suggest to the backend
        #[arg(long)]
        filename: Option<String>,
    },
    /// Open a media URL in a new browsing context
    Open { url: String },
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/medialink/config.toml", xdg_config_home);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/medialink/config.toml", home.display());
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = if let Some(config_path) = get_config_path(&args) {
        config::Config::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path))?
    } else {
        config::Config::default()
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if config.get_logging_format() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let backend_url = args.backend.clone().unwrap_or(config.backend_url.clone());
    let client = BackendClient::new(&backend_url)?;
    let dispatcher = Dispatcher::new(Box::new(client.clone()), Box::new(SystemNavigator));

    match args.command {
        Command::Single {
            url,
            download,
            save,
            open,
        } => run_single(&client, &dispatcher, &url, download, save, open).await,
        Command::Live { url, open_best } => run_live(&client, &dispatcher, &url, open_best).await,
        Command::Download { url, filename } => {
            let link = LinkField::Single(url);
            report(
                dispatcher
                    .dispatch(&link, Action::Download, filename.as_deref())
                    .await,
            );
            Ok(())
        }
        Command::Open { url } => {
            let link = LinkField::Single(url);
            report(dispatcher.dispatch(&link, Action::Open, None).await);
            Ok(())
        }
    }
}

async fn run_single(
    client: &BackendClient,
    dispatcher: &Dispatcher,
    url: &str,
    download: bool,
    save: bool,
    open: bool,
) -> Result<()> {
    let mut session = Session::default();
    let ticket = session.media.begin();

    let media = match client.resolve_single(url, download).await {
        Ok(media) => media,
        Err(e) => {
            warn!("Resolution failed: {:#}", e);
            failed_resolution()
        }
    };
    session.media.accept(ticket, media);
    let Some(media) = session.media.get() else {
        return Ok(());
    };

    println!("{}", media.status_text);

    if download {
        // Background mode: the backend downloads server-side; the status text
        // is all it reports.
        println!("Download request handed to the server for background processing");
        return Ok(());
    }

    let mut panel = DetailPanel::default();
    panel.toggle_with(|| media_listing(media));
    for line in panel.lines() {
        println!("{}", line);
    }
    if let Some(preview) = media.preview.as_single() {
        println!("Preview: {}", preview);
    }

    if save {
        let filename = derive_filename(&DeriveContext::from(media), "mp4");
        report(
            dispatcher
                .dispatch(&media.primary, Action::Download, Some(&filename))
                .await,
        );
    }
    if open {
        report(dispatcher.dispatch(&media.primary, Action::Open, None).await);
    }

    Ok(())
}

async fn run_live(
    client: &BackendClient,
    dispatcher: &Dispatcher,
    url: &str,
    open_best: bool,
) -> Result<()> {
    let mut session = Session::default();
    let ticket = session.live.begin();

    match client.resolve_live(url).await {
        Ok(live) => {
            session.live.accept(ticket, live);
        }
        Err(e) => {
            warn!("Live resolution failed: {:#}", e);
            // A failed query clears the manifest instead of keeping a stale one.
            session.clear_live(ticket);
        }
    }
    let Some(live) = session.live.get() else {
        return Ok(());
    };

    if !live.status_text.is_empty() {
        println!("{}", live.status_text);
    }

    let mut panel = DetailPanel::default();
    panel.toggle_with(|| manifest_listing(&live.manifest));
    for line in panel.lines() {
        println!("{}", line);
    }

    let best = best_link(live);
    match &best {
        LinkField::Single(url) => println!("Best: {}", url),
        _ => println!("Best stream unavailable"),
    }
    if let Some(preview) = live.preview.as_single() {
        println!("Preview: {}", preview);
    }

    if open_best {
        report(dispatcher.dispatch(&best, Action::Open, None).await);
    }

    Ok(())
}

/// Placeholder installed when a single resolution fails; keeps the client
/// usable for the next attempt.
fn failed_resolution() -> ResolvedMedia {
    ResolvedMedia {
        primary: LinkField::Absent,
        cover: LinkField::Absent,
        dynamic_cover: LinkField::Absent,
        audio: LinkField::Absent,
        preview: LinkField::Absent,
        status_text: "Failed to resolve media data".to_string(),
        author_hint: None,
        description_hint: None,
    }
}

fn best_link(live: &LiveResolution) -> LinkField {
    match &live.manifest {
        QualityManifest { best: Some(url), .. } => LinkField::Single(url.clone()),
        _ => LinkField::Absent,
    }
}

/// Converts a dispatch result into a user-visible message. No dispatch
/// failure is fatal.
fn report(result: Result<Outcome, dispatch::DispatchError>) {
    match result {
        Ok(Outcome::Saved { file_path }) => {
            info!("Media saved on the server");
            println!("Saved on the server at: {}", file_path);
        }
        Ok(Outcome::Opened) => println!("Opened in a new browsing context"),
        Err(e) => println!("{}", e),
    }
}
