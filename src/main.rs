use dropview::cli::{Action, Args, ReceiveInput};
use dropview::config::UserConfig;
use dropview::domain::guess_media_type;
use dropview::{
    classify_for_receiver, classify_for_sender, format_file_size, BlobStore, FilePreviewSet,
    HandoffCell, LocalFile, Payload, Received, Result, SharedPreviews,
};

use clap::CommandFactory;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Load user configuration
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    init_logging(&user_config);

    if let Err(e) = run(args.into(), &user_config).await {
        tracing::error!(error = %e, "dropview failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize logging with tracing. RUST_LOG wins over the config file.
fn init_logging(config: &UserConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config
            .log_filter
            .as_deref()
            .and_then(|f| EnvFilter::try_new(f).ok())
            .unwrap_or_else(|| EnvFilter::new("dropview=info"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(action: Action, config: &UserConfig) -> Result<()> {
    match action {
        Action::Home => {
            Args::command().print_help()?;
            println!();
            Ok(())
        }
        Action::Send { file, media_type } => run_send(&file, media_type).await,
        Action::Receive {
            input,
            media_type,
            token,
        } => run_receive(input, media_type, token, config).await,
        Action::Size { sizes } => {
            for size in sizes {
                println!("{}", format_file_size(size));
            }
            Ok(())
        }
    }
}

async fn run_send(path: &Path, media_type: Option<String>) -> Result<()> {
    let mut file = LocalFile::from_path(path)?;
    if let Some(media_type) = media_type {
        file = file.with_media_type(media_type);
    }

    tracing::info!(
        file = %file.name,
        media_type = %file.media_type,
        size = %format_file_size(file.size),
        "preparing to send"
    );

    let previews = SharedPreviews::new();
    classify_for_sender(file, &previews).await??;

    print_previews(&previews.snapshot())
}

async fn run_receive(
    input: ReceiveInput,
    media_type: Option<String>,
    token: Option<String>,
    config: &UserConfig,
) -> Result<()> {
    // Stands in for the QR decoder writing what it scanned
    let handoff = HandoffCell::new();
    if let Some(token) = token {
        handoff.write(token);
    }
    match handoff.read() {
        Some(token) => tracing::info!(token = %token, "using connection token"),
        None => tracing::info!("no connection token decoded"),
    }

    let received = match input {
        ReceiveInput::Reference(reference) => Received::Reference(reference),
        ReceiveInput::File(path) => {
            let bytes = tokio::fs::read(&path).await?;
            let media_type = media_type.unwrap_or_else(|| guess_media_type(&path));
            tracing::info!(
                media_type = %media_type,
                size = %format_file_size(bytes.len() as u64),
                "payload received"
            );
            Received::Payload(Payload::new(media_type, bytes))
        }
    };

    let previews = SharedPreviews::new();
    let blobs = BlobStore::with_origin(config.blob_origin.clone());
    let handle = classify_for_receiver(received, &previews, &blobs).await?;

    let result = print_previews(&previews.snapshot());

    if let Some(handle) = handle {
        handle.revoke();
    }
    for leaked in blobs.outstanding() {
        tracing::warn!(url = %leaked.url, "object url was not revoked");
    }

    result
}

fn print_previews(previews: &FilePreviewSet) -> Result<()> {
    let json = serde_json::to_string_pretty(previews)?;
    println!("{}", json);
    Ok(())
}
