pub mod modules;
mod schema;
pub mod shared;

pub use modules::cache::{CacheEntry, SqliteCacheRepository, TwoTierCache};
pub use modules::catalog::{BasicDetails, CatalogClient, DetailedMovieInfo, MovieSummary, TmdbClient};
pub use modules::matching::{clean_title, extract_external_id, find_best_match};
pub use modules::registry::MetadataRegistry;
pub use modules::resolver::{
    CallbackEvent, MetadataService, PosterCallback, PosterRequest, Resolution,
};
pub use shared::{AppError, AppResult, ResolverConfig};

use anyhow::{bail, Context};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const CLI_TIMEOUT: Duration = Duration::from_secs(60);

/// Command-line entry point: `marquee <title> [description]`.
///
/// Resolves one title and prints every callback as it arrives.
pub fn run() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    shared::utils::init_logger();

    let mut args = std::env::args().skip(1);
    let Some(title) = args.next() else {
        bail!("usage: marquee <title> [description]");
    };
    let description = args.next();

    let config = ResolverConfig::from_env().context("Failed to load configuration")?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    runtime.block_on(async move {
        let service = MetadataService::start(config).context("Failed to start resolver")?;

        let mut request = PosterRequest::new(title);
        if let Some(description) = description {
            request = request.with_description(description);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let resolution = service.resolve_poster(request, Arc::new(tx)).await;
        let scheduled = matches!(resolution, Resolution::Scheduled { .. });

        loop {
            let event = if scheduled {
                match tokio::time::timeout(CLI_TIMEOUT, rx.recv()).await {
                    Ok(Some(event)) => event,
                    Ok(None) => break,
                    Err(_) => {
                        log::warn!("Timed out waiting for lookup to finish");
                        break;
                    }
                }
            } else {
                match rx.try_recv() {
                    Ok(event) => event,
                    Err(_) => break,
                }
            };

            print_event(&event)?;
            if event.is_terminal() {
                break;
            }
        }

        service.shutdown().await;
        Ok(())
    })
}

fn print_event(event: &CallbackEvent) -> anyhow::Result<()> {
    match event {
        CallbackEvent::ImageUrl(Some(url)) => println!("poster:   {}", url),
        CallbackEvent::ImageUrl(None) => println!("poster:   (none)"),
        CallbackEvent::BackdropUrl(url) => println!("backdrop: {}", url),
        CallbackEvent::BasicDetails(details) => {
            println!("title:    {} ({})", details.title, details.year);
            println!("rating:   {}", details.rating);
        }
        CallbackEvent::DetailedInfo(Some(info)) => {
            println!("{}", serde_json::to_string_pretty(info)?);
        }
        CallbackEvent::DetailedInfo(None) => println!("details:  (none)"),
    }
    Ok(())
}
