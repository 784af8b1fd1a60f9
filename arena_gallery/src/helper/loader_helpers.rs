use crate::config::Config;
use crate::helper::arena_client::{self, ArenaClient, Endpoints, GalleryError, JsonSource};
use crate::models::Region;
use crate::{write_region, AppState};
use actix_web::web;
use std::sync::RwLock;

fn store<T>(lock: &RwLock<Region<T>>, name: &str, outcome: Result<T, GalleryError>) {
    if let Err(e) = &outcome {
        log::error!("Failed to load {}: {}", name, e);
    }
    write_region(lock, name).store(outcome);
}

pub async fn load_channel<S: JsonSource>(source: &S, endpoints: &Endpoints, config: &Config, state: &AppState) {
    let outcome = arena_client::fetch_channel(source, endpoints, &config.channel_slug).await;
    if let Ok(channel) = &outcome {
        log::info!("Loaded channel '{}' ({} blocks)", channel.title, channel.counts.blocks);
    }
    store(&state.channel, "channel", outcome);
}

pub async fn load_profile<S: JsonSource>(source: &S, endpoints: &Endpoints, config: &Config, state: &AppState) {
    let outcome = arena_client::fetch_user(source, endpoints, &config.local_username).await;
    store(&state.profile, "profile", outcome);
}

pub async fn load_blocks<S: JsonSource>(source: &S, endpoints: &Endpoints, config: &Config, state: &AppState) {
    let outcome = arena_client::fetch_blocks(source, endpoints, &config.channel_slug).await;
    if let Ok(blocks) = &outcome {
        log::info!("Loaded {} blocks from '{}'", blocks.len(), config.channel_slug);
    }
    store(&state.blocks, "blocks", outcome);
}

/// Starts the three fetch chains as independent tasks on the current actix system.
/// None of them waits for another.
pub fn spawn_loaders(state: web::Data<AppState>, config: Config) {
    let endpoints = match Endpoints::from_config(&config) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            log::error!("Cannot build API endpoints: {}", e);
            store(&state.channel, "channel", Err(e.clone()));
            store(&state.profile, "profile", Err(e.clone()));
            store(&state.blocks, "blocks", Err(e));
            return;
        }
    };

    {
        let (state, config, endpoints) = (state.clone(), config.clone(), endpoints.clone());
        actix_web::rt::spawn(async move {
            let client = ArenaClient::new(&config);
            load_channel(&client, &endpoints, &config, &state).await;
        });
    }
    {
        let (state, config, endpoints) = (state.clone(), config.clone(), endpoints.clone());
        actix_web::rt::spawn(async move {
            let client = ArenaClient::new(&config);
            load_profile(&client, &endpoints, &config, &state).await;
        });
    }
    actix_web::rt::spawn(async move {
        let client = ArenaClient::new(&config);
        load_blocks(&client, &endpoints, &config, &state).await;
    });
}

/// Re-runs the three chains on the configured interval. Does nothing when refresh is disabled.
pub fn spawn_refresh(state: web::Data<AppState>, config: Config) {
    let Some(period) = config.refresh_interval() else {
        return;
    };

    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(period);
        // The first tick completes immediately and the initial load already ran.
        interval.tick().await;
        loop {
            interval.tick().await;
            log::info!("Refreshing channel '{}'", config.channel_slug);
            spawn_loaders(state.clone(), config.clone());
        }
    });
}
