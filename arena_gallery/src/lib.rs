use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::block::Block;
use crate::models::{Channel, Region, User};

/// One slot per independent fetch chain. A failure in one never touches the others.
#[derive(Default)]
pub struct AppState {
    pub channel: RwLock<Region<Channel>>,
    pub profile: RwLock<Region<User>>,
    pub blocks: RwLock<Region<Vec<Block>>>,
}

pub(crate) fn read_region<'a, T>(lock: &'a RwLock<T>, name: &str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        log::error!("RwLock for {} region was poisoned! Using stale data.", name);
        poisoned.into_inner()
    })
}

pub(crate) fn write_region<'a, T>(lock: &'a RwLock<T>, name: &str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        log::error!("RwLock for {} region was poisoned! Recovering lock.", name);
        poisoned.into_inner()
    })
}

impl AppState {
    /// State with every region already populated; used by tools and tests.
    pub fn ready(channel: Channel, profile: User, blocks: Vec<Block>) -> Self {
        AppState {
            channel: RwLock::new(Region::Ready(channel)),
            profile: RwLock::new(Region::Ready(profile)),
            blocks: RwLock::new(Region::Ready(blocks)),
        }
    }

    pub fn channel(&self) -> RwLockReadGuard<'_, Region<Channel>> {
        read_region(&self.channel, "channel")
    }

    pub fn profile(&self) -> RwLockReadGuard<'_, Region<User>> {
        read_region(&self.profile, "profile")
    }

    pub fn blocks(&self) -> RwLockReadGuard<'_, Region<Vec<Block>>> {
        read_region(&self.blocks, "blocks")
    }
}

pub mod config;
pub mod helper;
pub mod models;
pub mod routes;
pub mod templates;
