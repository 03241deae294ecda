//! One-shot position lookup used when a draft asks to record where a game is played.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Location;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
    #[error("permission to read the position was denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Location, GeoError>;
}

/// Reports a fixed position, or `Unavailable` when none is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticGeolocator {
    position: Option<Location>,
}

impl StaticGeolocator {
    #[must_use]
    pub fn new(position: Option<Location>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for StaticGeolocator {
    async fn current_position(&self) -> Result<Location, GeoError> {
        self.position
            .ok_or_else(|| GeoError::Unavailable("no coordinates configured".into()))
    }
}
