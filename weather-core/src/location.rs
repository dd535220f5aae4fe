//! Device location seam.
//!
//! The controller only needs two calls from the platform: ask for permission
//! and read the current position. Both may fail.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::LoadError, model::Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

#[async_trait]
pub trait LocationService: Send + Sync + Debug {
    async fn request_foreground_permission(&self) -> Result<PermissionStatus, LoadError>;

    async fn current_position(&self) -> Result<Coordinates, LoadError>;
}

/// Location backed by fixed coordinates (config file or command line).
///
/// Having no coordinates is treated like a user who refused the permission.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    coordinates: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self { coordinates }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }
}

#[async_trait]
impl LocationService for ConfiguredLocation {
    async fn request_foreground_permission(&self) -> Result<PermissionStatus, LoadError> {
        Ok(match self.coordinates {
            Some(_) => PermissionStatus::Granted,
            None => PermissionStatus::Denied,
        })
    }

    async fn current_position(&self) -> Result<Coordinates, LoadError> {
        self.coordinates.ok_or_else(|| {
            LoadError::LocationUnavailable(
                "no coordinates configured; pass --lat/--lon or run `weather configure`".into(),
            )
        })
    }
}
