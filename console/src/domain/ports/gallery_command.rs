//! Driven port for recording gallery rows.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{GalleryItem, NewGalleryItem};

define_port_error! {
    /// Errors surfaced while recording a gallery item.
    pub enum GalleryCommandError {
        /// Backend connection could not be established.
        Connection { message } as ServiceUnavailable => "gallery store unavailable: {message}",
        /// The backend refused the row (policy or constraint).
        Rejected { message } as InvalidRequest => "gallery item rejected: {message}",
    }
}

/// Port for inserting gallery rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GalleryCommand: Send + Sync {
    /// Insert one gallery row and return it as stored.
    async fn record(&self, item: &NewGalleryItem) -> Result<GalleryItem, GalleryCommandError>;
}
