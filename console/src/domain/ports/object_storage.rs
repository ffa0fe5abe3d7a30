//! Driven port for the hosted object storage.

use async_trait::async_trait;
use url::Url;

use super::define_port_error;

/// Bytes to place in a storage bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUpload {
    /// Target bucket id.
    pub bucket: String,
    /// Object path inside the bucket, without a leading slash.
    pub path: String,
    /// MIME type sent with the upload.
    pub content_type: String,
    /// Object body.
    pub bytes: Vec<u8>,
}

/// Location of an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object path inside the bucket.
    pub path: String,
    /// Public URL serving the object.
    pub public_url: Url,
}

define_port_error! {
    /// Errors surfaced by object storage.
    pub enum ObjectStorageError {
        /// Storage could not be reached.
        Connection { message } as ServiceUnavailable => "storage unavailable: {message}",
        /// An object already exists at the path.
        AlreadyExists { path } as Conflict => "object already exists at {path}",
        /// Storage refused the upload.
        Rejected { message } as InvalidRequest => "upload rejected: {message}",
    }
}

/// Port for uploading objects and deriving their public URLs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload bytes; existing objects are not overwritten.
    async fn upload(&self, object: &ObjectUpload) -> Result<StoredObject, ObjectStorageError>;
}
