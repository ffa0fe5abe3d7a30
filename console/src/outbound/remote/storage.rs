//! Object uploads backed by the hosted storage service.

use std::sync::Arc;

use async_trait::async_trait;

use super::client::RemoteClient;
use super::error::RemoteError;
use crate::domain::ports::{ObjectStorage, ObjectStorageError, ObjectUpload, StoredObject};

/// [`ObjectStorage`] adapter over [`RemoteClient`].
pub struct RemoteStorage {
    client: Arc<RemoteClient>,
}

impl RemoteStorage {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

fn map_remote_error(error: RemoteError, path: &str) -> ObjectStorageError {
    if error.is_conflict() {
        ObjectStorageError::already_exists(path)
    } else {
        error.into_port_error(ObjectStorageError::connection, ObjectStorageError::rejected)
    }
}

#[async_trait]
impl ObjectStorage for RemoteStorage {
    async fn upload(&self, object: &ObjectUpload) -> Result<StoredObject, ObjectStorageError> {
        self.client
            .upload(
                &object.bucket,
                &object.path,
                &object.content_type,
                object.bytes.clone(),
            )
            .await
            .map_err(|error| map_remote_error(error, &object.path))?;
        let public_url = self
            .client
            .public_url(&object.bucket, &object.path)
            .map_err(|error| map_remote_error(error, &object.path))?;
        Ok(StoredObject {
            path: object.path.clone(),
            public_url,
        })
    }
}
