//! Publishing photos and videos to the public gallery.
//!
//! Publishing is two remote steps: the bytes go to the gallery bucket, then a
//! gallery row pointing at the object's public URL is inserted. A failed
//! insert leaves an orphaned object behind; nothing is rolled back.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use url::Url;
use uuid::Uuid;

use super::{GalleryItem, MediaKind};
use crate::domain::Error;
use crate::domain::ports::{GalleryCommand, ObjectStorage, ObjectUpload};

/// Default bucket holding gallery media.
pub const GALLERY_BUCKET: &str = "gallery";

/// Validation errors for a gallery upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryValidationError {
    EmptyTitle,
    EmptyFile,
    UnsupportedContentType { content_type: String },
}

impl fmt::Display for GalleryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyFile => write!(f, "file must not be empty"),
            Self::UnsupportedContentType { content_type } => {
                write!(f, "content type '{content_type}' is neither image nor video")
            }
        }
    }
}

impl std::error::Error for GalleryValidationError {}

/// A file an administrator wants to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryUpload {
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub tags: Vec<String>,
    pub is_public: bool,
}

impl GalleryUpload {
    /// Validate the upload and infer its media kind.
    pub fn media_kind(&self) -> Result<MediaKind, GalleryValidationError> {
        if self.title.trim().is_empty() {
            return Err(GalleryValidationError::EmptyTitle);
        }
        if self.bytes.is_empty() {
            return Err(GalleryValidationError::EmptyFile);
        }
        MediaKind::from_content_type(&self.content_type).ok_or_else(|| {
            GalleryValidationError::UnsupportedContentType {
                content_type: self.content_type.clone(),
            }
        })
    }
}

/// Gallery row to insert once the object is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGalleryItem {
    pub title: String,
    pub description: Option<String>,
    pub file_url: Url,
    pub kind: MediaKind,
    pub tags: Vec<String>,
    pub is_public: bool,
}

/// Object path for `file_name`: `<kind>/<random id>-<sanitised name>`.
pub fn object_path(kind: MediaKind, id: Uuid, file_name: &str) -> String {
    let cleaned: String = file_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let name = cleaned.trim_matches('-');
    if name.is_empty() {
        format!("{kind}/{id}")
    } else {
        format!("{kind}/{id}-{name}")
    }
}



/// Uploads media and records gallery rows.
pub struct GalleryService<S: ?Sized, G: ?Sized> {
    storage: Arc<S>,
    gallery: Arc<G>,
    bucket: String,
}

impl<S: ?Sized, G: ?Sized> GalleryService<S, G> {
    pub fn new(storage: Arc<S>, gallery: Arc<G>, bucket: impl Into<String>) -> Self {
        Self {
            storage,
            gallery,
            bucket: bucket.into(),
        }
    }
}

impl<S, G> GalleryService<S, G>
where
    S: ObjectStorage + ?Sized,
    G: GalleryCommand + ?Sized,
{
    /// Upload `upload` to the bucket and record it in the gallery.
    pub async fn publish(&self, upload: GalleryUpload) -> Result<GalleryItem, Error> {
        let kind = upload
            .media_kind()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let path = object_path(kind, Uuid::new_v4(), &upload.file_name);

        let GalleryUpload {
            title,
            description,
            content_type,
            bytes,
            tags,
            is_public,
            ..
        } = upload;
        let stored = self
            .storage
            .upload(&ObjectUpload {
                bucket: self.bucket.clone(),
                path,
                content_type,
                bytes,
            })
            .await
            .map_err(Error::from)?;

        let item = NewGalleryItem {
            title: title.trim().to_owned(),
            description: description.filter(|text| !text.trim().is_empty()),
            file_url: stored.public_url,
            kind,
            tags,
            is_public,
        };
        let recorded = self
            .gallery
            .record(&item)
            .await
            .map_err(Error::from)?;
        info!(id = %recorded.id, path = %stored.path, %kind, "gallery item published");
        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockGalleryCommand, MockObjectStorage, ObjectStorageError, StoredObject,
    };
    use rstest::rstest;

    fn upload() -> GalleryUpload {
        GalleryUpload {
            title: " Graduation 2026 ".to_owned(),
            description: Some(String::new()),
            file_name: "Stage Photo.JPG".to_owned(),
            content_type: "image/jpeg".to_owned(),
            bytes: vec![0xFF, 0xD8, 0xFF],
            tags: vec!["graduation".to_owned()],
            is_public: true,
        }
    }

    #[rstest]
    #[case("Stage Photo.JPG", "image/00000000-0000-0000-0000-000000000000-stage-photo.jpg")]
    #[case("***", "image/00000000-0000-0000-0000-000000000000")]
    #[case("clip_01.mp4", "image/00000000-0000-0000-0000-000000000000-clip_01.mp4")]
    fn object_paths_are_sanitised(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(object_path(MediaKind::Image, Uuid::nil(), name), expected);
    }

    #[rstest]
    #[case(GalleryUpload { title: "  ".into(), ..upload() }, GalleryValidationError::EmptyTitle)]
    #[case(GalleryUpload { bytes: Vec::new(), ..upload() }, GalleryValidationError::EmptyFile)]
    #[case(
        GalleryUpload { content_type: "application/pdf".into(), ..upload() },
        GalleryValidationError::UnsupportedContentType { content_type: "application/pdf".into() }
    )]
    fn rejects_invalid_uploads(
        #[case] input: GalleryUpload,
        #[case] expected: GalleryValidationError,
    ) {
        assert_eq!(input.media_kind(), Err(expected));
    }

    #[tokio::test]
    async fn publish_uploads_then_records() {
        let public_url =
            Url::parse("https://edtech.example/storage/v1/object/public/gallery/x.jpg")
                .expect("fixture url");
        let mut storage = MockObjectStorage::new();
        let stored_url = public_url.clone();
        storage
            .expect_upload()
            .withf(|object| {
                object.bucket == GALLERY_BUCKET
                    && object.path.starts_with("image/")
                    && object.content_type == "image/jpeg"
            })
            .times(1)
            .return_once(move |object| {
                Ok(StoredObject {
                    path: object.path.clone(),
                    public_url: stored_url,
                })
            });
        let mut gallery = MockGalleryCommand::new();
        gallery
            .expect_record()
            .withf(|item| item.title == "Graduation 2026" && item.description.is_none())
            .times(1)
            .return_once(|item| {
                Ok(GalleryItem {
                    id: Uuid::new_v4(),
                    title: item.title.clone(),
                    description: item.description.clone(),
                    file_url: item.file_url.clone(),
                    kind: item.kind,
                    tags: item.tags.clone(),
                    is_public: item.is_public,
                })
            });

        let service = GalleryService::new(Arc::new(storage), Arc::new(gallery), GALLERY_BUCKET);
        let item = service.publish(upload()).await.expect("published");

        assert_eq!(item.file_url, public_url);
        assert_eq!(item.kind, MediaKind::Image);
    }

    #[tokio::test]
    async fn storage_failure_skips_the_insert() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .return_once(|object| Err(ObjectStorageError::already_exists(object.path.clone())));
        let mut gallery = MockGalleryCommand::new();
        gallery.expect_record().never();

        let service = GalleryService::new(Arc::new(storage), Arc::new(gallery), GALLERY_BUCKET);
        let error = service.publish(upload()).await.expect_err("upload fails");

        assert_eq!(error.code(), ErrorCode::Conflict);
    }
}
