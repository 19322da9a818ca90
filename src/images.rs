use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Disk-backed stand-in for the image host: persists uploaded bytes under
/// `<root>/<folder>/` and returns the public URL they are served from.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    base_url: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            base_url,
        }
    }

    pub async fn upload(
        &self,
        folder: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> AppResult<String> {
        let name = format!("{}.{}", Uuid::new_v4(), extension_for(content_type));
        let dir = self.root.join(folder);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        fs::write(dir.join(&name), bytes)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(format!("{}/{}/{}", self.base_url, folder, name))
    }
}

fn extension_for(content_type: Option<&str>) -> &'static str {
    match content_type {
        Some("image/png") => "png",
        Some("image/jpeg") => "jpg",
        Some("image/webp") => "webp",
        Some("image/gif") => "gif",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_writes_file_and_returns_public_url() {
        let root = std::env::temp_dir().join(format!("pasarku-media-{}", Uuid::new_v4()));
        let store = ImageStore::new(&root, "http://localhost:3000/media/");

        let url = store
            .upload("pasarku/items", b"fake-image", Some("image/png"))
            .await
            .expect("upload");

        assert!(url.starts_with("http://localhost:3000/media/pasarku/items/"));
        assert!(url.ends_with(".png"));

        let name = url.rsplit('/').next().unwrap();
        let on_disk = root.join("pasarku/items").join(name);
        assert_eq!(tokio::fs::read(on_disk).await.unwrap(), b"fake-image");

        tokio::fs::remove_dir_all(root).await.ok();
    }

    #[tokio::test]
    async fn unknown_content_type_falls_back_to_bin() {
        let root = std::env::temp_dir().join(format!("pasarku-media-{}", Uuid::new_v4()));
        let store = ImageStore::new(&root, "http://localhost:3000/media");

        let url = store.upload("pasarku", b"blob", None).await.expect("upload");
        assert!(url.ends_with(".bin"));

        tokio::fs::remove_dir_all(root).await.ok();
    }
}
