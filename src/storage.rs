//! Artifact storage: generated images are downloaded and re-uploaded to a
//! persistent object store under a path derived from the season and card index.
//!
//! Storage never fails a card. When anything goes wrong the original image URL
//! is kept as the card's image path.

use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use url::Url;

use crate::constants::{DOWNLOAD_TIMEOUT, PNG_CONTENT_TYPE};
use crate::error::StoreError;
use crate::season::SeasonId;

/// Object path of a card image, `seasons/{season}/cards/card_{index}.png`.
pub fn object_path(season: &SeasonId, index: usize) -> String {
    format!("{}/card_{index}.png", season.collection_path())
}

/// Fetches the bytes behind an image URL.
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    /// Downloads the whole body.
    async fn download(&self, url: &Url) -> Result<Vec<u8>, StoreError>;
}

/// A persistent object store that hands out public URLs.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` at `path`, replacing anything there, and returns its public URL.
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<String, StoreError>;
}

/// Downloads over HTTP with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    /// Builds a client with the download timeout applied.
    pub fn new() -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &Url) -> Result<Vec<u8>, StoreError> {
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

fn join_public(base: &Url, path: &str) -> Result<String, StoreError> {
    let base = base.as_str().trim_end_matches('/');
    let joined = format!("{base}/{path}");
    Url::parse(&joined)
        .map(|url| url.to_string())
        .map_err(|err| StoreError::Url(format!("{joined}: {err}")))
}

/// Stores objects as files under a root directory.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: Option<Url>,
}

impl FsObjectStore {
    /// Creates the root directory if needed. Without a public base URL the
    /// returned references are `file://` URLs.
    pub fn new(root: &Path, public_base_url: Option<Url>) -> Result<Self, StoreError> {
        std::fs::create_dir_all(root)?;
        let root = root.canonicalize()?;
        Ok(Self {
            root,
            public_base_url,
        })
    }
}

#[async_trait::async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StoreError> {
        if Path::new(path)
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        match &self.public_base_url {
            Some(base) => join_public(base, path),
            None => Url::from_file_path(&target)
                .map(|url| url.to_string())
                .map_err(|()| StoreError::Url(target.display().to_string())),
        }
    }
}

/// Stores objects with HTTP PUT requests against a bucket URL.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: Url,
    public_base_url: Option<Url>,
    api_key: Option<String>,
}

impl HttpObjectStore {
    /// Objects go to `{base_url}/{path}` and are served from
    /// `{public_base_url}/{path}`, defaulting to the upload location.
    pub fn new(
        base_url: Url,
        public_base_url: Option<Url>,
        api_key: Option<String>,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            public_base_url,
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let target = join_public(&self.base_url, path)?;
        let mut builder = self
            .client
            .put(&target)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(api_key) = self.api_key.as_deref() {
            builder = builder.bearer_auth(api_key);
        }
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status,
                url: target,
            });
        }
        match &self.public_base_url {
            Some(base) => join_public(base, path),
            None => Ok(target),
        }
    }
}

/// Ensures image bytes are a valid PNG, converting if possible.
pub fn normalize_image_to_png(bytes: &[u8]) -> Result<Vec<u8>, StoreError> {
    let reader = image::ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format();
    let image = reader.decode()?;

    if format == Some(image::ImageFormat::Png) {
        return Ok(bytes.to_vec());
    }

    debug!("Converting {:?} image to PNG", format);
    let mut output = Cursor::new(Vec::new());
    image.write_to(&mut output, image::ImageFormat::Png)?;
    Ok(output.into_inner())
}

/// Moves generated images into the object store for one season.
pub struct ArtifactStore {
    downloader: Box<dyn Downloader>,
    store: Box<dyn ObjectStore>,
    season: SeasonId,
}

impl ArtifactStore {
    /// Stores images for `season`.
    pub fn new(
        downloader: Box<dyn Downloader>,
        store: Box<dyn ObjectStore>,
        season: SeasonId,
    ) -> Self {
        Self {
            downloader,
            store,
            season,
        }
    }

    /// The season images are stored under.
    pub fn season(&self) -> &SeasonId {
        &self.season
    }

    /// Stores the image for card `slot_index` and returns its persistent URL,
    /// or the original URL if downloading or uploading fails.
    pub async fn store(&self, image_url: &Url, slot_index: usize) -> String {
        match self.try_store(image_url, slot_index).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!("Storing card {slot_index} failed, keeping original URL: {err}");
                image_url.to_string()
            }
        }
    }

    async fn try_store(&self, image_url: &Url, slot_index: usize) -> Result<String, StoreError> {
        let downloaded = self.downloader.download(image_url).await?;
        let png = normalize_image_to_png(&downloaded)?;
        let path = object_path(&self.season, slot_index);
        let stored = self.store.put(&path, png, PNG_CONTENT_TYPE).await?;
        info!("Uploaded to {path}");
        Ok(stored)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A tiny valid image in the given format.
    pub(crate) fn sample_image(format: image::ImageFormat) -> Vec<u8> {
        let image = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 40, 90]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut out, format)
            .expect("encode sample image");
        out.into_inner()
    }

    fn sample_gif() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(4, 4, image::Rgba([20, 160, 90, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut out, image::ImageFormat::Gif)
            .expect("encode sample gif");
        out.into_inner()
    }

    pub(crate) struct StaticDownloader(pub(crate) Vec<u8>);

    #[async_trait::async_trait]
    impl Downloader for StaticDownloader {
        async fn download(&self, _url: &Url) -> Result<Vec<u8>, StoreError> {
            Ok(self.0.clone())
        }
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl ObjectStore for FailingStore {
        async fn put(
            &self,
            _path: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<String, StoreError> {
            Err(StoreError::Io(std::io::Error::other("bucket unavailable")))
        }
    }

    #[test]
    fn object_path_is_derived_from_season_and_index() {
        let season = "2025_S3_v1".parse::<SeasonId>().expect("valid season");
        assert_eq!(
            object_path(&season, 0),
            "seasons/2025_S3_v1/cards/card_0.png"
        );
        assert_eq!(
            object_path(&season, 69),
            "seasons/2025_S3_v1/cards/card_69.png"
        );
    }

    #[test]
    fn test_normalize_image_to_png() {
        let png = sample_image(image::ImageFormat::Png);
        assert_eq!(normalize_image_to_png(&png).expect("normalize png"), png);

        let jpeg = sample_image(image::ImageFormat::Jpeg);
        let converted = normalize_image_to_png(&jpeg).expect("normalize jpeg");
        assert_eq!(
            image::guess_format(&converted).expect("guess format"),
            image::ImageFormat::Png
        );

        for other in [sample_image(image::ImageFormat::WebP), sample_gif()] {
            let converted = normalize_image_to_png(&other).expect("normalize");
            assert_eq!(
                image::guess_format(&converted).expect("guess format"),
                image::ImageFormat::Png
            );
        }

        assert!(normalize_image_to_png(&[]).is_err());
        assert!(normalize_image_to_png(b"This is not an image.").is_err());
    }

    #[tokio::test]
    async fn upload_failure_keeps_original_url() {
        let artifacts = ArtifactStore::new(
            Box::new(StaticDownloader(sample_image(image::ImageFormat::Png))),
            Box::new(FailingStore),
            "2025_S3_v1".parse::<SeasonId>().expect("valid season"),
        );
        let original = Url::parse("https://cdn.example.com/generated/1.png").expect("url");
        assert_eq!(artifacts.store(&original, 1).await, original.to_string());
    }

    #[tokio::test]
    async fn undecodable_download_keeps_original_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let artifacts = ArtifactStore::new(
            Box::new(StaticDownloader(b"<html>rate limited</html>".to_vec())),
            Box::new(FsObjectStore::new(dir.path(), None).expect("fs store")),
            "2025_S3_v1".parse::<SeasonId>().expect("valid season"),
        );
        let original = Url::parse("https://cdn.example.com/generated/2.png").expect("url");
        assert_eq!(artifacts.store(&original, 2).await, original.to_string());
    }

    #[tokio::test]
    async fn fs_store_writes_under_season_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let public = Url::parse("https://cards.example.com/assets/").expect("url");
        let artifacts = ArtifactStore::new(
            Box::new(StaticDownloader(sample_image(image::ImageFormat::Jpeg))),
            Box::new(FsObjectStore::new(dir.path(), Some(public)).expect("fs store")),
            "2025_S3_v1".parse::<SeasonId>().expect("valid season"),
        );
        let original = Url::parse("https://cdn.example.com/generated/7.jpg").expect("url");
        let stored = artifacts.store(&original, 7).await;
        assert_eq!(
            stored,
            "https://cards.example.com/assets/seasons/2025_S3_v1/cards/card_7.png"
        );

        let written = std::fs::read(dir.path().join("seasons/2025_S3_v1/cards/card_7.png"))
            .expect("file written");
        assert_eq!(
            image::guess_format(&written).expect("guess format"),
            image::ImageFormat::Png
        );
    }

    #[tokio::test]
    async fn webp_download_is_stored_as_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let artifacts = ArtifactStore::new(
            Box::new(StaticDownloader(sample_image(image::ImageFormat::WebP))),
            Box::new(FsObjectStore::new(dir.path(), None).expect("fs store")),
            "2025_S3_v1".parse::<SeasonId>().expect("valid season"),
        );
        let original = Url::parse("https://cdn.example.com/generated/3.webp").expect("url");
        let stored = artifacts.store(&original, 3).await;
        assert_ne!(stored, original.to_string());
        assert!(stored.ends_with("seasons/2025_S3_v1/cards/card_3.png"));

        let written = std::fs::read(dir.path().join("seasons/2025_S3_v1/cards/card_3.png"))
            .expect("file written");
        assert_eq!(
            image::guess_format(&written).expect("guess format"),
            image::ImageFormat::Png
        );
    }

    #[tokio::test]
    async fn fs_store_refuses_paths_leaving_the_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("storage");
        let store = FsObjectStore::new(&root, None).expect("fs store");
        for path in [
            "seasons/../../../escaped/cards/card_0.png",
            "/tmp/card_0.png",
            "./seasons/card_0.png",
        ] {
            let result = store.put(path, vec![1, 2, 3], PNG_CONTENT_TYPE).await;
            assert!(
                matches!(result, Err(StoreError::InvalidPath(ref refused)) if refused == path),
                "{path} should be refused"
            );
        }
        assert!(!dir.path().join("escaped").exists());
        assert_eq!(std::fs::read_dir(&root).expect("read root").count(), 0);
    }

    #[tokio::test]
    async fn fs_store_without_public_url_returns_file_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsObjectStore::new(dir.path(), None).expect("fs store");
        let url = store
            .put("seasons/s/cards/card_0.png", vec![1, 2, 3], PNG_CONTENT_TYPE)
            .await
            .expect("put");
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("seasons/s/cards/card_0.png"));
    }
}
