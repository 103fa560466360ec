use super::fetcher::{ImageData, ImageFetcher};
use crate::logger;
use crate::models::settings::CommonAssets;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tokio::task::JoinSet;

/// A usable image: either the fetched bytes or a 1x1 stand-in after a failed load.
#[derive(Debug, PartialEq)]
pub enum Texture {
    Image(ImageData),
    Placeholder { url: String },
}

impl Texture {
    pub fn url(&self) -> &str {
        match self {
            Texture::Image(image) => &image.url,
            Texture::Placeholder { url } => url,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Texture::Placeholder { .. })
    }

    /// Intrinsic size, known only for the placeholder.
    pub fn placeholder_size(&self) -> Option<(u32, u32)> {
        match self {
            Texture::Placeholder { .. } => Some((1, 1)),
            Texture::Image(_) => None,
        }
    }
}

pub type TextureHandle = Arc<Texture>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Pending,
    Loaded,
    FailedWithPlaceholder,
}

/// URL-keyed image registry. Each distinct URL is fetched at most once for the
/// lifetime of the cache; concurrent requests for a pending URL wait on the same
/// load. Entries are never evicted.
pub struct AssetCache<F> {
    fetcher: F,
    entries: RwLock<HashMap<String, Arc<OnceCell<TextureHandle>>>>,
}

impl<F: ImageFetcher> AssetCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn entry(&self, url: &str) -> Arc<OnceCell<TextureHandle>> {
        if let Some(cell) = self.entries.read().await.get(url) {
            return Arc::clone(cell);
        }

        let mut entries = self.entries.write().await;
        let cell = entries
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()));
        Arc::clone(cell)
    }

    /// Resolves `url` to a texture. Never fails: a failed load settles to the placeholder.
    pub async fn resolve(&self, url: &str) -> TextureHandle {
        let cell = self.entry(url).await;
        let texture = cell.get_or_init(|| self.load(url)).await;
        Arc::clone(texture)
    }

    async fn load(&self, url: &str) -> TextureHandle {
        logger!(DEBUG, "[ASSETS] Loading `{url}`");
        match self.fetcher.fetch(url).await {
            Ok(image) => Arc::new(Texture::Image(image)),
            Err(error) => {
                logger!(WARN, "[ASSETS] Using placeholder for `{url}` ({error})");
                Arc::new(Texture::Placeholder {
                    url: url.to_string(),
                })
            }
        }
    }

    /// Returns the settled texture for `url` without starting a load.
    pub async fn cached(&self, url: &str) -> Option<TextureHandle> {
        let entries = self.entries.read().await;
        entries.get(url).and_then(|cell| cell.get().cloned())
    }

    pub async fn state(&self, url: &str) -> Option<EntryState> {
        let entries = self.entries.read().await;
        let cell = entries.get(url)?;
        Some(match cell.get() {
            None => EntryState::Pending,
            Some(texture) if texture.is_placeholder() => EntryState::FailedWithPlaceholder,
            Some(_) => EntryState::Loaded,
        })
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Resolves the well-known table assets. Returns once all of them have settled.
    pub async fn preload_common(&self, assets: &CommonAssets) -> [TextureHandle; 3] {
        let (mat, default_card, card_back) = tokio::join!(
            self.resolve(&assets.mat),
            self.resolve(&assets.default_card),
            self.resolve(&assets.card_back),
        );

        let failed = [&mat, &default_card, &card_back]
            .iter()
            .filter(|texture| texture.is_placeholder())
            .count();
        logger!(INFO, "[ASSETS] Common assets settled ({failed} placeholder)");

        [mat, default_card, card_back]
    }
}

impl<F: ImageFetcher + 'static> AssetCache<F> {
    /// Resolves a batch of URLs concurrently and returns them keyed by URL.
    pub async fn resolve_all(self: &Arc<Self>, urls: &[String]) -> HashMap<String, TextureHandle> {
        let mut tasks = JoinSet::new();
        for url in urls {
            let cache = Arc::clone(self);
            let url = url.clone();
            tasks.spawn(async move {
                let texture = cache.resolve(&url).await;
                (url, texture)
            });
        }

        let mut resolved = HashMap::with_capacity(urls.len());
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok((url, texture)) => {
                    resolved.insert(url, texture);
                }
                Err(error) => logger!(ERROR, "[ASSETS] Image task failed ({error})"),
            }
        }
        resolved
    }
}
