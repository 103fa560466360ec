use crate::logger;
use crate::utils::errors::AssetError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::StatusCode;
use std::future::Future;

/// Raw bytes of a successfully fetched image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub url: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageData {
    /// The served content type, or one guessed from the URL's extension.
    pub fn mime_type(&self) -> &str {
        if let Some(content_type) = self.content_type.as_deref() {
            return content_type.split(';').next().unwrap_or(content_type).trim();
        }

        let path = self.url.split(['?', '#']).next().unwrap_or(&self.url);
        match path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
            Some(ext) if ext == "png" => "image/png",
            Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
            Some(ext) if ext == "gif" => "image/gif",
            Some(ext) if ext == "webp" => "image/webp",
            Some(ext) if ext == "svg" => "image/svg+xml",
            _ => "application/octet-stream",
        }
    }

    /// The image inlined as a `data:` URI, loadable without the server.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

/// Source of image bytes for the asset cache.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<ImageData, AssetError>> + Send;
}

/// Fetches images over HTTP. Relative URLs are resolved against `base_url`.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.base_url, url.trim_start_matches('/'))
        }
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<ImageData, AssetError> {
        let absolute = self.absolute_url(url);
        logger!(DEBUG, "[ASSETS] GET `{absolute}`");

        match self.client.get(&absolute).send().await {
            Err(error) => Err(AssetError::RequestFailed(error.to_string())),
            Ok(response) => match response.status() {
                StatusCode::OK => {
                    let content_type = response
                        .headers()
                        .get(reqwest::header::CONTENT_TYPE)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string);
                    let bytes = response
                        .bytes()
                        .await
                        .map_err(|e| AssetError::InvalidBody(e.to_string()))?;

                    Ok(ImageData {
                        url: url.to_string(),
                        content_type,
                        bytes: bytes.to_vec(),
                    })
                }
                status => Err(AssetError::UnexpectedStatus(url.to_string(), status.as_u16())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_prefers_served_content_type() {
        let served = ImageData {
            url: "/static/images/card_back".to_string(),
            content_type: Some("image/png; charset=binary".to_string()),
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
        };
        assert_eq!(served.data_uri(), "data:image/png;base64,iVBORw==");

        let guessed = ImageData {
            url: "/cards/sangan.JPG?v=2".to_string(),
            content_type: None,
            bytes: Vec::new(),
        };
        assert_eq!(guessed.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_relative_urls_join_the_base() {
        let fetcher = HttpFetcher::new("http://localhost:5000/");
        assert_eq!(
            fetcher.absolute_url("/static/images/card_back.png"),
            "http://localhost:5000/static/images/card_back.png"
        );
        assert_eq!(
            fetcher.absolute_url("https://cdn.example/x.png"),
            "https://cdn.example/x.png"
        );
    }
}
