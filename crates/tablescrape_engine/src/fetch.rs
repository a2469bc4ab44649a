use std::sync::Mutex;
use std::time::Duration;

use engine_logging::engine_debug;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::decode::decode_page;
use crate::surface::{NextControl, PageSurface};
use crate::SurfaceError;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

/// Server-rendered pages fetched over HTTP. Every snapshot re-fetches the
/// current URL; activating a control follows its link.
pub struct HttpPageSurface {
    client: reqwest::Client,
    settings: FetchSettings,
    current: Mutex<Url>,
}

impl HttpPageSurface {
    pub fn new(start_url: &str, settings: FetchSettings) -> Result<Self, SurfaceError> {
        let url = Url::parse(start_url).map_err(|err| SurfaceError::InvalidUrl(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| SurfaceError::Network(err.to_string()))?;
        Ok(Self {
            client,
            settings,
            current: Mutex::new(url),
        })
    }

    fn current_url(&self) -> Result<Url, SurfaceError> {
        self.current
            .lock()
            .map(|url| url.clone())
            .map_err(|_| SurfaceError::NavigationFailed("url state poisoned".into()))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let essence = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    }

    async fn fetch(&self, url: Url) -> Result<String, SurfaceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SurfaceError::HttpStatus(status.as_u16()));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(len) = response.content_length().filter(|len| *len > max_bytes) {
            return Err(SurfaceError::TooLarge {
                max_bytes,
                actual: Some(len),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(SurfaceError::UnsupportedContentType(ct.to_string()));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = (body.len() + chunk.len()) as u64;
            if next_len > max_bytes {
                return Err(SurfaceError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            body.extend_from_slice(&chunk);
        }

        let decoded = decode_page(&body, content_type.as_deref())?;
        engine_debug!(
            "Fetched {} bytes ({})",
            body.len(),
            decoded.encoding
        );
        Ok(decoded.html)
    }
}

#[async_trait::async_trait]
impl PageSurface for HttpPageSurface {
    fn location(&self) -> String {
        self.current_url()
            .map(String::from)
            .unwrap_or_default()
    }

    async fn snapshot(&self) -> Result<String, SurfaceError> {
        let url = self.current_url()?;
        self.fetch(url).await
    }

    async fn activate(&self, control: &NextControl) -> Result<(), SurfaceError> {
        let href = control.href.as_deref().ok_or_else(|| {
            SurfaceError::NavigationFailed(format!("control `{}` has no link", control.label))
        })?;
        let next = self
            .current_url()?
            .join(href)
            .map_err(|err| SurfaceError::InvalidUrl(err.to_string()))?;
        let mut current = self
            .current
            .lock()
            .map_err(|_| SurfaceError::NavigationFailed("url state poisoned".into()))?;
        *current = next;
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SurfaceError {
    if err.is_timeout() {
        SurfaceError::Timeout
    } else {
        SurfaceError::Network(err.to_string())
    }
}
