use std::fs;
use std::path::Path;
use std::sync::Mutex;

use crate::SurfaceError;

/// A next-page control located in a document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextControl {
    /// Link target from `href` or `data-href`, when the control has one.
    pub href: Option<String>,
    pub label: String,
}

/// The live document the scraper inspects and navigates.
#[async_trait::async_trait]
pub trait PageSurface: Send + Sync {
    /// Where the current document came from; recorded as the export source.
    fn location(&self) -> String;

    /// HTML of the document as it is right now.
    async fn snapshot(&self) -> Result<String, SurfaceError>;

    /// Activates a control found in the latest snapshot.
    async fn activate(&self, control: &NextControl) -> Result<(), SurfaceError>;
}

/// Ordered in-memory documents; activating any next control moves to the
/// following one.
pub struct StaticPages {
    location: String,
    pages: Vec<String>,
    position: Mutex<usize>,
}

impl StaticPages {
    pub fn new(location: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            location: location.into(),
            pages,
            position: Mutex::new(0),
        }
    }

    /// Reads saved pages from disk, in the given order.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, SurfaceError> {
        let pages = paths
            .iter()
            .map(|path| fs::read_to_string(path))
            .collect::<Result<Vec<_>, _>>()?;
        let location = paths
            .first()
            .map(|path| path.as_ref().display().to_string())
            .unwrap_or_default();
        Ok(Self::new(location, pages))
    }

    pub fn position(&self) -> usize {
        self.position.lock().map(|guard| *guard).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl PageSurface for StaticPages {
    fn location(&self) -> String {
        self.location.clone()
    }

    async fn snapshot(&self) -> Result<String, SurfaceError> {
        self.pages
            .get(self.position())
            .cloned()
            .ok_or_else(|| SurfaceError::NavigationFailed("no pages loaded".into()))
    }

    async fn activate(&self, control: &NextControl) -> Result<(), SurfaceError> {
        let mut position = self
            .position
            .lock()
            .map_err(|_| SurfaceError::NavigationFailed("page cursor poisoned".into()))?;
        if *position + 1 >= self.pages.len() {
            return Err(SurfaceError::NavigationFailed(format!(
                "control `{}` leads past the last page",
                control.label
            )));
        }
        *position += 1;
        Ok(())
    }
}
