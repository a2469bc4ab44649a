use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use scraper::{ElementRef, Html, Selector};
use tablescrape_core::{NextControlSpec, RunState, ScrapeConfig};

use crate::reader::parse_selector;
use crate::surface::{NextControl, PageSurface};
use crate::{SelectorError, SurfaceError};

/// Decides whether a pagination candidate is the "next page" control.
pub trait NextControlMatcher: Send + Sync {
    fn matches(&self, control: ElementRef<'_>) -> bool;
}

/// Matches controls whose icon path data contains a fragment.
pub struct SvgPathMatcher {
    fragment: String,
    path: Selector,
}

impl SvgPathMatcher {
    pub fn new(fragment: impl Into<String>) -> Result<Self, SelectorError> {
        Ok(Self {
            fragment: fragment.into(),
            path: parse_selector("svg path")?,
        })
    }
}

impl NextControlMatcher for SvgPathMatcher {
    fn matches(&self, control: ElementRef<'_>) -> bool {
        control
            .select(&self.path)
            .next()
            .and_then(|path| path.value().attr("d"))
            .is_some_and(|d| d.contains(&self.fragment))
    }
}

/// Matches controls carrying an exact attribute value, e.g. `aria-label="Next"`.
pub struct AttributeMatcher {
    name: String,
    value: String,
}

impl AttributeMatcher {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl NextControlMatcher for AttributeMatcher {
    fn matches(&self, control: ElementRef<'_>) -> bool {
        control.value().attr(&self.name) == Some(self.value.as_str())
    }
}

/// Matches controls by visible text, ignoring case and surrounding whitespace.
pub struct TextMatcher {
    text: String,
}

impl TextMatcher {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
        }
    }
}

impl NextControlMatcher for TextMatcher {
    fn matches(&self, control: ElementRef<'_>) -> bool {
        control_text(control).eq_ignore_ascii_case(&self.text)
    }
}

pub fn matcher_for(spec: &NextControlSpec) -> Result<Box<dyn NextControlMatcher>, SelectorError> {
    Ok(match spec {
        NextControlSpec::SvgPath { fragment } => Box::new(SvgPathMatcher::new(fragment.clone())?),
        NextControlSpec::Attribute { name, value } => {
            Box::new(AttributeMatcher::new(name.clone(), value.clone()))
        }
        NextControlSpec::Text { text } => Box::new(TextMatcher::new(text.clone())),
    })
}

/// Finds and activates the next-page control. Holds no run state.
pub struct PaginationDriver {
    region: Selector,
    candidates: Selector,
    matcher: Box<dyn NextControlMatcher>,
    wait_window: (u64, u64),
}

impl PaginationDriver {
    pub fn new(config: &ScrapeConfig) -> Result<Self, SelectorError> {
        Self::with_matcher(config, matcher_for(&config.next_control)?)
    }

    pub fn with_matcher(
        config: &ScrapeConfig,
        matcher: Box<dyn NextControlMatcher>,
    ) -> Result<Self, SelectorError> {
        Ok(Self {
            region: parse_selector(&config.pagination_selector)?,
            candidates: parse_selector(&config.control_selector)?,
            matcher,
            wait_window: config.wait_window(),
        })
    }

    /// First enabled candidate in the pagination region accepted by the matcher.
    pub fn find_next_control(&self, html: &str) -> Option<NextControl> {
        let doc = Html::parse_document(html);
        let region = doc.select(&self.region).next()?;
        region
            .select(&self.candidates)
            .filter(|control| !is_disabled(*control))
            .find(|control| self.matcher.matches(*control))
            .map(|control| NextControl {
                href: control
                    .value()
                    .attr("href")
                    .or_else(|| control.value().attr("data-href"))
                    .map(str::to_string),
                label: control_label(control),
            })
    }

    pub fn has_next_page(&self, html: &str) -> bool {
        self.find_next_control(html).is_some()
    }

    /// Moves to the next page when a control is available.
    ///
    /// Returns `Ok(false)` when pagination is exhausted. After activation the
    /// page counter is bumped and a jittered delay elapses; readiness of the
    /// new page is not confirmed here.
    pub async fn advance(
        &self,
        surface: &dyn PageSurface,
        run: &mut RunState,
    ) -> Result<bool, SurfaceError> {
        let html = surface.snapshot().await?;
        match self.find_next_control(&html) {
            Some(control) => {
                self.activate(surface, &control, run).await?;
                Ok(true)
            }
            None => {
                engine_info!("No next page available");
                Ok(false)
            }
        }
    }

    pub(crate) async fn activate(
        &self,
        surface: &dyn PageSurface,
        control: &NextControl,
        run: &mut RunState,
    ) -> Result<(), SurfaceError> {
        surface.activate(control).await?;
        run.next_page();
        engine_info!("Navigating to page {}", run.current_page());
        let wait = self.jitter();
        engine_debug!("Waiting {}ms for page to load...", wait.as_millis());
        tokio::time::sleep(wait).await;
        Ok(())
    }

    fn jitter(&self) -> Duration {
        let (min, max) = self.wait_window;
        Duration::from_millis(fastrand::u64(min..=max))
    }
}

fn is_disabled(control: ElementRef<'_>) -> bool {
    let value = control.value();
    value.attr("disabled").is_some()
        || value.attr("aria-disabled") == Some("true")
        || value.classes().any(|class| class == "disabled")
}

fn control_text(control: ElementRef<'_>) -> String {
    control.text().collect::<String>().trim().to_string()
}

fn control_label(control: ElementRef<'_>) -> String {
    let text = control_text(control);
    if !text.is_empty() {
        return text;
    }
    control
        .value()
        .attr("aria-label")
        .or_else(|| control.value().attr("title"))
        .unwrap_or("next")
        .to_string()
}
