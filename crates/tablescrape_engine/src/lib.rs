//! Tablescrape engine: page surfaces, table reading, pagination, the
//! extraction loop and export.
mod decode;
mod engine;
mod export;
mod extraction;
mod fetch;
mod filename;
mod pagination;
mod persist;
mod poll;
mod reader;
mod sink;
mod surface;
mod types;

pub use decode::{decode_page, DecodeError, DecodedPage};
pub use engine::EngineHandle;
pub use export::{to_csv, to_json, ExportMeta, Exporter};
pub use extraction::{ExtractionLoop, RunControl};
pub use fetch::{FetchSettings, HttpPageSurface};
pub use filename::export_filename;
pub use pagination::{
    matcher_for, AttributeMatcher, NextControlMatcher, PaginationDriver, SvgPathMatcher,
    TextMatcher,
};
pub use persist::{ensure_output_dir, ArtifactWriter, PersistError};
pub use poll::Poller;
pub use reader::PageReader;
pub use sink::{ChannelEventSink, CollectingSink, EventSink};
pub use surface::{NextControl, PageSurface, StaticPages};
pub use types::{
    ExportError, ReadError, RunError, RunReport, SelectorError, StartError, SurfaceError,
};
