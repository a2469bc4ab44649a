#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked an export format in the panel.
    FormatSelected(crate::ExportFormat),
    /// User clicked Start.
    StartClicked,
    /// User clicked Stop.
    StopClicked,
    /// User asked to export what the last run collected.
    ExportClicked,
    /// Event relayed from the extraction engine.
    Engine(crate::ScraperEvent),
    /// Render tick to coalesce redraws.
    Tick,
}
