#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartRun { format: crate::ExportFormat },
    StopRun,
    ExportAccumulated { format: crate::ExportFormat },
}
