//! Line commands typed into the control console.

use tablescrape_core::{ExportFormat, Msg};

pub(crate) const HELP: &str = "commands: start [csv|json], stop, export [csv|json], status, logs, help, quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Start(Option<ExportFormat>),
    Stop,
    Export(Option<ExportFormat>),
    Status,
    Logs,
    Help,
    Quit,
}

impl Command {
    pub(crate) fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let format = words
            .next()
            .map(|word| word.parse::<ExportFormat>().map_err(|err| err.to_string()))
            .transpose()?;
        if let Some(extra) = words.next() {
            return Err(format!("unexpected argument `{extra}`"));
        }

        let command = match verb.as_str() {
            "start" => Command::Start(format),
            "export" => Command::Export(format),
            _ if format.is_some() => return Err(format!("`{verb}` takes no arguments")),
            "stop" => Command::Stop,
            "status" => Command::Status,
            "logs" => Command::Logs,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => return Err("empty command".to_string()),
            other => return Err(format!("unknown command `{other}`")),
        };
        Ok(command)
    }

    /// Panel messages for commands the reducer handles.
    pub(crate) fn into_msgs(self) -> Vec<Msg> {
        let with_format = |format: Option<ExportFormat>, msg: Msg| -> Vec<Msg> {
            format
                .map(Msg::FormatSelected)
                .into_iter()
                .chain(std::iter::once(msg))
                .collect()
        };
        match self {
            Command::Start(format) => with_format(format, Msg::StartClicked),
            Command::Export(format) => with_format(format, Msg::ExportClicked),
            Command::Stop => vec![Msg::StopClicked],
            Command::Status | Command::Logs | Command::Help | Command::Quit => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_optional_format() {
        assert_eq!(Command::parse("start"), Ok(Command::Start(None)));
        assert_eq!(
            Command::parse("  START json "),
            Ok(Command::Start(Some(ExportFormat::Json)))
        );
        assert_eq!(
            Command::parse("export csv"),
            Ok(Command::Export(Some(ExportFormat::Csv)))
        );
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("start xml").is_err());
        assert!(Command::parse("stop now").is_err());
        assert!(Command::parse("export csv please").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[test]
    fn format_is_selected_before_the_action() {
        assert_eq!(
            Command::Start(Some(ExportFormat::Csv)).into_msgs(),
            vec![Msg::FormatSelected(ExportFormat::Csv), Msg::StartClicked]
        );
        assert_eq!(Command::Stop.into_msgs(), vec![Msg::StopClicked]);
        assert!(Command::Status.into_msgs().is_empty());
    }
}
