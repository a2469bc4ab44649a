use std::path::PathBuf;

use clap::Parser;
use tablescrape_core::ExportFormat;

#[derive(Debug, Parser)]
#[command(name = "tablescrape")]
#[command(about = "Scrape paginated HTML tables into CSV or JSON")]
#[command(version)]
pub struct Cli {
    /// Settings file (RON)
    #[arg(short, long, default_value = "tablescrape.ron")]
    pub settings: PathBuf,

    /// Start page, fetched over HTTP; next-page links are followed
    #[arg(long, conflicts_with = "pages")]
    pub url: Option<String>,

    /// Saved HTML pages, visited in the given order
    #[arg(long, num_args = 1..)]
    pub pages: Vec<PathBuf>,

    /// Directory receiving exported files
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Export format, overriding the settings default
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Also write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Write the default settings to the settings path and exit
    #[arg(long)]
    pub write_settings: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_page_list_and_format() {
        let cli = Cli::try_parse_from([
            "tablescrape",
            "--pages",
            "one.html",
            "two.html",
            "--format",
            "CSV",
        ])
        .unwrap();
        assert_eq!(cli.pages.len(), 2);
        assert_eq!(cli.format, Some(ExportFormat::Csv));
        assert_eq!(cli.output, PathBuf::from("output"));
    }

    #[test]
    fn url_and_pages_conflict() {
        assert!(Cli::try_parse_from([
            "tablescrape",
            "--url",
            "https://example.com",
            "--pages",
            "one.html",
        ])
        .is_err());
    }
}
