use engine_logging::{engine_debug, engine_warn};
use scraper::{ElementRef, Html, Selector};
use tablescrape_core::{RunState, Row, ScrapeConfig};

use crate::{ReadError, SelectorError};

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|err| SelectorError {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

/// Reads table content from document snapshots. Holds no run state.
#[derive(Debug, Clone)]
pub struct PageReader {
    table_source: String,
    table: Selector,
    loading: Selector,
}

struct TableLayout<'a> {
    header: Vec<String>,
    body: Vec<ElementRef<'a>>,
}

impl PageReader {
    pub fn new(config: &ScrapeConfig) -> Result<Self, SelectorError> {
        Ok(Self {
            table_source: config.table_selector.clone(),
            table: parse_selector(&config.table_selector)?,
            loading: parse_selector(&config.loading_selector)?,
        })
    }

    /// True when the table exists, has a data row, and no loading indicator is visible.
    pub fn is_data_loaded(&self, html: &str) -> bool {
        let doc = Html::parse_document(html);
        let Some(table) = doc.select(&self.table).next() else {
            engine_warn!("No table found");
            return false;
        };
        let layout = self.layout(table);
        if layout.body.is_empty() {
            engine_warn!("No table rows found");
            return false;
        }
        if doc.select(&self.loading).any(|el| !is_hidden(el)) {
            engine_debug!("Data still loading...");
            return false;
        }
        engine_debug!("Data loaded: {} rows found", layout.body.len());
        true
    }

    /// Extracts the unique, non-blank rows of the table.
    ///
    /// Column names are pinned into `run` on the first read; later pages map
    /// cells onto them by position. Duplicates are counted in `run` and left
    /// out of the result.
    pub fn extract_rows(&self, html: &str, run: &mut RunState) -> Result<Vec<Row>, ReadError> {
        let doc = Html::parse_document(html);
        let table = doc
            .select(&self.table)
            .next()
            .ok_or_else(|| ReadError::NoTableFound {
                selector: self.table_source.clone(),
            })?;
        let layout = self.layout(table);

        let body: Vec<Vec<String>> = layout.body.iter().map(|row| row_values(*row)).collect();
        if run.columns().is_none() {
            let width = body.iter().map(Vec::len).max().unwrap_or(0);
            run.pin_columns(column_names(&layout.header, width));
        }
        let columns = run.columns().map(<[String]>::to_vec).unwrap_or_default();

        let page = run.current_page();
        let mut rows = Vec::new();
        for (index, values) in body.into_iter().enumerate() {
            if values.iter().all(String::is_empty) {
                continue;
            }
            let row = Row::from_pairs(
                columns
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), values.get(i).cloned().unwrap_or_default())),
            );
            if run.is_duplicate(&row) {
                engine_warn!("Duplicate row found on page {}, row {}", page, index + 1);
                continue;
            }
            rows.push(row);
        }
        engine_debug!("Extracted {} unique rows from page {}", rows.len(), page);
        Ok(rows)
    }

    /// Header from `<thead>` when present, otherwise from the first row.
    fn layout<'a>(&self, table: ElementRef<'a>) -> TableLayout<'a> {
        let rows = own_rows(table);
        let mut body = rows
            .iter()
            .filter(|(section, _)| *section == Section::Body)
            .map(|(_, row)| *row);
        let header = if has_child(table, "thead") {
            rows.iter()
                .find(|(section, _)| *section == Section::Head)
                .map(|(_, row)| header_texts(*row))
                .unwrap_or_default()
        } else {
            body.next().map(header_texts).unwrap_or_default()
        };
        TableLayout {
            header,
            body: body.collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Head,
    Body,
    Foot,
}

/// Rows that belong to `table` itself, tagged by section. Rows of tables
/// nested inside cells are not included.
fn own_rows(table: ElementRef<'_>) -> Vec<(Section, ElementRef<'_>)> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        let section = match child.value().name() {
            "tr" => {
                rows.push((Section::Body, child));
                continue;
            }
            "thead" => Section::Head,
            "tbody" => Section::Body,
            "tfoot" => Section::Foot,
            _ => continue,
        };
        rows.extend(
            child
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|row| row.value().name() == "tr")
                .map(|row| (section, row)),
        );
    }
    rows
}

fn cells(row: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
}

fn header_texts(row: ElementRef<'_>) -> Vec<String> {
    cells(row).map(text_of).collect()
}

fn row_values(row: ElementRef<'_>) -> Vec<String> {
    cells(row).map(cell_value).collect()
}

/// `data-value`, then `title`, then trimmed text.
fn cell_value(cell: ElementRef<'_>) -> String {
    non_empty_attr(cell, "data-value")
        .or_else(|| non_empty_attr(cell, "title"))
        .map(str::to_string)
        .unwrap_or_else(|| text_of(cell))
}

fn non_empty_attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name).filter(|value| !value.is_empty())
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Blank header cells become `Column_N` (1-based); rows wider than the
/// header get synthesized names for the extra positions.
fn column_names(header: &[String], width: usize) -> Vec<String> {
    (0..header.len().max(width))
        .map(|i| match header.get(i) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Column_{}", i + 1),
        })
        .collect()
}

fn has_child(el: ElementRef<'_>, name: &str) -> bool {
    el.children()
        .filter_map(ElementRef::wrap)
        .any(|child| child.value().name() == name)
}

fn is_hidden(el: ElementRef<'_>) -> bool {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .any(|node| {
            let value = node.value();
            if value.attr("hidden").is_some() || value.attr("aria-hidden") == Some("true") {
                return true;
            }
            value.attr("style").is_some_and(|style| {
                let style: String = style
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_ascii_lowercase();
                style.contains("display:none") || style.contains("visibility:hidden")
            })
        })
}
