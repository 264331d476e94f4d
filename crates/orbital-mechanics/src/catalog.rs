//! Element-set catalog files
//!
//! Reads and writes the three-line layout used by element-set distributors:
//! an optional name line followed by the two record lines.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tle::TleRecord;
use crate::{OrbitalError, Result};

/// One named object of a catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub record: TleRecord,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, record: TleRecord) -> Self {
        Self {
            name: name.into(),
            record,
        }
    }

    pub fn catalog_number(&self) -> u32 {
        self.record.catalog_number()
    }
}

fn is_record_line(line: &str, number: char) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(number) && chars.next() == Some(' ')
}

/// Parse catalog text into ordered entries
///
/// Blank lines are skipped. A record without a name line is named after its
/// catalog number. A leading `0 ` on a name line is dropped.
pub fn parse_catalog(text: &str) -> Result<Vec<CatalogEntry>> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    let mut entries = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let (line_no, first) = lines[i];

        let name = if is_record_line(first, '1') {
            None
        } else {
            i += 1;
            Some(first.strip_prefix("0 ").unwrap_or(first).trim().to_string())
        };

        let (l1_no, line1) = *lines.get(i).ok_or_else(|| {
            OrbitalError::InvalidTle(format!("line {line_no}: name without element lines"))
        })?;
        let (l2_no, line2) = *lines.get(i + 1).ok_or_else(|| {
            OrbitalError::InvalidTle(format!("line {l1_no}: missing second element line"))
        })?;

        if !is_record_line(line1, '1') || !is_record_line(line2, '2') {
            return Err(OrbitalError::InvalidTle(format!(
                "lines {l1_no}-{l2_no}: expected element lines 1 and 2"
            )));
        }

        let record = TleRecord::new(line1, line2)
            .map_err(|e| OrbitalError::InvalidTle(format!("lines {l1_no}-{l2_no}: {e}")))?;
        let name = name.unwrap_or_else(|| record.catalog_number().to_string());

        debug!("catalog entry {} ({})", name, record.catalog_number());
        entries.push(CatalogEntry::new(name, record));
        i += 2;
    }

    Ok(entries)
}

/// Format entries as `name`, `line1`, `line2` triples
pub fn format_catalog<'a>(entries: impl IntoIterator<Item = &'a CatalogEntry>) -> String {
    entries
        .into_iter()
        .map(|e| format!("{}\n{}\n{}", e.name, e.record.line1(), e.record.line2()))
        .collect::<Vec<_>>()
        .join("\n")
}
