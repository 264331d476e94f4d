//! File loading

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use orbital_mechanics::{parse_catalog, CatalogEntry};

use crate::{Result, ToolConfig, ToolError};

/// Load settings from a JSON file; missing fields keep their defaults
pub fn load_config(path: impl AsRef<Path>) -> Result<ToolConfig> {
    let path = path.as_ref();
    info!("Loading config from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: ToolConfig = serde_json::from_reader(reader)?;
    Ok(config)
}

/// Load a three-line element file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<CatalogEntry>> {
    let path = path.as_ref();
    info!("Loading catalog from {:?}", path);

    let text = fs::read_to_string(path)?;
    let catalog = parse_catalog(&text)?;
    if catalog.is_empty() {
        return Err(ToolError::EmptyCatalog);
    }

    info!("Loaded {} objects", catalog.len());
    Ok(catalog)
}

/// Entry named `name`, or the first entry when no name is given
pub fn select_entry(catalog: &[CatalogEntry], name: Option<&str>) -> Result<CatalogEntry> {
    match name {
        Some(name) => catalog
            .iter()
            .find(|e| e.name == name)
            .cloned()
            .ok_or_else(|| ToolError::UnknownObject(name.to_string())),
        None => catalog.first().cloned().ok_or(ToolError::EmptyCatalog),
    }
}
