use std::path::Path;

use nickdl::errors::*;
use nickdl::models::Region;

const BUNDLED_REGIONS: &str = include_str!("../regions.json");

/// loads the region list from `path`, or the bundled list when none is given.
pub fn load_regions(path: Option<&Path>) -> Result<Vec<Region>> {
    let (raw, source) = match path {
        Some(path) => (
            std::fs::read_to_string(path).map_err(|err| {
                NickError::Message(format!("failed to read {}: {err}", path.display()))
            })?,
            path.display().to_string(),
        ),
        None => (BUNDLED_REGIONS.to_string(), "bundled regions".to_string()),
    };

    let regions: Vec<Region> = serde_json::from_str(&raw).map_err(|source_err| NickError::Json {
        context: format!("reading {source}"),
        source: source_err,
    })?;

    if regions.is_empty() {
        return Err(NickError::Message(format!("{source} lists no regions")));
    }

    Ok(regions)
}

/// finds a region by display name or locale, ignoring case.
pub fn find_region<'a>(regions: &'a [Region], query: &str) -> Option<&'a Region> {
    let query = query.trim();
    regions
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(query) || r.locale.eq_ignore_ascii_case(query))
}
