// src/render.rs

use std::{fs, path::Path};
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::{LeaderboardError, Result};
use crate::process::Dataset;

/// Token in the template that gets swapped for the data assignment.
pub const PLACEHOLDER: &str = "/* __DATA_PLACEHOLDER__ */";

/// Substitute the dataset into `template` as `const DATA = {...};`.
pub fn render_page(dataset: &Dataset, template: &str) -> Result<String> {
    if !template.contains(PLACEHOLDER) {
        return Err(LeaderboardError::PlaceholderMissing(PLACEHOLDER.to_string()));
    }
    let data_line = format!("const DATA = {};", dataset.to_json()?);
    Ok(template.replace(PLACEHOLDER, &data_line))
}

fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(LeaderboardError::MissingInputFile(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Read the dataset and template from disk and write the final page.
/// Returns the number of bytes written.
#[instrument(level = "info", skip(config), fields(out = %config.html_path().display()))]
pub fn render_files(config: &Config) -> Result<usize> {
    let dataset = Dataset::from_json(&read_input(&config.data_path())?)?;
    let template = read_input(&config.template_path())?;

    let html = render_page(&dataset, &template)?;
    let out = config.html_path();
    fs::write(&out, &html)?;
    info!(path = %out.display(), bytes = html.len(), "generated page");
    Ok(html.len())
}
