//! Terminal rendering for search results and backend listings.

use owo_colors::OwoColorize;
use supports_color::Stream;

use oneinstall_core::search::PackageHit;

const DESCRIPTION_MAX: usize = 50;

/// Render ranked hits as an aligned table, capped at `limit` rows.
pub fn render_search_results(hits: &[PackageHit], limit: usize) {
    if hits.is_empty() {
        println!("No packages found.");
        return;
    }

    let color = supports_color::on_cached(Stream::Stdout).is_some();
    let shown = hits.iter().take(limit);

    let name_width = column_width("Package", hits.iter().take(limit).map(|h| h.name.len()));
    let version_width = column_width(
        "Version",
        hits.iter()
            .take(limit)
            .map(|h| h.version.as_deref().unwrap_or("-").len()),
    );
    let source_width = column_width("Source", hits.iter().take(limit).map(|h| h.source.len()));

    println!(
        "{:<name_width$}  {:<version_width$}  {:<source_width$}  Description",
        "Package", "Version", "Source"
    );

    for hit in shown {
        let version = hit.version.as_deref().unwrap_or("-");
        let description = truncate(hit.description.as_deref().unwrap_or("-"), DESCRIPTION_MAX);
        let source_cell = format!("{:<source_width$}", hit.source);
        println!(
            "{:<name_width$}  {:<version_width$}  {}  {}",
            hit.name,
            version,
            paint_source(&source_cell, &hit.source, color),
            description
        );
    }

    if hits.len() > limit {
        println!(
            "\nShowing {limit} of {} results. Use --limit to see more.",
            hits.len()
        );
    }
}

pub fn render_backends(names: &[&str]) {
    if names.is_empty() {
        println!("No package managers available on this system.");
        return;
    }
    println!("Available backends on this system:\n");
    let color = supports_color::on_cached(Stream::Stdout).is_some();
    for name in names {
        println!("  - {}", paint_source(name, name, color));
    }
    println!();
}

fn column_width(header: &str, cells: impl Iterator<Item = usize>) -> usize {
    cells.fold(header.len(), usize::max)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

fn paint_source(cell: &str, source: &str, color: bool) -> String {
    if !color {
        return cell.to_string();
    }
    match source {
        "apt" => cell.green().to_string(),
        "winget" => cell.cyan().to_string(),
        "brew" => cell.yellow().to_string(),
        "npm" => cell.red().to_string(),
        "pip" | "pipx" => cell.blue().to_string(),
        "snap" => cell.magenta().to_string(),
        _ => cell.to_string(),
    }
}
