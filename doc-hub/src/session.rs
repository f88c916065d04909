//! Session files and plain-text rendering for the command line driver.

use anyhow::{Context, Result};
use doc_hub_core::highlight::TextLayer;
use doc_hub_core::hub::Session;
use doc_hub_core::tree::{SkipReason, SkippedFolder, TreeRow};
use std::fmt::Write as _;
use std::path::Path;

/// Read a session file. A missing file yields the default seed.
pub fn load(path: Option<&Path>) -> Result<Session> {
    let Some(path) = path else {
        return Ok(Session::seed());
    };
    if !path.exists() {
        tracing::info!(path = %path.display(), "no session file, starting from seed");
        return Ok(Session::seed());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid session {}", path.display()))
}

pub fn save(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write session {}", path.display()))?;
    Ok(())
}

pub fn load_layer(path: &Path) -> Result<TextLayer> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read text layer {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid text layer {}", path.display()))
}

/// One line per row, indented two spaces per level.
///
/// Folders show `+` when collapsible content is hidden, `-` when it is
/// shown, and a `*` suffix when selected.
pub fn render_rows(rows: &[TreeRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let indent = "  ".repeat(row.depth());
        match row {
            TreeRow::Folder {
                name,
                expanded,
                selected,
                has_toggle,
                ..
            } => {
                let marker = match (has_toggle, expanded) {
                    (false, _) => ' ',
                    (true, true) => '-',
                    (true, false) => '+',
                };
                let _ = writeln!(
                    out,
                    "{indent}{marker} {name}/{}",
                    if *selected { " *" } else { "" }
                );
            }
            TreeRow::Document { title, .. } => {
                let _ = writeln!(out, "{indent}  {title}");
            }
        }
    }
    out
}

pub fn render_skipped(skipped: &[SkippedFolder]) -> String {
    let mut out = String::new();
    for s in skipped {
        let reason = match s.reason {
            SkipReason::Cycle => "parent cycle",
            SkipReason::MissingParent => "missing parent",
        };
        let _ = writeln!(out, "skipped {} ({}): {}", s.name, s.id, reason);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_hub_core::blob::InMemoryStorage;
    use doc_hub_core::config::HubConfig;
    use doc_hub_core::hub::DocumentHub;
    use std::sync::Arc;

    #[test]
    fn missing_file_is_seed() {
        let dir = tempfile::tempdir().unwrap();
        let session = load(Some(&dir.path().join("none.json"))).unwrap();
        let names: Vec<_> = session.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Documents", "Images", "Reports"]);
        assert!(session.documents.is_empty());
    }

    #[test]
    fn renders_indented_rows() {
        let mut hub =
            DocumentHub::from_session(HubConfig::default(), Arc::new(InMemoryStorage::new()), Session::seed());
        hub.expand_all();
        let documents = hub.folders().iter().next().unwrap().id;
        hub.select_folder(documents);
        assert_eq!(
            render_rows(&hub.rows()),
            "- Documents/ *\n    Reports/\n  Images/\n"
        );
    }
}
