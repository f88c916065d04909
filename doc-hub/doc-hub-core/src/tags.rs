//! Tag list editing. Tags behave as an order-preserving set.

/// Append `tag` unless it is blank or already present.
pub fn add(tags: &[String], tag: &str) -> Vec<String> {
    let mut out = tags.to_vec();
    let tag = tag.trim();
    if tag.is_empty() || out.iter().any(|t| t == tag) {
        return out;
    }
    out.push(tag.to_string());
    out
}

pub fn remove(tags: &[String], tag: &str) -> Vec<String> {
    tags.iter().filter(|t| *t != tag).cloned().collect()
}

/// Rename `from` in place. Renaming onto a tag that already exists drops
/// the old entry instead of duplicating.
pub fn rename(tags: &[String], from: &str, to: &str) -> Vec<String> {
    let to = to.trim();
    if to.is_empty() || to == from || !tags.iter().any(|t| t == from) {
        return tags.to_vec();
    }
    if tags.iter().any(|t| t == to) {
        return remove(tags, from);
    }
    tags.iter()
        .map(|t| if t == from { to.to_string() } else { t.clone() })
        .collect()
}
