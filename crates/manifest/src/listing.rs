//! Plain-text listings, one reference per line

use vsixget_types::ExtensionRef;

use crate::{ReferenceSet, SkippedEntry};

/// Parse a text listing
///
/// Blank lines and `#` comments are ignored. A line that fails the inline
/// grammar is skipped and recorded rather than aborting the listing.
#[must_use]
pub fn parse_listing(source: &str, content: &str) -> ReferenceSet {
    let mut set = ReferenceSet::default();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<ExtensionRef>() {
            Ok(reference) => set.references.push(reference),
            Err(error) => {
                tracing::debug!(source, line = index + 1, %error, "skipping listing line");
                set.skipped.push(SkippedEntry {
                    source: source.to_string(),
                    position: index + 1,
                    error,
                });
            }
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_extensions_output() {
        let content = "# exported\nms-python.python@2024.1.0\n\n  acme.widget  \nbroken\n";
        let set = parse_listing("exts.txt", content);
        assert_eq!(set.references.len(), 2);
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].position, 5);
    }
}
