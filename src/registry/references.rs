//! `${Name}` placeholders embedded in variable values.
//!
//! Placeholders are opaque to the registry: they are written out verbatim and
//! expanded later by the build-rule writer. This module only finds them.

use std::sync::LazyLock;

use regex::Regex;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("reference pattern is valid")
});

/// Format a placeholder for `name`.
pub fn reference(name: &str) -> String {
    format!("${{{}}}", name)
}

/// Names referenced by `${...}` placeholders in `value`, in order of appearance.
pub fn references(value: &str) -> Vec<&str> {
    REFERENCE
        .captures_iter(value)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        assert_eq!(reference("ClangBase"), "${ClangBase}");
    }

    #[test]
    fn test_references_in_order() {
        let value = "${ClangBase}/${HostPrebuiltTag}/${ClangVersion}";
        assert_eq!(
            references(value),
            vec!["ClangBase", "HostPrebuiltTag", "ClangVersion"]
        );
    }

    #[test]
    fn test_no_references() {
        assert!(references("-DANDROID -O2").is_empty());
        assert!(references("$ClangBase ${} ${1abc}").is_empty());
    }
}
