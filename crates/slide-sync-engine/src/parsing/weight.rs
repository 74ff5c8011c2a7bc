use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Base names of section index documents. These always sort first.
pub const INDEX_FILE_NAMES: [&str; 2] = ["_index.md", "index.md"];

/// Weight given to index documents, below any declared weight.
pub const INDEX_WEIGHT: i64 = -1;

/// Weight given to documents that declare none, above any plausible declared weight.
pub const UNDECLARED_WEIGHT: i64 = 1_000_000;

fn weight_regex() -> &'static Regex {
    static WEIGHT_REGEX: OnceLock<Regex> = OnceLock::new();
    WEIGHT_REGEX.get_or_init(|| {
        Regex::new(r#"(?m)^\s*"?weight"?\s*[:=]\s*([0-9]+),?\s*$"#).expect("Invalid weight regex")
    })
}

/// Whether `path` names a section index document.
pub fn is_index_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| INDEX_FILE_NAMES.contains(&name))
}

/// Resolve the ordering key of a document.
///
/// Index documents get [`INDEX_WEIGHT`]. Otherwise the first `weight: N`,
/// `weight = N` or `"weight": N,` line wins, and documents without one get
/// [`UNDECLARED_WEIGHT`].
pub fn resolve_weight(path: &Path, text: &str) -> i64 {
    if is_index_file(path) {
        return INDEX_WEIGHT;
    }

    weight_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(UNDECLARED_WEIGHT, |value| {
            value.as_str().parse().unwrap_or(i64::MAX)
        })
}
