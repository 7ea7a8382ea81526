//! File-extension based language labels.

use std::path::Path;

/// Label shown in the file description.
///
/// Only Python is analyzed; other known extensions are named so the
/// description is honest about what the file claims to be.
pub fn language_label(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("py") | Some("pyw") | Some("pyi") => "Python",
        Some("java") => "Java",
        Some("c") => "C",
        Some("cpp") | Some("cc") | Some("cxx") | Some("h") | Some("hpp") => "C++",
        Some("cs") => "C#",
        _ => "Python",
    }
}
