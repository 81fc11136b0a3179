//! Slash-separated change paths.

/// Normalize a patch path: drop empty and `.` segments.
///
/// Returns `None` for paths with no segments left or with `..` segments.
pub fn normalize(path: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Ancestor folder paths of a normalized path, deepest first.
///
/// `"a/b/c.txt"` yields `"a/b"`, then `"a"`.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    let mut rest = path;
    std::iter::from_fn(move || {
        let idx = rest.rfind('/')?;
        rest = &rest[..idx];
        Some(rest)
    })
}

/// The parent folder path of a normalized path, `""` for top-level entries.
pub fn parent(path: &str) -> &str {
    path.rfind('/').map_or("", |idx| &path[..idx])
}

/// Join a folder path and a child name.
pub fn join(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}
