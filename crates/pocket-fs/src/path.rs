//! String helpers for `/`-separated paths.
//!
//! Directory paths carry a trailing `/` (`"/roms/"`), which is what the file
//! browser builds and displays.

/// Path of `dir` entered from `cur`.
///
/// `"."` stays put, `".."` drops the last component (keeping the trailing
/// `/`), anything else is appended followed by `/`.
pub fn enter_directory(cur: &str, dir: &str) -> String {
    match dir {
        "." => cur.to_string(),
        ".." => {
            let trimmed = cur.trim_end_matches('/');
            match trimmed.rfind('/') {
                Some(pos) => cur[..=pos].to_string(),
                None => cur.to_string(),
            }
        },
        _ => format!("{cur}{dir}/"),
    }
}

/// Everything up to and including the last `/`, or `None` when there is none.
pub fn parent_directory(path: &str) -> Option<&str> {
    path.rfind('/').map(|pos| &path[..=pos])
}

/// Component after the last `/`.
pub fn file_name(path: &str) -> &str {
    path.rfind('/').map_or(path, |pos| &path[pos + 1..])
}

/// Extension of the file component without the period, or `""`.
pub fn file_extension(path: &str) -> &str {
    let name = file_name(path);
    name.rfind('.').map_or("", |pos| &name[pos + 1..])
}

/// True when nothing follows the first `/` (or there is no `/` at all).
pub fn is_root_directory(path: &str) -> bool {
    path.find('/').is_none_or(|pos| pos + 1 == path.len())
}

/// True when `name` ends with `.ext` (case-insensitive) and has at least one
/// character before the period.
pub fn has_extension(name: &str, ext: &str) -> bool {
    if name.len() < ext.len() + 2 {
        return false;
    }
    let split = name.len() - ext.len();
    let (Some(stem), Some(tail)) = (name.get(..split), name.get(split..)) else {
        return false;
    };
    stem.ends_with('.') && tail.eq_ignore_ascii_case(ext)
}
