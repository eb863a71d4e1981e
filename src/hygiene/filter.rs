use crate::storage::FileRecord;

/// Marker object Supabase writes to keep an otherwise empty folder alive
pub const EMPTY_FOLDER_PLACEHOLDER: &str = ".emptyFolderPlaceholder";

/// Check whether a listing name is a system artifact rather than user content.
///
/// Matches the placeholder marker itself, any dotfile, and names that embed
/// the marker after a path separator.
pub fn is_system_file(name: &str) -> bool {
    name == EMPTY_FOLDER_PLACEHOLDER
        || name.starts_with('.')
        || name.contains("/.emptyFolderPlaceholder")
}

/// Whether a record belongs in a user-facing listing.
///
/// Stricter than [`is_system_file`]: zero-byte objects are hidden too, while
/// records that report no size at all (folders) stay visible.
pub fn is_visible(record: &FileRecord) -> bool {
    if record.name == EMPTY_FOLDER_PLACEHOLDER {
        return false;
    }
    if record.name.starts_with('.') {
        return false;
    }
    if record.size() == Some(0) {
        return false;
    }
    true
}

/// Drop system files from a listing, keeping the listing's order
pub fn filter_system_files(files: Vec<FileRecord>) -> Vec<FileRecord> {
    files.into_iter().filter(is_visible).collect()
}

/// Full object path of `name` inside the listed directory `dir`
pub fn object_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Full paths of every system file in a raw listing of `dir`
pub fn system_file_paths(dir: &str, files: &[FileRecord]) -> Vec<String> {
    files
        .iter()
        .filter(|f| f.is_system())
        .map(|f| object_path(dir, &f.name))
        .collect()
}
