use bytes::Bytes;

/// A file or directory read out of the source container, waiting to be
/// written into the replacement.
///
/// Writing consumes the value, so each archive is handed to the runtime at most
/// once; an archive that never reaches the replacement is released when the
/// migration returns.
#[derive(Debug)]
pub struct StagedFile {
    source_path: String,
    archive: Bytes,
}

impl StagedFile {
    pub fn new(source_path: impl Into<String>, archive: Bytes) -> Self {
        Self {
            source_path: source_path.into(),
            archive,
        }
    }

    /// Directory the archive is extracted into on the replacement.
    pub fn target_dir(&self) -> &str {
        parent_dir(&self.source_path)
    }

    pub(crate) fn into_archive(self) -> Bytes {
        self.archive
    }
}

/// Parent directory of a container path; `/` for top-level entries.
pub(crate) fn parent_dir(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    let parent = match trimmed.rfind('/') {
        Some(idx) => trimmed[..idx].trim_end_matches('/'),
        None => "",
    };
    if parent.is_empty() {
        "/"
    } else {
        parent
    }
}
