use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::program::{ShaderError, ShaderSource};

/// The subset of file metadata that signals an edit.
///
/// A missing or unreadable file has default stats, so deleting a shader and
/// putting it back both count as changes.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FileStats {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileStats {
    pub fn of(path: &Path) -> Self {
        fs::metadata(path)
            .map(|m| Self {
                len: m.len(),
                modified: m.modified().ok(),
            })
            .unwrap_or_default()
    }
}

#[derive(Debug)]
struct WatchedFile {
    path: PathBuf,
    stats: FileStats,
}

impl WatchedFile {
    fn new(path: PathBuf) -> Self {
        let stats = FileStats::of(&path);
        Self { path, stats }
    }

    fn refresh(&mut self) -> bool {
        let now = FileStats::of(&self.path);
        let changed = now != self.stats;
        self.stats = now;
        changed
    }

    fn read(&self) -> Result<String, ShaderError> {
        let text = fs::read_to_string(&self.path).map_err(|e| ShaderError::Read {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        if text.trim().is_empty() {
            return Err(ShaderError::Read {
                path: self.path.clone(),
                reason: "file is empty".to_string(),
            });
        }
        Ok(text)
    }
}

/// Polls the vertex and fragment shader files for changes.
///
/// Meant to be polled once per frame: `stat` is cheap and the viewer is
/// single-threaded, so there is no watcher thread.
#[derive(Debug)]
pub struct ShaderWatcher {
    vertex: WatchedFile,
    fragment: WatchedFile,
}

impl ShaderWatcher {
    /// Starts watching; the current file stats are the baseline.
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: WatchedFile::new(vertex.into()),
            fragment: WatchedFile::new(fragment.into()),
        }
    }

    /// Returns true when either file changed since the previous poll.
    pub fn poll(&mut self) -> bool {
        // Refresh both so a simultaneous edit is reported once, not twice.
        let v = self.vertex.refresh();
        let f = self.fragment.refresh();
        v || f
    }

    pub fn read_sources(&self) -> Result<ShaderSource, ShaderError> {
        Ok(ShaderSource {
            vertex: self.vertex.read()?,
            fragment: self.fragment.read()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(path: &Path, text: &str) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
        f.sync_all().unwrap();
    }

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let vert = dir.path().join("vert.glsl");
        let frag = dir.path().join("frag.glsl");
        write(&vert, "void main() {}\n");
        write(&frag, "void main() {}\n");
        (dir, vert, frag)
    }

    #[test]
    fn unchanged_files_do_not_trigger() {
        let (_dir, vert, frag) = setup();
        let mut w = ShaderWatcher::new(&vert, &frag);
        assert!(!w.poll());
        assert!(!w.poll());
    }

    #[test]
    fn edit_triggers_exactly_once() {
        let (_dir, vert, frag) = setup();
        let mut w = ShaderWatcher::new(&vert, &frag);

        // Different length, so the change is visible even on coarse mtime filesystems.
        write(&frag, "void main() { /* edited */ }\n");
        assert!(w.poll());
        assert!(!w.poll());
    }

    #[test]
    fn deleting_and_restoring_are_both_changes() {
        let (_dir, vert, frag) = setup();
        let mut w = ShaderWatcher::new(&vert, &frag);

        fs::remove_file(&vert).unwrap();
        assert!(w.poll());
        assert!(w.read_sources().is_err());

        write(&vert, "void main() { }\n");
        assert!(w.poll());
        assert!(w.read_sources().is_ok());
    }

    #[test]
    fn empty_file_is_a_read_error() {
        let (_dir, vert, frag) = setup();
        write(&vert, "   \n");
        let w = ShaderWatcher::new(&vert, &frag);
        match w.read_sources() {
            Err(ShaderError::Read { path, reason }) => {
                assert_eq!(path, vert);
                assert!(reason.contains("empty"));
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_has_default_stats() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(FileStats::of(&dir.path().join("nope.glsl")), FileStats::default());
    }
}
