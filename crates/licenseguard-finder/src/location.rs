use crate::error::FinderError;
use camino::{Utf8Path, Utf8PathBuf};
use licenseguard_types::ScanPath;
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What to scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanLocation {
    /// Walk this directory recursively.
    Directory(Utf8PathBuf),
    /// Process exactly these files, in this order.
    Files(Vec<Utf8PathBuf>),
}

impl ScanLocation {
    pub fn describe(&self) -> String {
        match self {
            ScanLocation::Directory(root) => root.to_string(),
            ScanLocation::Files(files) => files
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// A file selected for scanning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundFile {
    /// Where to read it.
    pub abs: Utf8PathBuf,
    /// How to report it: relative to the walked root, or as listed.
    pub path: ScanPath,
}

/// Files under `location` accepted by `filter` (which sees the simple file name).
///
/// A missing or unreadable root, or a listed file that does not exist, is an error. Unreadable
/// entries below the root are logged and skipped. Directory walks are sorted by file name.
pub fn collect_files(
    location: &ScanLocation,
    filter: impl Fn(&str) -> bool,
) -> Result<Vec<FoundFile>, FinderError> {
    match location {
        ScanLocation::Directory(root) => walk(root, filter),
        ScanLocation::Files(files) => {
            let mut out = Vec::new();
            for file in files {
                let meta = std::fs::metadata(file).map_err(|source| FinderError::ScanLocation {
                    path: file.clone(),
                    source,
                })?;
                if meta.is_file() && filter(simple_name(file.as_str())) {
                    out.push(FoundFile {
                        abs: file.clone(),
                        path: ScanPath::new(file.as_str()),
                    });
                }
            }
            Ok(out)
        }
    }
}

fn walk(root: &Utf8Path, filter: impl Fn(&str) -> bool) -> Result<Vec<FoundFile>, FinderError> {
    std::fs::metadata(root).map_err(|source| FinderError::ScanLocation {
        path: root.to_path_buf(),
        source,
    })?;

    let mut out = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(FinderError::ScanLocation {
                    path: root.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                warn!(error = %e, "unreadable entry skipped");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(abs) = pathbuf_to_utf8(entry.path().to_path_buf()) else {
            debug!(path = %entry.path().display(), "non UTF-8 path skipped");
            continue;
        };
        debug!(path = %abs, "visit");
        if !filter(simple_name(abs.as_str())) {
            continue;
        }
        let path = if abs == root {
            ScanPath::new(abs.as_str())
        } else {
            ScanPath::relative_to(root, &abs)
        };
        out.push(FoundFile { abs, path });
    }
    Ok(out)
}

/// Last component of a `/`- or `\`-separated path.
pub fn simple_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    #[test]
    fn directory_walk_is_sorted_and_relative() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("lib/z.jar"), "z");
        write_file(&root.join("lib/a.jar"), "a");
        write_file(&root.join("b/c.jar"), "c");
        write_file(&root.join("b/readme.txt"), "r");

        let found = collect_files(&ScanLocation::Directory(root.clone()), |n| {
            n.ends_with(".jar")
        })
        .expect("collect");
        let paths: Vec<&str> = found.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["b/c.jar", "lib/a.jar", "lib/z.jar"]);
        assert_eq!(found[0].abs, root.join("b/c.jar"));
    }

    #[test]
    fn missing_root_is_fatal() {
        let tmp = TempDir::new().expect("temp dir");
        let missing = utf8_root(&tmp).join("nope");
        let err = collect_files(&ScanLocation::Directory(missing), |_| true).unwrap_err();
        assert!(matches!(err, FinderError::ScanLocation { .. }));
    }

    #[test]
    fn file_list_keeps_order_and_rejects_missing_files() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("b.jar"), "b");
        write_file(&root.join("a.jar"), "a");

        let files = vec![root.join("b.jar"), root.join("a.jar")];
        let found = collect_files(&ScanLocation::Files(files), |_| true).expect("collect");
        let names: Vec<&str> = found.iter().map(|f| f.path.file_name()).collect();
        assert_eq!(names, vec!["b.jar", "a.jar"]);

        let err = collect_files(&ScanLocation::Files(vec![root.join("c.jar")]), |_| true)
            .unwrap_err();
        assert!(err.to_string().contains("c.jar"));
    }

    #[test]
    fn simple_name_handles_separators() {
        assert_eq!(simple_name("META-INF/LICENSE"), "LICENSE");
        assert_eq!(simple_name("dir\\file.txt"), "file.txt");
        assert_eq!(simple_name("plain"), "plain");
        assert_eq!(simple_name("nested/dir/"), "dir");
    }

    #[test]
    fn pathbuf_to_utf8_rejects_invalid() {
        #[cfg(unix)]
        {
            use std::ffi::OsString;
            use std::os::unix::ffi::OsStringExt;
            let invalid = OsString::from_vec(vec![0xFF, 0xFE, 0xFD]);
            assert!(pathbuf_to_utf8(PathBuf::from(invalid)).is_none());
        }
    }
}
