//! Lexical classification of source strings

use crate::error::{BasarError, BasarResult};
use std::path::{Path, PathBuf};

/// Where a source's banners come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A file on this machine, already resolved to a path
    Local(PathBuf),
    /// An HTTP(S) URL
    Remote(String),
}

impl SourceKind {
    /// Classify a source string, expanding `~` against the user's home directory
    pub fn resolve(source: &str) -> BasarResult<Self> {
        if !Self::is_local(source) {
            return Ok(Self::Remote(source.to_string()));
        }

        let home = if source.trim_start_matches("file://").starts_with('~') {
            Some(dirs::home_dir().ok_or(BasarError::HomeDirUnavailable)?)
        } else {
            None
        };

        Ok(Self::Local(local_path(source, home.as_deref())))
    }

    /// Whether a source string names a local file
    ///
    /// Checked in order: `file://` prefix, absolute path, `~` prefix, missing scheme.
    pub fn is_local(source: &str) -> bool {
        source.starts_with("file://")
            || source.starts_with('/')
            || source.starts_with('~')
            || !source.contains("://")
    }
}

/// Turn a local source string into a filesystem path
fn local_path(source: &str, home: Option<&Path>) -> PathBuf {
    let path = source.strip_prefix("file://").unwrap_or(source);

    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_sources() {
        let cases = [
            ("file:///srv/banners.json", true),
            ("/srv/banners.json", true),
            ("~/banners.json", true),
            ("banners.json", true),
            ("relative/dir/banners.json", true),
            ("https://example.com/banners.json", false),
            ("http://example.com/banners.json", false),
            ("ftp://example.com/banners.json", false),
        ];

        for (source, expected) in cases {
            assert_eq!(SourceKind::is_local(source), expected, "{source}");
        }
    }

    #[test]
    fn strips_file_scheme() {
        assert_eq!(
            local_path("file:///srv/banners.json", None),
            PathBuf::from("/srv/banners.json")
        );
    }

    #[test]
    fn expands_home() {
        let home = Path::new("/home/analyst");
        assert_eq!(
            local_path("~/isf/banners.json", Some(home)),
            PathBuf::from("/home/analyst/isf/banners.json")
        );
        assert_eq!(
            local_path("file://~/banners.json", Some(home)),
            PathBuf::from("/home/analyst/banners.json")
        );
    }

    #[test]
    fn resolve_remote_is_verbatim() {
        let kind = SourceKind::resolve("https://example.com/b.json?x=1").unwrap();
        assert_eq!(kind, SourceKind::Remote("https://example.com/b.json?x=1".into()));
    }

    #[test]
    fn resolve_plain_path() {
        let kind = SourceKind::resolve("/var/lib/banners.json").unwrap();
        assert_eq!(kind, SourceKind::Local(PathBuf::from("/var/lib/banners.json")));
    }
}
