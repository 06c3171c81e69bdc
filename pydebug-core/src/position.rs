//! Source position conversion
//!
//! Frames arrive with the file path as the remote interpreter sees it. The
//! decoders hand `(file, line)` to a [`PositionConverter`] and embed whatever
//! it returns, without interpreting either value themselves.

use crate::config::PathMapping;
use serde::Serialize;

/// A location in a source file as understood by the debugger client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcePosition {
    pub file: String,
    pub line: i32,
}

/// Turns remote `(file, line)` pairs into client-side positions.
pub trait PositionConverter {
    fn to_position(&self, file: &str, line: i32) -> SourcePosition;
}

/// Passes remote paths through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl PositionConverter for IdentityConverter {
    fn to_position(&self, file: &str, line: i32) -> SourcePosition {
        SourcePosition {
            file: file.to_string(),
            line,
        }
    }
}

/// Rewrites remote path prefixes to local ones, e.g. when debugging a
/// process inside a container.
///
/// The longest matching remote prefix wins. Paths matching no mapping are
/// passed through.
#[derive(Debug, Clone, Default)]
pub struct PathMappingConverter {
    mappings: Vec<PathMapping>,
}

impl PathMappingConverter {
    pub fn new(mut mappings: Vec<PathMapping>) -> Self {
        mappings.sort_by(|a, b| b.remote.len().cmp(&a.remote.len()));
        Self { mappings }
    }

    fn map_file(&self, file: &str) -> String {
        for mapping in &self.mappings {
            if let Some(rest) = strip_dir_prefix(file, &mapping.remote) {
                let local = mapping.local.trim_end_matches('/');
                return format!("{}{}", local, rest);
            }
        }
        file.to_string()
    }
}

/// Strip `prefix` only on a path-component boundary, so `/srv/app` does
/// not match `/srv/apple/x.py`.
fn strip_dir_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = prefix.trim_end_matches('/');
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

impl PositionConverter for PathMappingConverter {
    fn to_position(&self, file: &str, line: i32) -> SourcePosition {
        SourcePosition {
            file: self.map_file(file),
            line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(remote: &str, local: &str) -> PathMapping {
        PathMapping {
            remote: remote.to_string(),
            local: local.to_string(),
        }
    }

    #[test]
    fn test_identity() {
        let pos = IdentityConverter.to_position("/srv/app/main.py", 12);
        assert_eq!(
            pos,
            SourcePosition {
                file: "/srv/app/main.py".to_string(),
                line: 12
            }
        );
    }

    #[test]
    fn test_longest_prefix_wins() {
        let converter = PathMappingConverter::new(vec![
            mapping("/srv", "/mnt/srv"),
            mapping("/srv/app/", "/home/dev/app"),
        ]);

        assert_eq!(
            converter.to_position("/srv/app/pkg/mod.py", 3).file,
            "/home/dev/app/pkg/mod.py"
        );
        assert_eq!(
            converter.to_position("/srv/other.py", 3).file,
            "/mnt/srv/other.py"
        );
    }

    #[test]
    fn test_prefix_must_end_on_component() {
        let converter = PathMappingConverter::new(vec![mapping("/srv/app", "/local")]);
        assert_eq!(
            converter.to_position("/srv/apple/x.py", 1).file,
            "/srv/apple/x.py"
        );
        assert_eq!(converter.to_position("/srv/app", 1).file, "/local");
    }

    #[test]
    fn test_unmapped_path_and_line_untouched() {
        let converter = PathMappingConverter::new(vec![mapping("/srv", "/mnt")]);
        let pos = converter.to_position("<string>", 0);
        assert_eq!(pos.file, "<string>");
        assert_eq!(pos.line, 0);
    }
}
