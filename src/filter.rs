//! Path filtering for mined history.
//!
//! History paths are repository-relative, so everything here works on
//! plain `Path` values without touching the filesystem.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{MineError, MineResult};

/// Test directory names excluded unless tests are included.
pub const TEST_DIRS: &[&str] = &["tests", "test", "__tests__", "spec"];

/// Check whether a file matches a test naming pattern based on its extension.
pub fn is_test_file(path: &Path) -> bool {
    let file_name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };

    let Some(dot) = file_name.rfind('.') else {
        return false;
    };
    let ext = &file_name[dot + 1..];
    let base = &file_name[..dot];

    match ext {
        "rs" | "go" | "exs" | "dart" => base.ends_with("_test"),
        "py" => base.starts_with("test_") || base.ends_with("_test"),
        "rb" => base.ends_with("_test") || base.ends_with("_spec"),
        "php" => base.ends_with("Test") || base.ends_with("_test"),
        "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts" | "cts" => {
            base.ends_with(".test") || base.ends_with(".spec")
        }
        "java" | "kt" | "kts" | "cs" | "swift" => {
            base.ends_with("Test") || base.ends_with("Tests")
        }
        "scala" | "hs" => base.ends_with("Test") || base.ends_with("Spec"),
        "c" | "cc" | "cpp" | "cxx" => {
            base.ends_with("_test") || base.starts_with("test_") || base.ends_with("_unittest")
        }
        _ => false,
    }
}

/// Whether any directory component of a repository-relative path is a
/// test directory, or the file itself is named like a test.
pub fn is_test_path(path: &Path) -> bool {
    let in_test_dir = path
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .filter_map(|c| c.as_os_str().to_str())
        .any(|name| TEST_DIRS.contains(&name));
    in_test_dir || is_test_file(path)
}

/// Lock files, minified bundles and protobuf output: their line counts
/// say nothing about who knows the code.
pub fn is_generated(path: &Path) -> bool {
    let file_name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };

    matches!(
        file_name,
        "Cargo.lock"
            | "package-lock.json"
            | "yarn.lock"
            | "pnpm-lock.yaml"
            | "Gemfile.lock"
            | "poetry.lock"
            | "composer.lock"
            | "Pipfile.lock"
            | "go.sum"
    ) || file_name.ends_with(".min.js")
        || file_name.ends_with(".min.css")
        || file_name.ends_with(".bundle.js")
        || file_name.ends_with(".pb.go")
        || file_name.ends_with("_pb2.py")
        || file_name.contains(".generated.")
}

/// Decides which history paths take part in mining.
pub struct PathFilter {
    globs: GlobSet,
    include_tests: bool,
}

impl PathFilter {
    pub fn new(patterns: &[String], include_tests: bool) -> MineResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns.iter().filter(|p| !p.trim().is_empty()) {
            let glob = Glob::new(pattern)
                .map_err(|e| MineError::Config(format!("invalid exclude pattern {pattern:?}: {e}")))?;
            builder.add(glob);
        }
        let globs = builder
            .build()
            .map_err(|e| MineError::Config(format!("exclude patterns: {e}")))?;
        Ok(Self {
            globs,
            include_tests,
        })
    }

    /// Filter that keeps everything except generated files.
    #[cfg(test)]
    pub fn permissive() -> Self {
        Self {
            globs: GlobSet::empty(),
            include_tests: true,
        }
    }

    pub fn excludes(&self, path: &Path) -> bool {
        is_generated(path)
            || (!self.include_tests && is_test_path(path))
            || self.globs.is_match(path)
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
