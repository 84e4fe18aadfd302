//! Filesystem roots used while loading.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the include directory.
const INCLUDE_ENV: &str = "KDEF_INCLUDE";

/// Working, include and temporary directories of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Files {
    working_dir: PathBuf,
    include_dir: PathBuf,
    temp_dir: PathBuf,
}

impl Files {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        include_dir: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Files {
            working_dir: working_dir.into(),
            include_dir: include_dir.into(),
            temp_dir: temp_dir.into(),
        }
    }

    /// Roots for the current process.
    ///
    /// The include directory comes from `KDEF_INCLUDE`, falling back to the
    /// `include/` directory of the source tree. The temp directory is
    /// private to this process.
    pub fn from_env() -> Self {
        let working_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let include_dir = env::var_os(INCLUDE_ENV).map_or_else(
            || PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../include")),
            PathBuf::from,
        );
        let temp_dir = env::temp_dir().join(format!("kdef-{}", std::process::id()));
        Files::new(working_dir, include_dir, temp_dir)
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn include_dir(&self) -> &Path {
        &self.include_dir
    }

    /// Directory holding the builtin definitions (`prelude.md`, ...).
    pub fn builtin_dir(&self) -> PathBuf {
        self.include_dir.join("builtin")
    }

    /// Relative paths are taken from the working directory.
    pub fn resolve_working(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    pub fn resolve_temp(&self, path: impl AsRef<Path>) -> PathBuf {
        self.temp_dir.join(path)
    }
}
