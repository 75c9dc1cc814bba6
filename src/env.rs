//! Environment variable access and `.env` merging
//!
//! [`Env::real`] reads and writes the process environment. [`Env::in_memory`]
//! is backed by a map so callers can load a configuration without touching
//! global state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{CouncilError, Result};

/// Name of the environment file looked up by [`find_dotenv`]
pub const DOTENV_FILENAME: &str = ".env";

/// Environment variable reader/writer.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Reads from the real process environment
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Backed by explicit key-value pairs instead of the process environment
    pub fn in_memory(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    #[cfg(test)]
    fn is_real(&self) -> bool {
        self.overrides.is_none()
    }

    /// Look up a variable. Non-unicode process values read as absent.
    pub fn var(&self, name: &str) -> Option<String> {
        match &self.overrides {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    /// Whether the variable is defined at all, even as an empty string
    pub fn is_set(&self, name: &str) -> bool {
        match &self.overrides {
            Some(map) => map.contains_key(name),
            None => std::env::var_os(name).is_some(),
        }
    }

    fn set(&mut self, name: String, value: String) {
        match &mut self.overrides {
            Some(map) => {
                map.insert(name, value);
            }
            None => std::env::set_var(name, value),
        }
    }

    /// Apply the declarations in `path` that are not already set.
    ///
    /// Returns how many variables were added. Malformed lines are logged and
    /// skipped; only a file that cannot be opened is an error.
    pub fn merge_dotenv(&mut self, path: &Path) -> Result<usize> {
        let entries = dotenvy::from_path_iter(path).map_err(|source| CouncilError::EnvFile {
            path: path.to_path_buf(),
            source,
        })?;

        let mut applied = 0;
        for entry in entries {
            let (name, value) = match entry {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!("Skipping line in {}: {}", path.display(), e);
                    continue;
                }
            };
            if self.is_set(&name) {
                tracing::trace!(%name, "Keeping existing value over env file");
                continue;
            }
            self.set(name, value);
            applied += 1;
        }
        Ok(applied)
    }
}

/// First `.env` file in `start` or any of its ancestors
pub fn find_dotenv(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(DOTENV_FILENAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_dotenv(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(DOTENV_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_real_env_reads_cargo_manifest_dir() {
        let env = Env::real();
        assert!(env.is_real());
        assert!(env.var("CARGO_MANIFEST_DIR").is_some());
    }

    #[test]
    fn test_in_memory_lookup() {
        let env = Env::in_memory([("FOO", "bar"), ("EMPTY", "")]);

        assert!(!env.is_real());
        assert_eq!(env.var("FOO").as_deref(), Some("bar"));
        assert_eq!(env.var("MISSING"), None);
        assert!(env.is_set("EMPTY"));
        assert!(!env.is_set("MISSING"));
    }

    #[test]
    fn test_find_dotenv_in_start_dir() {
        let dir = TempDir::new().unwrap();
        let path = write_dotenv(dir.path(), "A=1\n");

        assert_eq!(find_dotenv(dir.path()), Some(path));
    }

    #[test]
    fn test_find_dotenv_walks_ancestors() {
        let dir = TempDir::new().unwrap();
        let path = write_dotenv(dir.path(), "A=1\n");
        let nested = dir.path().join("backend").join("src");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_dotenv(&nested), Some(path));
    }

    #[test]
    fn test_find_dotenv_prefers_closest_file() {
        let dir = TempDir::new().unwrap();
        write_dotenv(dir.path(), "A=outer\n");
        let nested = dir.path().join("backend");
        fs::create_dir_all(&nested).unwrap();
        let inner = write_dotenv(&nested, "A=inner\n");

        assert_eq!(find_dotenv(&nested), Some(inner));
    }

    #[test]
    fn test_find_dotenv_ignores_directory_named_dotenv() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(DOTENV_FILENAME)).unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();

        let found = find_dotenv(&nested);
        assert_ne!(found, Some(dir.path().join(DOTENV_FILENAME)));
    }

    #[test]
    fn test_merge_adds_missing_variables() {
        let dir = TempDir::new().unwrap();
        let path = write_dotenv(dir.path(), "# comment\nFIRST=one\nSECOND=\"two words\"\n");
        let mut env = Env::in_memory(Vec::<(String, String)>::new());

        let applied = env.merge_dotenv(&path).unwrap();

        assert_eq!(applied, 2);
        assert_eq!(env.var("FIRST").as_deref(), Some("one"));
        assert_eq!(env.var("SECOND").as_deref(), Some("two words"));
    }

    #[test]
    fn test_merge_keeps_existing_values() {
        let dir = TempDir::new().unwrap();
        let path = write_dotenv(dir.path(), "KEY=from-file\nOTHER=x\n");
        let mut env = Env::in_memory([("KEY", "direct")]);

        let applied = env.merge_dotenv(&path).unwrap();

        assert_eq!(applied, 1);
        assert_eq!(env.var("KEY").as_deref(), Some("direct"));
        assert_eq!(env.var("OTHER").as_deref(), Some("x"));
    }

    #[test]
    fn test_merge_existing_empty_value_still_wins() {
        let dir = TempDir::new().unwrap();
        let path = write_dotenv(dir.path(), "KEY=from-file\n");
        let mut env = Env::in_memory([("KEY", "")]);

        env.merge_dotenv(&path).unwrap();

        assert_eq!(env.var("KEY").as_deref(), Some(""));
    }

    #[test]
    fn test_merge_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut env = Env::in_memory(Vec::<(String, String)>::new());

        let err = env.merge_dotenv(&dir.path().join(DOTENV_FILENAME)).unwrap_err();

        match err {
            CouncilError::EnvFile { source, .. } => assert!(source.not_found()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_skips_malformed_line() {
        let dir = TempDir::new().unwrap();
        let path = write_dotenv(dir.path(), "GOOD=1\nthis line is not valid\nLATER=2\n");
        let mut env = Env::in_memory(Vec::<(String, String)>::new());

        let applied = env.merge_dotenv(&path).unwrap();

        assert_eq!(applied, 2);
        assert_eq!(env.var("GOOD").as_deref(), Some("1"));
        assert_eq!(env.var("LATER").as_deref(), Some("2"));
    }
}
