use ignore::gitignore::{Gitignore, GitignoreBuilder};
use pardiff_common::{DiffError, Entry};
use std::path::Path;
use tracing::debug;

/// Drops directory entries matching gitignore-style exclude patterns
///
/// Patterns are matched against the entry's path relative to the compared
/// roots, which is identical on both sides, so an excluded name disappears
/// from both listings before reconciliation.
#[derive(Debug, Default)]
pub struct EntryFilter {
    matcher: Option<Gitignore>,
}

impl EntryFilter {
    pub fn new(patterns: &[String]) -> Result<Self, DiffError> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }

        let mut builder = GitignoreBuilder::new("");
        for pattern in patterns {
            builder.add_line(None, pattern).map_err(|e| {
                DiffError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
            debug!("Added exclude pattern: {}", pattern);
        }

        let matcher = builder
            .build()
            .map_err(|e| DiffError::Config(format!("Failed to build exclude set: {}", e)))?;

        Ok(Self {
            matcher: Some(matcher),
        })
    }

    /// Remove excluded entries from a listing of the directory at `relative_dir`.
    pub fn apply(&self, relative_dir: &Path, entries: Vec<Entry>) -> Vec<Entry> {
        let Some(matcher) = &self.matcher else {
            return entries;
        };

        entries
            .into_iter()
            .filter(|entry| {
                let rel = relative_dir.join(&entry.name);
                let excluded = matcher.matched(&rel, entry.is_dir).is_ignore();
                if excluded {
                    debug!("Excluding {:?}", rel);
                }
                !excluded
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn names(entries: &[Entry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| e.name.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = EntryFilter::new(&[]).unwrap();
        assert!(filter.matcher.is_none());

        let entries = vec![Entry::file("a.o"), Entry::dir("build")];
        assert_eq!(filter.apply(Path::new(""), entries.clone()), entries);
    }

    #[test]
    fn test_glob_pattern_at_any_depth() {
        let filter = EntryFilter::new(&["*.o".to_string()]).unwrap();

        let kept = filter.apply(
            Path::new("nested/dir"),
            vec![Entry::file("main.o"), Entry::file("main.c")],
        );
        assert_eq!(names(&kept), vec!["main.c"]);
    }

    #[test]
    fn test_directory_only_pattern() {
        let filter = EntryFilter::new(&["temp/".to_string()]).unwrap();

        let kept = filter.apply(
            Path::new(""),
            vec![Entry::dir("temp"), Entry::file("temp.txt")],
        );
        assert_eq!(names(&kept), vec!["temp.txt"]);
    }

    #[test]
    fn test_root_anchored_pattern() {
        let filter = EntryFilter::new(&["/config.toml".to_string()]).unwrap();

        let root = filter.apply(Path::new(""), vec![Entry::file("config.toml")]);
        assert!(root.is_empty());

        let nested = filter.apply(&PathBuf::from("sub"), vec![Entry::file("config.toml")]);
        assert_eq!(names(&nested), vec!["config.toml"]);
    }
}
