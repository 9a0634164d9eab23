//! TOML settings mapped onto a configured rollover action.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use baler_core::{
    BeyondCount, BeyondTotalSize, NameMatches, NamePattern, OlderThan, PathCondition,
    SubstitutionContext,
};
use baler_rollover::ArchivePurge;
use serde::Deserialize;

/// Settings file describing one archive-then-purge action.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) base_path: PathBuf,
    pub(crate) archive_pattern: String,
    #[serde(default = "default_max_depth")]
    pub(crate) max_depth: usize,
    #[serde(default)]
    pub(crate) follow_links: bool,
    #[serde(default)]
    pub(crate) test_mode: bool,
    #[serde(default)]
    pub(crate) conditions: Conditions,
}

/// Optional eligibility conditions, compiled into the chain in a fixed
/// order: name globs, age, newest-count, total size.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Conditions {
    pub(crate) name_globs: Option<Vec<String>>,
    pub(crate) older_than_days: Option<i64>,
    pub(crate) keep_newest: Option<usize>,
    pub(crate) max_total_bytes: Option<u64>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Build the configured action; `dry_run` forces test mode on.
    pub(crate) fn into_action(self, dry_run: bool) -> Result<ArchivePurge> {
        let pattern_text = resolve_pattern(&self.base_path, &self.archive_pattern);
        let pattern = NamePattern::parse(&pattern_text)
            .with_context(|| format!("invalid archive pattern '{}'", self.archive_pattern))?;

        let action = ArchivePurge::new(self.base_path, pattern)
            .with_conditions(self.conditions.build()?)
            .with_substitutions(SubstitutionContext::with_env())
            .with_follow_links(self.follow_links)
            .with_max_depth(self.max_depth)
            .with_test_mode(self.test_mode || dry_run);
        Ok(action)
    }
}

impl Conditions {
    fn build(&self) -> Result<Vec<Box<dyn PathCondition>>> {
        let mut chain: Vec<Box<dyn PathCondition>> = Vec::new();
        if let Some(globs) = &self.name_globs {
            let matches = NameMatches::new(globs).context("invalid name_globs entry")?;
            chain.push(Box::new(matches));
        }
        if let Some(days) = self.older_than_days {
            chain.push(Box::new(OlderThan::days(days)));
        }
        if let Some(keep) = self.keep_newest {
            chain.push(Box::new(BeyondCount::new(keep)));
        }
        if let Some(threshold) = self.max_total_bytes {
            chain.push(Box::new(BeyondTotalSize::new(threshold)));
        }
        Ok(chain)
    }
}

const fn default_max_depth() -> usize {
    1
}

fn resolve_pattern(base: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        base.join(pattern).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baler_test_support::fixtures::LogTree;

    fn write_settings(tree: &LogTree, contents: &str) -> Result<PathBuf> {
        Ok(tree.file("baler.toml", contents.as_bytes())?)
    }

    #[test]
    fn load_applies_defaults() -> Result<()> {
        let tree = LogTree::new()?;
        let path = write_settings(
            &tree,
            r#"
base_path = "/var/log/app"
archive_pattern = "archive-%i.zip"
"#,
        )?;

        let settings = Settings::load(&path)?;
        assert_eq!(settings.base_path, PathBuf::from("/var/log/app"));
        assert_eq!(settings.max_depth, 1);
        assert!(!settings.follow_links);
        assert!(!settings.test_mode);
        assert!(settings.conditions.name_globs.is_none());
        Ok(())
    }

    #[test]
    fn load_rejects_unknown_fields() -> Result<()> {
        let tree = LogTree::new()?;
        let path = write_settings(
            &tree,
            r#"
base_path = "/var/log/app"
archive_pattern = "archive-%i.zip"
surprise = true
"#,
        )?;

        assert!(Settings::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn conditions_compile_in_declaration_order() -> Result<()> {
        let conditions = Conditions {
            name_globs: Some(vec!["server-*.log".to_string()]),
            older_than_days: Some(7),
            keep_newest: Some(3),
            max_total_bytes: Some(1_000_000),
        };
        assert_eq!(conditions.build()?.len(), 4);
        assert!(Conditions::default().build()?.is_empty());
        Ok(())
    }

    #[test]
    fn relative_patterns_resolve_against_the_base_path() -> Result<()> {
        let tree = LogTree::new()?;
        let path = write_settings(
            &tree,
            &format!(
                r#"
base_path = "{base}"
archive_pattern = "archive-%i.zip"
test_mode = false
"#,
                base = tree.path().display()
            ),
        )?;

        let action = Settings::load(&path)?.into_action(false)?;
        assert_eq!(action.base_path(), tree.path());

        let absolute = resolve_pattern(Path::new("/var/log"), "/archives/a-%i.zip");
        assert_eq!(absolute, "/archives/a-%i.zip");
        Ok(())
    }

    #[test]
    fn invalid_patterns_fail_at_load_time() -> Result<()> {
        let tree = LogTree::new()?;
        let path = write_settings(
            &tree,
            r#"
base_path = "/var/log/app"
archive_pattern = "archive-%q.zip"
"#,
        )?;

        let err = Settings::load(&path)?
            .into_action(false)
            .expect_err("pattern should be rejected");
        assert!(err.to_string().contains("invalid archive pattern"));
        Ok(())
    }
}
