//! Installation of the bundled agent skill file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

pub const SKILL_NAME: &str = "thingsctl";
const SKILL_FILENAME: &str = "SKILL.md";
const SKILL_MARKDOWN: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/skills/thingsctl/SKILL.md"
));

#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct SkillInstallReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Content of the bundled skill file.
pub fn skill_markdown() -> &'static str {
    SKILL_MARKDOWN
}

/// `~/.claude/skills/thingsctl`, when a home directory is known.
pub fn default_install_dir() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new()
        .ok_or_else(|| anyhow!("Unable to resolve home dir; pass --dest or set skills.dir"))?;
    Ok(dirs
        .home_dir()
        .join(".claude")
        .join("skills")
        .join(SKILL_NAME))
}

/// Expand a leading `~/` against the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), directories::BaseDirs::new()) {
        (Ok(rest), Some(dirs)) => dirs.home_dir().join(rest),
        _ => path.to_path_buf(),
    }
}

/// Write `SKILL.md` into `dest`. An existing file is left alone unless `force`.
pub fn install_skill(dest: &Path, force: bool) -> Result<SkillInstallReport> {
    let path = dest.join(SKILL_FILENAME);
    let mut report = SkillInstallReport::default();
    if path.exists() && !force {
        report.skipped.push(path);
        return Ok(report);
    }

    fs::create_dir_all(dest).with_context(|| format!("creating {}", dest.display()))?;
    fs::write(&path, SKILL_MARKDOWN).with_context(|| format!("writing {}", path.display()))?;
    report.written.push(path);
    Ok(report)
}
