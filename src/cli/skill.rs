//! `skill install`: write the bundled SKILL.md for coding agents

use std::path::PathBuf;

use crate::error::Result;
use crate::output::{emit_success, Human, HumanOutput, OutputOptions};
use crate::skills::{default_install_dir, expand_home, install_skill, SKILL_NAME};

/// Options for `skill install`
#[derive(Debug, Clone, Default)]
pub struct SkillInstallOptions {
    pub dest: Option<PathBuf>,
    pub force: bool,
}

pub fn run_install(options: SkillInstallOptions, output: OutputOptions) -> Result<()> {
    let dest = match options.dest {
        Some(dest) => expand_home(&dest),
        None => default_install_dir()?,
    };
    let report = install_skill(&dest, options.force)?;

    let mut human = HumanOutput::new(format!("Skill {SKILL_NAME}"));
    human.push_summary("destination", dest.display().to_string());
    for path in &report.written {
        human.push_detail(format!("wrote {}", path.display()));
    }
    for path in &report.skipped {
        human.push_warning(format!("{} exists; pass --force to overwrite", path.display()));
    }
    emit_success(output, "skill install", &report, Some(Human::Block(&human)))
}
