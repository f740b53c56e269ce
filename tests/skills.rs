use std::fs;

use thingsctl::skills::{install_skill, skill_markdown, SKILL_NAME};

#[test]
fn bundled_skill_mentions_commands() {
    let markdown = skill_markdown();
    assert!(markdown.contains(SKILL_NAME));
    assert!(markdown.contains("thingsctl list"));
}

#[test]
fn install_writes_then_skips_without_force() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("skills").join(SKILL_NAME);

    let first = install_skill(&dest, false).expect("install");
    assert_eq!(first.written, vec![dest.join("SKILL.md")]);
    assert!(first.skipped.is_empty());
    assert_eq!(
        fs::read_to_string(dest.join("SKILL.md")).expect("read"),
        skill_markdown()
    );

    fs::write(dest.join("SKILL.md"), "local edits").expect("write");
    let second = install_skill(&dest, false).expect("install again");
    assert!(second.written.is_empty());
    assert_eq!(second.skipped.len(), 1);
    assert_eq!(
        fs::read_to_string(dest.join("SKILL.md")).expect("read"),
        "local edits"
    );

    let forced = install_skill(&dest, true).expect("force install");
    assert_eq!(forced.written.len(), 1);
    assert_eq!(
        fs::read_to_string(dest.join("SKILL.md")).expect("read"),
        skill_markdown()
    );
}

#[test]
fn expand_home_leaves_plain_paths_alone() {
    let plain = std::path::Path::new("/tmp/skills");
    assert_eq!(thingsctl::skills::expand_home(plain), plain.to_path_buf());

    let expanded = thingsctl::skills::expand_home(std::path::Path::new("~/skills"));
    assert!(expanded.ends_with("skills"));
}
