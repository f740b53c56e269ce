use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn thingsctl_help_works() {
    Command::cargo_bin("thingsctl")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("control Things from the command line"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "list", "add", "edit", "complete", "cancel", "project", "area", "skill",
    ];

    for cmd in subcommands {
        Command::cargo_bin("thingsctl")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn nested_subcommand_help_works() {
    for args in [
        ["project", "create"],
        ["project", "list"],
        ["area", "create"],
        ["area", "list"],
        ["skill", "install"],
    ] {
        Command::cargo_bin("thingsctl")
            .expect("binary")
            .args(args)
            .arg("--help")
            .assert()
            .success();
    }
}
