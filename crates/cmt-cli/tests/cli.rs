use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmt(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cmt").unwrap();
    cmd.current_dir(dir.path())
        .env("CMT_STORE", dir.path().join("store"))
        .arg("--no-color");
    cmd
}

/// Run a write command and return the comment id it reports
fn created_id(dir: &TempDir, args: &[&str]) -> String {
    let output = cmt(dir).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "cmt {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout)
        .unwrap()
        .split_whitespace()
        .last()
        .unwrap()
        .to_string()
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    cmt(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("thread"));
}

#[test]
fn test_add_list_and_thread() {
    let dir = TempDir::new().unwrap();

    let a = created_id(&dir, &["add", "--on", "Article:42", "--by", "User:7", "First!"]);
    let b = created_id(&dir, &["reply", &a, "--by", "User:8", "Agreed"]);
    created_id(
        &dir,
        &["add", "--on", "Article:42", "--guest-name", "Jane", "--approved", "Hi"],
    );

    cmt(&dir)
        .args(["list", "--on", "Article:42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(3)"))
        .stdout(predicate::str::contains("Jane"));

    cmt(&dir)
        .args(["list", "--on", "Article:42", "--approved", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"guest_name\": \"Jane\""))
        .stdout(predicate::str::contains("First!").not());

    cmt(&dir)
        .args(["thread", "--on", "Article:42", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"depth\": 1"));

    cmt(&dir)
        .args(["top", &b])
        .assert()
        .success()
        .stdout(predicate::str::contains("First!"));
}

#[test]
fn test_guest_without_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    cmt(&dir)
        .args(["add", "--on", "Article:1", "anonymous words"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("guest name"));
}

#[test]
fn test_delete_restore_and_purge() {
    let dir = TempDir::new().unwrap();
    let id = created_id(&dir, &["add", "--on", "Post:9", "--by", "User:1", "hello"]);

    cmt(&dir)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trashed"));

    cmt(&dir)
        .args(["list", "--on", "Post:9", "--only-trashed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"));

    cmt(&dir).args(["restore", &id]).assert().success();

    cmt(&dir)
        .args(["show", &id, "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted_at\": null"));

    cmt(&dir)
        .args(["purge", "--on", "Post:9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trashed 1 comment(s)"));

    cmt(&dir)
        .args(["list", "--on", "Post:9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No comments"));
}

#[test]
fn test_edit_ignores_guarded_fields() {
    let dir = TempDir::new().unwrap();
    let id = created_id(&dir, &["add", "--on", "Post:1", "--by", "User:1", "draft"]);

    cmt(&dir)
        .args([
            "edit",
            &id,
            "--fields",
            r#"{"comment": "final", "commentable_id": "999", "is_featured": "1"}"#,
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"comment\": \"final\""))
        .stdout(predicate::str::contains("\"commentable_id\": \"1\""))
        .stdout(predicate::str::contains("\"is_featured\": true"));
}

#[test]
fn test_edit_clears_guest_email_with_null() {
    let dir = TempDir::new().unwrap();
    let id = created_id(
        &dir,
        &[
            "add",
            "--on",
            "Post:1",
            "--guest-name",
            "Jane",
            "--guest-email",
            "jane@example.com",
            "hello",
        ],
    );

    cmt(&dir)
        .args(["edit", &id, "--fields", r#"{"guest_email": null}"#])
        .assert()
        .success();

    cmt(&dir)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane"))
        .stdout(predicate::str::contains("jane@example.com").not());
}

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();

    cmt(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join(".cmt/config.toml").exists());

    cmt(&dir)
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"soft_deletes\": true"));
}

#[test]
fn test_unknown_comment_fails() {
    let dir = TempDir::new().unwrap();
    cmt(&dir)
        .args(["approve", "6f1c2a52-0c5e-4b8e-9d0e-3f2d1f0a9b11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
