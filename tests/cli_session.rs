// Drives the compiled binary with piped stdin inside a scratch working
// directory. Without a TTY the console prints plain text and never clears.
use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn wordrill(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wordrill").unwrap();
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join("config"))
        .arg("--config")
        .arg(workdir.join("config.json"));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "exit status: {:?}", output.status);
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn exit_choice_ends_cleanly() {
    let dir = tempdir().unwrap();
    let out = stdout_of(wordrill(dir.path()).write_stdin("4\n"));

    assert!(out.contains("Typing Trainer Menu:"));
    assert!(out.contains("Goodbye!"));
    // schema is created on startup even before any practice
    assert!(dir.path().join("typing_records.db").exists());
}

#[test]
fn end_of_input_ends_cleanly() {
    let dir = tempdir().unwrap();
    let out = stdout_of(wordrill(dir.path()).write_stdin(""));
    assert!(!out.contains("Goodbye!"));
}

#[test]
fn missing_word_list_refuses_practice() {
    let dir = tempdir().unwrap();
    let out = stdout_of(wordrill(dir.path()).write_stdin("1\n4\n"));
    assert!(out.contains("No words found for practice. Make sure the file is not empty."));
}

#[test]
fn practice_then_view_records() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "cat\n").unwrap();

    let out = stdout_of(wordrill(dir.path()).write_stdin("1\n\ncat\ncta\ncat\n2\n4\n"));

    assert!(out.contains("Repetition 1/2 / cat"));
    assert!(out.contains("Repetition 2/2 / cat"));
    assert!(out.contains("INCORRECT! The attempt does not count. Try again."));
    assert!(out.contains("Summary for 'cat':"));
    assert!(out.contains("Final Results for this session:"));
    assert!(out.contains("Average Accuracy (%)"));
    assert!(out.contains("Best Accuracy (%)"));
    assert!(out.contains("100.00"));

    // records persist for the next run
    let out = stdout_of(wordrill(dir.path()).write_stdin("2\n4\n"));
    assert!(out.contains("cat"));
    assert!(out.contains("100.00"));
}

#[test]
fn repetitions_flag_overrides_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "ab\n").unwrap();

    let out = stdout_of(
        wordrill(dir.path())
            .args(["--repetitions", "3"])
            .write_stdin("1\n\nab\nab\nab\n4\n"),
    );
    assert!(out.contains("Repetition 3/3 / ab"));
    assert!(out.contains("Final Results for this session:"));
}

#[test]
fn modify_word_list_through_menu() {
    let dir = tempdir().unwrap();
    let out = stdout_of(wordrill(dir.path()).write_stdin("3\n1\nrhythm\n1\nqueue\n2\n1\n3\n4\n4\n"));

    assert!(out.contains("Word 'rhythm' added."));
    assert!(out.contains("Word 'rhythm' removed."));
    assert_eq!(
        fs::read_to_string(dir.path().join("words.txt")).unwrap(),
        "queue\n"
    );
}

#[test]
fn zero_repetitions_is_rejected() {
    let dir = tempdir().unwrap();
    wordrill(dir.path())
        .args(["--repetitions", "0"])
        .write_stdin("4\n")
        .assert()
        .failure();
}

#[test]
fn save_config_persists_overrides_for_later_runs() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "ab\n").unwrap();

    stdout_of(
        wordrill(dir.path())
            .args(["--repetitions", "3", "--save-config"])
            .write_stdin("4\n"),
    );
    let saved = fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(saved.contains("\"repetitions_per_word\": 3"), "{saved}");

    // no flags this time; the stored setting applies
    let out = stdout_of(wordrill(dir.path()).write_stdin("1\n\nab\nab\nab\n4\n"));
    assert!(out.contains("Repetition 3/3 / ab"));
}
