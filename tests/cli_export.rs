//! CLI integration tests for notebook export.
//!
//! These tests spawn the `ipynb_api` binary as a subprocess inside a
//! temporary working directory to verify exit statuses, console messages, and
//! the files each run produces.

mod support;

use std::path::Path;
use std::process::{Command, Output};

use ipynb_api::export::test_helpers::NotebookBuilder;
use rstest::rstest;

use support::{create_temp_dir, write_file};

fn run_exporter(working_dir: &Path, args: &[&str]) -> Output {
    run_exporter_with_env(working_dir, args, &[])
}

fn run_exporter_with_env(working_dir: &Path, args: &[&str], vars: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ipynb_api"));
    command
        .args(args)
        .current_dir(working_dir)
        .env_remove("IPYNB_API_LOG")
        .env_remove("IPYNB_API_LOG_FORMAT")
        .envs(vars.iter().copied());

    command
        .output()
        .unwrap_or_else(|error| panic!("failed to execute binary: {error}"))
}

fn sample_notebook() -> String {
    NotebookBuilder::new()
        .language("python")
        .markdown("# Quarterly figures\n\nTotals per region.")
        .code("totals = {'north': 3, 'south': 4}\nprint(sum(totals.values()))")
        .stream("stdout", "7\n")
        .to_json()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_exit_code(output: &Output, expected: i32) {
    assert_eq!(
        output.status.code(),
        Some(expected),
        "unexpected exit status: {:?}\nstdout: {}\nstderr: {}",
        output.status,
        stdout_of(output),
        stderr_of(output)
    );
}

fn read_output(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|error| panic!("failed to read {}: {error}", path.display()))
}

const SAMPLE_MARKDOWN: &str = "# Quarterly figures\n\nTotals per region.\n\n```python\ntotals = {'north': 3, 'south': 4}\nprint(sum(totals.values()))\n```\n\n```\n7\n```\n";

fn create_dir(path: &Path) {
    std::fs::create_dir_all(path)
        .unwrap_or_else(|error| panic!("failed to create {}: {error}", path.display()));
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) {
    std::os::unix::fs::symlink(target, link)
        .unwrap_or_else(|error| panic!("failed to link {}: {error}", link.display()));
}

#[test]
fn missing_notebook_exits_with_failure_and_writes_nothing() {
    let temp_dir = create_temp_dir();

    let output = run_exporter(temp_dir.path(), &["absent.ipynb"]);

    assert_exit_code(&output, 1);
    assert!(
        stderr_of(&output).contains(
            "The path 'absent.ipynb' wasn't found or doesn't exist, or this is not a .ipynb file"
        ),
        "unexpected stderr: {}",
        stderr_of(&output)
    );
    assert!(!temp_dir.path().join("absent.md").exists());
}

#[rstest]
#[case::text_file("notes.txt")]
#[case::uppercase_extension("notes.IPYNB")]
#[case::no_extension("notes")]
fn wrong_extension_exits_with_failure(#[case] name: &str) {
    let temp_dir = create_temp_dir();
    write_file(temp_dir.path(), name, &sample_notebook());

    let output = run_exporter(temp_dir.path(), &[name]);

    assert_exit_code(&output, 1);
    assert!(
        stderr_of(&output).contains("wasn't found or doesn't exist"),
        "unexpected stderr: {}",
        stderr_of(&output)
    );
    assert!(!temp_dir.path().join("notes.md").exists());
}

#[test]
fn default_output_uses_notebook_stem_in_working_directory() {
    let temp_dir = create_temp_dir();
    std::fs::create_dir(temp_dir.path().join("notebooks"))
        .unwrap_or_else(|error| panic!("failed to create directory: {error}"));
    write_file(temp_dir.path(), "notebooks/report.ipynb", &sample_notebook());

    let output = run_exporter(temp_dir.path(), &["notebooks/report.ipynb"]);

    assert_exit_code(&output, 0);
    assert_eq!(
        stdout_of(&output),
        "The notebook 'notebooks/report.ipynb' was exported to markdown 'report.md'\n"
    );
    assert_eq!(
        read_output(&temp_dir.path().join("report.md")),
        SAMPLE_MARKDOWN
    );
    assert!(!temp_dir.path().join("notebooks/report.md").exists());
}

#[test]
fn explicit_output_overrides_default_name() {
    let temp_dir = create_temp_dir();
    write_file(temp_dir.path(), "report.ipynb", &sample_notebook());

    let output = run_exporter(
        temp_dir.path(),
        &["report.ipynb", "--output", "custom.md", "--type", "markdown"],
    );

    assert_exit_code(&output, 0);
    assert!(temp_dir.path().join("custom.md").exists());
    assert!(!temp_dir.path().join("report.md").exists());
    assert!(
        stdout_of(&output).contains("'custom.md'"),
        "unexpected stdout: {}",
        stdout_of(&output)
    );
}

#[test]
fn unsupported_type_is_a_usage_error() {
    let temp_dir = create_temp_dir();
    write_file(temp_dir.path(), "report.ipynb", &sample_notebook());

    let output = run_exporter(temp_dir.path(), &["report.ipynb", "--type", "html"]);

    assert_exit_code(&output, 2);
    assert!(
        stderr_of(&output).contains("invalid value 'html'"),
        "unexpected stderr: {}",
        stderr_of(&output)
    );
    assert!(!temp_dir.path().join("report.md").exists());
}

#[test]
fn missing_positional_argument_is_a_usage_error() {
    let temp_dir = create_temp_dir();

    let output = run_exporter(temp_dir.path(), &[]);

    assert_exit_code(&output, 2);
    assert!(
        stderr_of(&output).contains("Usage"),
        "unexpected stderr: {}",
        stderr_of(&output)
    );
}

#[test]
fn malformed_notebook_exits_with_failure() {
    let temp_dir = create_temp_dir();
    write_file(temp_dir.path(), "broken.ipynb", "{ \"cells\": [");

    let output = run_exporter(temp_dir.path(), &["broken.ipynb"]);

    assert_exit_code(&output, 1);
    assert!(
        stderr_of(&output).contains("failed to parse notebook"),
        "unexpected stderr: {}",
        stderr_of(&output)
    );
}

#[test]
fn parsed_arguments_are_logged_to_stderr() {
    let temp_dir = create_temp_dir();
    write_file(temp_dir.path(), "report.ipynb", &sample_notebook());

    let output = run_exporter(temp_dir.path(), &["report.ipynb"]);

    assert_exit_code(&output, 0);
    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("parsed arguments") && stderr.contains("report.ipynb"),
        "expected argument echo on stderr, got: {stderr}"
    );
    assert!(
        !stdout_of(&output).contains("parsed arguments"),
        "log lines must not reach stdout"
    );
}

#[test]
fn argument_echo_follows_log_filter() {
    let temp_dir = create_temp_dir();
    write_file(temp_dir.path(), "report.ipynb", &sample_notebook());

    let output = run_exporter_with_env(
        temp_dir.path(),
        &["report.ipynb"],
        &[("IPYNB_API_LOG", "warn")],
    );

    assert_exit_code(&output, 0);
    assert!(
        !stderr_of(&output).contains("parsed arguments"),
        "unexpected stderr: {}",
        stderr_of(&output)
    );
}

#[rstest]
#[case::unknown_format(&[("IPYNB_API_LOG_FORMAT", "pretty")], "unknown IPYNB_API_LOG_FORMAT")]
#[case::invalid_filter(&[("IPYNB_API_LOG", "ipynb_api=notalevel")], "invalid IPYNB_API_LOG")]
fn bad_logging_settings_warn_and_still_export(
    #[case] vars: &[(&str, &str)],
    #[case] warning: &str,
) {
    let temp_dir = create_temp_dir();
    write_file(temp_dir.path(), "report.ipynb", &sample_notebook());

    let output = run_exporter_with_env(temp_dir.path(), &["report.ipynb"], vars);

    assert_exit_code(&output, 0);
    assert!(
        stderr_of(&output).contains(warning),
        "expected warning '{warning}', got: {}",
        stderr_of(&output)
    );
    assert_eq!(
        read_output(&temp_dir.path().join("report.md")),
        SAMPLE_MARKDOWN
    );
}

#[test]
fn repeated_exports_are_byte_identical() {
    let temp_dir = create_temp_dir();
    write_file(temp_dir.path(), "report.ipynb", &sample_notebook());
    let destination = temp_dir.path().join("report.md");

    let first = run_exporter(temp_dir.path(), &["report.ipynb"]);
    let first_content = read_output(&destination);
    let second = run_exporter(temp_dir.path(), &["report.ipynb"]);
    let second_content = read_output(&destination);

    assert_exit_code(&first, 0);
    assert_exit_code(&second, 0);
    assert_eq!(first_content, second_content);
}

#[cfg(unix)]
#[test]
fn symlinked_notebook_outside_working_directory_is_exported() {
    let temp_dir = create_temp_dir();
    let work = temp_dir.path().join("work");
    create_dir(&work);
    create_dir(&temp_dir.path().join("store"));
    let target = write_file(temp_dir.path(), "store/real.ipynb", &sample_notebook());
    symlink(&target, &work.join("link.ipynb"));

    let output = run_exporter(&work, &["link.ipynb"]);

    assert_exit_code(&output, 0);
    assert_eq!(read_output(&work.join("link.md")), SAMPLE_MARKDOWN);
}

#[cfg(unix)]
#[test]
fn output_below_symlinked_directory_is_written() {
    let temp_dir = create_temp_dir();
    let work = temp_dir.path().join("work");
    let real_exports = temp_dir.path().join("real_exports");
    create_dir(&work);
    create_dir(&real_exports);
    symlink(&real_exports, &work.join("exports"));
    write_file(&work, "report.ipynb", &sample_notebook());

    let output = run_exporter(&work, &["report.ipynb", "--output", "exports/sub/out.md"]);

    assert_exit_code(&output, 0);
    assert_eq!(read_output(&real_exports.join("sub/out.md")), SAMPLE_MARKDOWN);
}

#[test]
fn output_with_parent_component_and_missing_directory_is_written() {
    let temp_dir = create_temp_dir();
    let work = temp_dir.path().join("work");
    create_dir(&work);
    write_file(&work, "report.ipynb", &sample_notebook());

    let output = run_exporter(&work, &["report.ipynb", "--output", "../exports/out.md"]);

    assert_exit_code(&output, 0);
    assert_eq!(
        read_output(&temp_dir.path().join("exports/out.md")),
        SAMPLE_MARKDOWN
    );
}
