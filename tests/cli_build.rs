//! End-to-end tests driving the compiled `docbuild` binary.
//!
//! A small POSIX shell script stands in for pandoc: it writes its last
//! argument (the output path) and fails for any input under a `broken/`
//! directory. It is run as `sh <script>`, configured through
//! `docbuild.toml`, so the test never executes a freshly written file.
//!
//! Run with: cargo test --test cli_build

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const FAKE_PANDOC: &str = r#"for last; do :; done
case "$*" in
  */broken/*) echo "fake-pandoc: refusing to render" >&2; exit 43 ;;
esac
echo "<html>rendered</html>" > "$last"
"#;

struct Site {
    tmp: TempDir,
}

impl Site {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join(".tools/fake-pandoc.sh");
        fs::create_dir_all(script.parent().unwrap()).unwrap();
        fs::write(&script, FAKE_PANDOC).unwrap();
        fs::write(
            tmp.path().join("docbuild.toml"),
            format!(
                "[renderer]\ncommand = [\"sh\", \"{}\"]\n",
                script.display()
            ),
        )
        .unwrap();
        fs::write(tmp.path().join("pandoc.yaml"), "toc-title: Contents\n").unwrap();
        Self { tmp }
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn add_document(&self, dir: &str) -> PathBuf {
        let path = self.root().join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("index.md"), format!("# {dir}\n")).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_docbuild"))
            .arg("--root")
            .arg(self.root())
            .args(args)
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn builds_missing_outputs_then_skips_them() {
    let site = Site::new();
    let intro = site.add_document("docs/intro");

    let first = site.run(&["build"]);
    assert!(first.status.success(), "stdout: {}", stdout(&first));
    assert!(stdout(&first).contains("Building docs/intro..."));

    let html = intro.join("index.html");
    assert_eq!(
        fs::read_to_string(&html).unwrap(),
        "<html>rendered</html>\n"
    );
    let source_mtime = fs::metadata(intro.join("index.md")).unwrap().modified().unwrap();
    assert!(fs::metadata(&html).unwrap().modified().unwrap() >= source_mtime);

    // Nothing changed: second run renders nothing
    let second = site.run(&[]);
    assert!(second.status.success());
    let out = stdout(&second);
    assert!(out.contains("Skipping docs/intro..."), "stdout: {out}");
    assert!(!out.contains("Building"));
    assert!(out.contains("0 built, 1 skipped, 0 failed"));
}

#[test]
fn failed_document_does_not_stop_the_build() {
    let site = Site::new();
    let broken = site.add_document("docs/broken");
    let fine = site.add_document("docs/fine");

    let output = site.run(&["build"]);

    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Building docs/broken..."), "stdout: {out}");
    assert!(out.contains("Failed docs/broken (renderer exited with code 43)"));
    assert!(out.contains("Building docs/fine..."));
    assert!(out.contains("1 built, 0 skipped, 1 failed"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("fake-pandoc: refusing"));

    assert!(!broken.join("index.html").exists());
    assert!(fine.join("index.html").exists());
}

#[test]
fn check_reports_without_rendering() {
    let site = Site::new();
    let intro = site.add_document("docs/intro");

    let output = site.run(&["check"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("build docs/intro (output missing)"), "stdout: {out}");
    assert!(out.contains("1 to build, 0 up to date"));
    assert!(!intro.join("index.html").exists());
}

#[test]
fn force_rebuilds_fresh_documents() {
    let site = Site::new();
    site.add_document("a");
    assert!(site.run(&["build"]).status.success());

    let output = site.run(&["build", "--force"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("1 built, 0 skipped, 0 failed"));
}

#[test]
fn missing_root_is_an_error() {
    let site = Site::new();
    let output = Command::new(env!("CARGO_BIN_EXE_docbuild"))
        .arg("--root")
        .arg(site.root().join("nope"))
        .arg("build")
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn gen_config_prints_loadable_defaults() {
    let output = Command::new(env!("CARGO_BIN_EXE_docbuild"))
        .arg("gen-config")
        .output()
        .unwrap();
    assert!(output.status.success());

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("docbuild.toml");
    fs::write(&path, &output.stdout).unwrap();
    let config = docbuild::config::load_config_file(&path).unwrap();
    assert_eq!(config, docbuild::config::BuildConfig::default());
}
