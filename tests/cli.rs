use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

fn numbered(count: usize) -> String {
    (1..=count)
        .map(|i| format!("line {i}"))
        .collect::<Vec<String>>()
        .join("\n")
}

fn write(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("can create parent directories");
    }
    fs::write(path, contents).expect("can write file");
}

fn read_part(docx: &Path, name: &str) -> String {
    let file = fs::File::open(docx).expect("can open docx");
    let mut archive = zip::ZipArchive::new(file).expect("docx is a zip package");
    let mut contents = String::default();
    archive
        .by_name(name)
        .expect("package has the part")
        .read_to_string(&mut contents)
        .expect("part is utf-8");
    contents
}

fn command() -> Command {
    Command::cargo_bin("copyright-code").expect("binary exists")
}

#[test]
fn small_tree_is_rendered_whole() {
    let source = TempDir::new().expect("can create source dir");
    write(source.path(), "a.py", numbered(20));
    write(source.path(), "b.py", numbered(20));
    write(source.path(), "pkg/c.py", numbered(20));
    let out = TempDir::new().expect("can create output dir");
    let docx = out.path().join("small.docx");

    command()
        .arg(source.path())
        .arg("-o")
        .arg(&docx)
        .args(["-n", "MyApp", "-v", "V2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 source files"))
        .stdout(predicate::str::contains("Total lines collected: 69"))
        .stdout(predicate::str::contains("Total pages: 2"))
        .stdout(predicate::str::contains("Selected pages: 2"))
        .stdout(predicate::str::contains("Done!"));

    let document = read_part(&docx, "word/document.xml");
    assert_eq!(document.matches("<w:p>").count(), 69);
    assert_eq!(document.matches("<w:pageBreakBefore/>").count(), 1);
    assert!(document.contains(">// File: pkg/c.py<"));

    let header = read_part(&docx, "word/header1.xml");
    assert!(header.contains("MyApp V2.0"));
    let footer = read_part(&docx, "word/footer1.xml");
    assert!(footer.contains(" PAGE "));
}

#[test]
fn large_tree_keeps_first_and_last_thirty_pages() {
    let source = TempDir::new().expect("can create source dir");
    write(source.path(), "big.rs", numbered(4000));
    let out = TempDir::new().expect("can create output dir");
    let docx = out.path().join("big.docx");

    command()
        .arg(source.path())
        .arg("--output")
        .arg(&docx)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total lines collected: 4003"))
        .stdout(predicate::str::contains("Total pages: 81"))
        .stdout(predicate::str::contains(
            "Selected pages: 60 (lines 1-1500 and 2504-4003 of 4003)",
        ));

    let document = read_part(&docx, "word/document.xml");
    assert_eq!(document.matches("<w:p>").count(), 3000);
    assert_eq!(document.matches("<w:pageBreakBefore/>").count(), 59);
    // line 1500 of the sequence is content line 1498; the tail starts at
    // sequence line 2504, content line 2502
    assert!(document.contains(">line 1498<"));
    assert!(!document.contains(">line 1499<"));
    assert!(!document.contains(">line 2501<"));
    assert!(document.contains(">line 2502<"));
    assert!(document.contains(">line 4000<"));

    let header = read_part(&docx, "word/header1.xml");
    assert!(header.contains("软件名称 V1.0"));
}

#[test]
fn runs_are_byte_identical() {
    let source = TempDir::new().expect("can create source dir");
    write(source.path(), "src/main.rs", "fn main() {\n\tprintln!(\"hi\");\n}\n");
    write(source.path(), "src/util/mod.rs", "pub mod strings;");
    write(source.path(), "README.md", "# Demo");
    let out = TempDir::new().expect("can create output dir");
    let first = out.path().join("first.docx");
    let second = out.path().join("second.docx");

    for docx in [&first, &second] {
        command()
            .arg(source.path())
            .arg("-o")
            .arg(docx)
            .arg("-q")
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    assert_eq!(
        fs::read(&first).expect("can read first"),
        fs::read(&second).expect("can read second")
    );
}

#[test]
fn missing_source_directory_fails() {
    let out = TempDir::new().expect("can create output dir");
    command()
        .arg(out.path().join("does-not-exist"))
        .arg("-o")
        .arg(out.path().join("x.docx"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Source directory not found"));
}

#[test]
fn tree_without_source_files_fails() {
    let source = TempDir::new().expect("can create source dir");
    write(source.path(), "image.png", [0x89u8, b'P', b'N', b'G']);
    write(source.path(), "node_modules/lib/index.js", "module.exports = {};");
    let out = TempDir::new().expect("can create output dir");
    let docx = out.path().join("x.docx");

    command()
        .arg(source.path())
        .arg("-o")
        .arg(&docx)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No source code files found"));
    assert!(!docx.exists());
}

#[test]
fn unwritable_output_fails_with_context() {
    let source = TempDir::new().expect("can create source dir");
    write(source.path(), "main.go", "package main");
    let out = TempDir::new().expect("can create output dir");

    command()
        .arg(source.path())
        .arg("-o")
        .arg(out.path().join("missing-dir").join("x.docx"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to render DOCX"))
        .stderr(predicate::str::contains("Failed to create output file"));
}

#[test]
fn configuration_file_supplies_defaults_and_exclusions() {
    let source = TempDir::new().expect("can create source dir");
    write(source.path(), "src/app.ts", "export const app = 1;");
    write(source.path(), "generated/schema.ts", "export type Schema = {};");
    let out = TempDir::new().expect("can create output dir");
    let docx = out.path().join("configured.docx");
    let config = out.path().join("copyright-code.toml");
    fs::write(
        &config,
        format!(
            "[document]\nname = \"Configured\"\nversion = \"V7\"\noutfile = {:?}\n\n[source]\nexclude = [\"generated\"]\n",
            docx.display().to_string()
        ),
    )
    .expect("can write config");

    command()
        .arg(source.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 source files"));

    let document = read_part(&docx, "word/document.xml");
    assert!(document.contains(">// File: src/app.ts<"));
    assert!(!document.contains("schema.ts"));
    assert!(read_part(&docx, "word/header1.xml").contains("Configured V7"));
}

#[test]
fn invalid_configuration_is_reported() {
    let source = TempDir::new().expect("can create source dir");
    write(source.path(), "main.rs", "fn main() {}");
    let out = TempDir::new().expect("can create output dir");
    let config = out.path().join("bad.toml");
    fs::write(&config, "[document\nname = 1").expect("can write config");

    command()
        .arg(source.path())
        .arg("-c")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse TOML"));
}
