use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run(project: &Path, args: &[&str]) -> std::io::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_article-aggregator"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
}

#[test]
fn test_index_uses_project_order() -> std::io::Result<()> {
    let output = run(Path::new("./testdata/project"), &["index"])?;
    assert!(output.status.success());
    assert_eq!(
        "Second thoughts\tsecond-thoughts\nHello, world!\thello-world\n",
        String::from_utf8_lossy(&output.stdout)
    );
    Ok(())
}

#[test]
fn test_render_single_article() -> std::io::Result<()> {
    let output = run(
        Path::new("./testdata/project"),
        &["render", "--url", "hello-world"],
    )?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(2, stdout.matches("href=\"/posts/hello-world\"").count());
    assert!(!stdout.contains("second-thoughts"));
    Ok(())
}

#[test]
fn test_render_unknown_url_fails() -> std::io::Result<()> {
    let output = run(Path::new("./testdata/project"), &["render", "--url", "nope"])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn test_malformed_article_terminates() -> std::io::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("aggregator.yaml"), "{}")?;
    fs::create_dir(dir.path().join("articles"))?;
    fs::write(dir.path().join("articles").join("bad.json"), "{")?;

    let output = run(dir.path(), &["render"])?;
    assert_eq!(Some(1), output.status.code());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad.json"));
    Ok(())
}
