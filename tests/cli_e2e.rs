//! End-to-end CLI tests for the page-loader binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Binary command isolated from the user's config file.
fn page_loader(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("page-loader").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

async fn site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cursos"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            br#"<html><body><img src="/assets/nodejs.png"><script src="/missing.js"></script></body></html>"#
                .to_vec(),
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/nodejs.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 16]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing.js"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    server
}

#[test]
fn test_binary_help_displays_usage() {
    let config = TempDir::new().unwrap();
    page_loader(&config)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Save a web page for offline use"));
}

#[test]
fn test_binary_version_displays_version() {
    let config = TempDir::new().unwrap();
    page_loader(&config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("page-loader"));
}

#[test]
fn test_binary_without_url_fails() {
    let config = TempDir::new().unwrap();
    page_loader(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[test]
fn test_binary_invalid_url_reports_error() {
    let config = TempDir::new().unwrap();
    page_loader(&config)
        .arg("not a url")
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error: invalid page URL"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_prints_saved_page_path() {
    let server = site().await;
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let url = format!("{}/cursos", server.uri());
    let port = server.address().port();
    let page_name = format!("127-0-0-1-{port}-cursos");

    page_loader(&config)
        .args(["--no-progress", "-o"])
        .arg(out.path())
        .arg(&url)
        .assert()
        .success()
        .stdout(predicate::str::ends_with(format!("{page_name}.html\n")))
        .stderr(predicate::str::contains("Failed to download").and(
            predicate::str::contains("missing.js"),
        ));

    let files_dir = out.path().join(format!("{page_name}_files"));
    assert_eq!(
        std::fs::read(files_dir.join(format!("127-0-0-1-{port}-assets-nodejs.png"))).unwrap(),
        vec![7u8; 16]
    );
    let html = std::fs::read_to_string(out.path().join(format!("{page_name}.html"))).unwrap();
    assert!(html.contains(&format!(
        r#"src="{page_name}_files/127-0-0-1-{port}-missing.js""#
    )));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_strict_flag_fails_on_resource_error() {
    let server = site().await;
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    page_loader(&config)
        .args(["--strict", "-q", "-o"])
        .arg(out.path())
        .arg(format!("{}/cursos", server.uri()))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("1 of 2 resources failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_page_404_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    page_loader(&config)
        .arg("-o")
        .arg(out.path())
        .arg(format!("{}/nope", server.uri()))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("HTTP 404"));

    assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_reads_output_dir_from_config_file() {
    let server = site().await;
    let config = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let config_dir = config.path().join("page-loader");
    std::fs::create_dir(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!("output_dir = \"{}\"\nconcurrency = 2\n", out.path().display()),
    )
    .unwrap();

    page_loader(&config)
        .arg("--no-progress")
        .arg(format!("{}/cursos", server.uri()))
        .assert()
        .success()
        .stdout(predicate::str::starts_with(out.path().to_string_lossy().into_owned()));
}

#[test]
fn test_binary_rejects_bad_config_file() {
    let config = TempDir::new().unwrap();
    let config_dir = config.path().join("page-loader");
    std::fs::create_dir(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "retries = 3\n").unwrap();

    page_loader(&config)
        .arg("http://codica.la/cursos")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown configuration key"));
}
