//! CLI end-to-end tests
//!
//! Runs the mediascore binary, with providers pointed at a local mock server.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get a command for the mediascore binary with a clean environment.
#[allow(deprecated)]
fn mediascore_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mediascore").unwrap();
    cmd.env("HOME", home)
        .env_remove("OMDB_API_KEY")
        .env_remove("USER_CACHE_DIR")
        .env_remove("DEBUG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_flag() {
    let home = tempdir().unwrap();
    mediascore_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mediascore"))
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--clean"));
}

#[test]
fn test_cli_version_flag() {
    let home = tempdir().unwrap();
    mediascore_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mediascore"));
}

#[test]
fn test_cli_no_dirs_prints_usage() {
    let home = tempdir().unwrap();
    mediascore_cmd(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_missing_api_key_is_fatal() {
    let home = tempdir().unwrap();
    let media = tempdir().unwrap();
    mediascore_cmd(home.path())
        .arg(media.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("OMDB_API_KEY"));
}

#[test]
fn test_cli_missing_directory_is_fatal() {
    let home = tempdir().unwrap();
    let media = tempdir().unwrap();
    mediascore_cmd(home.path())
        .env("OMDB_API_KEY", "test-key")
        .env("USER_CACHE_DIR", home.path().join("cache"))
        .arg(media.path().join("nope"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read directory"));
}

#[test]
fn test_cli_empty_directory_prints_nothing() {
    let home = tempdir().unwrap();
    let media = tempdir().unwrap();
    mediascore_cmd(home.path())
        .env("OMDB_API_KEY", "test-key")
        .env("USER_CACHE_DIR", home.path().join("cache"))
        .arg(media.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(home.path().join("cache/MediaScore/movie.db").exists());
    assert!(home.path().join("cache/MediaScore/tv.db").exists());
}

/// Mount one movie's worth of provider responses. Each provider may only be
/// hit once across all runs in a test.
async fn mount_matrix(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("t", "The Matrix"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Title": "The Matrix",
            "Year": "1999",
            "imdbRating": "8.7",
            "tomatoRating": "N/A",
            "tomatoURL": "N/A",
            "Response": "True"
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/m/The_Matrix"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<span class="mop-ratings-wrap__percentage mop-ratings-wrap__percentage--audience">85%</span>"#,
        ))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/movie/The%20Matrix/results"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="result"><a href="/movie/the-matrix">The Matrix</a></div>"#,
        ))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/the-matrix"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="phead_summary"><span class="metascore_w">73</span></div>"#,
        ))
        .expect(1)
        .mount(server)
        .await;
}

fn write_config(dir: &TempDir, server: &MockServer) -> std::path::PathBuf {
    let config = dir.path().join("mediascore.toml");
    fs::write(
        &config,
        format!(
            r#"
[pipeline]
workers = 2

[providers]
omdb = "{uri}/"
imdb_suggest = "{uri}"
rotten_tomatoes = "{uri}"
metacritic = "{uri}"
"#,
            uri = server.uri()
        ),
    )
    .unwrap();
    config
}

async fn run(mut cmd: Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_renders_ratings_and_reuses_cache() {
    let server = MockServer::start().await;
    mount_matrix(&server).await;

    let home = tempdir().unwrap();
    let media = tempdir().unwrap();
    fs::write(media.path().join("The.Matrix.1999.1080p.mkv"), b"").unwrap();
    fs::write(media.path().join("The.Matrix.1999.1080p.nfo"), b"").unwrap();
    let config = write_config(&home, &server);

    let command = || {
        let mut cmd = mediascore_cmd(home.path());
        cmd.env("OMDB_API_KEY", "test-key")
            .env("USER_CACHE_DIR", home.path().join("cache"))
            .arg("--config")
            .arg(&config)
            .arg(media.path());
        cmd
    };

    let expected_row = "| The Matrix | 1999 | 8.7         | 85        | 73                |";

    run(command())
        .await
        .assert()
        .success()
        .stdout(predicate::str::contains(expected_row))
        .stdout(predicate::str::contains("Movie Ratings"))
        .stdout(predicate::str::contains("TV Series Ratings").not());

    // Served from the cache: the mocks would fail their `expect(1)` otherwise.
    run(command())
        .await
        .assert()
        .success()
        .stdout(predicate::str::contains(expected_row));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_clean_forces_fresh_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Title": "Heat",
            "Year": "1995",
            "imdbRating": "8.3",
            "tomatoRating": "86",
            "Response": "True"
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/movie/Heat/results"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>none</p>"))
        .expect(2)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    let media = tempdir().unwrap();
    fs::write(media.path().join("Heat.1995.mkv"), b"").unwrap();
    let config = write_config(&home, &server);

    for _ in 0..2 {
        let mut cmd = mediascore_cmd(home.path());
        cmd.env("OMDB_API_KEY", "test-key")
            .env("USER_CACHE_DIR", home.path().join("cache"))
            .arg("--clean")
            .arg("--config")
            .arg(&config)
            .arg(media.path());

        run(cmd)
            .await
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "| Heat  | 1995 | 8.3         | 86        | N/A               |",
            ));
    }
}
