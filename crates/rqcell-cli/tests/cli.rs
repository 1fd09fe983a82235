//! End-to-end tests for the rqcell binary

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;
use tempfile::TempDir;

const POSTS_CELL: &str = r#"export const RQUERY = gql`
  query FindPosts {
    posts { id title }
  }
`
export const Loading = () => <div>Loading...</div>
export const Success = ({ posts }) => <ul>{posts.length}</ul>
"#;

const PLAIN_MODULE: &str = "export const Loading = () => null\n";

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let cells = temp.path().join("web/src/components/PostsCell");
    fs::create_dir_all(&cells).unwrap();
    fs::write(cells.join("PostsCell.jsx"), POSTS_CELL).unwrap();
    fs::write(temp.path().join("web/src/components/Spinner.js"), PLAIN_MODULE).unwrap();
    temp
}

fn rqcell(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rqcell");
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn transform_prints_cells_to_stdout() {
    let temp = project();
    rqcell(temp.path())
        .args(["transform", "web/src"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "import { withRQCell } from '@rwjsexperiments/react';",
        ))
        .stdout(predicate::str::contains("PostsCell.jsx"))
        .stdout(predicate::str::contains("Spinner.js").not())
        .stderr(predicate::str::contains("2 scanned, 1 rewritten, 0 failed"));

    // files on disk are untouched
    let on_disk = fs::read_to_string(temp.path().join("web/src/components/PostsCell/PostsCell.jsx")).unwrap();
    assert_eq!(on_disk, POSTS_CELL);
}

#[test]
fn check_fails_until_cells_are_written() {
    let temp = project();
    rqcell(temp.path())
        .args(["transform", "--check", "web/src"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("would be rewritten"));

    rqcell(temp.path())
        .args(["transform", "--write", "web/src"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrapped 1 cell(s)"));

    let written = fs::read_to_string(temp.path().join("web/src/components/PostsCell/PostsCell.jsx")).unwrap();
    assert!(written.contains("export default withRQCell("));
    assert!(written.contains(POSTS_CELL));
    assert_eq!(
        fs::read_to_string(temp.path().join("web/src/components/Spinner.js")).unwrap(),
        PLAIN_MODULE
    );

    // a wrapped Cell has a default export and is left alone
    rqcell(temp.path())
        .args(["transform", "--check", "web/src"])
        .assert()
        .success();
}

#[test]
fn out_dir_keeps_relative_paths() {
    let temp = project();
    rqcell(temp.path())
        .args(["transform", "--out-dir", "out", "web/src"])
        .assert()
        .success();

    let copy = temp.path().join("out/components/PostsCell/PostsCell.jsx");
    assert!(fs::read_to_string(copy).unwrap().contains("withRQCell"));
    assert!(!temp.path().join("out/components/Spinner.js").exists());
}

#[test]
fn out_dir_keeps_explicit_files_apart() {
    let temp = TempDir::new().unwrap();
    for dir in ["web/src/a/PostsCell", "web/src/b/UsersCell"] {
        fs::create_dir_all(temp.path().join(dir)).unwrap();
        fs::write(temp.path().join(dir).join("index.jsx"), POSTS_CELL).unwrap();
    }

    rqcell(temp.path())
        .args([
            "transform",
            "--out-dir",
            "out",
            "web/src/a/PostsCell/index.jsx",
            "web/src/b/UsersCell/index.jsx",
        ])
        .assert()
        .success();

    assert!(temp.path().join("out/web/src/a/PostsCell/index.jsx").exists());
    assert!(temp.path().join("out/web/src/b/UsersCell/index.jsx").exists());
}

#[test]
fn out_dir_refuses_colliding_targets() {
    let temp = TempDir::new().unwrap();
    for dir in ["one/PostsCell", "two/PostsCell"] {
        fs::create_dir_all(temp.path().join(dir)).unwrap();
        fs::write(temp.path().join(dir).join("PostsCell.jsx"), POSTS_CELL).unwrap();
    }

    rqcell(temp.path())
        .args(["transform", "--out-dir", "out", "one", "two"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("would both be written to"));

    assert!(!temp.path().join("out").exists());
}

#[test]
fn parse_failures_are_reported_and_counted() {
    let temp = project();
    fs::write(
        temp.path().join("web/src/components/Broken.js"),
        "export const RQUERY = (\n",
    )
    .unwrap();

    rqcell(temp.path())
        .args(["transform", "--out-dir", "out", "web/src"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Broken.js"))
        .stderr(predicate::str::contains("3 scanned, 1 rewritten, 1 failed"));

    assert!(temp.path().join("out/components/PostsCell/PostsCell.jsx").exists());
}

#[test]
fn config_file_changes_the_wrapper() {
    let temp = project();
    fs::write(
        temp.path().join("rqcell.toml"),
        "[transform]\nimport_source = \"@acme/cells\"\nwrapper = \"withCell\"\nsingle_quote = false\n",
    )
    .unwrap();

    rqcell(temp.path())
        .args(["transform", "web/src"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "import { withCell } from \"@acme/cells\";",
        ))
        .stdout(predicate::str::contains("export default withCell("));
}

#[test]
fn missing_path_is_an_error() {
    let temp = project();
    rqcell(temp.path())
        .args(["transform", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn key_prints_canonical_key() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("post.graphql"),
        "query FindPost($id: Int!) { post(id: $id) { id } }",
    )
    .unwrap();

    rqcell(temp.path())
        .args(["key", "post.graphql", "--variables", r#"{"z":true,"id":3}"#])
        .assert()
        .success()
        .stdout(r#"["FindPost",{"id":3,"z":true}]"#.to_string() + "\n");
}

#[test]
fn config_show_prints_defaults() {
    let temp = TempDir::new().unwrap();
    rqcell(temp.path())
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrapper = \"withRQCell\""))
        .stdout(predicate::str::contains("uri = \"/graphql\""))
        .stderr(predicate::str::contains("using defaults"));
}

#[test]
fn config_reads_package_json_and_env() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("package.json"),
        r#"{ "name": "web", "rqcell": { "client": { "uri": "/api/graphql" } } }"#,
    )
    .unwrap();

    rqcell(temp.path())
        .args(["config", "--show"])
        .env("RQCELL_CLIENT__STALE_TIME_MS", "5000")
        .assert()
        .success()
        .stdout(predicate::str::contains("uri = \"/api/graphql\""))
        .stdout(predicate::str::contains("stale_time_ms = 5000"))
        .stderr(predicate::str::contains("package.json"));
}

#[test]
fn invalid_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("rqcell.toml"), "[transform]\nwrapper = \"with-cell\"\n").unwrap();

    rqcell(temp.path())
        .args(["config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("transform.wrapper"));
}

#[test]
fn explicit_config_must_exist() {
    let temp = TempDir::new().unwrap();
    rqcell(temp.path())
        .args(["--config", "missing.toml", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

/// Serve one GraphQL response on a local port; returns the endpoint and
/// the raw request once it has been answered
fn graphql_server(body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}/graphql", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&request).to_string()
    });

    (uri, handle)
}

#[test]
fn query_prints_normalized_result() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("me.graphql"), "query Me { me { id } }").unwrap();
    let (uri, server) = graphql_server(r#"{"data":{"me":{"id":"u1"}}}"#);

    rqcell(temp.path())
        .args(["query", "me.graphql", "--token", "s3cret", "--auth-provider", "dbAuth"])
        .env("RQCELL_CLIENT__URI", &uri)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""loading": false"#))
        .stdout(predicate::str::contains(r#""status": "success""#))
        .stdout(predicate::str::contains(r#""id": "u1""#));

    let request = server.join().unwrap().to_ascii_lowercase();
    assert!(request.contains("authorization: bearer s3cret"));
    assert!(request.contains("auth-provider: dbauth"));
}

#[test]
fn query_needs_an_absolute_endpoint() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("me.graphql"), "query Me { me { id } }").unwrap();

    rqcell(temp.path())
        .args(["query", "me.graphql"])
        .env_remove("RQCELL_CLIENT__URI")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an absolute URL"))
        .stderr(predicate::str::contains("RQCELL_CLIENT__URI"));
}

#[test]
fn query_errors_exit_non_zero() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("me.graphql"), "query Me { me { id } }").unwrap();
    let (uri, server) = graphql_server(r#"{"data":null,"errors":[{"message":"Not authorized"}]}"#);

    rqcell(temp.path())
        .args(["query", "me.graphql"])
        .env("RQCELL_CLIENT__URI", &uri)
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""status": "error""#))
        .stderr(predicate::str::contains("Not authorized"));

    server.join().unwrap();
}
