//! HTTP API over a real socket

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tiny_http::Server;
use unicorn_draw::server::{self, AppContext};
use unicorn_draw::{codec, Drawing, MemoryStore, ServerConfig};

struct TestServer {
    base: String,
    _root: tempfile::TempDir,
}

fn start_test_server(secret: Option<&str>) -> TestServer {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "<!doctype html><title>draw</title>").unwrap();
    std::fs::write(root.path().join("style.css"), "body{}").unwrap();

    let config = ServerConfig {
        bind: "127.0.0.1".into(),
        port: 0,
        public_root: Some(root.path().to_path_buf()),
        secret: secret.map(str::to_string),
        ephemeral: true,
        body_limit: 4096,
        workers: 2,
        ..Default::default()
    };
    let ctx = AppContext::with_store(config, Box::new(MemoryStore::new(50))).unwrap();
    let server = Server::http("127.0.0.1:0").unwrap();
    let base = format!("http://{}", server.server_addr());
    // workers run detached for the rest of the test process
    let _workers = server::serve(Arc::new(server), Arc::new(ctx), 2);

    TestServer { base, _root: root }
}

fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

#[test]
fn latest_round_trip_with_headers() {
    let srv = start_test_server(None);
    let c = client();

    let resp = c.get(format!("{}/api/latest", srv.base)).send().unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    assert_eq!(resp.headers()["cache-control"], "no-store, max-age=0");
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert_eq!(resp.headers()["referrer-policy"], "no-referrer");
    assert_eq!(resp.json::<Value>().unwrap()["error"], "no latest yet");

    let mut d = Drawing::blank();
    d.pixels[10] = 1;
    let resp = c
        .put(format!("{}/api/latest", srv.base))
        .body(serde_json::to_vec(&d).unwrap())
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let got: Value = c.get(format!("{}/api/latest", srv.base)).send().unwrap().json().unwrap();
    assert_eq!(Drawing::normalize(&got), d);

    let legacy: Value = c
        .get(format!("{}/drawings/latest.json", srv.base))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(legacy, got);
}

#[test]
fn oversized_body_is_413() {
    let srv = start_test_server(None);
    let resp = client()
        .post(format!("{}/api/latest", srv.base))
        .body(vec![b' '; 5000])
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 413);
}

#[test]
fn gallery_flow_and_rotation() {
    let srv = start_test_server(Some("display-key"));
    let c = client();

    let mut ids = Vec::new();
    for (i, artist) in ["ann", "bo"].iter().enumerate() {
        let mut d = Drawing::blank();
        d.pixels[i] = 1;
        let resp: Value = c
            .post(format!("{}/api/submit", srv.base))
            .json(&json!({ "artist": artist, "drawing": d }))
            .send()
            .unwrap()
            .json()
            .unwrap();
        ids.push(resp["id"].as_str().unwrap().to_string());
    }

    let list: Vec<Value> = c.get(format!("{}/api/gallery", srv.base)).send().unwrap().json().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|s| s.get("drawing").is_none()));

    let art: Value = c
        .get(format!("{}/api/artwork/{}", srv.base, ids[1]))
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(art["artist"], "bo");
    let token = codec::encode(&Drawing::normalize(&art["drawing"]));
    assert_eq!(codec::decode(&token).pixels[1], 1);

    let resp = c.get(format!("{}/api/next?secret=wrong", srv.base)).send().unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let mut seen = Vec::new();
    for _ in 0..2 {
        let art: Value = c
            .get(format!("{}/api/next?secret=display-key", srv.base))
            .send()
            .unwrap()
            .json()
            .unwrap();
        seen.push(art["id"].as_str().unwrap().to_string());
    }
    seen.sort();
    let mut expected = ids.clone();
    expected.sort();
    assert_eq!(seen, expected);

    let current: Value = c.get(format!("{}/api/current", srv.base)).send().unwrap().json().unwrap();
    assert_eq!(current["display_count"], 1);
}

#[test]
fn static_files_and_unknown_routes() {
    let srv = start_test_server(None);
    let c = client();

    let resp = c.get(format!("{}/", srv.base)).send().unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
    assert!(resp.headers().get("cache-control").is_none());
    assert!(resp.text().unwrap().contains("draw"));

    let resp = c.get(format!("{}/style.css", srv.base)).send().unwrap();
    assert_eq!(resp.headers()["content-type"], "text/css; charset=utf-8");

    assert_eq!(c.get(format!("{}/missing.js", srv.base)).send().unwrap().status().as_u16(), 404);
    assert_eq!(c.get(format!("{}/api/nope", srv.base)).send().unwrap().status().as_u16(), 404);
    assert_eq!(c.delete(format!("{}/api/gallery", srv.base)).send().unwrap().status().as_u16(), 405);
}
