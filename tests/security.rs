//! Integration tests for the security surface: fixed headers, HSTS, CORS,
//! CSP nonces, and rate limiting.

use std::net::SocketAddr;

use asset_server::config::schema::Environment;

mod common;

fn assert_fixed_headers(res: &reqwest::Response) {
    let headers = res.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");
    assert_eq!(
        headers.get("referrer-policy").unwrap(),
        "strict-origin-when-cross-origin"
    );
    assert_eq!(
        headers.get("x-permitted-cross-domain-policies").unwrap(),
        "none"
    );
    assert_eq!(
        headers.get("permissions-policy").unwrap(),
        "geolocation=(self), camera=(), microphone=(), payment=()"
    );
    assert!(headers.contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_fixed_headers_on_every_response() {
    let addr: SocketAddr = "127.0.0.1:28441".parse().unwrap();
    let root = tempfile::tempdir().unwrap();
    common::write_fixture_site(root.path());
    let shutdown = common::spawn_server(addr, root.path(), |_| {}).await;
    let client = common::client();

    let res = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_fixed_headers(&res);

    // Rejections carry the same headers.
    let res = client
        .get(format!("http://{}/assets/missing.js", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_fixed_headers(&res);

    shutdown.trigger();
}

#[tokio::test]
async fn test_nonce_differs_between_requests() {
    let addr: SocketAddr = "127.0.0.1:28442".parse().unwrap();
    let root = tempfile::tempdir().unwrap();
    common::write_fixture_site(root.path());
    let shutdown = common::spawn_server(addr, root.path(), |_| {}).await;
    let client = common::client();
    let url = format!("http://{}/", addr);

    let mut nonces = Vec::new();
    for _ in 0..2 {
        let res = client.get(&url).send().await.unwrap();
        let csp = res
            .headers()
            .get("content-security-policy")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let nonce = common::extract_nonce(&csp).unwrap();
        let body = res.text().await.unwrap();
        assert!(body.contains(&format!("nonce=\"{}\"", nonce)));
        nonces.push(nonce);
    }
    assert_ne!(nonces[0], nonces[1], "nonces must be single-use");

    shutdown.trigger();
}

#[tokio::test]
async fn test_hsts_in_production_only() {
    let root = tempfile::tempdir().unwrap();
    common::write_fixture_site(root.path());

    let prod_addr: SocketAddr = "127.0.0.1:28443".parse().unwrap();
    let prod_shutdown = common::spawn_server(prod_addr, root.path(), |config| {
        config.environment = Environment::Production;
    })
    .await;

    let dev_addr: SocketAddr = "127.0.0.1:28444".parse().unwrap();
    let dev_shutdown = common::spawn_server(dev_addr, root.path(), |_| {}).await;

    let client = common::client();

    let res = client
        .get(format!("http://{}/", prod_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get("strict-transport-security").unwrap(),
        "max-age=31536000; includeSubDomains"
    );

    let res = client
        .get(format!("http://{}/", dev_addr))
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("strict-transport-security").is_none());

    prod_shutdown.trigger();
    dev_shutdown.trigger();
}

#[tokio::test]
async fn test_cors_origin_allow_list() {
    let addr: SocketAddr = "127.0.0.1:28445".parse().unwrap();
    let root = tempfile::tempdir().unwrap();
    common::write_fixture_site(root.path());
    let shutdown = common::spawn_server(addr, root.path(), |config| {
        config.cors.development_origins = vec!["http://localhost:5173".to_string()];
    })
    .await;
    let client = common::client();
    let url = format!("http://{}/", addr);

    let res = client
        .get(&url)
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );

    // Unknown origins get no CORS header at all.
    let res = client
        .get(&url)
        .header("origin", "http://evil.example")
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("access-control-allow-origin").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_rate_limit_rejects_the_101st_request() {
    let addr: SocketAddr = "127.0.0.1:28446".parse().unwrap();
    let root = tempfile::tempdir().unwrap();
    common::write_fixture_site(root.path());
    let shutdown = common::spawn_server(addr, root.path(), |_| {}).await;
    let client = common::client();
    let url = format!("http://{}/index.html", addr);

    for i in 0..100 {
        let res = client.get(&url).send().await.unwrap();
        assert_eq!(res.status(), 200, "request {} should be admitted", i + 1);
    }

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 429);
    // The rejection still carries the security headers.
    assert_eq!(res.headers().get("x-frame-options").unwrap(), "DENY");
    assert_eq!(res.text().await.unwrap(), "Too many requests, slow down");

    shutdown.trigger();
}
