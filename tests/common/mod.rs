//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use asset_server::config::schema::ServerConfig;
use asset_server::http::HttpServer;
use asset_server::lifecycle::Shutdown;

/// Index document with one inline script and one external script.
pub const INDEX_HTML: &str = "<!doctype html><html><head>\n\
    <title>Emergency call-out</title>\n\
    <script>window.dataLayer = [];</script>\n\
    </head><body>\n\
    <h1>24/7 mobile fitting</h1>\n\
    <script src=\"/assets/app.js\"></script>\n\
    </body></html>";

/// Populate a document root with a small fixture site.
pub fn write_fixture_site(root: &Path) {
    std::fs::create_dir_all(root.join("assets")).unwrap();
    std::fs::write(root.join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(
        root.join("emergency-service-worker.js"),
        "self.addEventListener('install', () => {});\n",
    )
    .unwrap();
    std::fs::write(root.join("assets/app.js"), "console.log('app');\n").unwrap();
    std::fs::write(root.join("assets/site.css"), "body { margin: 0; }\n").unwrap();
    // Exists on disk but is neither allow-listed nor under an asset prefix.
    std::fs::write(root.join("secret.html"), "<html><body>internal</body></html>").unwrap();
    // Under an asset prefix but with an extension the MIME table rejects.
    std::fs::write(root.join("assets/data.conf"), "key = value\n").unwrap();
}

/// Start a server over `root` on `addr`. Returns the shutdown handle; the
/// server task exits when it is triggered.
pub async fn spawn_server(
    addr: SocketAddr,
    root: &Path,
    mutate: impl FnOnce(&mut ServerConfig),
) -> Arc<Shutdown> {
    let mut config = ServerConfig::default();
    config.listener.bind_address = addr.to_string();
    config.site.document_root = root.to_path_buf();
    mutate(&mut config);

    let server = HttpServer::new(config).unwrap();
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, &server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

/// Non-pooled client so every test request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Send a raw HTTP/1.1 request, bypassing client-side URL normalization
/// (reqwest collapses `..` segments before sending).
pub async fn raw_request(addr: SocketAddr, request: &str) -> String {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

/// Extract the nonce value from a CSP header.
pub fn extract_nonce(csp: &str) -> Option<String> {
    let start = csp.find("'nonce-")? + "'nonce-".len();
    let rest = &csp[start..];
    let end = rest.find('\'')?;
    Some(rest[..end].to_string())
}
