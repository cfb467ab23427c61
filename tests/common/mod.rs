//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;

const SENTENCE: &str = "The quick brown fox jumps over the lazy dog while the reader keeps pace. ";

/// Plain text of exactly `chars` characters, ending in a period
pub fn article_text(chars: usize) -> String {
    assert!(chars > 1);
    let mut text: String = SENTENCE.repeat(chars / SENTENCE.len() + 1).chars().take(chars - 1).collect();
    text.push('.');
    text
}

/// A page whose article text is exactly `chars` characters
pub fn article_page(title: &str, chars: usize) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body>
<nav class="menu"><a href="/">Home</a> <a href="/about">About</a></nav>
<article><p>{text}</p></article>
<div id="footer">Copyright notice</div>
</body>
</html>"#,
        title = title,
        text = article_text(chars)
    )
}

/// A client-rendered shell with no article content
pub fn app_shell() -> String {
    r#"<!DOCTYPE html><html><head><title>App</title></head><body><div id="root"></div><script>boot()</script></body></html>"#.to_string()
}

/// Serve `app` on an ephemeral local port
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    addr
}
