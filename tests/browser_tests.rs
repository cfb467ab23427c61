//! Browser module tests
//!
//! Configuration and site-rule tests run everywhere. Tests that launch
//! Chrome/Chromium are `#[ignore]`d; run them with `cargo test -- --ignored`
//! on a machine with a browser installed. They hold [`LAUNCH_LOCK`] so the
//! live-browser count is only ever touched by one test at a time.

mod common;

use std::time::Duration;

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use rsvp_extract::browser::{
    is_dom_ready, live_browsers, BrowserConfig, NavigationOptions, RenderFetcher, SiteRule,
    SiteRules,
};
use rsvp_extract::config::{RenderConfig, DESKTOP_USER_AGENT};
use rsvp_extract::error::{Error, NavigationError};
use rsvp_extract::{ExtractionMethod, Extractor, PageSource};
use tokio::sync::Mutex;
use url::Url;

static LAUNCH_LOCK: Mutex<()> = Mutex::const_new(());

#[test]
fn test_browser_config_default() {
    let config = BrowserConfig::default();
    assert!(config.headless);
    assert_eq!(config.width, 1280);
    assert_eq!(config.height, 720);
    assert_eq!(config.device_scale_factor, 2.0);
    assert!(config.stealth);
    assert_eq!(config.user_agent.as_deref(), Some(DESKTOP_USER_AGENT));
    assert!(config.chrome_path.is_none());
    assert!(config.extra_args.is_empty());
}

#[test]
fn test_browser_config_builder() {
    let config = BrowserConfig::builder()
        .headless(false)
        .viewport(1920, 1080)
        .device_scale_factor(1.0)
        .user_agent("TestBot/1.0")
        .launch_timeout_ms(60000)
        .chrome_path("/usr/bin/chromium")
        .stealth(false)
        .arg("--disable-gpu")
        .build();

    assert!(!config.headless);
    assert_eq!(config.width, 1920);
    assert_eq!(config.height, 1080);
    assert_eq!(config.device_scale_factor, 1.0);
    assert_eq!(config.user_agent, Some("TestBot/1.0".to_string()));
    assert_eq!(config.launch_timeout_ms, 60000);
    assert_eq!(config.chrome_path.as_deref(), Some("/usr/bin/chromium"));
    assert!(!config.stealth);
    assert_eq!(config.extra_args, vec!["--disable-gpu"]);
}

#[test]
fn test_launch_args_hide_automation() {
    let args = BrowserConfig::default().launch_args();
    assert!(args.contains(&"--disable-blink-features=AutomationControlled".to_string()));
    assert!(args.contains(&"--no-sandbox".to_string()));
    assert!(args.contains(&"--disable-setuid-sandbox".to_string()));
    assert!(args.contains(&format!("--user-agent={}", DESKTOP_USER_AGENT)));
}

#[test]
fn test_launch_args_without_stealth() {
    let config = BrowserConfig::builder()
        .stealth(false)
        .arg("--mute-audio")
        .build();
    let args = config.launch_args();
    assert!(!args.iter().any(|a| a.contains("AutomationControlled")));
    assert!(args.contains(&"--mute-audio".to_string()));
}

#[test]
fn test_navigation_options() {
    let opts = NavigationOptions::default();
    assert_eq!(opts.timeout_ms, 30000);

    let opts = NavigationOptions::with_timeout(Duration::from_secs(5));
    assert_eq!(opts.timeout_ms, 5000);
}

#[test]
fn test_dom_ready_states() {
    assert!(!is_dom_ready("loading"));
    assert!(is_dom_ready("interactive"));
    assert!(is_dom_ready("complete"));
}

#[test]
fn test_builtin_site_rules() {
    let rules = SiteRules::builtin();
    assert_eq!(rules.len(), 1);

    let tweet = Url::parse("https://x.com/someone/status/1").unwrap();
    let rule = rules.find(&tweet).unwrap();
    assert_eq!(rule.selector, r#"[data-testid="tweetText"]"#);
    assert_eq!(rule.timeout, Duration::from_secs(8));

    assert!(rules
        .find(&Url::parse("https://mobile.twitter.com/a").unwrap())
        .is_some());
    assert!(rules
        .find(&Url::parse("https://en.wikipedia.org/wiki/Rust").unwrap())
        .is_none());
}

#[test]
fn test_site_rules_match_host_substring() {
    // substring match on the host, not the path
    let rules = SiteRules::builtin();
    assert!(rules
        .find(&Url::parse("https://netflix.com/title/1").unwrap())
        .is_some());
    assert!(rules
        .find(&Url::parse("https://example.com/x.com").unwrap())
        .is_none());
}

#[test]
fn test_site_rules_first_match_wins() {
    let rules = SiteRules::empty()
        .with_rule(SiteRule::new(
            "docs",
            &["docs.example"],
            "main",
            Duration::from_secs(1),
        ))
        .with_rule(SiteRule::new(
            "example",
            &["example"],
            "#app",
            Duration::from_secs(2),
        ));

    let url = Url::parse("https://docs.example.org/page").unwrap();
    assert_eq!(rules.find(&url).unwrap().name, "docs");

    let url = Url::parse("https://www.example.net/").unwrap();
    assert_eq!(rules.find(&url).unwrap().name, "example");
}

#[test]
fn test_render_fetcher_defaults() {
    let fetcher = RenderFetcher::default();
    assert_eq!(fetcher.name(), "render");
    assert_eq!(fetcher.config().navigation_timeout, Duration::from_secs(30));
    assert_eq!(fetcher.config().settle_delay, Duration::from_secs(2));
    assert_eq!(fetcher.config().site_rules, SiteRules::builtin());
}

// ============================================================================
// Live browser tests
// ============================================================================

fn client_rendered_site() -> Router {
    let script_page = format!(
        r#"<!DOCTYPE html><html><head><title>Client Rendered</title></head>
<body><div id="root"></div>
<script>
document.getElementById('root').innerHTML = '<article><p>' + {text:?} + '</p></article>';
</script></body></html>"#,
        text = common::article_text(900)
    );

    Router::new()
        .route(
            "/app",
            get(move || {
                let page = script_page.clone();
                async move { Html(page) }
            }),
        )
        .route(
            "/webdriver",
            get(|| async {
                Html(
                    r#"<html><body><article><p id="probe"></p></article>
<script>document.getElementById('probe').textContent = 'webdriver=' + String(navigator.webdriver);</script>
</body></html>"#,
                )
            }),
        )
        .route(
            "/hang",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Html("<p>too late</p>")
            }),
        )
}

fn fast_render_config() -> RenderConfig {
    RenderConfig {
        settle_delay: Duration::from_millis(200),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires Chrome/Chromium"]
async fn test_render_executes_scripts() {
    let _guard = LAUNCH_LOCK.lock().await;
    let addr = common::spawn_server(client_rendered_site()).await;
    let url = Url::parse(&format!("http://{}/app", addr)).unwrap();

    let doc = RenderFetcher::new(fast_render_config())
        .fetch(&url)
        .await
        .unwrap();

    assert!(doc.html.contains("<article>"));
    assert!(doc.html.contains(&common::article_text(900)));
    assert_eq!(live_browsers(), 0);
}

#[tokio::test]
#[ignore = "requires Chrome/Chromium"]
async fn test_render_hides_webdriver() {
    let _guard = LAUNCH_LOCK.lock().await;
    let addr = common::spawn_server(client_rendered_site()).await;
    let url = Url::parse(&format!("http://{}/webdriver", addr)).unwrap();

    let doc = RenderFetcher::new(fast_render_config())
        .fetch(&url)
        .await
        .unwrap();

    assert!(doc.html.contains("webdriver=undefined"));
}

#[tokio::test]
#[ignore = "requires Chrome/Chromium"]
async fn test_selector_timeout_is_not_an_error() {
    let _guard = LAUNCH_LOCK.lock().await;
    let addr = common::spawn_server(client_rendered_site()).await;
    let url = Url::parse(&format!("http://{}/app", addr)).unwrap();

    let config = RenderConfig {
        site_rules: SiteRules::empty().with_rule(SiteRule::new(
            "local",
            &["127.0.0.1"],
            "#never-appears",
            Duration::from_millis(500),
        )),
        ..fast_render_config()
    };

    let doc = RenderFetcher::new(config).fetch(&url).await.unwrap();
    assert!(doc.html.contains("<article>"));
    assert_eq!(live_browsers(), 0);
}

#[tokio::test]
#[ignore = "requires Chrome/Chromium"]
async fn test_navigation_timeout_is_an_error() {
    let _guard = LAUNCH_LOCK.lock().await;
    let addr = common::spawn_server(client_rendered_site()).await;
    let url = Url::parse(&format!("http://{}/hang", addr)).unwrap();

    let config = RenderConfig {
        navigation_timeout: Duration::from_secs(1),
        ..fast_render_config()
    };

    let err = RenderFetcher::new(config).fetch(&url).await.unwrap_err();
    assert!(
        matches!(err, Error::Navigation(NavigationError::Timeout(1000))),
        "expected navigation timeout, got {err:?}"
    );
    assert_eq!(live_browsers(), 0);
}

#[tokio::test]
#[ignore = "requires Chrome/Chromium"]
async fn test_client_rendered_page_uses_render_path() {
    let _guard = LAUNCH_LOCK.lock().await;
    let addr = common::spawn_server(client_rendered_site()).await;
    let url = Url::parse(&format!("http://{}/app", addr)).unwrap();

    let config = rsvp_extract::ExtractorConfig::default()
        .with_settle_delay(Duration::from_millis(200));
    let extractor = Extractor::from_config(config).unwrap();

    let result = extractor.run(&url).await;
    assert_eq!(result.method, ExtractionMethod::Render);
    assert_eq!(result.length, 900);
    assert_eq!(live_browsers(), 0);
}

#[tokio::test]
#[ignore = "requires Chrome/Chromium"]
async fn test_sequential_renders_release_browsers() {
    let _guard = LAUNCH_LOCK.lock().await;
    let addr = common::spawn_server(client_rendered_site()).await;
    let url = Url::parse(&format!("http://{}/app", addr)).unwrap();
    let fetcher = RenderFetcher::new(fast_render_config());

    // each call launches and closes its own browser
    for _ in 0..3 {
        let doc = fetcher.fetch(&url).await.unwrap();
        assert!(doc.html.contains("<article>"));
        assert_eq!(live_browsers(), 0);
    }
}

#[tokio::test]
#[ignore = "requires Chrome/Chromium"]
async fn test_unreachable_host_releases_browser() {
    let _guard = LAUNCH_LOCK.lock().await;
    // bind then drop so nothing is listening on the port
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let url = Url::parse(&format!("http://{}/gone", addr)).unwrap();

    let err = RenderFetcher::new(fast_render_config())
        .fetch(&url)
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Navigation(NavigationError::LoadFailed(_))),
        "expected load failure, got {err:?}"
    );
    assert_eq!(live_browsers(), 0);
}
