//! Stealth mode for anti-detection
//!
//! Bot-detection scripts commonly read `navigator.webdriver` and the
//! user-agent string. Both are patched on every new page before the first
//! navigation.

use crate::error::{Error, Result};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use tracing::{debug, instrument};

/// Redefines `navigator.webdriver` so it reads as absent
pub const HIDE_WEBDRIVER_SCRIPT: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined,
        configurable: true
    });
"#;

/// Stealth mode configuration and application
pub struct StealthMode;

impl StealthMode {
    /// Apply all stealth techniques to a page
    #[instrument(skip(page))]
    pub async fn apply(page: &Page, user_agent: Option<&str>) -> Result<()> {
        debug!("Applying stealth mode");

        if let Some(ua) = user_agent {
            Self::override_user_agent(page, ua).await?;
        }
        Self::hide_webdriver(page).await?;

        debug!("Stealth mode applied successfully");
        Ok(())
    }

    /// Hide navigator.webdriver property
    async fn hide_webdriver(page: &Page) -> Result<()> {
        Self::inject_script(page, HIDE_WEBDRIVER_SCRIPT).await
    }

    /// Report a desktop browser identity, including to workers
    async fn override_user_agent(page: &Page, user_agent: &str) -> Result<()> {
        let params = SetUserAgentOverrideParams::builder()
            .user_agent(user_agent)
            .accept_language("en-US,en;q=0.9")
            .build()
            .map_err(|e| Error::cdp(format!("Failed to build user agent params: {}", e)))?;

        page.execute(params)
            .await
            .map_err(|e| Error::cdp(format!("Failed to override user agent: {}", e)))?;

        Ok(())
    }

    /// Inject a script to run on new document
    async fn inject_script(page: &Page, script: &str) -> Result<()> {
        let params = AddScriptToEvaluateOnNewDocumentParams::builder()
            .source(script)
            .build()
            .map_err(|e| Error::cdp(format!("Failed to build script params: {}", e)))?;

        page.execute(params)
            .await
            .map_err(|e| Error::cdp(format!("Failed to inject script: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hide_webdriver_script_targets_navigator() {
        assert!(HIDE_WEBDRIVER_SCRIPT.contains("navigator, 'webdriver'"));
        assert!(HIDE_WEBDRIVER_SCRIPT.contains("undefined"));
    }
}
