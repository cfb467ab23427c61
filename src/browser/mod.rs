//! Browser automation module
//!
//! This module provides headless browser control through ChromiumOxide:
//! lifecycle management, stealth patches, navigation and the render-path
//! page source.

pub mod controller;
pub mod navigation;
pub mod render;
pub mod sites;
pub mod stealth;

pub use controller::{live_browsers, BrowserConfig, BrowserController};
pub use navigation::{is_dom_ready, NavigationOptions, NavigationResult, PageNavigator};
pub use render::RenderFetcher;
pub use sites::{SiteRule, SiteRules};
pub use stealth::StealthMode;
