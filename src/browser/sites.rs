//! Site-specific content waits
//!
//! Some sites render their content long after DOMContentLoaded. Each
//! [`SiteRule`] names a content marker to wait for on matching hosts. Rules
//! are checked in order and the first match wins.

use std::time::Duration;
use url::Url;

/// Wait for `selector` on hosts containing any of `host_patterns`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRule {
    /// Short label used in logs
    pub name: String,
    /// Lowercase substrings matched against the URL host
    pub host_patterns: Vec<String>,
    /// CSS selector of the content marker
    pub selector: String,
    /// Wait budget for the marker
    pub timeout: Duration,
}

impl SiteRule {
    /// Create a rule
    pub fn new<S: Into<String>>(
        name: S,
        host_patterns: &[&str],
        selector: S,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            host_patterns: host_patterns.iter().map(|p| p.to_lowercase()).collect(),
            selector: selector.into(),
            timeout,
        }
    }

    /// Whether this rule applies to `host`
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.host_patterns.iter().any(|p| host.contains(p.as_str()))
    }
}

/// Ordered rule table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteRules {
    rules: Vec<SiteRule>,
}

impl SiteRules {
    /// A table with no rules
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in rules
    pub fn builtin() -> Self {
        Self {
            rules: vec![SiteRule::new(
                "x",
                &["x.com", "twitter.com"],
                r#"[data-testid="tweetText"]"#,
                Duration::from_secs(8),
            )],
        }
    }

    /// Append a rule (checked after existing ones)
    pub fn push(&mut self, rule: SiteRule) {
        self.rules.push(rule);
    }

    /// Builder-style [`SiteRules::push`]
    pub fn with_rule(mut self, rule: SiteRule) -> Self {
        self.push(rule);
        self
    }

    /// First rule matching the URL's host
    pub fn find(&self, url: &Url) -> Option<&SiteRule> {
        let host = url.host_str()?;
        self.rules.iter().find(|r| r.matches_host(host))
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate rules in match order
    pub fn iter(&self) -> impl Iterator<Item = &SiteRule> {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_builtin_matches_x_and_twitter() {
        let rules = SiteRules::builtin();
        let rule = rules.find(&url("https://x.com/user/status/1")).unwrap();
        assert_eq!(rule.selector, r#"[data-testid="tweetText"]"#);
        assert_eq!(rule.timeout, Duration::from_secs(8));

        assert!(rules.find(&url("https://twitter.com/user/status/1")).is_some());
        assert!(rules.find(&url("https://mobile.twitter.com/a")).is_some());
        assert!(rules.find(&url("https://X.COM/a")).is_some());
    }

    #[test]
    fn test_builtin_ignores_path_and_query() {
        let rules = SiteRules::builtin();
        assert!(rules.find(&url("https://example.com/x.com")).is_none());
        assert!(rules
            .find(&url("https://example.com/?ref=twitter.com"))
            .is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let rules = SiteRules::empty()
            .with_rule(SiteRule::new(
                "first",
                &["example.com"],
                "article",
                Duration::from_secs(1),
            ))
            .with_rule(SiteRule::new(
                "second",
                &["example.com"],
                "main",
                Duration::from_secs(2),
            ));

        let rule = rules.find(&url("https://blog.example.com/post")).unwrap();
        assert_eq!(rule.name, "first");
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_empty_table_matches_nothing() {
        let rules = SiteRules::empty();
        assert!(rules.is_empty());
        assert!(rules.find(&url("https://x.com/")).is_none());
    }
}
