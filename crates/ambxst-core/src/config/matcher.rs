use regex::Regex;
use tracing::warn;

/// Compiled `ignoredAppRegexes`, kept in configuration order
#[derive(Debug, Clone, Default)]
pub struct AppMatcher {
    patterns: Vec<Regex>,
}

impl AppMatcher {
    /// Compile patterns, skipping any that are not valid regexes
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match Regex::new(p.as_ref()) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Ignoring invalid app regex '{}': {}", p.as_ref(), e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    pub fn is_ignored(&self, app_id: &str) -> bool {
        self.matching_pattern(app_id).is_some()
    }

    /// First pattern that matches anywhere in `app_id`
    pub fn matching_pattern(&self, app_id: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|re| re.is_match(app_id))
            .map(|re| re.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
