//! Query and result model shared between plugins and the ranking pipeline.

use crate::pattern::EqualityPattern;

/// A query as typed by the user
///
/// `raw_query` is kept exactly as typed; it is the key pins are stored under.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    raw_query: String,
    action_keyword: String,
    search: String,
}

impl Query {
    /// Query with no action keyword; the whole trimmed text is the search
    pub fn new(raw_query: impl Into<String>) -> Self {
        let raw_query = raw_query.into();
        let search = raw_query.trim().to_string();
        Self { raw_query, action_keyword: String::new(), search }
    }

    /// Query addressed to a plugin by action keyword
    ///
    /// The keyword is only split off when it is the first whitespace-separated
    /// term; otherwise this behaves like [`Query::new`].
    pub fn with_action_keyword(raw_query: impl Into<String>, action_keyword: &str) -> Self {
        let raw_query = raw_query.into();
        let search = match raw_query.trim_start().strip_prefix(action_keyword) {
            Some(rest) if !action_keyword.is_empty() && (rest.is_empty() || rest.starts_with(char::is_whitespace)) => {
                Some(rest.trim().to_string())
            }
            _ => None,
        };

        match search {
            Some(search) => Self { raw_query, action_keyword: action_keyword.to_string(), search },
            None => Self::new(raw_query),
        }
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn action_keyword(&self) -> &str {
        &self.action_keyword
    }

    /// Text after the action keyword, trimmed
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Whitespace-separated terms of the search text
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.search.split_whitespace()
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
    }
}

/// A candidate result produced by a plugin
///
/// The two equality patterns are set by the producing plugin and consulted only
/// when deciding whether this result is the one a user pinned.
#[derive(Debug, Clone, Default)]
pub struct LaunchResult {
    pub title: String,
    pub subtitle: String,
    /// Identifier of the plugin that produced this result
    pub plugin_id: String,
    /// Query that produced this result, if the pipeline attached one
    pub origin_query: Option<Query>,
    pub score: i32,
    pub title_equal_pattern: Option<EqualityPattern>,
    pub subtitle_equal_pattern: Option<EqualityPattern>,
}

impl LaunchResult {
    pub fn new(title: impl Into<String>, plugin_id: impl Into<String>) -> Self {
        Self { title: title.into(), plugin_id: plugin_id.into(), ..Self::default() }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_origin_query(mut self, query: Query) -> Self {
        self.origin_query = Some(query);
        self
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }

    pub fn with_title_pattern(mut self, pattern: EqualityPattern) -> Self {
        self.title_equal_pattern = Some(pattern);
        self
    }

    pub fn with_subtitle_pattern(mut self, pattern: EqualityPattern) -> Self {
        self.subtitle_equal_pattern = Some(pattern);
        self
    }

    /// Raw text of the originating query, if any
    pub fn raw_query(&self) -> Option<&str> {
        self.origin_query.as_ref().map(Query::raw_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_keeps_raw_text() {
        let query = Query::new("  firefox  ");
        assert_eq!(query.raw_query(), "  firefox  ");
        assert_eq!(query.search(), "firefox");
        assert_eq!(query.action_keyword(), "");
    }

    #[test]
    fn test_query_with_action_keyword() {
        let query = Query::with_action_keyword("gh  rust-lang/regex issues", "gh");
        assert_eq!(query.raw_query(), "gh  rust-lang/regex issues");
        assert_eq!(query.action_keyword(), "gh");
        assert_eq!(query.search(), "rust-lang/regex issues");
        assert_eq!(query.terms().collect::<Vec<_>>(), vec!["rust-lang/regex", "issues"]);
    }

    #[test]
    fn test_query_keyword_only() {
        let query = Query::with_action_keyword("gh", "gh");
        assert_eq!(query.action_keyword(), "gh");
        assert!(query.is_empty());
    }

    #[test]
    fn test_query_keyword_must_be_whole_term() {
        let query = Query::with_action_keyword("ghost", "gh");
        assert_eq!(query.action_keyword(), "");
        assert_eq!(query.search(), "ghost");
    }

    #[test]
    fn test_query_empty_keyword_is_ignored() {
        let query = Query::with_action_keyword("calc 1+1", "");
        assert_eq!(query.action_keyword(), "");
        assert_eq!(query.search(), "calc 1+1");
    }

    #[test]
    fn test_result_builder() {
        let pattern = EqualityPattern::new(r"^Build #(\d+)").unwrap();
        let result = LaunchResult::new("Build #12", "ci")
            .with_subtitle("main")
            .with_origin_query(Query::new("build"))
            .with_score(40)
            .with_title_pattern(pattern);

        assert_eq!(result.title, "Build #12");
        assert_eq!(result.subtitle, "main");
        assert_eq!(result.plugin_id, "ci");
        assert_eq!(result.raw_query(), Some("build"));
        assert_eq!(result.score, 40);
        assert!(result.title_equal_pattern.is_some());
        assert!(result.subtitle_equal_pattern.is_none());
    }

    #[test]
    fn test_result_without_origin_query() {
        let result = LaunchResult::new("Calculator", "apps");
        assert_eq!(result.raw_query(), None);
    }
}
