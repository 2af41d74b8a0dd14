//! Route path patterns.
//!
//! A pattern is a `/`-separated list of segments. A segment written as
//! `{name}` captures exactly one non-empty path segment under `name`; every
//! other segment must match literally (case-sensitive).
//!
//! Both patterns and request paths are normalised the same way before
//! comparison: trailing slashes are dropped and an empty path is the root
//! `/`. Matching requires equal segment counts, so `/users/{id}` never matches
//! `/users` or `/users/1/posts`.

use std::collections::BTreeMap;
use std::fmt;

/// One segment of a [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Captures any non-empty request segment under this name.
    Param(String),
}

/// A parsed route path pattern such as `/users/{id}/posts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parses and normalises a pattern.
    ///
    /// Only a segment that is exactly `{name}` (non-empty name, no nested
    /// braces) is a parameter; anything else, including `{}` or `file{id}`,
    /// is a literal. If a name repeats, the later capture wins.
    pub fn parse(pattern: &str) -> Self {
        let raw = normalize_path(pattern);
        let segments = split_segments(&raw)
            .map(|part| match part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) if !name.is_empty() && !name.contains(['{', '}']) => {
                    Segment::Param(name.to_string())
                }
                _ => Segment::Literal(part.to_string()),
            })
            .collect();

        Self { raw, segments }
    }

    /// The normalised pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments, root first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the captured parameters, in pattern order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Tests a request path against this pattern.
    ///
    /// Returns the captured parameters on success. The returned map is freshly
    /// allocated on every call.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let path = normalize_path(path);
        let parts: Vec<&str> = split_segments(&path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.insert(name.clone(), part.to_string());
                }
                _ => return None,
            }
        }
        Some(params)
    }

    /// Builds a concrete path by substituting `params` into the pattern.
    ///
    /// Returns the name of the first missing parameter on failure.
    pub fn build(&self, params: &BTreeMap<String, String>) -> Result<String, String> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Param(name) => match params.get(name) {
                    Some(value) => path.push_str(value),
                    None => return Err(name.clone()),
                },
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// Returns a new pattern with `prefix` prepended.
    pub fn prefixed(&self, prefix: &str) -> Self {
        let prefix = normalize_path(prefix);
        if prefix == "/" {
            return self.clone();
        }
        if self.raw == "/" {
            return Self::parse(&prefix);
        }
        Self::parse(&format!("{prefix}{}", self.raw))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Normalises a path: leading `/` added, trailing `/` removed, empty → `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Splits a normalised path into segments. The root has none.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/')
        .unwrap_or(path)
        .split('/')
        .filter(move |_| path != "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("users/"), "/users");
        assert_eq!(normalize_path("/users/42/"), "/users/42");
    }

    #[test]
    fn test_parse_segments() {
        let pattern = PathPattern::parse("/users/{id}/posts");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("users".into()),
                Segment::Param("id".into()),
                Segment::Literal("posts".into()),
            ]
        );
        assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_root_has_no_segments() {
        let pattern = PathPattern::parse("/");
        assert!(pattern.segments().is_empty());
        assert_eq!(pattern.matches("/"), Some(BTreeMap::new()));
        assert_eq!(pattern.matches(""), Some(BTreeMap::new()));
        assert_eq!(pattern.matches("/users"), None);
    }

    #[test]
    fn test_literal_match_is_case_sensitive() {
        let pattern = PathPattern::parse("/about");
        assert!(pattern.matches("/about").is_some());
        assert!(pattern.matches("/about/").is_some());
        assert!(pattern.matches("/About").is_none());
    }

    #[test]
    fn test_param_capture() {
        let pattern = PathPattern::parse("/users/{id}/posts/{post}");
        assert_eq!(
            pattern.matches("/users/42/posts/7"),
            Some(params(&[("id", "42"), ("post", "7")]))
        );
    }

    #[test]
    fn test_segment_count_must_match() {
        let pattern = PathPattern::parse("/users/{id}");
        assert!(pattern.matches("/users").is_none());
        assert!(pattern.matches("/users/1/posts").is_none());
    }

    #[test]
    fn test_param_rejects_empty_segment() {
        let pattern = PathPattern::parse("/a/{id}/b");
        assert!(pattern.matches("/a//b").is_none());
    }

    #[test]
    fn test_malformed_placeholders_are_literals() {
        let pattern = PathPattern::parse("/files/{}/{id/file{id}");
        assert!(
            pattern
                .segments()
                .iter()
                .all(|segment| matches!(segment, Segment::Literal(_)))
        );
        assert!(pattern.matches("/files/{}/{id/file{id}").is_some());
        assert!(pattern.matches("/files/a/b/c").is_none());
    }

    #[test]
    fn test_repeated_name_keeps_last_capture() {
        let pattern = PathPattern::parse("/{id}/{id}");
        assert_eq!(pattern.matches("/1/2"), Some(params(&[("id", "2")])));
    }

    #[test]
    fn test_build() {
        let pattern = PathPattern::parse("/users/{id}");
        assert_eq!(pattern.build(&params(&[("id", "42")])).unwrap(), "/users/42");
        assert_eq!(pattern.build(&BTreeMap::new()).unwrap_err(), "id");
        assert_eq!(PathPattern::parse("/").build(&BTreeMap::new()).unwrap(), "/");
    }

    #[test]
    fn test_prefixed() {
        let pattern = PathPattern::parse("/{id}");
        assert_eq!(pattern.prefixed("/admin/").as_str(), "/admin/{id}");
        assert_eq!(
            PathPattern::parse("/").prefixed("admin").as_str(),
            "/admin"
        );
        assert_eq!(pattern.prefixed("/").as_str(), "/{id}");
    }
}
