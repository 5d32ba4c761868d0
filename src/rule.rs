//! Pattern rules: one compiled regex bound to one handler.

use std::collections::HashMap;

use regex::Regex;

use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::request::Request;

/// Positional capture texts for one matched request.
///
/// Index 0 is the full match, followed by each capture group's text in group
/// order. A group that did not participate in the match yields the empty
/// string.
pub type Args = Vec<String>;

/// Named capture texts for one matched request, keyed by the pattern's
/// `(?P<name>...)` group names. Unnamed groups are absent here but still
/// present positionally in [`Args`].
pub type Kwargs = HashMap<String, String>;

/// A single route rule: a compiled pattern bound to one handler.
///
/// Matching is unanchored, exactly like [`Regex::is_match`]: the rule
/// matches if its pattern matches anywhere in the path. Patterns that should
/// cover the whole path must say so with `^` and `$`.
#[derive(Clone)]
pub struct Rule {
    re: Regex,
    handler: BoxedHandler,
}

impl Rule {
    /// Compiles `pattern` and binds it to `handler`.
    ///
    /// An invalid pattern fails here, at registration time — never at
    /// request time.
    pub fn compile(pattern: &str, handler: impl Handler) -> Result<Self, Error> {
        Ok(Self {
            re: Regex::new(pattern)?,
            handler: handler.into_boxed_handler(),
        })
    }

    /// Whether the pattern matches anywhere in `path`. Pure, no side effects.
    pub fn matches(&self, path: &str) -> bool {
        self.re.is_match(path)
    }

    /// The capture payload for `path`: positional texts (full match first)
    /// and one named entry per `(?P<name>...)` group.
    pub fn captures(&self, path: &str) -> Option<(Args, Kwargs)> {
        let caps = self.re.captures(path)?;
        let args: Args = (0..caps.len())
            .map(|i| caps.get(i).map_or_else(String::new, |m| m.as_str().to_owned()))
            .collect();
        let mut kwargs = Kwargs::new();
        for (i, name) in self.re.capture_names().enumerate() {
            if let Some(name) = name {
                kwargs.insert(name.to_owned(), args[i].clone());
            }
        }
        Some((args, kwargs))
    }

    /// Attempts to route `req`. On a match, invokes the bound handler with
    /// the request and its captures and returns the handler's future; on no
    /// match, hands the request back untouched.
    pub(crate) fn try_handle(&self, req: Request) -> Result<BoxFuture, Request> {
        match self.captures(req.path()) {
            Some((args, kwargs)) => Ok(self.handler.call(req, args, kwargs)),
            None => Err(req),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;

    async fn ok(_req: Request, _args: Args, _kwargs: Kwargs) -> Response {
        Response::text("ok")
    }

    #[test]
    fn compile_rejects_invalid_pattern() {
        assert!(matches!(Rule::compile("(", ok), Err(Error::Pattern(_))));
    }

    #[test]
    fn matching_is_unanchored() {
        let rule = Rule::compile("/users/", ok).unwrap();
        assert!(rule.matches("/users/"));
        assert!(rule.matches("/api/users/42"));
        assert!(!rule.matches("/groups/"));
    }

    #[test]
    fn explicit_anchors_pin_the_whole_path() {
        let rule = Rule::compile(r"^/users/(?P<id>[0-9]+)$", ok).unwrap();
        assert!(rule.matches("/users/42"));
        assert!(!rule.matches("/api/users/42"));
        assert!(!rule.matches("/users/42/posts"));
    }

    #[test]
    fn captures_are_positional_and_named() {
        let rule = Rule::compile(r"^/users/(?P<id>[0-9]+)$", ok).unwrap();
        let (args, kwargs) = rule.captures("/users/42").unwrap();
        assert_eq!(args, ["/users/42", "42"]);
        assert_eq!(kwargs.len(), 1);
        assert_eq!(kwargs["id"], "42");
    }

    #[test]
    fn unnamed_groups_stay_positional_only() {
        let rule = Rule::compile(r"^/posts/([0-9]+)/(?P<slug>[a-z-]+)$", ok).unwrap();
        let (args, kwargs) = rule.captures("/posts/7/hello-world").unwrap();
        assert_eq!(args, ["/posts/7/hello-world", "7", "hello-world"]);
        assert_eq!(kwargs.len(), 1);
        assert_eq!(kwargs["slug"], "hello-world");
    }

    #[test]
    fn skipped_optional_group_yields_empty_string() {
        let rule = Rule::compile(r"^/files/([a-z]+)(?P<ext>\.[a-z]+)?$", ok).unwrap();
        let (args, kwargs) = rule.captures("/files/report").unwrap();
        assert_eq!(args, ["/files/report", "report", ""]);
        assert_eq!(kwargs["ext"], "");
    }

    #[test]
    fn captures_returns_none_on_miss() {
        let rule = Rule::compile(r"^/users/(?P<id>[0-9]+)$", ok).unwrap();
        assert!(rule.captures("/nope").is_none());
        assert!(rule.captures("/users/alice").is_none());
    }
}
