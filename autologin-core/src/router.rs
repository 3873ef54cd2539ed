use crate::errors::RouteError;
use std::collections::HashMap;
use url::{form_urlencoded, Position, Url};

/// Builds URLs for the host application.
pub trait Router: Send + Sync {
    /// Resolves a literal path against the application URL. `extra` values are appended as
    /// path segments; `secure` forces the scheme when set.
    fn to(&self, path: &str, extra: &[&str], secure: Option<bool>) -> Result<String, RouteError>;

    /// Resolves a named route. Parameters fill the route's placeholders in order; any left
    /// over are appended to the query string.
    fn route(&self, name: &str, parameters: &[&str], absolute: bool) -> Result<String, RouteError>;
}

/// [`Router`] over a base URL and a table of named path templates such as
/// `autologin/{token}` or `posts/{post}/{comment?}`.
#[derive(Clone, Debug)]
pub struct UrlRouter {
    base: Url,
    routes: HashMap<String, String>,
}

impl UrlRouter {
    pub fn new(base: &str) -> Result<Self, RouteError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            routes: HashMap::new(),
        })
    }

    pub fn with_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.routes.insert(name.into(), template.into());
        self
    }
}

impl Router for UrlRouter {
    fn to(&self, path: &str, extra: &[&str], secure: Option<bool>) -> Result<String, RouteError> {
        if let Ok(url) = Url::parse(path) {
            return Ok(url.into());
        }
        let mut url = self.base.join(path.trim_start_matches('/'))?;
        if !extra.is_empty() {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().extend(extra);
            }
        }
        let scheme = match secure {
            Some(true) => Some("https"),
            Some(false) => Some("http"),
            None => None,
        };
        if let Some(scheme) = scheme {
            if url.set_scheme(scheme).is_err() {
                return Err(RouteError::InvalidScheme(scheme.to_string()));
            }
        }
        Ok(url.into())
    }

    fn route(&self, name: &str, parameters: &[&str], absolute: bool) -> Result<String, RouteError> {
        let template = self
            .routes
            .get(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
        let (segments, leftover) = fill(name, template, parameters)?;
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !leftover.is_empty() {
            let query = leftover
                .iter()
                .map(|value| form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>())
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query));
        }
        if absolute {
            Ok(url.into())
        } else {
            Ok(url[Position::BeforePath..].to_string())
        }
    }
}

/// Splits a template into path segments, returning them with the parameters left unused.
fn fill<'a>(
    name: &str,
    template: &'a str,
    parameters: &[&'a str],
) -> Result<(Vec<&'a str>, Vec<&'a str>), RouteError> {
    let mut parameters = parameters.iter();
    let mut segments = Vec::new();
    for segment in template.trim_matches('/').split('/') {
        if let Some(placeholder) = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        {
            match parameters.next() {
                Some(value) => segments.push(*value),
                None if placeholder.ends_with('?') => {}
                None => {
                    return Err(RouteError::MissingParameter {
                        route: name.to_string(),
                        parameter: placeholder.trim_end_matches('?').to_string(),
                    })
                }
            }
        } else if !segment.is_empty() {
            segments.push(segment);
        }
    }
    Ok((segments, parameters.copied().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> UrlRouter {
        UrlRouter::new("https://example.com/app")
            .unwrap()
            .with_route("autologin", "autologin/{token}")
            .with_route("comments", "/posts/{post}/comments/{comment?}")
    }

    #[test]
    fn to_resolves_relative_path_against_base() {
        let url = router().to("/dashboard", &[], None).unwrap();
        assert_eq!(url, "https://example.com/app/dashboard");
    }

    #[test]
    fn to_appends_extra_segments_and_forces_scheme() {
        let url = router().to("users", &["7", "a b"], Some(false)).unwrap();
        assert_eq!(url, "http://example.com/app/users/7/a%20b");
    }

    #[test]
    fn to_keeps_absolute_urls() {
        let url = router().to("https://other.test/x", &[], None).unwrap();
        assert_eq!(url, "https://other.test/x");
    }

    #[test]
    fn route_fills_placeholders_in_order() {
        let url = router().route("autologin", &["AbC123"], true).unwrap();
        assert_eq!(url, "https://example.com/app/autologin/AbC123");
    }

    #[test]
    fn route_skips_missing_optional_and_appends_leftovers_to_query() {
        let r = router();
        assert_eq!(
            r.route("comments", &["5"], false).unwrap(),
            "/app/posts/5/comments"
        );
        assert_eq!(
            r.route("comments", &["5", "9", "draft"], false).unwrap(),
            "/app/posts/5/comments/9?draft"
        );
    }

    #[test]
    fn route_reports_unknown_route_and_missing_parameter() {
        assert!(matches!(
            router().route("nope", &[], true),
            Err(RouteError::UnknownRoute(name)) if name == "nope"
        ));
        assert!(matches!(
            router().route("autologin", &[], true),
            Err(RouteError::MissingParameter { parameter, .. }) if parameter == "token"
        ));
    }

    #[test]
    fn to_rejects_scheme_switch_on_non_http_base() {
        let router = UrlRouter::new("custom://host/app").unwrap();
        assert!(matches!(
            router.to("inbox", &[], Some(true)),
            Err(RouteError::InvalidScheme(scheme)) if scheme == "https"
        ));
        assert_eq!(
            router.to("inbox", &[], None).unwrap(),
            "custom://host/app/inbox"
        );
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(matches!(
            UrlRouter::new("not a url"),
            Err(RouteError::InvalidUrl(_))
        ));
    }
}
