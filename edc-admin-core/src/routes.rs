// Named routes and reverse resolution

use crate::directive::RouteKwargs;
use crate::error::{AdminError, NoReverseMatch, Result};
use crate::model::ModelLabel;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Bytes left as-is in a reversed path value: unreserved characters, the
/// RFC 3986 sub-delims and `:@`.
const PATH_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Turns a route name and arguments into a path.
pub trait RouteReverser {
    fn reverse(
        &self,
        name: &str,
        args: &[&str],
        kwargs: &RouteKwargs,
    ) -> std::result::Result<String, NoReverseMatch>;
}

/// A route declaration as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub name: String,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct Route {
    name: String,
    pattern: String,
    segments: Vec<Segment>,
}

impl Route {
    fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(p) => Some(p.as_str()),
            Segment::Literal(_) => None,
        })
    }

    fn build(&self, values: &[&str]) -> String {
        let mut values = values.iter();
        let mut path = String::from("/");
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param(_) => {
                    let value = values.next().copied().unwrap_or_default();
                    path.extend(utf8_percent_encode(value, PATH_VALUE));
                }
            }
        }
        path
    }
}

/// Parse `admin/<app>/<str:object_id>/change/` into literal and parameter segments.
/// A converter prefix (`str:`, `int:`, `uuid:`) is accepted and ignored.
fn parse_pattern(pattern: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = pattern.trim_start_matches('/');
    let mut seen = BTreeSet::new();

    while !rest.is_empty() {
        match rest.find('<') {
            Some(start) => {
                if start > 0 {
                    segments.push(Segment::Literal(rest[..start].to_string()));
                }
                let end = rest[start..].find('>').ok_or_else(|| {
                    AdminError::Config(format!("Unclosed '<' in route pattern '{}'", pattern))
                })? + start;
                let inner = &rest[start + 1..end];
                let name = inner.rsplit(':').next().unwrap_or_default();
                if name.is_empty() {
                    return Err(AdminError::Config(format!(
                        "Empty parameter name in route pattern '{}'",
                        pattern
                    )));
                }
                if !seen.insert(name.to_string()) {
                    return Err(AdminError::Config(format!(
                        "Duplicate parameter '{}' in route pattern '{}'",
                        name, pattern
                    )));
                }
                segments.push(Segment::Param(name.to_string()));
                rest = &rest[end + 1..];
            }
            None => {
                segments.push(Segment::Literal(rest.to_string()));
                rest = "";
            }
        }
    }
    Ok(segments)
}

fn valid_value(value: &str) -> bool {
    !value.is_empty() && !value.contains('/')
}

/// In-process route registry.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: &[RouteSpec]) -> Result<Self> {
        let mut table = Self::new();
        for spec in specs {
            table.add(&spec.name, &spec.pattern)?;
        }
        Ok(table)
    }

    /// Register `pattern` under `name`. Names may repeat; patterns are tried
    /// in registration order.
    pub fn add(&mut self, name: &str, pattern: &str) -> Result<()> {
        if name.is_empty() {
            return Err(AdminError::Config(format!(
                "Route pattern '{}' has no name",
                pattern
            )));
        }
        let segments = parse_pattern(pattern)?;
        self.routes.push(Route {
            name: name.to_string(),
            pattern: pattern.to_string(),
            segments,
        });
        Ok(())
    }

    pub fn with_route(mut self, name: &str, pattern: &str) -> Result<Self> {
        self.add(name, pattern)?;
        Ok(self)
    }

    /// Register the admin site's routes for one model.
    pub fn register_admin_model(&mut self, site_name: &str, model: &ModelLabel) -> Result<()> {
        let name = format!("{}:{}", site_name, model.url_fragment());
        let base = format!(
            "{}/{}/{}/",
            site_name,
            model.app_label(),
            model.model_name()
        );
        self.add(&format!("{}_changelist", name), &base)?;
        self.add(&format!("{}_add", name), &format!("{}add/", base))?;
        self.add(
            &format!("{}_history", name),
            &format!("{}<object_id>/history/", base),
        )?;
        self.add(
            &format!("{}_delete", name),
            &format!("{}<object_id>/delete/", base),
        )?;
        self.add(
            &format!("{}_change", name),
            &format!("{}<object_id>/change/", base),
        )?;
        debug!("Registered admin routes for {} on site {}", model, site_name);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// `(name, pattern)` for every registered route.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes
            .iter()
            .map(|r| (r.name.as_str(), r.pattern.as_str()))
    }
}

impl RouteReverser for RouteTable {
    fn reverse(
        &self,
        name: &str,
        args: &[&str],
        kwargs: &RouteKwargs,
    ) -> std::result::Result<String, NoReverseMatch> {
        if !args.is_empty() && !kwargs.is_empty() {
            return Err(NoReverseMatch::new(
                name,
                "positional and keyword arguments cannot be mixed",
            ));
        }

        let candidates: Vec<&Route> = self.routes.iter().filter(|r| r.name == name).collect();
        if candidates.is_empty() {
            return Err(NoReverseMatch::new(name, "not a valid route name"));
        }

        for route in candidates {
            let params: Vec<&str> = route.params().collect();
            if !kwargs.is_empty() {
                let wanted: BTreeSet<&str> = params.iter().copied().collect();
                let given: BTreeSet<&str> = kwargs.keys().collect();
                if wanted != given {
                    continue;
                }
                let values: Vec<&str> = params
                    .iter()
                    .map(|p| kwargs.get(p).unwrap_or_default())
                    .collect();
                if values.iter().all(|v| valid_value(v)) {
                    return Ok(route.build(&values));
                }
            } else if params.len() == args.len() && args.iter().all(|v| valid_value(v)) {
                return Ok(route.build(args));
            }
        }

        Err(NoReverseMatch::new(
            name,
            format!(
                "arguments '{:?}' and keyword arguments '{}' matched none of the patterns tried",
                args, kwargs
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new()
            .with_route("dashboard_url", "subject/dashboard/<subject_identifier>/")
            .unwrap()
            .with_route(
                "dashboard_url",
                "subject/dashboard/<subject_identifier>/<appointment>/",
            )
            .unwrap()
            .with_route("home_url", "")
            .unwrap()
    }

    #[test]
    fn test_reverse_with_kwargs() {
        let kwargs: RouteKwargs = [("subject_identifier", "101-001")].into_iter().collect();
        let path = table().reverse("dashboard_url", &[], &kwargs).unwrap();
        assert_eq!(path, "/subject/dashboard/101-001/");
    }

    #[test]
    fn test_reverse_picks_pattern_matching_kwargs() {
        let kwargs: RouteKwargs = [("appointment", "abc"), ("subject_identifier", "101-001")]
            .into_iter()
            .collect();
        let path = table().reverse("dashboard_url", &[], &kwargs).unwrap();
        assert_eq!(path, "/subject/dashboard/101-001/abc/");
    }

    #[test]
    fn test_reverse_root_pattern() {
        assert_eq!(
            table().reverse("home_url", &[], &RouteKwargs::new()).unwrap(),
            "/"
        );
    }

    #[test]
    fn test_reverse_unknown_name() {
        let err = table()
            .reverse("nope", &[], &RouteKwargs::new())
            .unwrap_err();
        assert_eq!(err.name, "nope");
    }

    #[test]
    fn test_reverse_missing_or_extra_kwargs() {
        let t = table();
        assert!(t.reverse("dashboard_url", &[], &RouteKwargs::new()).is_err());
        let extra: RouteKwargs = [("subject_identifier", "1"), ("other", "2")]
            .into_iter()
            .collect();
        assert!(t.reverse("dashboard_url", &[], &extra).is_err());
    }

    #[test]
    fn test_reverse_rejects_slash_in_value() {
        let kwargs: RouteKwargs = [("subject_identifier", "a/b")].into_iter().collect();
        assert!(table().reverse("dashboard_url", &[], &kwargs).is_err());
    }

    #[test]
    fn test_reverse_percent_encodes_values() {
        let kwargs: RouteKwargs = [("subject_identifier", "a?b#c d")].into_iter().collect();
        let path = table().reverse("dashboard_url", &[], &kwargs).unwrap();
        assert_eq!(path, "/subject/dashboard/a%3Fb%23c%20d/");

        let kept: RouteKwargs = [("subject_identifier", "x:y@z+1")].into_iter().collect();
        let path = table().reverse("dashboard_url", &[], &kept).unwrap();
        assert_eq!(path, "/subject/dashboard/x:y@z+1/");
    }

    #[test]
    fn test_reverse_positional() {
        let path = table().reverse("dashboard_url", &["101-001"], &RouteKwargs::new());
        assert_eq!(path.unwrap(), "/subject/dashboard/101-001/");
    }

    #[test]
    fn test_admin_model_routes() {
        let mut t = RouteTable::new();
        let label = ModelLabel::new("edc_example", "crfone");
        t.register_admin_model("edc_example_admin", &label).unwrap();
        assert_eq!(t.len(), 5);
        assert_eq!(
            t.reverse("edc_example_admin:edc_example_crfone_add", &[], &RouteKwargs::new())
                .unwrap(),
            "/edc_example_admin/edc_example/crfone/add/"
        );
        assert_eq!(
            t.reverse("edc_example_admin:edc_example_crfone_change", &["42"], &RouteKwargs::new())
                .unwrap(),
            "/edc_example_admin/edc_example/crfone/42/change/"
        );
    }

    #[test]
    fn test_pattern_errors() {
        let mut t = RouteTable::new();
        assert!(t.add("bad", "a/<id/").is_err());
        assert!(t.add("bad", "a/<>/").is_err());
        assert!(t.add("bad", "a/<id>/<str:id>/").is_err());
        assert!(t.add("", "a/").is_err());
        assert!(t.add("ok", "a/<int:id>/").is_ok());
    }
}
