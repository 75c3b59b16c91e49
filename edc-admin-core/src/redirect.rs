//! Post-submit redirect resolution.
//!
//! Decides where a user goes after an add, change or delete: the next form
//! in the visit schedule ("Save next"), the route named by the `next`
//! querystring directive, a cancel destination, or nothing at all, in which
//! case the caller falls back to the framework's default URL.
//!
//! ```text
//! ?next=my_url_name,arg1,arg2&arg1=value1&arg2=value2&arg3=value3
//! ```
//!
//! reverses `my_url_name` with `{arg1: value1, arg2: value2}`.

use crate::directive::{RedirectDirective, RouteKwargs};
use crate::error::{AdminError, NoReverseMatch, Result};
use crate::model::AdminRecord;
use crate::querystring::QueryParams;
use crate::routes::RouteReverser;
use crate::schedule::{FormReference, LookupCriteria, RecordLookup, VisitSchedule};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use url::form_urlencoded;

pub const CANCEL_BUTTON: &str = "_cancel";
pub const SAVE_NEXT_BUTTON: &str = "_savenext";
pub const DEFAULT_NEXT_ATTR: &str = "next";

/// Redirect behavior configured on a model admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectSettings {
    /// Admin site name, the namespace of the per-model admin routes.
    pub site_name: String,
    pub next_querystring_attr: String,
    pub show_save_next: bool,
    pub show_cancel: bool,
    /// Where "Cancel" goes when the querystring carries no `next` directive.
    pub cancel_url: Option<String>,
}

impl Default for RedirectSettings {
    fn default() -> Self {
        Self {
            site_name: "admin".to_string(),
            next_querystring_attr: DEFAULT_NEXT_ATTR.to_string(),
            show_save_next: false,
            show_cancel: false,
            cancel_url: None,
        }
    }
}

/// Which submit button was used. A button only counts when the admin
/// shows it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFlags {
    pub is_cancel: bool,
    pub is_save_next: bool,
}

impl RequestFlags {
    pub fn from_form(form: &QueryParams, settings: &RedirectSettings) -> Self {
        Self {
            is_cancel: settings.show_cancel && form.flag(CANCEL_BUTTON),
            is_save_next: settings.show_save_next && form.flag(SAVE_NEXT_BUTTON),
        }
    }
}

/// A resolved redirect: a path plus an optional querystring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectOutcome {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl RedirectOutcome {
    pub fn to_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
        }
    }

    pub fn url(&self) -> String {
        match self.query {
            Some(ref query) if !query.is_empty() => format!("{}?{}", self.path, query),
            _ => self.path.clone(),
        }
    }
}

impl fmt::Display for RedirectOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

pub struct RedirectResolver<'a> {
    settings: &'a RedirectSettings,
    routes: &'a dyn RouteReverser,
    schedule: &'a dyn VisitSchedule,
    records: &'a dyn RecordLookup,
}

impl<'a> RedirectResolver<'a> {
    pub fn new(
        settings: &'a RedirectSettings,
        routes: &'a dyn RouteReverser,
        schedule: &'a dyn VisitSchedule,
        records: &'a dyn RecordLookup,
    ) -> Self {
        Self {
            settings,
            routes,
            schedule,
            records,
        }
    }

    /// Resolve the redirect for a submitted form.
    ///
    /// `Ok(None)` means nothing here applies and the framework default
    /// should be used.
    pub fn resolve(
        &self,
        flags: RequestFlags,
        query: &QueryParams,
        record: Option<&AdminRecord>,
    ) -> Result<Option<RedirectOutcome>> {
        if flags.is_save_next {
            if let Some(record) = record {
                if let Some(outcome) = self.savenext_redirect(record, query)? {
                    info!("Save next redirect to {}", outcome);
                    return Ok(Some(outcome));
                }
            }
            debug!("Save next found no next form, falling through to next directive");
            return self.next_redirect(query);
        }
        if flags.is_cancel {
            return self.cancel_redirect(query);
        }
        self.next_redirect(query)
    }

    /// Cancel goes to the `next` directive, then to the configured cancel URL.
    pub fn cancel_redirect(&self, query: &QueryParams) -> Result<Option<RedirectOutcome>> {
        if let Some(outcome) = self.next_redirect(query)? {
            debug!("Cancel redirect to {}", outcome);
            return Ok(Some(outcome));
        }
        Ok(self
            .settings
            .cancel_url
            .as_ref()
            .map(|url| RedirectOutcome::to_path(url.clone())))
    }

    /// Reverse the route named by the `next` directive, if the querystring has one.
    pub fn next_redirect(&self, query: &QueryParams) -> Result<Option<RedirectOutcome>> {
        let Some(value) = query.get_non_empty(&self.settings.next_querystring_attr) else {
            return Ok(None);
        };
        let directive = match RedirectDirective::parse(value) {
            Ok(directive) => directive,
            Err(e) => {
                return Err(AdminError::NextUrlRedirect {
                    url_name: String::new(),
                    kwargs: RouteKwargs::new(),
                    source: NoReverseMatch::new("", e.to_string()),
                });
            }
        };
        let kwargs = directive.kwargs(query);
        match self.routes.reverse(&directive.route_name, &[], &kwargs) {
            Ok(path) => {
                debug!("Next directive {} reversed to {}", directive.route_name, path);
                Ok(Some(RedirectOutcome::to_path(path)))
            }
            Err(source) => Err(AdminError::NextUrlRedirect {
                url_name: directive.route_name,
                kwargs,
                source,
            }),
        }
    }

    /// Kwargs named by the `next` directive. Empty when there is no usable directive.
    pub fn next_options(&self, query: &QueryParams) -> RouteKwargs {
        query
            .get_non_empty(&self.settings.next_querystring_attr)
            .and_then(|value| RedirectDirective::parse(value).ok())
            .map(|d| d.kwargs(query))
            .unwrap_or_default()
    }

    /// URL of the form that follows `record` in its visit schedule.
    ///
    /// Links to the change form when the next record already exists for this
    /// visit, otherwise to the add form. The original `next` directive and
    /// its kwargs ride along in the querystring.
    pub fn savenext_redirect(
        &self,
        record: &AdminRecord,
        query: &QueryParams,
    ) -> Result<Option<RedirectOutcome>> {
        let visit = record.visit_tracking().ok_or_else(|| AdminError::NextUrl {
            model: record.model.to_string(),
            reason: "Record does not expose visit tracking.".to_string(),
        })?;

        let current = FormReference {
            model: record.model.clone(),
            panel_name: record.panel_name.clone(),
        };
        let Some(next_form) = self.schedule.next_form(visit, &current) else {
            return Ok(None);
        };
        let panel_name = next_form.panel_name.as_deref();

        let url_name = format!(
            "{}:{}",
            self.settings.site_name,
            next_form.model.url_fragment()
        );
        let criteria = LookupCriteria::for_visit(visit, panel_name);
        let path = match self.records.find(&next_form.model, &criteria) {
            Some(id) => {
                debug!("Next form {} exists as {}", next_form.model, id);
                let id = id.to_string();
                self.routes.reverse(
                    &format!("{}_change", url_name),
                    &[id.as_str()],
                    &RouteKwargs::new(),
                )?
            }
            None => {
                debug!("Next form {} not yet captured", next_form.model);
                self.routes
                    .reverse(&format!("{}_add", url_name), &[], &RouteKwargs::new())?
            }
        };

        let mut options = self.next_options(query);
        if let Some(panel_name) = panel_name {
            options.insert("panel_name", panel_name);
        }
        options.insert(visit.visit_model_attr.clone(), visit.visit_id.to_string());

        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(options.iter())
            .finish();
        let attr = &self.settings.next_querystring_attr;
        let query = match query.get_non_empty(attr) {
            Some(next) => format!("{}={}&{}", attr, next, encoded),
            None => encoded,
        };

        Ok(Some(RedirectOutcome {
            path,
            query: Some(query),
        }))
    }
}
