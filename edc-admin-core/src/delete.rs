// Redirect after a record is deleted

use crate::directive::RouteKwargs;
use crate::routes::RouteReverser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRedirect {
    /// Route to show after a delete. May be remapped per request through
    /// `url_name_data`, e.g. to a dashboard route chosen by middleware.
    pub post_url_on_delete_name: Option<String>,
}

impl DeleteRedirect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            post_url_on_delete_name: Some(name.into()),
        }
    }

    /// The post-delete URL, or `None` when unset or not reversible.
    pub fn resolve(
        &self,
        routes: &dyn RouteReverser,
        url_name_data: &BTreeMap<String, String>,
        kwargs: &RouteKwargs,
    ) -> Option<String> {
        let name = self.post_url_on_delete_name.as_deref()?;
        let url_name = url_name_data
            .get(name)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
            .unwrap_or(name);
        match routes.reverse(url_name, &[], kwargs) {
            Ok(url) => {
                debug!("Post delete url {} -> {}", url_name, url);
                Some(url)
            }
            Err(e) => {
                warn!("Ignoring post delete url: {}", e);
                None
            }
        }
    }
}

pub fn deleted_message(verbose_name: &str, object_display: &str) -> String {
    format!(
        "The {} \"{}\" was deleted successfully.",
        verbose_name, object_display
    )
}
