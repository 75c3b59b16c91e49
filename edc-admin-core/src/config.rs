// JSON configuration for an admin site

use crate::context::Institution;
use crate::error::{AdminError, Result};
use crate::handler::AdminOptions;
use crate::model::ModelLabel;
use crate::redirect::RedirectSettings;
use crate::routes::{RouteSpec, RouteTable};
use crate::schedule::{RecordStore, ScheduledForms};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    #[serde(flatten)]
    pub redirect: RedirectSettings,
    pub institution: Option<Institution>,
    /// Application routes, e.g. dashboards named in `next` directives.
    pub routes: Vec<RouteSpec>,
    /// Models registered with the admin site.
    pub admin_models: Vec<ModelLabel>,
    pub visit_schedule: ScheduledForms,
    /// Existing records, for looking up the next form of a visit.
    pub records: RecordStore,
}

impl AdminConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AdminConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AdminError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.redirect.site_name.is_empty() {
            return Err(AdminError::Config("site_name must not be empty".to_string()));
        }
        if self.redirect.next_querystring_attr.is_empty() {
            return Err(AdminError::Config(
                "next_querystring_attr must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Declared routes, the site index and the admin routes of every
    /// registered model.
    pub fn route_table(&self) -> Result<RouteTable> {
        let mut table = RouteTable::from_specs(&self.routes)?;
        let site = &self.redirect.site_name;
        table.add(&format!("{}:index", site), &format!("{}/", site))?;
        for model in &self.admin_models {
            table.register_admin_model(site, model)?;
        }
        Ok(table)
    }

    pub fn admin_options(&self) -> AdminOptions {
        AdminOptions {
            redirect: self.redirect.clone(),
            institution: self.institution.clone(),
            ..Default::default()
        }
    }
}
