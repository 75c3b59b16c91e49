use crate::error::{AdminError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type RecordId = Uuid;

/// `app_label.model_name`, always lower case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelLabel {
    app_label: String,
    model_name: String,
}

impl ModelLabel {
    pub fn new(app_label: &str, model_name: &str) -> Self {
        Self {
            app_label: app_label.to_lowercase(),
            model_name: model_name.to_lowercase(),
        }
    }

    pub fn parse(label: &str) -> Result<Self> {
        match label.split_once('.') {
            Some((app, model)) if !app.is_empty() && !model.is_empty() && !model.contains('.') => {
                Ok(Self::new(app, model))
            }
            _ => Err(AdminError::Config(format!(
                "Invalid model label '{}', expected app_label.model_name",
                label
            ))),
        }
    }

    pub fn app_label(&self) -> &str {
        &self.app_label
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Route name fragment used by the admin site, e.g. `edc_example_subjectvisit`.
    pub fn url_fragment(&self) -> String {
        format!("{}_{}", self.app_label, self.model_name)
    }
}

impl fmt::Display for ModelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_label, self.model_name)
    }
}

impl TryFrom<String> for ModelLabel {
    type Error = AdminError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ModelLabel> for String {
    fn from(label: ModelLabel) -> Self {
        label.to_string()
    }
}

/// Visit context of a CRF record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitTracking {
    /// Name of the attribute on the CRF that points at its visit, e.g. `subject_visit`.
    pub visit_model_attr: String,
    pub visit_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_code: Option<String>,
}

impl VisitTracking {
    pub fn new(visit_model_attr: impl Into<String>, visit_id: Uuid) -> Self {
        Self {
            visit_model_attr: visit_model_attr.into(),
            visit_id,
            visit_code: None,
        }
    }

    pub fn with_visit_code(mut self, visit_code: impl Into<String>) -> Self {
        self.visit_code = Some(visit_code.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFields {
    pub user_created: Option<String>,
    pub user_modified: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub hostname_created: Option<String>,
    pub hostname_modified: Option<String>,
}

/// A record as seen by the admin: the row being added, changed or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminRecord {
    pub id: RecordId,
    pub model: ModelLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit: Option<VisitTracking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_name: Option<String>,
    #[serde(default)]
    pub audit: AuditFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_as_json: Option<serde_json::Value>,
    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
}

impl AdminRecord {
    pub fn new(model: ModelLabel) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            visit: None,
            panel_name: None,
            audit: AuditFields::default(),
            form_as_json: None,
            values: serde_json::Map::new(),
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    pub fn with_visit(mut self, visit: VisitTracking) -> Self {
        self.visit = Some(visit);
        self
    }

    pub fn with_panel(mut self, panel_name: impl Into<String>) -> Self {
        self.panel_name = Some(panel_name.into());
        self
    }

    /// The visit-tracking capability, if this record was declared with one.
    pub fn visit_tracking(&self) -> Option<&VisitTracking> {
        self.visit.as_ref()
    }
}

impl fmt::Display for AdminRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.model.model_name(), self.id)
    }
}
