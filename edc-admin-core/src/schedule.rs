// Visit schedule and record lookup collaborators

use crate::model::{ModelLabel, RecordId, VisitTracking};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A form in a visit: a model and, for panel-based forms such as
/// requisitions, the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormReference {
    pub model: ModelLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_name: Option<String>,
}

/// The form that follows the one just saved.
pub type NextFormReference = FormReference;

impl FormReference {
    pub fn new(model: ModelLabel) -> Self {
        Self {
            model,
            panel_name: None,
        }
    }

    pub fn with_panel(mut self, panel_name: impl Into<String>) -> Self {
        self.panel_name = Some(panel_name.into());
        self
    }

    fn matches(&self, other: &FormReference) -> bool {
        self.model == other.model
            && (other.panel_name.is_none() || self.panel_name == other.panel_name)
    }
}

pub trait VisitSchedule {
    /// The form defined after `current` for this visit, if any.
    fn next_form(&self, visit: &VisitTracking, current: &FormReference)
    -> Option<NextFormReference>;
}

/// Filter for finding an existing record of the next form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupCriteria {
    pub visit_model_attr: String,
    pub visit_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_name: Option<String>,
}

impl LookupCriteria {
    pub fn for_visit(visit: &VisitTracking, panel_name: Option<&str>) -> Self {
        Self {
            visit_model_attr: visit.visit_model_attr.clone(),
            visit_id: visit.visit_id,
            panel_name: panel_name.map(str::to_string),
        }
    }
}

pub trait RecordLookup {
    fn find(&self, model: &ModelLabel, criteria: &LookupCriteria) -> Option<RecordId>;
}

/// Ordered forms per visit code, with a default sequence for visits that
/// have no sequence of their own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledForms {
    #[serde(default)]
    pub forms: Vec<FormReference>,
    #[serde(default)]
    pub visits: BTreeMap<String, Vec<FormReference>>,
}

impl ScheduledForms {
    pub fn new(forms: Vec<FormReference>) -> Self {
        Self {
            forms,
            visits: BTreeMap::new(),
        }
    }

    pub fn with_visit(mut self, visit_code: impl Into<String>, forms: Vec<FormReference>) -> Self {
        self.visits.insert(visit_code.into(), forms);
        self
    }

    fn forms_for(&self, visit: &VisitTracking) -> &[FormReference] {
        visit
            .visit_code
            .as_ref()
            .and_then(|code| self.visits.get(code))
            .map(Vec::as_slice)
            .unwrap_or(&self.forms)
    }
}

impl VisitSchedule for ScheduledForms {
    fn next_form(
        &self,
        visit: &VisitTracking,
        current: &FormReference,
    ) -> Option<NextFormReference> {
        let forms = self.forms_for(visit);
        let index = forms.iter().position(|f| f.matches(current))?;
        forms.get(index + 1).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    pub model: ModelLabel,
    pub visit_model_attr: String,
    pub visit_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_name: Option<String>,
}

/// Records already saved, searchable by model and visit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: Vec<StoredRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: StoredRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<StoredRecord>> for RecordStore {
    fn from(records: Vec<StoredRecord>) -> Self {
        Self { records }
    }
}

impl RecordLookup for RecordStore {
    fn find(&self, model: &ModelLabel, criteria: &LookupCriteria) -> Option<RecordId> {
        self.records
            .iter()
            .find(|r| {
                r.model == *model
                    && r.visit_model_attr == criteria.visit_model_attr
                    && r.visit_id == criteria.visit_id
                    && (criteria.panel_name.is_none() || r.panel_name == criteria.panel_name)
            })
            .map(|r| r.id)
    }
}
