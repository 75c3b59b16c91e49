// Audit field stamping and audit columns

use crate::form::Fieldset;
use crate::model::AdminRecord;
use chrono::{DateTime, Utc};

pub const AUDIT_FIELDS: [&str; 6] = [
    "user_created",
    "user_modified",
    "created",
    "modified",
    "hostname_created",
    "hostname_modified",
];

const AUDIT_LIST_FILTER: [&str; 6] = [
    "created",
    "modified",
    "user_created",
    "user_modified",
    "hostname_created",
    "hostname_modified",
];

/// Collapsed "Audit" fieldset listing the audit fields.
pub fn audit_fieldset() -> Fieldset {
    Fieldset::new(Some("Audit"), &AUDIT_FIELDS).collapsed()
}

/// Record who saved `record`, from where and when. Adds fill the `*_created`
/// fields, changes fill the `*_modified` fields.
pub fn stamp_audit_fields(
    record: &mut AdminRecord,
    username: &str,
    hostname: &str,
    change: bool,
    now: DateTime<Utc>,
) {
    let audit = &mut record.audit;
    if change {
        audit.user_modified = Some(username.to_string());
        audit.hostname_modified = Some(hostname.to_string());
        audit.modified = Some(now);
    } else {
        audit.user_created = Some(username.to_string());
        audit.hostname_created = Some(hostname.to_string());
        audit.created = Some(now);
    }
}

/// `list_filter` with the audit columns appended, skipping ones already present.
pub fn with_audit_list_filter(list_filter: &[String]) -> Vec<String> {
    let mut filters = list_filter.to_vec();
    for column in AUDIT_LIST_FILTER {
        if !list_filter.iter().any(|f| f == column) {
            filters.push(column.to_string());
        }
    }
    filters
}

/// `readonly_fields` followed by the audit fields.
pub fn with_audit_readonly_fields(readonly_fields: &[String]) -> Vec<String> {
    readonly_fields
        .iter()
        .cloned()
        .chain(AUDIT_FIELDS.iter().map(|f| f.to_string()))
        .collect()
}
