// Admin layout for address/contact models

use crate::audit::{audit_fieldset, with_audit_readonly_fields};
use crate::form::Fieldset;

pub const ADDRESS_FIELDS: [&str; 10] = [
    "contact_name",
    "name",
    "address",
    "postal_code",
    "city",
    "country",
    "telephone",
    "mobile",
    "fax",
    "email",
];

pub fn address_fieldsets() -> Vec<Fieldset> {
    vec![Fieldset::new(None, &ADDRESS_FIELDS), audit_fieldset()]
}

pub fn address_readonly_fields(readonly_fields: &[String]) -> Vec<String> {
    with_audit_readonly_fields(readonly_fields)
}
