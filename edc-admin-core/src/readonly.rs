// Read-only rendering requested with `edc_readonly=1`

use crate::context::PageContext;
use crate::form::{AdminForm, Widget};
use crate::querystring::QueryParams;

pub const READONLY_ATTR: &str = "edc_readonly";
pub const READONLY_NEXT_KEY: &str = "edc_readonly_next";

pub fn is_readonly(query: &QueryParams) -> bool {
    query.flag(READONLY_ATTR)
}

/// Disable every field and strip related-object links. Admin date widgets
/// become plain date inputs.
pub fn make_readonly(mut form: AdminForm) -> AdminForm {
    for field in form.fields.iter_mut() {
        field.disabled = true;
        match field.widget {
            Widget::RelatedSelect { .. } => {
                field.widget = Widget::RelatedSelect {
                    can_add_related: false,
                    can_change_related: false,
                    can_delete_related: false,
                }
            }
            Widget::AdminDate => field.widget = Widget::DateInput,
            _ => {}
        }
    }
    form
}

/// Adds `edc_readonly` and the Close button target to a change-view context.
pub fn readonly_context(query: &QueryParams, next_attr: &str, context: &mut PageContext) {
    if let Some(value) = query.get_non_empty(READONLY_ATTR) {
        context.insert(READONLY_ATTR, value);
        context.insert(
            READONLY_NEXT_KEY,
            query
                .get(next_attr)
                .map(serde_json::Value::from)
                .unwrap_or(serde_json::Value::Null),
        );
    }
}
