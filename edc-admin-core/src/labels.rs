// Form label rewriting: question numbers and text replacement

use crate::form::AdminForm;

const NUMBERED_PREFIX: &str = "<a title=\"";

fn starts_with_number(label: &str) -> bool {
    let digits = label.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && label[digits..].starts_with('.')
}

/// Prefix each label with its 1-based position, e.g.
/// `<a title="weight">3</a>. Weight`. Labels that are already numbered are
/// left alone, as are forms with auto-numbering switched off.
pub fn auto_number(mut form: AdminForm) -> AdminForm {
    if !form.auto_number {
        return form;
    }
    for (index, field) in form.fields.iter_mut().enumerate() {
        if !starts_with_number(&field.label) && !field.label.starts_with(NUMBERED_PREFIX) {
            field.label = format!(
                "{}{}\">{}</a>. {}",
                NUMBERED_PREFIX,
                field.name,
                index + 1,
                field.label
            );
        }
    }
    form
}

/// Replace `old` with `new` in every label except those of `skip_fields`.
pub fn replace_label_text(
    mut form: AdminForm,
    old: &str,
    new: &str,
    skip_fields: &[&str],
) -> AdminForm {
    if old.is_empty() {
        return form;
    }
    for field in form
        .fields
        .iter_mut()
        .filter(|f| !skip_fields.contains(&f.name.as_str()))
    {
        if field.label.contains(old) {
            field.label = field.label.replace(old, new);
        }
    }
    form
}
