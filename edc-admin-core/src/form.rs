use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    TextInput,
    Textarea,
    /// Admin date widget with the calendar shortcut.
    AdminDate,
    /// Plain date input.
    DateInput,
    Select,
    RadioSelect,
    /// Foreign-key select wrapped with add/change/delete related links.
    RelatedSelect {
        can_add_related: bool,
        can_change_related: bool,
        can_delete_related: bool,
    },
}

impl Widget {
    pub fn related() -> Self {
        Widget::RelatedSelect {
            can_add_related: true,
            can_change_related: true,
            can_delete_related: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub widget: Widget,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FormField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, widget: Widget) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            widget,
            disabled: false,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A model form as built for the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminForm {
    pub fields: Vec<FormField>,
    /// Whether labels get question numbers.
    #[serde(default = "default_true")]
    pub auto_number: bool,
    /// Whether the form can render itself as JSON for storage on save.
    #[serde(default)]
    pub supports_json: bool,
}

fn default_true() -> bool {
    true
}

impl AdminForm {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            auto_number: true,
            supports_json: false,
        }
    }

    pub fn with_auto_number(mut self, auto_number: bool) -> Self {
        self.auto_number = auto_number;
        self
    }

    pub fn with_json_support(mut self) -> Self {
        self.supports_json = true;
        self
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field values and labels as a JSON object, or `None` if the form does
    /// not support it.
    pub fn as_json(&self) -> Option<serde_json::Value> {
        if !self.supports_json {
            return None;
        }
        let map = self
            .fields
            .iter()
            .map(|f| {
                (
                    f.name.clone(),
                    serde_json::json!({ "label": f.label, "value": f.value }),
                )
            })
            .collect::<serde_json::Map<_, _>>();
        Some(serde_json::Value::Object(map))
    }
}

/// A named group of fields on the admin form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fieldset {
    pub name: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub fields: Vec<String>,
}

impl Fieldset {
    pub fn new(name: Option<&str>, fields: &[&str]) -> Self {
        Self {
            name: name.map(str::to_string),
            classes: Vec::new(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn collapsed(mut self) -> Self {
        self.classes.push("collapse".to_string());
        self
    }
}
