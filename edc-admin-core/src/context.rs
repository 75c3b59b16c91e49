// Page context passed to admin templates

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageContext(BTreeMap<String, Value>);

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn pick(&self, keys: &[&str]) -> PageContext {
        let mut picked = PageContext::new();
        for key in keys {
            picked.insert(*key, self.get(key).cloned().unwrap_or(Value::Null));
        }
        picked
    }
}

/// Institution branding shown on add and change pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub institution: String,
    #[serde(default)]
    pub copyright: String,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub disclaimer: String,
}

impl Institution {
    pub fn apply(&self, context: &mut PageContext) {
        context.insert("institution", self.institution.clone());
        context.insert("copyright", self.copyright.clone());
        context.insert("license", self.license.clone().unwrap_or_default());
        context.insert("disclaimer", self.disclaimer.clone());
    }
}

/// Context for the revision line at the foot of a form.
pub fn revision_row(context: &PageContext) -> PageContext {
    context.pick(&["copyright", "institution", "revision", "disclaimer"])
}

pub fn instructions(context: &PageContext) -> PageContext {
    context.pick(&["instructions"])
}

pub fn additional_instructions(context: &PageContext) -> PageContext {
    context.pick(&["additional_instructions"])
}
