// The "next" querystring directive: `next=<route_name>,<arg1>,<arg2>,...`

use crate::error::{AdminError, Result};
use crate::querystring::QueryParams;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed value of the "next" querystring attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectDirective {
    pub route_name: String,
    /// Names of other querystring keys whose values become route kwargs.
    pub arg_names: Vec<String>,
}

impl RedirectDirective {
    pub fn parse(value: &str) -> Result<Self> {
        let mut tokens = value.split(',');
        let route_name = tokens.next().unwrap_or_default().to_string();
        if route_name.is_empty() {
            return Err(AdminError::InvalidDirective(format!(
                "missing route name in '{}'",
                value
            )));
        }
        let arg_names = tokens
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self {
            route_name,
            arg_names,
        })
    }

    /// Read and parse the directive stored under `attr`, if any.
    pub fn from_query(query: &QueryParams, attr: &str) -> Result<Option<Self>> {
        match query.get_non_empty(attr) {
            Some(value) => Self::parse(value).map(Some),
            None => Ok(None),
        }
    }

    /// Kwargs for reversing `route_name`, taken from `query` in directive order.
    ///
    /// Names that are missing from the querystring or carry an empty value
    /// are left out.
    pub fn kwargs(&self, query: &QueryParams) -> RouteKwargs {
        let mut kwargs = RouteKwargs::new();
        for name in &self.arg_names {
            if let Some(value) = query.get_non_empty(name) {
                kwargs.insert(name.clone(), value);
            }
        }
        kwargs
    }
}

/// Keyword arguments for route reversal. Keys are unique and keep
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteKwargs(Vec<(String, String)>);

impl RouteKwargs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. An overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn extend(&mut self, other: &RouteKwargs) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteKwargs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut kwargs = RouteKwargs::new();
        for (k, v) in iter {
            kwargs.insert(k, v);
        }
        kwargs
    }
}

impl fmt::Display for RouteKwargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{}': '{}'", k, v)?;
        }
        f.write_str("}")
    }
}
