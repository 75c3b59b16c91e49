//! Field and column layout merging.
//!
//! An admin for an abstract model declares `mixin_*` lists that get merged
//! into the concrete admin's own lists. Everything here returns fresh vectors
//! computed from the declarations; nothing is mutated between requests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A layout entry: a plain field name or one pinned to a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutEntry {
    Name(String),
    Positioned(usize, String),
}

impl From<&str> for LayoutEntry {
    fn from(name: &str) -> Self {
        LayoutEntry::Name(name.to_string())
    }
}

impl From<(usize, &str)> for LayoutEntry {
    fn from((index, name): (usize, &str)) -> Self {
        LayoutEntry::Positioned(index, name.to_string())
    }
}

/// Flatten entries into names, moving each positioned item to its index.
/// An index past the end appends.
pub fn reorder(entries: &[LayoutEntry]) -> Vec<String> {
    let mut names: Vec<String> = entries
        .iter()
        .filter_map(|e| match e {
            LayoutEntry::Name(name) => Some(name.clone()),
            LayoutEntry::Positioned(..) => None,
        })
        .collect();
    for entry in entries {
        if let LayoutEntry::Positioned(index, name) = entry {
            if let Some(existing) = names.iter().position(|n| n == name) {
                names.remove(existing);
            }
            let index = (*index).min(names.len());
            names.insert(index, name.clone());
        }
    }
    names
}

/// `fields` followed by the mixin fields it does not already contain.
pub fn extend_from(fields: &[String], mixin_fields: &[String]) -> Vec<String> {
    let mut merged = fields.to_vec();
    merged.extend(
        mixin_fields
            .iter()
            .filter(|f| !fields.contains(f))
            .cloned(),
    );
    merged
}

pub fn remove_from(fields: &[String], exclude: &[String]) -> Vec<String> {
    fields
        .iter()
        .filter(|f| !exclude.contains(f))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioLayout {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLayout {
    pub mixin_fields: Vec<String>,
    pub mixin_radio_fields: BTreeMap<String, RadioLayout>,
    pub mixin_list_display: Vec<String>,
    pub list_display_pos: Vec<(usize, String)>,
    pub mixin_list_filter: Vec<String>,
    pub list_filter_pos: Vec<(usize, String)>,
    pub mixin_search_fields: Vec<String>,
    /// Fields the mixin declares but the concrete admin does not want.
    pub mixin_exclude_fields: Vec<String>,
}

fn with_positions(base: &[String], positioned: &[(usize, String)]) -> Vec<LayoutEntry> {
    base.iter()
        .map(|name| LayoutEntry::Name(name.clone()))
        .chain(
            positioned
                .iter()
                .map(|(index, name)| LayoutEntry::Positioned(*index, name.clone())),
        )
        .collect()
}

impl FieldLayout {
    fn update_from_mixin(&self, fields: &[String], mixin_fields: &[String]) -> Vec<String> {
        remove_from(&extend_from(fields, mixin_fields), &self.mixin_exclude_fields)
    }

    pub fn list_display(&self, base: &[String]) -> Vec<String> {
        let ordered = reorder(&with_positions(base, &self.list_display_pos));
        self.update_from_mixin(&ordered, &self.mixin_list_display)
    }

    pub fn list_filter(&self, base: &[String]) -> Vec<String> {
        let ordered = reorder(&with_positions(base, &self.list_filter_pos));
        self.update_from_mixin(&ordered, &self.mixin_list_filter)
    }

    pub fn search_fields(&self, base: &[String]) -> Vec<String> {
        self.update_from_mixin(base, &self.mixin_search_fields)
    }

    /// Form fields in display order.
    ///
    /// Mixin fields win when declared; otherwise the admin's own `declared`
    /// fields; otherwise every form field followed by the read-only fields.
    pub fn fields(
        &self,
        declared: &[String],
        form_fields: &[String],
        readonly_fields: &[String],
    ) -> Vec<String> {
        if !self.mixin_fields.is_empty() {
            self.update_from_mixin(declared, &self.mixin_fields)
        } else if !declared.is_empty() {
            declared.to_vec()
        } else {
            form_fields
                .iter()
                .chain(readonly_fields.iter())
                .cloned()
                .collect()
        }
    }

    pub fn radio_fields(
        &self,
        base: &BTreeMap<String, RadioLayout>,
    ) -> BTreeMap<String, RadioLayout> {
        let mut merged = base.clone();
        merged.extend(self.mixin_radio_fields.iter().map(|(k, v)| (k.clone(), *v)));
        for field in &self.mixin_exclude_fields {
            merged.remove(field);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reorder_moves_positioned_items() {
        let entries: Vec<LayoutEntry> = vec![
            "a".into(),
            "b".into(),
            "c".into(),
            (0, "c").into(),
            (1, "d").into(),
        ];
        assert_eq!(reorder(&entries), names(&["c", "d", "a", "b"]));
    }

    #[test]
    fn test_reorder_index_past_end_appends() {
        let entries: Vec<LayoutEntry> = vec!["a".into(), (10, "z").into()];
        assert_eq!(reorder(&entries), names(&["a", "z"]));
    }

    #[test]
    fn test_extend_and_remove() {
        let merged = extend_from(&names(&["a", "b"]), &names(&["b", "c"]));
        assert_eq!(merged, names(&["a", "b", "c"]));
        assert_eq!(remove_from(&merged, &names(&["b"])), names(&["a", "c"]));
    }

    #[test]
    fn test_list_display() {
        let layout = FieldLayout {
            mixin_list_display: names(&["consent_datetime", "gender"]),
            list_display_pos: vec![(1, "dashboard".to_string())],
            mixin_exclude_fields: names(&["gender"]),
            ..Default::default()
        };
        let display = layout.list_display(&names(&["subject_identifier", "created"]));
        assert_eq!(
            display,
            names(&["subject_identifier", "dashboard", "created", "consent_datetime"])
        );
    }

    #[test]
    fn test_list_display_is_not_cumulative() {
        let layout = FieldLayout {
            mixin_list_display: names(&["gender"]),
            ..Default::default()
        };
        let base = names(&["subject_identifier"]);
        assert_eq!(layout.list_display(&base), layout.list_display(&base));
    }

    #[test]
    fn test_search_fields_and_filter() {
        let layout = FieldLayout {
            mixin_search_fields: names(&["subject_identifier", "initials"]),
            mixin_list_filter: names(&["gender"]),
            list_filter_pos: vec![(0, "report_datetime".to_string())],
            ..Default::default()
        };
        assert_eq!(
            layout.search_fields(&names(&["initials"])),
            names(&["initials", "subject_identifier"])
        );
        assert_eq!(
            layout.list_filter(&names(&["created"])),
            names(&["report_datetime", "created", "gender"])
        );
    }

    #[test]
    fn test_fields_precedence() {
        let form_fields = names(&["a", "b"]);
        let readonly = names(&["created"]);

        let plain = FieldLayout::default();
        assert_eq!(plain.fields(&[], &form_fields, &readonly), names(&["a", "b", "created"]));
        assert_eq!(plain.fields(&names(&["b"]), &form_fields, &readonly), names(&["b"]));

        let mixin = FieldLayout {
            mixin_fields: names(&["x", "y"]),
            mixin_exclude_fields: names(&["y"]),
            ..Default::default()
        };
        assert_eq!(mixin.fields(&names(&["b"]), &form_fields, &readonly), names(&["b", "x"]));
    }

    #[test]
    fn test_radio_fields_merge_and_exclude() {
        let layout = FieldLayout {
            mixin_radio_fields: BTreeMap::from([
                ("gender".to_string(), RadioLayout::Vertical),
                ("is_literate".to_string(), RadioLayout::Vertical),
            ]),
            mixin_exclude_fields: names(&["is_literate"]),
            ..Default::default()
        };
        let base = BTreeMap::from([("consent_copy".to_string(), RadioLayout::Horizontal)]);
        let merged = layout.radio_fields(&base);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("gender"), Some(&RadioLayout::Vertical));
        assert!(!merged.contains_key("is_literate"));
        assert_eq!(layout.mixin_radio_fields.len(), 2);
    }
}
