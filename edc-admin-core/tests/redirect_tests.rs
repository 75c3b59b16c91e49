// Tests for post-submit redirect resolution

use edc_admin_core::directive::RouteKwargs;
use edc_admin_core::model::{AdminRecord, ModelLabel, VisitTracking};
use edc_admin_core::querystring::QueryParams;
use edc_admin_core::redirect::{RedirectResolver, RedirectSettings, RequestFlags};
use edc_admin_core::routes::{RouteReverser, RouteTable};
use edc_admin_core::schedule::{FormReference, RecordStore, ScheduledForms, StoredRecord};
use edc_admin_core::AdminError;
use uuid::Uuid;

const SITE: &str = "edc_example_admin";

fn label(name: &str) -> ModelLabel {
    ModelLabel::new("edc_example", name)
}

fn routes() -> RouteTable {
    let mut table = RouteTable::new()
        .with_route("my_url_name", "listboard/<arg1>/<arg2>/")
        .unwrap()
        .with_route("dashboard_url", "dashboard/<subject_identifier>/")
        .unwrap();
    for name in ["crfone", "crftwo", "requisition"] {
        table.register_admin_model(SITE, &label(name)).unwrap();
    }
    table
}

fn schedule() -> ScheduledForms {
    ScheduledForms::new(vec![
        FormReference::new(label("crfone")),
        FormReference::new(label("crftwo")),
        FormReference::new(label("requisition")).with_panel("fbc"),
    ])
}

fn settings() -> RedirectSettings {
    RedirectSettings {
        site_name: SITE.to_string(),
        show_save_next: true,
        show_cancel: true,
        ..Default::default()
    }
}

fn visit() -> VisitTracking {
    VisitTracking::new("subject_visit", Uuid::parse_str("6f1c2c52-8d4c-4c8e-9d2e-0a7c3c6f1e11").unwrap())
}

fn save_next() -> RequestFlags {
    RequestFlags {
        is_cancel: false,
        is_save_next: true,
    }
}

// ============================================================================
// Next directive
// ============================================================================

#[test]
fn test_next_directive_reverses_named_route() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let query = QueryParams::parse("next=my_url_name,arg1,arg2&arg1=value1&arg2=value2&arg3=value3");
    let outcome = resolver
        .resolve(RequestFlags::default(), &query, None)
        .unwrap()
        .unwrap();
    assert_eq!(outcome.url(), "/listboard/value1/value2/");
    assert_eq!(outcome.query, None);
}

#[test]
fn test_next_options_exclude_unnamed_and_empty() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let query = QueryParams::parse("next=my_url_name,arg1,arg2&arg1=value1&arg2=value2&arg3=value3");
    let expected: RouteKwargs = [("arg1", "value1"), ("arg2", "value2")].into_iter().collect();
    assert_eq!(resolver.next_options(&query), expected);

    let empty = QueryParams::parse("next=my_url_name,arg1,arg2&arg1=&arg2=value2");
    let options = resolver.next_options(&empty);
    assert!(!options.contains_key("arg1"));
    assert_eq!(options.len(), 1);
}

#[test]
fn test_unknown_route_raises_next_url_redirect_error() {
    let table = RouteTable::new();
    let (schedule, records, settings) = (schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &table, &schedule, &records);

    let query = QueryParams::parse("next=my_url_name,arg1,arg2&arg1=value1&arg2=value2&arg3=value3");
    let err = resolver
        .resolve(RequestFlags::default(), &query, None)
        .unwrap_err();
    assert!(matches!(err, AdminError::NextUrlRedirect { .. }));
    let message = err.to_string();
    assert!(message.contains("my_url_name"));
    assert!(message.contains("{'arg1': 'value1', 'arg2': 'value2'}"));
}

#[test]
fn test_missing_route_argument_raises_next_url_redirect_error() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let query = QueryParams::parse("next=my_url_name,arg1,arg2&arg1=value1");
    let err = resolver.next_redirect(&query).unwrap_err();
    match err {
        AdminError::NextUrlRedirect { url_name, kwargs, .. } => {
            assert_eq!(url_name, "my_url_name");
            assert_eq!(kwargs.to_string(), "{'arg1': 'value1'}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_empty_route_name_raises_next_url_redirect_error() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let query = QueryParams::parse("next=,arg1&arg1=value1");
    let err = resolver.next_redirect(&query).unwrap_err();
    match err {
        AdminError::NextUrlRedirect { url_name, kwargs, .. } => {
            assert_eq!(url_name, "");
            assert!(kwargs.is_empty());
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_next_directive_values_are_escaped_in_path() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let query = QueryParams::parse(
        "next=dashboard_url,subject_identifier&subject_identifier=101%3Fadmin%3D1%23x%20y",
    );
    let outcome = resolver
        .resolve(RequestFlags::default(), &query, None)
        .unwrap()
        .unwrap();
    assert_eq!(outcome.url(), "/dashboard/101%3Fadmin=1%23x%20y/");
}

#[test]
fn test_no_directive_defers_to_default() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let outcome = resolver
        .resolve(RequestFlags::default(), &QueryParams::parse("arg1=value1"), None)
        .unwrap();
    assert!(outcome.is_none());
}

#[test]
fn test_custom_next_attr() {
    let (routes, schedule, records) = (routes(), schedule(), RecordStore::new());
    let settings = RedirectSettings {
        next_querystring_attr: "goto".to_string(),
        ..settings()
    };
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let query = QueryParams::parse("next=nowhere&goto=dashboard_url,subject_identifier&subject_identifier=101-001");
    let outcome = resolver.next_redirect(&query).unwrap().unwrap();
    assert_eq!(outcome.url(), "/dashboard/101-001/");
}

// ============================================================================
// Cancel
// ============================================================================

#[test]
fn test_cancel_uses_next_directive() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let flags = RequestFlags {
        is_cancel: true,
        is_save_next: false,
    };
    let query = QueryParams::parse("next=dashboard_url,subject_identifier&subject_identifier=101-001");
    let outcome = resolver.resolve(flags, &query, None).unwrap().unwrap();
    assert_eq!(outcome.url(), "/dashboard/101-001/");
}

#[test]
fn test_cancel_without_directive_uses_cancel_url() {
    let (routes, schedule, records) = (routes(), schedule(), RecordStore::new());
    let settings = RedirectSettings {
        cancel_url: Some("/subject/listboard/".to_string()),
        ..settings()
    };
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let flags = RequestFlags {
        is_cancel: true,
        is_save_next: false,
    };
    let outcome = resolver.resolve(flags, &QueryParams::new(), None).unwrap();
    assert_eq!(outcome.unwrap().url(), "/subject/listboard/");
}

#[test]
fn test_flags_require_button_to_be_shown() {
    let form = QueryParams::parse("_cancel=Cancel&_savenext=Save+next");
    let hidden = RedirectSettings::default();
    assert_eq!(RequestFlags::from_form(&form, &hidden), RequestFlags::default());
    let flags = RequestFlags::from_form(&form, &settings());
    assert!(flags.is_cancel);
    assert!(flags.is_save_next);
}

// ============================================================================
// Save next
// ============================================================================

#[test]
fn test_save_next_to_add_form() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let record = AdminRecord::new(label("crfone")).with_visit(visit());
    let query = QueryParams::parse("next=dashboard_url,subject_identifier&subject_identifier=101-001");
    let outcome = resolver
        .resolve(save_next(), &query, Some(&record))
        .unwrap()
        .unwrap();

    assert_eq!(outcome.path, "/edc_example_admin/edc_example/crftwo/add/");
    assert_eq!(
        outcome.query.as_deref(),
        Some(
            "next=dashboard_url,subject_identifier&subject_identifier=101-001\
             &subject_visit=6f1c2c52-8d4c-4c8e-9d2e-0a7c3c6f1e11"
        )
    );
}

#[test]
fn test_save_next_to_existing_record_change_form() {
    let (routes, schedule, settings) = (routes(), schedule(), settings());
    let existing = Uuid::new_v4();
    let records = RecordStore::from(vec![StoredRecord {
        id: existing,
        model: label("crftwo"),
        visit_model_attr: "subject_visit".to_string(),
        visit_id: visit().visit_id,
        panel_name: None,
    }]);
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let record = AdminRecord::new(label("crfone")).with_visit(visit());
    let outcome = resolver
        .savenext_redirect(&record, &QueryParams::new())
        .unwrap()
        .unwrap();
    assert_eq!(
        outcome.path,
        format!("/edc_example_admin/edc_example/crftwo/{}/change/", existing)
    );
    assert_eq!(
        outcome.query.as_deref(),
        Some("subject_visit=6f1c2c52-8d4c-4c8e-9d2e-0a7c3c6f1e11")
    );
}

#[test]
fn test_save_next_carries_panel_name() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let record = AdminRecord::new(label("crftwo")).with_visit(visit());
    let outcome = resolver
        .savenext_redirect(&record, &QueryParams::new())
        .unwrap()
        .unwrap();
    assert_eq!(outcome.path, "/edc_example_admin/edc_example/requisition/add/");
    assert_eq!(
        outcome.query.as_deref(),
        Some("panel_name=fbc&subject_visit=6f1c2c52-8d4c-4c8e-9d2e-0a7c3c6f1e11")
    );
}

#[test]
fn test_save_next_without_next_form_falls_through() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let record = AdminRecord::new(label("requisition"))
        .with_panel("fbc")
        .with_visit(visit());
    let query = QueryParams::parse("next=dashboard_url,subject_identifier&subject_identifier=101-001");
    let outcome = resolver
        .resolve(save_next(), &query, Some(&record))
        .unwrap()
        .unwrap();
    assert_eq!(outcome.url(), "/dashboard/101-001/");

    let none = resolver
        .resolve(save_next(), &QueryParams::new(), Some(&record))
        .unwrap();
    assert!(none.is_none());
}

#[test]
fn test_save_next_without_visit_tracking_fails() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let record = AdminRecord::new(label("crfone"));
    let err = resolver
        .resolve(save_next(), &QueryParams::new(), Some(&record))
        .unwrap_err();
    assert!(matches!(err, AdminError::NextUrl { .. }));
    assert!(err.to_string().contains("edc_example.crfone"));
}

#[test]
fn test_resolution_is_idempotent() {
    let (routes, schedule, records, settings) = (routes(), schedule(), RecordStore::new(), settings());
    let resolver = RedirectResolver::new(&settings, &routes, &schedule, &records);

    let record = AdminRecord::new(label("crfone")).with_visit(visit());
    let query = QueryParams::parse("next=dashboard_url,subject_identifier&subject_identifier=101-001");
    let first = resolver.resolve(save_next(), &query, Some(&record)).unwrap();
    let second = resolver.resolve(save_next(), &query, Some(&record)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_route_table_is_usable_as_trait_object() {
    let table = routes();
    let reverser: &dyn RouteReverser = &table;
    assert!(reverser.reverse("dashboard_url", &["x"], &RouteKwargs::new()).is_ok());
}
