use anyhow::{Context, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use edc_admin_core::handler::{AdminRequest, ChangelistDefaults, FrameworkDefaults};
use edc_admin_core::redirect::{CANCEL_BUTTON, SAVE_NEXT_BUTTON};
use edc_admin_core::{
    AdminConfig, AdminRecord, ModelLabel, QueryParams, RedirectDirective, RedirectResolver,
    RequestFlags, RouteTable, VisitTracking,
};
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Load an admin site configuration, expanding `~` in the path.
pub fn load_config(path: &str) -> anyhow::Result<AdminConfig> {
    let expanded = shellexpand::tilde(path);
    let path = PathBuf::from(expanded.as_ref());
    AdminConfig::load(&path).with_context(|| format!("Failed to load {}", path.display()))
}

/// The record a dry run pretends was just saved.
pub fn build_record(
    model: &str,
    visit_id: Option<Uuid>,
    visit_attr: &str,
    visit_code: Option<&str>,
    panel: Option<&str>,
) -> anyhow::Result<AdminRecord> {
    let label = ModelLabel::parse(model)?;
    let mut record = AdminRecord::new(label);
    if let Some(visit_id) = visit_id {
        let mut visit = VisitTracking::new(visit_attr, visit_id);
        if let Some(code) = visit_code {
            visit = visit.with_visit_code(code);
        }
        record = record.with_visit(visit);
    }
    if let Some(panel) = panel {
        record = record.with_panel(panel);
    }
    Ok(record)
}

/// The submit buttons of a dry run as a posted form.
pub fn submitted_form(cancel: bool, save_next: bool) -> QueryParams {
    let mut form = QueryParams::new();
    if cancel {
        form.append(CANCEL_BUTTON, "1");
    }
    if save_next {
        form.append(SAVE_NEXT_BUTTON, "1");
    }
    form
}

/// Where a submit of `form` with this querystring would redirect to. Buttons
/// the admin does not show are ignored.
pub fn resolve_redirect(
    config: &AdminConfig,
    query: &str,
    record: Option<&AdminRecord>,
    form: &QueryParams,
) -> anyhow::Result<String> {
    let routes = config.route_table()?;
    let query = QueryParams::parse(query);
    let flags = RequestFlags::from_form(form, &config.redirect);
    let resolver = RedirectResolver::new(
        &config.redirect,
        &routes,
        &config.visit_schedule,
        &config.records,
    );

    if let Some(outcome) = resolver.resolve(flags, &query, record)? {
        return Ok(outcome.url());
    }

    debug!("No redirect applies, using the admin default");
    let defaults = ChangelistDefaults::new(config.redirect.site_name.clone(), &routes);
    let request = AdminRequest::default()
        .with_query(query)
        .with_form(form.clone());
    let url = match record {
        Some(record) if flags.is_cancel => defaults.post_cancel_url(&request, &record.model)?,
        Some(record) => defaults.post_save_url(&request, record, false)?,
        None => "/".to_string(),
    };
    Ok(url)
}

pub fn format_routes(table: &RouteTable) -> String {
    let width = table.entries().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, pattern) in table.entries() {
        out.push_str(&format!("{:<width$}  /{}\n", name, pattern.trim_start_matches('/')));
    }
    out
}

/// Human-readable summary of the directive under `attr` in `query`.
pub fn describe_directive(query: &str, attr: &str) -> anyhow::Result<String> {
    let query = QueryParams::parse(query);
    let directive = RedirectDirective::from_query(&query, attr)?
        .ok_or_else(|| anyhow!("No '{}' directive in querystring", attr))?;
    let kwargs = directive.kwargs(&query);
    Ok(format!(
        "route: {}\nargs: {}\nkwargs: {}",
        directive.route_name,
        directive.arg_names.join(", "),
        kwargs
    ))
}

pub fn handle_resolve(args: &ArgMatches) {
    let config_path = args.get_one::<String>("config").unwrap();
    let query = args.get_one::<String>("query").map(String::as_str).unwrap_or("");
    let model = args.get_one::<String>("model");
    let visit_id = args.get_one::<Uuid>("visit-id").copied();
    let visit_attr = args
        .get_one::<String>("visit-attr")
        .map(String::as_str)
        .unwrap_or("subject_visit");
    let visit_code = args.get_one::<String>("visit-code").map(String::as_str);
    let panel = args.get_one::<String>("panel").map(String::as_str);
    let form = submitted_form(args.get_flag("cancel"), args.get_flag("save-next"));

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let record = match model {
        Some(model) => match build_record(model, visit_id, visit_attr, visit_code, panel) {
            Ok(record) => Some(record),
            Err(e) => {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    match resolve_redirect(&config, query, record.as_ref(), &form) {
        Ok(url) => println!("{} {}", "→".blue(), url.bright_white()),
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

pub fn handle_routes(args: &ArgMatches) {
    let config_path = args.get_one::<String>("config").unwrap();
    let table = match load_config(config_path).and_then(|c| c.route_table().map_err(anyhow::Error::from)) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };
    println!("{} {} route(s)", "✓".green().bold(), table.len());
    print!("{}", format_routes(&table));
}

pub fn handle_directive(args: &ArgMatches) {
    let query = args.get_one::<String>("QUERYSTRING").unwrap();
    let attr = args.get_one::<String>("attr").map(String::as_str).unwrap_or("next");
    match describe_directive(query, attr) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
