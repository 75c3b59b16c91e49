//! Model admin form lifecycle.
//!
//! [`ModelAdmin`] bundles the redirect, audit, layout, read-only and branding
//! behaviors behind the [`FormSubmissionHandler`] hooks a host admin calls on
//! add, change and delete. What the host would do by default after a save or
//! delete is supplied through [`FrameworkDefaults`].

use crate::audit::{stamp_audit_fields, with_audit_list_filter, with_audit_readonly_fields};
use crate::context::{Institution, PageContext};
use crate::delete::{DeleteRedirect, deleted_message};
use crate::directive::RouteKwargs;
use crate::error::Result;
use crate::fields::{FieldLayout, RadioLayout};
use crate::form::AdminForm;
use crate::labels::auto_number;
use crate::model::{AdminRecord, ModelLabel};
use crate::querystring::QueryParams;
use crate::readonly::{is_readonly, make_readonly, readonly_context};
use crate::redirect::{RedirectResolver, RedirectSettings, RequestFlags};
use crate::routes::RouteReverser;
use crate::schedule::{RecordLookup, VisitSchedule};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const CONTINUE_BUTTON: &str = "_continue";
pub const ADD_ANOTHER_BUTTON: &str = "_addanother";

/// The parts of an inbound admin request these hooks look at.
#[derive(Debug, Clone, Default)]
pub struct AdminRequest {
    /// GET querystring.
    pub query: QueryParams,
    /// Submitted POST values, including the submit button name.
    pub form: QueryParams,
    pub username: String,
    pub hostname: String,
    /// Route name substitutions provided by dashboard middleware.
    pub url_name_data: BTreeMap<String, String>,
}

impl AdminRequest {
    pub fn new(username: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_form(mut self, form: QueryParams) -> Self {
        self.form = form;
        self
    }

    pub fn with_url_name_data(mut self, url_name_data: BTreeMap<String, String>) -> Self {
        self.url_name_data = url_name_data;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminResponse {
    Redirect {
        location: String,
        messages: Vec<String>,
    },
    Render {
        form: AdminForm,
        context: PageContext,
    },
}

impl AdminResponse {
    pub fn redirect(location: impl Into<String>) -> Self {
        AdminResponse::Redirect {
            location: location.into(),
            messages: Vec::new(),
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            AdminResponse::Redirect { location, .. } => Some(location.as_str()),
            AdminResponse::Render { .. } => None,
        }
    }

    pub fn messages(&self) -> &[String] {
        match self {
            AdminResponse::Redirect { messages, .. } => messages.as_slice(),
            AdminResponse::Render { .. } => &[],
        }
    }

    pub fn context(&self) -> Option<&PageContext> {
        match self {
            AdminResponse::Render { context, .. } => Some(context),
            AdminResponse::Redirect { .. } => None,
        }
    }

    pub fn form(&self) -> Option<&AdminForm> {
        match self {
            AdminResponse::Render { form, .. } => Some(form),
            AdminResponse::Redirect { .. } => None,
        }
    }
}

/// Hooks run when a submitted admin form is saved or a record is deleted.
pub trait FormSubmissionHandler {
    fn on_add(
        &self,
        request: &AdminRequest,
        record: &mut AdminRecord,
        form: &AdminForm,
    ) -> Result<AdminResponse>;

    fn on_change(
        &self,
        request: &AdminRequest,
        record: &mut AdminRecord,
        form: &AdminForm,
    ) -> Result<AdminResponse>;

    fn on_delete(&self, request: &AdminRequest, record: &AdminRecord) -> Result<AdminResponse>;
}

/// Where the host admin sends users when nothing more specific applies.
pub trait FrameworkDefaults {
    fn post_save_url(
        &self,
        request: &AdminRequest,
        record: &AdminRecord,
        change: bool,
    ) -> Result<String>;

    fn post_delete_url(&self, request: &AdminRequest, model: &ModelLabel) -> Result<String>;

    fn post_cancel_url(&self, request: &AdminRequest, model: &ModelLabel) -> Result<String> {
        self.post_delete_url(request, model)
    }
}

/// Stock admin behavior: "Save and continue" returns to the change form,
/// "Save and add another" opens a blank add form, anything else lands on the
/// model's changelist, then the site index, then `/`.
pub struct ChangelistDefaults<'a> {
    site_name: String,
    routes: &'a dyn RouteReverser,
}

impl<'a> ChangelistDefaults<'a> {
    pub fn new(site_name: impl Into<String>, routes: &'a dyn RouteReverser) -> Self {
        Self {
            site_name: site_name.into(),
            routes,
        }
    }

    fn admin_url(&self, model: &ModelLabel, action: &str, args: &[&str]) -> Option<String> {
        let name = format!("{}:{}_{}", self.site_name, model.url_fragment(), action);
        self.routes.reverse(&name, args, &RouteKwargs::new()).ok()
    }

    fn changelist_or_index(&self, model: &ModelLabel) -> String {
        self.admin_url(model, "changelist", &[])
            .or_else(|| {
                self.routes
                    .reverse(&format!("{}:index", self.site_name), &[], &RouteKwargs::new())
                    .ok()
            })
            .unwrap_or_else(|| "/".to_string())
    }
}

impl FrameworkDefaults for ChangelistDefaults<'_> {
    fn post_save_url(
        &self,
        request: &AdminRequest,
        record: &AdminRecord,
        _change: bool,
    ) -> Result<String> {
        let id = record.id.to_string();
        let url = if request.form.flag(CONTINUE_BUTTON) {
            self.admin_url(&record.model, "change", &[id.as_str()])
        } else if request.form.flag(ADD_ANOTHER_BUTTON) {
            self.admin_url(&record.model, "add", &[])
        } else {
            None
        };
        Ok(url.unwrap_or_else(|| self.changelist_or_index(&record.model)))
    }

    fn post_delete_url(&self, _request: &AdminRequest, model: &ModelLabel) -> Result<String> {
        Ok(self.changelist_or_index(model))
    }
}

/// Everything the admin calls out to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub routes: &'a dyn RouteReverser,
    pub schedule: &'a dyn VisitSchedule,
    pub records: &'a dyn RecordLookup,
    pub defaults: &'a dyn FrameworkDefaults,
}

/// Static admin declarations. Per-request values are always derived from
/// these, never written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminOptions {
    pub redirect: RedirectSettings,
    pub institution: Option<Institution>,
    pub layout: FieldLayout,
    pub delete_redirect: DeleteRedirect,
    pub fields: Vec<String>,
    pub readonly_fields: Vec<String>,
    pub list_display: Vec<String>,
    pub list_filter: Vec<String>,
    pub search_fields: Vec<String>,
    pub radio_fields: BTreeMap<String, RadioLayout>,
}

pub type DeleteKwargsHook = Box<dyn Fn(&AdminRequest, &AdminRecord) -> RouteKwargs + Send + Sync>;

pub struct ModelAdmin<'a> {
    pub model: ModelLabel,
    pub verbose_name: String,
    pub options: AdminOptions,
    collaborators: Collaborators<'a>,
    delete_kwargs: Option<DeleteKwargsHook>,
}

impl<'a> ModelAdmin<'a> {
    pub fn new(model: ModelLabel, collaborators: Collaborators<'a>) -> Self {
        let verbose_name = model.model_name().to_string();
        Self {
            model,
            verbose_name,
            options: AdminOptions::default(),
            collaborators,
            delete_kwargs: None,
        }
    }

    pub fn with_options(mut self, options: AdminOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
        self.verbose_name = verbose_name.into();
        self
    }

    /// Kwargs used to reverse the post-delete route.
    pub fn with_delete_kwargs(mut self, hook: DeleteKwargsHook) -> Self {
        self.delete_kwargs = Some(hook);
        self
    }

    pub fn resolver(&self) -> RedirectResolver<'_> {
        RedirectResolver::new(
            &self.options.redirect,
            self.collaborators.routes,
            self.collaborators.schedule,
            self.collaborators.records,
        )
    }

    pub fn flags(&self, request: &AdminRequest) -> RequestFlags {
        RequestFlags::from_form(&request.form, &self.options.redirect)
    }

    /// The form as displayed: numbered labels, and locked when read-only
    /// rendering was requested.
    pub fn get_form(&self, request: &AdminRequest, form: AdminForm) -> AdminForm {
        let form = auto_number(form);
        if is_readonly(&request.query) {
            make_readonly(form)
        } else {
            form
        }
    }

    /// Context shared by the add and change views.
    pub fn extra_context(&self) -> PageContext {
        let mut context = PageContext::new();
        if self.options.redirect.show_save_next {
            context.insert("show_save_next", true);
        }
        if self.options.redirect.show_cancel {
            context.insert("show_cancel", true);
        }
        if let Some(ref institution) = self.options.institution {
            institution.apply(&mut context);
        }
        context
    }

    fn cancel_response(&self, request: &AdminRequest) -> Result<Option<AdminResponse>> {
        if !self.flags(request).is_cancel {
            return Ok(None);
        }
        let location = match self.resolver().cancel_redirect(&request.query)? {
            Some(outcome) => outcome.url(),
            None => self
                .collaborators
                .defaults
                .post_cancel_url(request, &self.model)?,
        };
        info!("Cancelled {} form, redirecting to {}", self.model, location);
        Ok(Some(AdminResponse::redirect(location)))
    }

    pub fn add_view(&self, request: &AdminRequest, form: AdminForm) -> Result<AdminResponse> {
        if let Some(response) = self.cancel_response(request)? {
            return Ok(response);
        }
        Ok(AdminResponse::Render {
            form: self.get_form(request, form),
            context: self.extra_context(),
        })
    }

    pub fn change_view(&self, request: &AdminRequest, form: AdminForm) -> Result<AdminResponse> {
        if let Some(response) = self.cancel_response(request)? {
            return Ok(response);
        }
        let mut context = self.extra_context();
        readonly_context(
            &request.query,
            &self.options.redirect.next_querystring_attr,
            &mut context,
        );
        Ok(AdminResponse::Render {
            form: self.get_form(request, form),
            context,
        })
    }

    /// Stamp audit fields and keep a JSON copy of the form when it offers one.
    pub fn save_model(
        &self,
        request: &AdminRequest,
        record: &mut AdminRecord,
        form: &AdminForm,
        change: bool,
    ) {
        stamp_audit_fields(
            record,
            &request.username,
            &request.hostname,
            change,
            Utc::now(),
        );
        if let Some(json) = form.as_json() {
            record.form_as_json = Some(json);
        }
        debug!("Saved {} {} (change={})", self.model, record.id, change);
    }

    /// URL to go to after `record` was saved.
    pub fn redirect_url(
        &self,
        request: &AdminRequest,
        record: &AdminRecord,
        change: bool,
    ) -> Result<String> {
        let flags = self.flags(request);
        match self.resolver().resolve(flags, &request.query, Some(record))? {
            Some(outcome) => Ok(outcome.url()),
            None => self
                .collaborators
                .defaults
                .post_save_url(request, record, change),
        }
    }

    fn save_and_redirect(
        &self,
        request: &AdminRequest,
        record: &mut AdminRecord,
        form: &AdminForm,
        change: bool,
    ) -> Result<AdminResponse> {
        if let Some(response) = self.cancel_response(request)? {
            return Ok(response);
        }
        self.save_model(request, record, form, change);
        let location = self.redirect_url(request, record, change)?;
        Ok(AdminResponse::redirect(location))
    }

    pub fn list_display(&self) -> Vec<String> {
        self.options.layout.list_display(&self.options.list_display)
    }

    pub fn list_filter(&self) -> Vec<String> {
        with_audit_list_filter(&self.options.layout.list_filter(&self.options.list_filter))
    }

    pub fn search_fields(&self) -> Vec<String> {
        self.options.layout.search_fields(&self.options.search_fields)
    }

    pub fn readonly_fields(&self) -> Vec<String> {
        with_audit_readonly_fields(&self.options.readonly_fields)
    }

    pub fn fields(&self, form: &AdminForm) -> Vec<String> {
        self.options.layout.fields(
            &self.options.fields,
            &form.field_names(),
            &self.readonly_fields(),
        )
    }

    pub fn radio_fields(&self) -> BTreeMap<String, RadioLayout> {
        self.options.layout.radio_fields(&self.options.radio_fields)
    }
}

impl FormSubmissionHandler for ModelAdmin<'_> {
    fn on_add(
        &self,
        request: &AdminRequest,
        record: &mut AdminRecord,
        form: &AdminForm,
    ) -> Result<AdminResponse> {
        self.save_and_redirect(request, record, form, false)
    }

    fn on_change(
        &self,
        request: &AdminRequest,
        record: &mut AdminRecord,
        form: &AdminForm,
    ) -> Result<AdminResponse> {
        self.save_and_redirect(request, record, form, true)
    }

    fn on_delete(&self, request: &AdminRequest, record: &AdminRecord) -> Result<AdminResponse> {
        let kwargs = self
            .delete_kwargs
            .as_ref()
            .map(|hook| hook(request, record))
            .unwrap_or_default();
        let response = match self.options.delete_redirect.resolve(
            self.collaborators.routes,
            &request.url_name_data,
            &kwargs,
        ) {
            Some(location) => AdminResponse::Redirect {
                location,
                messages: vec![deleted_message(&self.verbose_name, &record.to_string())],
            },
            None => AdminResponse::redirect(
                self.collaborators
                    .defaults
                    .post_delete_url(request, &self.model)?,
            ),
        };
        info!(
            "Deleted {} {}, redirecting to {}",
            self.model,
            record.id,
            response.location().unwrap_or_default()
        );
        Ok(response)
    }
}
