//! Admin form lifecycle helpers for clinical data capture.
//!
//! The centerpiece is [`redirect::RedirectResolver`], which decides where to
//! send a user after saving a form: the next form in the visit schedule,
//! a route named in the `next` querystring directive, or the framework
//! default. [`handler::ModelAdmin`] wires it together with audit stamping,
//! field layout merging, read-only rendering and institution branding.

pub mod address;
pub mod audit;
pub mod config;
pub mod context;
pub mod delete;
pub mod directive;
pub mod error;
pub mod fields;
pub mod form;
pub mod handler;
pub mod labels;
pub mod model;
pub mod querystring;
pub mod readonly;
pub mod redirect;
pub mod routes;
pub mod schedule;

pub use config::AdminConfig;
pub use directive::{RedirectDirective, RouteKwargs};
pub use error::{AdminError, NoReverseMatch, Result};
pub use handler::{
    AdminRequest, AdminResponse, ChangelistDefaults, Collaborators, FormSubmissionHandler,
    FrameworkDefaults, ModelAdmin,
};
pub use model::{AdminRecord, ModelLabel, RecordId, VisitTracking};
pub use querystring::QueryParams;
pub use redirect::{RedirectOutcome, RedirectResolver, RedirectSettings, RequestFlags};
pub use routes::{RouteReverser, RouteTable};
pub use schedule::{
    FormReference, LookupCriteria, NextFormReference, RecordLookup, RecordStore, ScheduledForms,
    VisitSchedule,
};
