// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_record, describe_directive, format_routes, load_config, resolve_redirect, submitted_form,
};
