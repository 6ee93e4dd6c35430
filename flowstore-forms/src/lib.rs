//! Field validation pipeline and form store for flowstore
//!
//! Builds on `flowstore-core`: form state is an ordered map of fields
//! folded by a pure reducer; blur and submit are async actions that run
//! each field's validation rules and publish the results back through
//! the bus.
//!
//! # Example
//!
//! ```ignore
//! use flowstore_core::ActionBus;
//! use flowstore_forms::{Field, Form, Rule};
//! use serde_json::json;
//!
//! let bus = ActionBus::new();
//! let form = Form::new(
//!     &bus,
//!     vec![
//!         Field::new("username", json!("")).requires(Rule::new(
//!             "username is required",
//!             |v| v.as_str().is_some_and(|s| !s.is_empty()),
//!         )),
//!         Field::new("newsletter", json!(false)),
//!     ],
//!     |values| println!("submitted: {values}"),
//! );
//!
//! form.update("username", json!("ada"))?;
//! form.blur("username")?;
//! form.submit();
//! ```

pub mod actions;
pub mod error;
pub mod form;
pub mod helpers;
pub mod reducer;
pub mod types;
pub mod validator;

pub use actions::{
    field_blur, field_focus, field_update, FormAction, SubmitHandler, ERROR, ERRORS, FIELD_BLUR,
    FIELD_ERROR_UPDATE, FIELD_FOCUS, FORM_INITIALIZE, FORM_RESET, FORM_SUBMIT, UPDATE,
};
pub use error::FormError;
pub use form::{Form, SUBMIT_THROTTLE};
pub use helpers::{contains_no_errors, extract_final_values};
pub use reducer::form_reducer;
pub use types::{Field, FormState, Meta, Rule};
pub use validator::validate;
