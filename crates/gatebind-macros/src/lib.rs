//! Procedural macros for gatebind.
//!
//! This crate provides:
//!
//! - `#[derive(Bindable)]` - Generates field binding and constraint metadata
//!   for a request target
//!
//! ```rust,ignore
//! use gatebind::prelude::*;
//!
//! #[derive(Default, Bindable)]
//! pub struct SampleInput {
//!     #[validate(not_blank)]
//!     pub test: String,
//!     #[validate(not_blank)]
//!     pub date: String,
//! }
//! ```

mod bindable;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `gatebind_core::Bindable` for a struct with named fields.
///
/// Generates:
/// - `object_name()` - the struct name, or `#[bindable(name = "...")]`
/// - `descriptor()` - constraint metadata, compiled once in a `static OnceLock`
/// - `bind_field()` - coercion of raw values through `FromFieldValue`
/// - `field_value()` - read-only views through `AsConstraintValue`
///
/// # Attributes
///
/// - `#[bindable(name = "...", crate = "...")]` on the struct
/// - `#[bind(rename = "...")]` / `#[bind(skip)]` on fields
/// - `#[validate(kind, message = "...", groups("A", ...))]` on fields, where
///   `kind` is one of `not_blank`, `not_empty`, `not_null`,
///   `length(min = N, max = M)` or `range(min = N, max = M)`
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Default, Bindable)]
/// #[bindable(name = "user")]
/// pub struct CreateUser {
///     #[bind(rename = "userName")]
///     #[validate(not_blank)]
///     #[validate(length(max = 32), groups("Strict"))]
///     pub user_name: String,
///
///     #[validate(range(min = 0, max = 150), message = "age must be {min}..{max}")]
///     pub age: Option<u32>,
///
///     #[bind(skip)]
///     pub audit: Vec<String>,
/// }
/// ```
#[proc_macro_derive(Bindable, attributes(bindable, bind, validate))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match bindable::derive_bindable(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
