//! Derive macros for relorm
//!
//! Provides `#[derive(Model)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod model;

/// Derive `Model` metadata for a struct.
///
/// # Example
///
/// ```ignore
/// use relorm::Model;
///
/// #[derive(Debug, Clone, Default, Model)]
/// #[orm(table = "posts")]
/// struct Post {
///     #[orm(id)]
///     id: i64,
///     user_id: i64,
///     #[orm(column = "content")]
///     body: String,
/// }
/// ```
///
/// # Generated
///
/// - `TABLE: &'static str` - Table name
/// - `PRIMARY_KEY: &'static str` - Column of the `#[orm(id)]` field
/// - `FIELDS` - one getter/setter pair per field, in declaration order
///
/// # Attributes
///
/// - `#[orm(table = "name")]` on the struct (required)
/// - `#[orm(id)]` on exactly one field
/// - `#[orm(column = "name")]` - Map field to a different column name
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
