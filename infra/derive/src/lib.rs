#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Wayfinder workspace.
//!
//! * [`macro@wf_error`] turns an enum into a context-aware error type.
//! * [`macro@main`] bootstraps an `async fn main` on a `wf-runtime` profile.
//! * [`macro@view_model`] turns a struct into a cheaply clonable view-model handle.
//!
//! The examples below are `ignore`d because they reference crates that depend on this one.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to run an `async fn main` on a `wf-runtime` profile.
///
/// # Arguments
///
/// * `interactive` - Single-threaded scheduler. The whole coordinator tree shares one
///   execution context, so navigation reactions never race each other.
/// * `background` - Multi-threaded scheduler for hosts that do heavy work off the UI context.
/// * `default` - Multi-threaded scheduler with auto-detected worker count.
///
/// # Examples
///
/// ```rust,ignore
/// #[wf_runtime::main(interactive)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to `Result<T, Source>` for every wrapped source error.
/// * **Standard Conversions**: Implements `From<Source>` for variants carrying a `source`
///   field (or a field marked `#[source]`/`#[from]`), so `?` works on upstream errors.
/// * **Internal Fallback**: Implements `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants with a source must also carry a `context` field.
/// 4. One error enum per module: a private `format_context` helper is emitted next to it.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[wf_derive::wf_error]
/// pub enum RegistryError {
///     #[error("Unresolved capability{}: {message}", format_context(.context))]
///     Unresolved { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Internal registry fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn wf_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_error(input).into()
}

/// Attribute macro to define a view-model handle.
///
/// The annotated struct becomes `<Name>State`; `<Name>` is generated as an
/// `Arc` wrapper that is `Clone`, derefs to the state and implements
/// `wf_navigation::ViewModel` using the mandatory `inputs` and `outputs` fields.
///
/// # Arguments
///
/// * `inputs = Type` - the intent sinks the presentation surface feeds.
/// * `outputs = Type` - the event streams the coordinator observes.
///
/// # Example
///
/// ```rust,ignore
/// #[wf_derive::view_model(inputs = DetailInputs, outputs = DetailOutputs)]
/// pub struct DetailViewModel {
///     inputs: DetailInputs,
///     outputs: DetailOutputs,
///     item: Item,
/// }
/// ```
#[proc_macro_attribute]
pub fn view_model(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::view_model::expand_view_model(args.into(), input).into()
}
