//! Procedural macro for record table metadata
//!
//! `#[derive(Record)]` implements `resource_store::Record` for a struct with
//! named fields, validating the table and column names at compile time with
//! the same rules the runtime whitelists use.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod parsing;

use parsing::parse_record;

/// Derive `resource_store::Record`.
///
/// ```ignore
/// #[derive(Debug, Clone, sqlx::FromRow, Record)]
/// #[record(table = "users")]
/// pub struct User {
///     pub id: i64,
///     pub name: String,
///     pub email: String,
/// }
/// ```
///
/// The primary key is the field named `id` unless another field carries
/// `#[record(primary_key)]`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let record = match parse_record(&input) {
        Ok(record) => record,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let table = &record.table;
    let primary_key = &record.primary_key;
    let columns = &record.columns;

    let expanded = quote! {
        impl #impl_generics ::resource_store::Record for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;
            const PRIMARY_KEY: &'static str = #primary_key;
            const COLUMNS: &'static [&'static str] = &[#(#columns),*];
        }
    };

    TokenStream::from(expanded)
}
