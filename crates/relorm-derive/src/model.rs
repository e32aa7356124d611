//! Model derive macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

struct ColumnField<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    column: String,
    is_id: bool,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Model cannot be derived for generic structs",
        ));
    }

    let table_name = get_table_name(&input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let (column, is_id) = get_field_attrs(field)?;
        columns.push(ColumnField {
            ident,
            ty: &field.ty,
            column: column.unwrap_or_else(|| ident.unraw().to_string()),
            is_id,
        });
    }

    let mut ids = columns.iter().filter(|c| c.is_id);
    let id_column = match (ids.next(), ids.next()) {
        (Some(id), None) => id.column.clone(),
        (None, _) => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model requires exactly one #[orm(id)] field",
            ));
        }
        (Some(_), Some(second)) => {
            return Err(syn::Error::new_spanned(
                second.ident,
                "Model allows only one #[orm(id)] field",
            ));
        }
    };

    let mut accessors = Vec::with_capacity(columns.len());
    let mut entries = Vec::with_capacity(columns.len());
    for c in &columns {
        let ident = c.ident;
        let ty = c.ty;
        let column = &c.column;
        let getter = format_ident!("__relorm_get_{}", ident);
        let setter = format_ident!("__relorm_set_{}", ident);

        accessors.push(quote! {
            fn #getter(model: &#name) -> ::relorm::Value {
                ::relorm::Value::from(::core::clone::Clone::clone(&model.#ident))
            }

            fn #setter(model: &mut #name, value: ::relorm::Value) -> ::relorm::OrmResult<()> {
                model.#ident = <#ty as ::relorm::FromValue>::from_value(value)
                    .map_err(|e| ::relorm::OrmError::decode(#column, e))?;
                ::core::result::Result::Ok(())
            }
        });
        entries.push(quote! {
            ::relorm::Field { column: #column, get: #getter, set: #setter }
        });
    }

    Ok(quote! {
        const _: () = {
            #(#accessors)*

            impl ::relorm::Model for #name {
                const TABLE: &'static str = #table_name;
                const PRIMARY_KEY: &'static str = #id_column;
                const FIELDS: &'static [::relorm::Field<Self>] = &[#(#entries),*];
            }
        };
    })
}

fn get_table_name(input: &DeriveInput) -> Result<String> {
    let mut table = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                table = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported orm attribute, expected `table = \"...\"`"))
            }
        })?;
    }
    table.ok_or_else(|| {
        syn::Error::new_spanned(
            input,
            "Model requires #[orm(table = \"table_name\")] attribute",
        )
    })
}

/// Parse `#[orm(id)]` and `#[orm(column = "...")]` on a field.
fn get_field_attrs(field: &syn::Field) -> Result<(Option<String>, bool)> {
    let mut column = None;
    let mut is_id = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                is_id = true;
                Ok(())
            } else if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                column = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error(
                    "unsupported orm field attribute, expected `id` or `column = \"...\"`",
                ))
            }
        })?;
    }
    Ok((column, is_id))
}
