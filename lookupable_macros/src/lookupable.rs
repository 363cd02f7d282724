use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr};

use crate::serde_attrs;

pub fn derive_lookupable(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = named_fields(input)?;

    // Extract #[lookupable(collection = "...", column = "...")] from struct-level attributes
    let (collection, struct_column) = extract_struct_options(input)?;
    let collection = collection.unwrap_or_else(|| format!("{}s", to_snake_case(&name.to_string())));

    // A field marked #[lookupable(column)] names the identifying column
    let (column_field, trashed_field) = extract_field_markers(fields)?;
    let field_column = match column_field {
        Some(field) => Some(serialized_field_name(input, field)?),
        None => None,
    };
    if struct_column.is_some() && field_column.is_some() {
        return Err(syn::Error::new_spanned(
            name,
            "Lookupable derive: set the column either on the struct or on a field, not both",
        ));
    }

    let lookup_column = match struct_column.or(field_column) {
        Some(column) => quote! { ::core::option::Option::Some(#column) },
        None => quote! { ::core::option::Option::None },
    };

    let soft_deletes = match &trashed_field {
        Some(field) => quote! {
            const SOFT_DELETES: bool = true;

            fn trashed(&self) -> bool {
                lookupable::TrashedMarker::is_trashed(&self.#field)
            }
        },
        None => quote! {},
    };

    Ok(quote! {
        impl #impl_generics lookupable::Lookupable for #name #ty_generics #where_clause {
            const COLLECTION: &'static str = #collection;
            const LOOKUP_COLUMN: ::core::option::Option<&'static str> = #lookup_column;

            #soft_deletes
        }
    })
}

fn named_fields(input: &DeriveInput) -> syn::Result<&syn::FieldsNamed> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            return Ok(fields);
        }
    }

    Err(syn::Error::new_spanned(
        &input.ident,
        "Lookupable derive: only structs with named fields are supported",
    ))
}

fn extract_struct_options(input: &DeriveInput) -> syn::Result<(Option<String>, Option<String>)> {
    let mut collection = None;
    let mut column = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("lookupable") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("column") {
                let value: LitStr = meta.value()?.parse()?;
                column = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `collection` or `column`"))
            }
        })?;
    }

    Ok((collection, column))
}

/// The key serde writes for `field`: its own `rename`, else the container's
/// `rename_all` applied to the unraw field name.
fn serialized_field_name(input: &DeriveInput, field: &syn::Field) -> syn::Result<String> {
    if let Some(rename) = serde_attrs::rename(&field.attrs)? {
        return Ok(rename.value());
    }

    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "Lookupable derive: unnamed field"))?;
    let name = ident.unraw().to_string();

    match serde_attrs::rename_all(&input.attrs)? {
        Some(rule) => serde_attrs::apply_rename_all(&rule, &name),
        None => Ok(name),
    }
}

fn extract_field_markers(
    fields: &syn::FieldsNamed,
) -> syn::Result<(Option<&syn::Field>, Option<syn::Ident>)> {
    let mut column: Option<&syn::Field> = None;
    let mut trashed: Option<syn::Ident> = None;

    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };

        for attr in &field.attrs {
            if !attr.path().is_ident("lookupable") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("column") {
                    if column.is_some() {
                        return Err(meta.error("only one field can be the lookup column"));
                    }
                    column = Some(field);
                    Ok(())
                } else if meta.path.is_ident("trashed") {
                    if trashed.is_some() {
                        return Err(meta.error("only one field can carry the trashed state"));
                    }
                    trashed = Some(ident.clone());
                    Ok(())
                } else {
                    Err(meta.error("expected `column` or `trashed`"))
                }
            })?;
        }
    }

    Ok((column, trashed))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
