//! Reading the serde attributes that change a field's serialized name.
//!
//! Lookups read the identifying column from the record's serde form, so a
//! field-level column must be named the way serde writes it.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Token};

/// `#[serde(rename_all = "...")]` on the container, serialize side.
pub fn rename_all(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    serialize_name(attrs, "rename_all")
}

/// `#[serde(rename = "...")]` on a field, serialize side.
pub fn rename(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    serialize_name(attrs, "rename")
}

/// Apply a serde `rename_all` rule to a snake_case field name.
pub fn apply_rename_all(rule: &LitStr, field: &str) -> syn::Result<String> {
    let renamed = match rule.value().as_str() {
        "lowercase" | "snake_case" => field.to_string(),
        "UPPERCASE" | "SCREAMING_SNAKE_CASE" => field.to_ascii_uppercase(),
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.to_ascii_uppercase().replace('_', "-"),
        "PascalCase" => to_pascal_case(field),
        "camelCase" => {
            let pascal = to_pascal_case(field);
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => pascal,
            }
        }
        other => {
            return Err(syn::Error::new(
                rule.span(),
                format!("Lookupable derive: unsupported serde rename_all rule `{other}`"),
            ))
        }
    };
    Ok(renamed)
}

fn to_pascal_case(field: &str) -> String {
    let mut result = String::new();
    let mut capitalize = true;
    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            result.extend(ch.to_uppercase());
            capitalize = false;
        } else {
            result.push(ch);
        }
    }
    result
}

fn serialize_name(attrs: &[Attribute], key: &str) -> syn::Result<Option<LitStr>> {
    let mut found = None;

    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident(key) {
                return skip(meta);
            }

            if meta.input.peek(Token![=]) {
                found = Some(meta.value()?.parse()?);
                return Ok(());
            }

            // rename(serialize = "...", deserialize = "...")
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("serialize") {
                    found = Some(inner.value()?.parse()?);
                    Ok(())
                } else {
                    skip(inner)
                }
            })
        })?;
    }

    Ok(found)
}

// Consume any other serde option (`default`, `with = "..."`, `bound(...)`).
fn skip(meta: ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(skip)?;
    }
    Ok(())
}
