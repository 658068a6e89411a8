//! `#[derive(Bindable)]` implementation.
//!
//! # Container attributes `#[bindable(...)]`
//!
//! | Key | Example | Description |
//! |-----|---------|-------------|
//! | `name` | `"SampleInput"` | Object name used in field errors (default: struct name) |
//! | `crate` | `"gatebind::core"` | Path to the core crate (default: `::gatebind_core`) |
//!
//! # Field attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `#[bind(rename = "...")]` | Bound key differs from the field name |
//! | `#[bind(skip)]` | Field never receives input and has no constraints |
//! | `#[validate(...)]` | One constraint; repeatable |
//!
//! A `#[validate(...)]` list starts with the constraint kind, followed by
//! optional `message = "..."` and `groups("A", "B")`:
//!
//! ```rust,ignore
//! #[validate(not_blank)]
//! #[validate(length(max = 32), message = "at most {max} chars", groups("Strict"))]
//! name: String,
//! ```

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Fields, Ident, LitInt, LitStr, Path, meta::ParseNestedMeta,
    parenthesized, parse::Parse, spanned::Spanned,
};

// ============================================================================
// Attribute structures
// ============================================================================

struct ContainerAttrs {
    name: Option<String>,
    krate: Path,
}

enum Kind {
    NotBlank,
    NotEmpty,
    NotNull,
    Length { min: Option<u64>, max: Option<u64> },
    Range { min: Option<i64>, max: Option<i64> },
}

struct ConstraintAttr {
    kind: Kind,
    message: Option<String>,
    groups: Vec<String>,
}

struct BoundField {
    ident: Ident,
    key: String,
    constraints: Vec<ConstraintAttr>,
}

// ============================================================================
// Entry point
// ============================================================================

pub fn derive_bindable(input: &DeriveInput) -> syn::Result<TokenStream> {
    let container = parse_container_attrs(&input.attrs, &input.ident)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new(
                    input.span(),
                    "Bindable requires a struct with named fields",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new(
                input.span(),
                "Bindable can only be derived for structs",
            ));
        }
    };

    let mut bound = Vec::new();
    for field in fields {
        if let Some(field) = parse_field(field)? {
            bound.push(field);
        }
    }

    Ok(generate(input, &container, &bound))
}

// ============================================================================
// Attribute parsing
// ============================================================================

fn parse_container_attrs(attrs: &[Attribute], ident: &Ident) -> syn::Result<ContainerAttrs> {
    let mut name = None;
    let mut krate: Path = syn::parse_quote!(::gatebind_core);

    for attr in attrs.iter().filter(|a| a.path().is_ident("bindable")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("crate") {
                krate = meta.value()?.parse::<LitStr>()?.parse()?;
            } else {
                return Err(meta.error("unknown bindable attribute"));
            }
            Ok(())
        })?;
    }

    if name.as_deref() == Some("") {
        return Err(syn::Error::new(ident.span(), "object name must not be empty"));
    }

    Ok(ContainerAttrs { name, krate })
}

fn parse_field(field: &syn::Field) -> syn::Result<Option<BoundField>> {
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new(field.span(), "expected a named field"));
    };

    let mut key = None;
    let mut skip = false;
    let mut constraints = Vec::new();

    for attr in &field.attrs {
        if attr.path().is_ident("bind") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    key = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else {
                    return Err(meta.error("unknown bind attribute"));
                }
                Ok(())
            })?;
        } else if attr.path().is_ident("validate") {
            constraints.push(parse_constraint(attr)?);
        }
    }

    if skip {
        if !constraints.is_empty() {
            return Err(syn::Error::new(
                field.span(),
                "a skipped field cannot carry constraints",
            ));
        }
        return Ok(None);
    }

    let key = key.unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());
    Ok(Some(BoundField {
        ident,
        key,
        constraints,
    }))
}

fn parse_constraint(attr: &Attribute) -> syn::Result<ConstraintAttr> {
    let mut kind = None;
    let mut message = None;
    let mut groups = Vec::new();

    attr.parse_nested_meta(|meta| {
        let set_kind = |kind_slot: &mut Option<Kind>, value: Kind| {
            if kind_slot.is_some() {
                return Err(meta.error("only one constraint per #[validate(...)]"));
            }
            *kind_slot = Some(value);
            Ok(())
        };

        if meta.path.is_ident("not_blank") {
            set_kind(&mut kind, Kind::NotBlank)
        } else if meta.path.is_ident("not_empty") {
            set_kind(&mut kind, Kind::NotEmpty)
        } else if meta.path.is_ident("not_null") {
            set_kind(&mut kind, Kind::NotNull)
        } else if meta.path.is_ident("length") {
            let (min, max) = parse_bounds::<u64>(&meta)?;
            set_kind(&mut kind, Kind::Length { min, max })
        } else if meta.path.is_ident("range") {
            let (min, max) = parse_bounds::<i64>(&meta)?;
            set_kind(&mut kind, Kind::Range { min, max })
        } else if meta.path.is_ident("message") {
            message = Some(meta.value()?.parse::<LitStr>()?.value());
            Ok(())
        } else if meta.path.is_ident("groups") {
            let content;
            parenthesized!(content in meta.input);
            let names = content.parse_terminated(<LitStr as Parse>::parse, syn::Token![,])?;
            groups.extend(names.iter().map(LitStr::value));
            Ok(())
        } else {
            Err(meta.error("unknown constraint"))
        }
    })?;

    let kind = kind.ok_or_else(|| {
        syn::Error::new(attr.span(), "#[validate(...)] requires a constraint kind")
    })?;

    Ok(ConstraintAttr {
        kind,
        message,
        groups,
    })
}

/// Parses `(min = N, max = M)`; both bounds optional.
fn parse_bounds<N>(meta: &ParseNestedMeta) -> syn::Result<(Option<N>, Option<N>)>
where
    N: std::str::FromStr,
    N::Err: std::fmt::Display,
{
    let mut min = None;
    let mut max = None;
    meta.parse_nested_meta(|bound| {
        if bound.path.is_ident("min") {
            min = Some(bound.value()?.parse::<LitInt>()?.base10_parse::<N>()?);
        } else if bound.path.is_ident("max") {
            max = Some(bound.value()?.parse::<LitInt>()?.base10_parse::<N>()?);
        } else {
            return Err(bound.error("expected `min` or `max`"));
        }
        Ok(())
    })?;
    if min.is_none() && max.is_none() {
        return Err(meta.error("at least one of `min` or `max` is required"));
    }
    Ok((min, max))
}

// ============================================================================
// Code generation
// ============================================================================

fn generate(input: &DeriveInput, container: &ContainerAttrs, fields: &[BoundField]) -> TokenStream {
    let name = &input.ident;
    let krate = &container.krate;
    let object_name = container.name.clone().unwrap_or_else(|| name.to_string());
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let descriptors = fields.iter().map(|field| {
        let key = &field.key;
        let constraints = field.constraints.iter().map(|c| constraint_tokens(krate, c));
        quote! {
            #krate::FieldDescriptor::new(#key) #( .constraint(#constraints) )*
        }
    });

    let keys: Vec<_> = fields.iter().map(|f| &f.key).collect();
    let idents: Vec<_> = fields.iter().map(|f| &f.ident).collect();

    quote! {
        impl #impl_generics #krate::Bindable for #name #ty_generics #where_clause {
            fn object_name() -> &'static str {
                #object_name
            }

            fn descriptor() -> &'static #krate::TargetDescriptor {
                static DESCRIPTOR: ::std::sync::OnceLock<#krate::TargetDescriptor> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    #krate::TargetDescriptor::new(#object_name, ::std::vec![ #(#descriptors),* ])
                })
            }

            fn bind_field(
                &mut self,
                key: &str,
                value: &#krate::FieldValue,
            ) -> #krate::FieldBinding {
                match key {
                    #(
                        #keys => #krate::FieldBinding::from_result(
                            #krate::bind_value(&mut self.#idents, value),
                        ),
                    )*
                    _ => #krate::FieldBinding::Unknown,
                }
            }

            fn field_value(&self, key: &str) -> ::std::option::Option<#krate::ConstraintValue<'_>> {
                match key {
                    #(
                        #keys => ::std::option::Option::Some(
                            #krate::AsConstraintValue::as_constraint_value(&self.#idents),
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }
        }
    }
}

fn constraint_tokens(krate: &Path, constraint: &ConstraintAttr) -> TokenStream {
    let kind = match &constraint.kind {
        Kind::NotBlank => quote!(#krate::ConstraintKind::NotBlank),
        Kind::NotEmpty => quote!(#krate::ConstraintKind::NotEmpty),
        Kind::NotNull => quote!(#krate::ConstraintKind::NotNull),
        Kind::Length { min, max } => {
            let min = option_tokens(min.map(|n| quote!(#n as usize)));
            let max = option_tokens(max.map(|n| quote!(#n as usize)));
            quote!(#krate::ConstraintKind::Length { min: #min, max: #max })
        }
        Kind::Range { min, max } => {
            let min = option_tokens(min.map(|n| quote!(#n)));
            let max = option_tokens(max.map(|n| quote!(#n)));
            quote!(#krate::ConstraintKind::Range { min: #min, max: #max })
        }
    };

    let message = constraint
        .message
        .as_ref()
        .map(|m| quote!(.message(#m)));
    let groups = &constraint.groups;
    let groups = (!groups.is_empty()).then(|| quote!(.groups(&[ #(#groups),* ])));

    quote!(#krate::Constraint::new(#kind) #message #groups)
}

fn option_tokens(value: Option<TokenStream>) -> TokenStream {
    match value {
        Some(v) => quote!(::std::option::Option::Some(#v)),
        None => quote!(::std::option::Option::None),
    }
}
