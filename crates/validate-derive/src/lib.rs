//! Derive macro for `fieldcheck_domain::FieldRules`.
//!
//! Each annotated field becomes one `FieldDescriptor`, in declaration order:
//!
//! ```ignore
//! #[derive(FieldRules)]
//! struct SignupForm {
//!     #[field(text = "Name", min = 3, max = 10)]
//!     name: String,
//!     #[field(variable = "emailAddress", text = "Email", min = 5, max = 64)]
//!     email: Option<String>,
//!     internal_id: u64,
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitInt, LitStr, PathArguments,
    Type,
};

/// Derive `fieldcheck_domain::FieldRules` from `#[field(...)]` attributes.
#[proc_macro_derive(FieldRules, attributes(field))]
pub fn derive_field_rules(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_field_rules(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_field_rules(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "FieldRules can only be derived for structs",
        ));
    };

    let fields = match &struct_data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &struct_data.fields,
                "FieldRules requires named fields",
            ));
        },
    };

    let mut descriptors = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let Some(rule) = parse_field_rule(&field.attrs, ident)? else {
            continue;
        };
        if !is_measurable(&field.ty) {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "#[field] can only be used on string-like or Vec fields",
            ));
        }
        descriptors.push(rule.to_tokens());
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::fieldcheck_domain::FieldRules for #name #ty_generics #where_clause {
            fn field_descriptors() -> ::core::result::Result<
                ::std::vec::Vec<::fieldcheck_domain::FieldDescriptor>,
                ::fieldcheck_domain::DescriptorError,
            > {
                ::core::result::Result::Ok(::std::vec![
                    #(#descriptors),*
                ])
            }
        }
    })
}

struct FieldRule {
    variable: String,
    text: String,
    min: usize,
    max: usize,
}

impl FieldRule {
    fn to_tokens(&self) -> proc_macro2::TokenStream {
        let variable = LitStr::new(&self.variable, proc_macro2::Span::call_site());
        let text = LitStr::new(&self.text, proc_macro2::Span::call_site());
        let min = self.min;
        let max = self.max;
        quote! {
            ::fieldcheck_domain::FieldDescriptor::new(#variable, #text, #min, #max)?
        }
    }
}

fn parse_field_rule(attrs: &[Attribute], ident: &Ident) -> Result<Option<FieldRule>, syn::Error> {
    let mut seen = false;
    let mut variable: Option<String> = None;
    let mut text: Option<String> = None;
    let mut min: Option<usize> = None;
    let mut max: Option<usize> = None;
    let mut span = proc_macro2::Span::call_site();

    for attr in attrs {
        if !attr.path().is_ident("field") {
            continue;
        }
        if seen {
            return Err(syn::Error::new_spanned(attr, "duplicate #[field] attribute"));
        }
        seen = true;
        span = ident.span();
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("variable") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().trim().is_empty() {
                    return Err(meta.error("variable must be non-empty"));
                }
                variable = Some(value.value());
                return Ok(());
            }
            if meta.path.is_ident("text") {
                let value: LitStr = meta.value()?.parse()?;
                text = Some(value.value());
                return Ok(());
            }
            if meta.path.is_ident("min") {
                let value: LitInt = meta.value()?.parse()?;
                min = Some(value.base10_parse()?);
                return Ok(());
            }
            if meta.path.is_ident("max") {
                let value: LitInt = meta.value()?.parse()?;
                max = Some(value.base10_parse()?);
                return Ok(());
            }
            Err(meta.error("unsupported field attribute; expected variable, text, min or max"))
        })?;
    }

    if !seen {
        return Ok(None);
    }

    let Some(text) = text else {
        return Err(syn::Error::new(span, "#[field] requires text = \"...\""));
    };
    let Some(min) = min else {
        return Err(syn::Error::new(span, "#[field] requires min"));
    };
    let Some(max) = max else {
        return Err(syn::Error::new(span, "#[field] requires max"));
    };
    if min > max {
        return Err(syn::Error::new(
            span,
            format!("#[field] min ({min}) must not exceed max ({max})"),
        ));
    }

    Ok(Some(FieldRule {
        variable: variable.unwrap_or_else(|| ident.to_string()),
        text,
        min,
        max,
    }))
}

fn is_measurable(ty: &Type) -> bool {
    let ty = option_inner(ty).unwrap_or(ty);
    is_string_like(ty) || is_vec(ty)
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    first_type_argument(&segment.arguments)
}

fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

fn is_vec(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    type_path
        .path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "Vec")
}

fn is_string_like(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) => is_string_like(&reference.elem),
        Type::Path(type_path) => {
            let Some(segment) = type_path.path.segments.last() else {
                return false;
            };
            if segment.ident == "String" || segment.ident == "str" {
                return true;
            }
            if segment.ident == "Box" || segment.ident == "Cow" {
                return type_path
                    .path
                    .segments
                    .last()
                    .and_then(|segment| first_type_argument(&segment.arguments))
                    .is_some_and(is_string_like);
            }
            false
        },
        _ => false,
    }
}
