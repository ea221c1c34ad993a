use crate::{ValueType, matches_path};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{GenericArgument, PathArguments, Type, TypePath};

/// Outcome of inspecting the type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecoded {
    pub value_type: ValueType,
    pub nullable: bool,
}

/// First generic argument of `Option<T>`, `None` for any other type.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { path, .. }) = ty else {
        return None;
    };
    if !matches_path(path, &["std", "option", "Option"]) {
        return None;
    }
    let PathArguments::AngleBracketed(bracketed) = &path.segments.last()?.arguments else {
        return None;
    };
    match bracketed.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// Decodes the type of a value field.
///
/// `Option` makes the field nullable, `Box` is transparent. Types a row cannot be assigned to
/// (for example `bool`) decode to `ValueType::Unsupported`.
pub fn decode_type(ty: &Type) -> TypeDecoded {
    let mut nullable = false;
    let value_type = 'value_type: {
        let Type::Path(TypePath { path, .. }) = ty else {
            break 'value_type ValueType::Unsupported("");
        };
        if let Some(ident) = path.get_ident() {
            if ident == "i32" {
                break 'value_type ValueType::Int32;
            } else if ident == "i64" {
                break 'value_type ValueType::Int64;
            } else if ident == "f32" {
                break 'value_type ValueType::Float32;
            } else if ident == "f64" {
                break 'value_type ValueType::Float64;
            }
        }
        if matches_path(path, &["std", "string", "String"]) {
            break 'value_type ValueType::Text;
        } else if matches_path(path, &["time", "Date"]) {
            break 'value_type ValueType::Date;
        } else if matches_path(path, &["time", "PrimitiveDateTime"]) {
            break 'value_type ValueType::Timestamp;
        }
        let is_option = matches_path(path, &["std", "option", "Option"]);
        if is_option || matches_path(path, &["std", "boxed", "Box"]) {
            if let Some(PathArguments::AngleBracketed(bracketed)) =
                path.segments.last().map(|v| &v.arguments)
                && let Some(GenericArgument::Type(inner)) = bracketed.args.first()
            {
                let inner = decode_type(inner);
                nullable = is_option || inner.nullable;
                break 'value_type inner.value_type;
            }
        }
        ValueType::Unsupported("")
    };
    let value_type = match value_type {
        ValueType::Unsupported(..) => ValueType::Unsupported(type_name(ty)),
        v => v,
    };
    TypeDecoded {
        value_type,
        nullable,
    }
}

fn type_name(ty: &Type) -> &'static str {
    let name = ty.to_token_stream().to_string().replace(' ', "");
    Box::leak(name.into_boxed_str())
}

impl ToTokens for ValueType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ts = match self {
            ValueType::Text => quote!(::poet::ValueType::Text),
            ValueType::Int32 => quote!(::poet::ValueType::Int32),
            ValueType::Int64 => quote!(::poet::ValueType::Int64),
            ValueType::Float32 => quote!(::poet::ValueType::Float32),
            ValueType::Float64 => quote!(::poet::ValueType::Float64),
            ValueType::Date => quote!(::poet::ValueType::Date),
            ValueType::Timestamp => quote!(::poet::ValueType::Timestamp),
            ValueType::Unsupported(name) => quote!(::poet::ValueType::Unsupported(#name)),
        };
        tokens.extend(ts);
    }
}
