use crate::decode_column::{ColumnKind, ColumnMetadata};
use poet_core::{ValueType, option_inner, quote_option};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

/// Accessor functions of a field and the `FieldDef` expression referring to them.
pub(crate) fn encode_field(entity: &Ident, column: &ColumnMetadata) -> (TokenStream, TokenStream) {
    let ident = &column.ident;
    let name = &column.name;
    let read_only = column.read_only;
    let column_name = quote_option(&column.column);
    let entity_name = entity.to_string();
    let (items, kind) = match column.kind {
        ColumnKind::Value => {
            let get = format_ident!("get_{}", ident);
            let set = format_ident!("set_{}", ident);
            let ty = column.decoded.value_type;
            let nullable = column.decoded.nullable;
            let mut items = quote! {
                fn #get(entity: &dyn ::std::any::Any) -> ::std::option::Option<::poet::Value> {
                    entity
                        .downcast_ref::<#entity>()
                        .map(|v| ::poet::AsValue::as_value(::std::clone::Clone::clone(&v.#ident)))
                }
            };
            let setter = if let ValueType::Unsupported(..) = ty {
                quote!(None)
            } else {
                items.extend(quote! {
                    fn #set(
                        entity: &mut dyn ::std::any::Any,
                        value: ::poet::Value,
                    ) -> ::poet::Result<()> {
                        let failure = || ::poet::Error::with_args(
                            ::poet::Status::PropertyAccessFailure,
                            [#entity_name, #name],
                        );
                        let Some(entity) = entity.downcast_mut::<#entity>() else {
                            return Err(failure());
                        };
                        entity.#ident = ::poet::AsValue::try_from_value(value)
                            .map_err(|e| failure().caused_by(e))?;
                        Ok(())
                    }
                });
                quote!(Some(#set))
            };
            (
                items,
                quote! {
                    ::poet::FieldKind::Value {
                        ty: #ty,
                        nullable: #nullable,
                        get: #get,
                        set: #setter,
                    }
                },
            )
        }
        ColumnKind::Embedded | ColumnKind::Base => {
            let get = format_ident!("ref_{}", ident);
            let get_mut = format_ident!("mut_{}", ident);
            let (target, as_ref, as_mut) = match option_inner(&column.ty) {
                Some(inner) => (inner, quote!(v.#ident.as_ref()), quote!(v.#ident.as_mut())),
                None => (&column.ty, quote!(Some(&v.#ident)), quote!(Some(&mut v.#ident))),
            };
            let items = quote! {
                fn #get(entity: &dyn ::std::any::Any) -> ::std::option::Option<&dyn ::std::any::Any> {
                    entity
                        .downcast_ref::<#entity>()
                        .and_then(|v| #as_ref)
                        .map(|v| v as &dyn ::std::any::Any)
                }
                fn #get_mut(
                    entity: &mut dyn ::std::any::Any,
                ) -> ::std::option::Option<&mut dyn ::std::any::Any> {
                    entity
                        .downcast_mut::<#entity>()
                        .and_then(|v| #as_mut)
                        .map(|v| v as &mut dyn ::std::any::Any)
                }
            };
            let nested = quote! {
                ::poet::Nested {
                    def: <#target as ::poet::Entity>::entity_def,
                    get: #get,
                    get_mut: #get_mut,
                }
            };
            let kind = if column.kind == ColumnKind::Embedded {
                quote!(::poet::FieldKind::Embedded(#nested))
            } else {
                quote!(::poet::FieldKind::Base(#nested))
            };
            (items, kind)
        }
        ColumnKind::Skip => (TokenStream::new(), quote!(::poet::FieldKind::Skip)),
    };
    let def = quote! {
        ::poet::FieldDef {
            name: #name,
            column: #column_name,
            read_only: #read_only,
            kind: #kind,
        }
    };
    (items, def)
}
