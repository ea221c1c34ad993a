mod decode_column;
mod decode_table;
mod encode_field;

use decode_column::decode_column;
use decode_table::decode_table;
use encode_field::encode_field;
use poet_core::quote_option;
use proc_macro::TokenStream;
use quote::quote;
use syn::{Fields, ItemStruct, parse_macro_input};

/// Implements `poet::Entity`, generating the static descriptor of the struct.
///
/// Struct attributes: `#[poet(table = "..", join = "..", from = "..", trace = "..")]`.
/// Field attributes: `#[poet(column = "..", read_only)]` and one of `embedded`, `base` or
/// `skip`. Fields not marked `skip` must implement `poet::AsValue` (value fields) or
/// `poet::Entity` (embedded and base fields, optionally inside an `Option`).
#[proc_macro_derive(Entity, attributes(poet))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    if !item.generics.params.is_empty() {
        panic!("Entity cannot be derived on generic structs");
    }
    let Fields::Named(..) = &item.fields else {
        panic!("Entity can only be derived on structs with named fields");
    };
    let name = &item.ident;
    let table = decode_table(&item);
    let (items, fields): (Vec<_>, Vec<_>) = item
        .fields
        .iter()
        .map(|field| encode_field(name, &decode_column(field)))
        .unzip();
    let entity_name = name.to_string();
    let tables = quote_option(&table.tables);
    let join = quote_option(&table.join);
    let from = quote_option(&table.from);
    let trace = quote_option(&table.trace);
    quote! {
        impl ::poet::Entity for #name {
            fn entity_def() -> &'static ::poet::EntityDef {
                static DEF: ::std::sync::LazyLock<::poet::EntityDef> = ::std::sync::LazyLock::new(|| {
                    #(#items)*
                    ::poet::EntityDef {
                        name: #entity_name,
                        type_id: ::std::any::TypeId::of::<#name>,
                        tables: #tables,
                        join: #join,
                        from: #from,
                        trace: #trace,
                        fields: ::std::boxed::Box::new([#(#fields),*]),
                    }
                });
                &DEF
            }
        }
    }
    .into()
}
