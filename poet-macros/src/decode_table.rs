use quote::ToTokens;
use syn::{ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct TableMetadata {
    pub(crate) tables: Option<String>,
    pub(crate) join: Option<String>,
    pub(crate) from: Option<String>,
    pub(crate) trace: Option<String>,
}

pub fn decode_table(item: &ItemStruct) -> TableMetadata {
    let mut result = TableMetadata {
        tables: None,
        join: None,
        from: None,
        trace: None,
    };
    for attr in &item.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("poet") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `poet`, use it like: `#[poet(attribute = value, ..)]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            let target = if arg.path.is_ident("table") {
                &mut result.tables
            } else if arg.path.is_ident("join") {
                &mut result.join
            } else if arg.path.is_ident("from") {
                &mut result.from
            } else if arg.path.is_ident("trace") {
                &mut result.trace
            } else {
                panic!(
                    "Unknown attribute `{}` inside poet macro",
                    arg.path.to_token_stream()
                );
            };
            let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                panic!(
                    "Error while parsing `{}`, use it like: `#[poet(table = \"ALIAS=TABLE\")]`",
                    arg.path.to_token_stream()
                );
            };
            *target = Some(value.value());
            Ok(())
        });
    }
    result
}
