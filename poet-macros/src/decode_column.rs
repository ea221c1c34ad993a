use poet_core::{TypeDecoded, decode_type};
use quote::ToTokens;
use syn::{Field, Ident, LitStr, Type, ext::IdentExt, parse::ParseBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Value,
    Embedded,
    Base,
    Skip,
}

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    /// Field name without the `r#` prefix.
    pub(crate) name: String,
    pub(crate) ty: Type,
    pub(crate) column: Option<String>,
    pub(crate) read_only: bool,
    pub(crate) kind: ColumnKind,
    pub(crate) decoded: TypeDecoded,
}

pub fn decode_column(field: &Field) -> ColumnMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let mut metadata = ColumnMetadata {
        name: ident.unraw().to_string(),
        ident,
        ty: field.ty.clone(),
        column: None,
        read_only: false,
        kind: ColumnKind::Value,
        decoded: decode_type(&field.ty),
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("poet") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `poet`, use it like: `#[poet(attribute = value, ..)]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("column") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!("Error while parsing `column`, use it like: `#[poet(column = \"MY_COLUMN\")]`");
                };
                metadata.column = Some(v.value());
            } else if arg.path.is_ident("read_only") {
                let Err(..) = arg.value() else {
                    // value() is Err for Meta::Path
                    panic!("Error while parsing `read_only`, use it like: `#[poet(read_only)]`");
                };
                metadata.read_only = true;
            } else if arg.path.is_ident("embedded") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `embedded`, use it like: `#[poet(embedded)]`");
                };
                set_kind(ColumnKind::Embedded, &mut metadata);
            } else if arg.path.is_ident("base") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `base`, use it like: `#[poet(base)]`");
                };
                set_kind(ColumnKind::Base, &mut metadata);
            } else if arg.path.is_ident("skip") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `skip`, use it like: `#[poet(skip)]`");
                };
                set_kind(ColumnKind::Skip, &mut metadata);
            } else {
                panic!(
                    "Unknown attribute `{}` inside poet macro",
                    arg.path.to_token_stream()
                );
            }
            Ok(())
        });
    }
    metadata
}

fn set_kind(kind: ColumnKind, metadata: &mut ColumnMetadata) {
    if metadata.kind != ColumnKind::Value {
        panic!(
            "Field `{}` can be only one of `embedded`, `base` or `skip`",
            metadata.name
        );
    }
    metadata.kind = kind;
}
