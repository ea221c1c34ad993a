//! Conversions between Rust identifiers and SQL identifiers.
//!
//! Fields are `lowerCamelCase` (or `snake_case`, which maps to itself once upper-cased), columns
//! and tables are `UPPER_SNAKE_CASE`.

/// Column name of a field: `createdAt` becomes `CREATED_AT`.
///
/// An underscore is inserted before every uppercase ASCII letter that is not the first character,
/// then the whole name is upper-cased. A leading `-` (the exclusion marker) is dropped.
pub fn column_name_for(identifier: &str) -> String {
    let mut result = String::with_capacity(identifier.len() + 4);
    for (i, c) in identifier.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            result.push('_');
        }
        result.push(c);
    }
    if let Some(stripped) = result.strip_prefix('-') {
        result = stripped.to_owned();
    }
    result.to_uppercase()
}

/// Field name of a column: `CREATED_AT` becomes `createdAt`.
pub fn field_name_for(column: &str) -> String {
    let lower = column.to_lowercase();
    let mut words = lower.split('_');
    let mut result = String::with_capacity(lower.len());
    result.push_str(words.next().unwrap_or_default());
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Default table name of an entity type.
///
/// A trailing `Po`, `Bo` or `Vo` (in any case) is removed when the name is longer than two
/// characters: `UserAccountPo` becomes `USER_ACCOUNT`.
pub fn table_name_for(type_name: &str) -> String {
    let mut name = type_name;
    if name.chars().count() > 2 {
        let split = name.len() - 2;
        if name.is_char_boundary(split)
            && ["PO", "BO", "VO"]
                .iter()
                .any(|suffix| name[split..].eq_ignore_ascii_case(suffix))
        {
            name = &name[..split];
        }
    }
    column_name_for(name)
}
