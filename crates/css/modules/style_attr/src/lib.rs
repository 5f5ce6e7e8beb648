//! Inline `style` attributes: reading and rewriting declarations.
//! Spec: <https://www.w3.org/TR/css-style-attr/>
//!
//! Values are treated as opaque text. Only the declaration structure
//! (`property: value;`) is understood, which is enough to query and set
//! properties such as `position` or `display` on template elements.

#![forbid(unsafe_code)]

/// `property: value` from a style attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercase, since property names are ASCII case-insensitive.
    pub property: String,
    /// Text after the colon with surrounding whitespace removed.
    pub value: String,
}

/// CSS whitespace: tab, newline, form feed, carriage return and space.
/// Spec: <https://www.w3.org/TR/css-syntax-3/#whitespace>
const fn is_css_whitespace(character: char) -> bool {
    matches!(character, '\t' | '\n' | '\u{c}' | '\r' | ' ')
}

fn parse_declaration(item: &str) -> Option<Declaration> {
    let (name, value) = item.split_once(':')?;
    let name = name.trim_matches(is_css_whitespace);
    let value = value.trim_matches(is_css_whitespace);
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some(Declaration {
        property: name.to_ascii_lowercase(),
        value: value.to_owned(),
    })
}

/// Every well-formed declaration in `input`, in source order.
///
/// Items without a colon, or with an empty name or value, are dropped.
/// Spec: <https://www.w3.org/TR/css-style-attr/#interpreting>
pub fn parse_style_attribute(input: &str) -> Vec<Declaration> {
    input.split(';').filter_map(parse_declaration).collect()
}

/// Value of `property` in `input`. Later declarations override earlier ones.
pub fn property_value(input: &str, property: &str) -> Option<String> {
    input
        .rsplit(';')
        .filter_map(parse_declaration)
        .find(|declaration| declaration.property.eq_ignore_ascii_case(property))
        .map(|declaration| declaration.value)
}

/// One declaration per property: the last value, kept where the property first appeared.
pub fn normalize_style_attribute(input: &str) -> Vec<Declaration> {
    let mut merged: Vec<Declaration> = Vec::new();
    for declaration in parse_style_attribute(input) {
        match merged
            .iter_mut()
            .find(|seen| seen.property == declaration.property)
        {
            Some(seen) => seen.value = declaration.value,
            None => merged.push(declaration),
        }
    }
    merged
}

/// Attribute text for `declarations`, e.g. `color: red; top: 0`.
pub fn serialize_declarations(declarations: &[Declaration]) -> String {
    let mut text = String::new();
    for declaration in declarations {
        if !text.is_empty() {
            text.push_str("; ");
        }
        text.push_str(&declaration.property);
        text.push_str(": ");
        text.push_str(&declaration.value);
    }
    text
}

/// `input` rewritten with `property` set to `value`. Other properties keep their order.
pub fn set_property(input: &str, property: &str, value: &str) -> String {
    let mut declarations = normalize_style_attribute(&format!("{input};{property}:{value}"));
    if value.trim_matches(is_css_whitespace).is_empty() {
        declarations.retain(|declaration| !declaration.property.eq_ignore_ascii_case(property));
    }
    serialize_declarations(&declarations)
}
