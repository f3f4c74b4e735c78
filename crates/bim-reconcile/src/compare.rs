//! Attribute-level comparison of two records for the same key.

use std::collections::BTreeSet;

use bim_model::{AssetRecord, CompareOptions, EqualityPolicy, FieldValue};

/// Value shape used by [`EqualityPolicy::Normalized`].
#[derive(Debug, PartialEq)]
enum Normalized<'a> {
    Blank,
    Bool(bool),
    Number(f64),
    Text(&'a str),
}

fn normalize(value: Option<&FieldValue>) -> Normalized<'_> {
    match value {
        None | Some(FieldValue::Null) => Normalized::Blank,
        Some(FieldValue::Bool(flag)) => Normalized::Bool(*flag),
        Some(FieldValue::Number(number)) => Normalized::Number(*number),
        Some(FieldValue::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Normalized::Blank
            } else if text.eq_ignore_ascii_case("true") {
                Normalized::Bool(true)
            } else if text.eq_ignore_ascii_case("false") {
                Normalized::Bool(false)
            } else if let Ok(number) = text.parse::<f64>()
                && number.is_finite()
            {
                Normalized::Number(number)
            } else {
                Normalized::Text(text)
            }
        }
    }
}

/// Compare one attribute. `None` means the attribute is absent on that side.
pub fn values_equal(
    left: Option<&FieldValue>,
    right: Option<&FieldValue>,
    policy: EqualityPolicy,
) -> bool {
    match policy {
        EqualityPolicy::Strict => left == right,
        EqualityPolicy::Normalized => normalize(left) == normalize(right),
    }
}

/// Names of attributes whose values differ between the two records.
///
/// Looks at the union of both records' attribute names minus ignored fields.
pub fn diff_fields(
    pim: &AssetRecord,
    maximo: &AssetRecord,
    options: &CompareOptions,
) -> BTreeSet<String> {
    pim.attribute_names()
        .chain(maximo.attribute_names())
        .filter(|name| !options.is_ignored(name))
        .filter(|name| !values_equal(pim.get(name), maximo.get(name), options.equality))
        .map(str::to_string)
        .collect()
}
