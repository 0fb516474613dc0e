//! Schema-driven cell decoding.
//!
//! [`decode`] dispatches on the field's declared [`TypeTag`] only; the raw
//! cell's native kind never picks the branch. Decoding is total: absent
//! leaves become `Null`, scalars that fail to parse keep their raw text, and
//! unknown tags fall back to text.

use tabrec_model::{
    Decimal, FieldDescriptor, NativeScalar, RawCell, Record, TypeTag, Value,
};
use tracing::trace;

use crate::timestamp;

/// Decode one cell according to its field descriptor.
pub fn decode(field: &FieldDescriptor, cell: &RawCell) -> Value {
    decode_tagged(field.name(), field.type_tag(), field.sub_fields(), cell)
}

fn decode_tagged(
    name: &str,
    tag: &TypeTag,
    sub_fields: &[FieldDescriptor],
    cell: &RawCell,
) -> Value {
    if cell.is_null() {
        return Value::Null;
    }
    match tag {
        TypeTag::Bool => decode_bool(name, cell),
        TypeTag::Int64 => decode_int64(name, cell),
        TypeTag::Float64 => decode_float64(name, cell),
        TypeTag::Decimal => decode_decimal(name, cell),
        TypeTag::String
        | TypeTag::Bytes
        | TypeTag::Date
        | TypeTag::Time
        | TypeTag::Datetime
        | TypeTag::Geography
        | TypeTag::Json => text_value(cell),
        TypeTag::Timestamp => match timestamp::normalize(cell) {
            Some(instant) => Value::Instant(instant),
            None => {
                trace!(field = name, "unparseable timestamp decoded as null");
                Value::Null
            }
        },
        TypeTag::Struct => match cell {
            RawCell::Record(children) => Value::Record(decode_struct(sub_fields, children)),
            other => degrade(name, tag, other),
        },
        TypeTag::Array(element) => match cell {
            RawCell::Repeated(elements) => Value::List(
                elements
                    .iter()
                    .map(|item| decode_tagged(name, element, sub_fields, item))
                    .collect(),
            ),
            other => degrade(name, tag, other),
        },
        TypeTag::Other(_) => text_value(cell),
    }
}

fn decode_struct(sub_fields: &[FieldDescriptor], children: &[RawCell]) -> Record {
    let mut record = Record::new();
    for (position, sub_field) in sub_fields.iter().enumerate() {
        let child = children.get(position).unwrap_or(&RawCell::Null);
        record.insert(sub_field.name(), decode(sub_field, child));
    }
    record
}

fn decode_bool(name: &str, cell: &RawCell) -> Value {
    if let Some(NativeScalar::Bool(flag)) = cell.native_scalar() {
        return Value::Bool(*flag);
    }
    parse_text(name, &TypeTag::Bool, cell, |text| {
        if text.eq_ignore_ascii_case("true") {
            Some(Value::Bool(true))
        } else if text.eq_ignore_ascii_case("false") {
            Some(Value::Bool(false))
        } else {
            None
        }
    })
}

fn decode_int64(name: &str, cell: &RawCell) -> Value {
    if let Some(NativeScalar::Int64(number)) = cell.native_scalar() {
        return Value::Int64(*number);
    }
    parse_text(name, &TypeTag::Int64, cell, |text| {
        text.parse::<i64>().ok().map(Value::Int64)
    })
}

fn decode_float64(name: &str, cell: &RawCell) -> Value {
    match cell.native_scalar() {
        Some(NativeScalar::Float64(number)) => return Value::Float64(*number),
        Some(NativeScalar::Int64(number)) => return Value::Float64(*number as f64),
        _ => {}
    }
    parse_text(name, &TypeTag::Float64, cell, |text| {
        text.parse::<f64>().ok().map(Value::Float64)
    })
}

fn decode_decimal(name: &str, cell: &RawCell) -> Value {
    match cell.native_scalar() {
        Some(NativeScalar::Decimal(number)) => return Value::Decimal(*number),
        Some(NativeScalar::Int64(number)) => {
            return Value::Decimal(Decimal::from(*number));
        }
        _ => {}
    }
    parse_text(name, &TypeTag::Decimal, cell, |text| {
        text.parse::<Decimal>().ok().map(Value::Decimal)
    })
}

/// Textual fallback for scalar tags: parse the trimmed text form, keeping the
/// untrimmed payload as `Text` when parsing fails.
fn parse_text(
    name: &str,
    tag: &TypeTag,
    cell: &RawCell,
    parse: impl FnOnce(&str) -> Option<Value>,
) -> Value {
    let Some(text) = cell.text_form() else {
        return Value::Null;
    };
    parse(text.trim()).unwrap_or_else(|| {
        trace!(field = name, tag = %tag, "scalar kept as raw text");
        Value::Text(text.into_owned())
    })
}

fn text_value(cell: &RawCell) -> Value {
    cell.text_form()
        .map_or(Value::Null, |text| Value::Text(text.into_owned()))
}

/// Shape mismatch between the declared tag and the cell; keep the payload as text.
fn degrade(name: &str, tag: &TypeTag, cell: &RawCell) -> Value {
    trace!(field = name, tag = %tag, "cell shape does not match declared type");
    text_value(cell)
}
