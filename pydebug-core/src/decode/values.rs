//! `<var>` decoding: single values, value lists and referrers

use super::attributes::{expect_node, read_optional, read_required};
use super::{for_each_child, open_reader};
use crate::accessor::AccessorLink;
use crate::error::{Error, Result};
use crate::reader::TreeReader;
use crate::types::DebugValue;

/// Decode a single value from a complete payload.
pub fn parse_value(payload: &str, accessor: &AccessorLink) -> Result<DebugValue> {
    let mut reader = open_reader(payload, true)?;
    reader.move_down();
    decode_value(&reader, accessor)
}

/// Decode every `<var>` child of the envelope, in wire order.
///
/// An empty envelope yields an empty list.
pub fn parse_values(payload: &str, accessor: &AccessorLink) -> Result<Vec<DebugValue>> {
    let mut reader = open_reader(payload, false)?;
    decode_values(&mut reader, accessor)
}

/// Decode the referrers of a value from a complete payload.
pub fn parse_referrers(payload: &str, accessor: &AccessorLink) -> Result<Vec<DebugValue>> {
    let mut reader = open_reader(payload, false)?;
    decode_referrers(&mut reader, accessor)
}

/// Decode the `<var>` node under the cursor.
///
/// `isContainer` and `isErrorOnEval` are true only for the exact text
/// `True`. A redundant `"<type>: "` prefix on the value is dropped once.
pub fn decode_value<R: TreeReader + ?Sized>(
    reader: &R,
    accessor: &AccessorLink,
) -> Result<DebugValue> {
    expect_node(reader, "var")?;

    let name = read_required(reader, "name")?;
    let type_name = read_required(reader, "type")?;
    let mut value = read_required(reader, "value")?;
    let is_container = read_optional(reader, "isContainer", "")?;
    let is_error_on_eval = read_optional(reader, "isErrorOnEval", "")?;

    let prefix = format!("{}: ", type_name);
    if let Some(stripped) = value.strip_prefix(&prefix) {
        value = stripped.to_string();
    }

    Ok(DebugValue::new(
        name,
        type_name,
        value,
        is_container == "True",
        is_error_on_eval == "True",
        accessor.clone(),
    ))
}

/// Decode all children of the node under the cursor as values.
pub fn decode_values<R: TreeReader + ?Sized>(
    reader: &mut R,
    accessor: &AccessorLink,
) -> Result<Vec<DebugValue>> {
    let mut values = Vec::new();
    for_each_child(reader, |reader| {
        values.push(decode_value(reader, accessor)?);
        Ok(())
    })?;
    Ok(values)
}

/// Decode the children of the node under the cursor as referrers.
///
/// Each `<var>` carries an explicit `id` identifying the referring object.
/// `<for>` markers describe how the object is referred to and are skipped.
pub fn decode_referrers<R: TreeReader + ?Sized>(
    reader: &mut R,
    accessor: &AccessorLink,
) -> Result<Vec<DebugValue>> {
    let mut values = Vec::new();
    let mut skipped = 0usize;

    for_each_child(reader, |reader| {
        match reader.node_name() {
            "var" => {
                let mut value = decode_value(reader, accessor)?;
                value.id = Some(read_required(reader, "id")?);
                values.push(value);
            }
            "for" => skipped += 1,
            other => return Err(Error::unexpected(&["var", "for"], other)),
        }
        Ok(())
    })?;

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped <for> markers in referrers payload");
    }
    Ok(values)
}
