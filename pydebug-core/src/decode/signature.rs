//! `<call_signature>` decoding
//!
//! ```xml
//! <xml><call_signature file="/app/m.py" name="f"><arg name="x" type="int"/></call_signature></xml>
//! ```

use super::attributes::{expect_node, read_optional};
use super::{for_each_child, open_reader};
use crate::error::Result;
use crate::reader::TreeReader;
use crate::types::CallSignature;

/// Decode a call signature from a complete payload.
pub fn parse_call_signature(payload: &str) -> Result<CallSignature> {
    let mut reader = open_reader(payload, true)?;
    reader.move_down();
    decode_call_signature(&mut reader)
}

/// Decode the `<call_signature>` node under the cursor.
pub fn decode_call_signature<R: TreeReader + ?Sized>(reader: &mut R) -> Result<CallSignature> {
    expect_node(reader, "call_signature")?;
    let file = read_optional(reader, "file", "")?;
    let name = read_optional(reader, "name", "")?;
    let mut signature = CallSignature::new(file, name);

    for_each_child(reader, |reader| {
        expect_node(reader, "arg")?;
        signature.add_argument(
            read_optional(reader, "name", "")?,
            read_optional(reader, "type", "")?,
        );
        Ok(())
    })?;

    tracing::trace!(
        function = %signature.name,
        args = signature.args.len(),
        "Decoded call signature"
    );
    Ok(signature)
}
