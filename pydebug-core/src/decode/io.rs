//! `<io>` decoding: console output redirected from the debuggee

use super::attributes::{expect_node, read_optional, read_optional_int};
use super::open_reader;
use crate::error::Result;
use crate::reader::TreeReader;
use crate::types::IoOutput;

/// Decode console output from a complete payload.
pub fn parse_io(payload: &str) -> Result<IoOutput> {
    let mut reader = open_reader(payload, true)?;
    reader.move_down();
    decode_io(&reader)
}

/// Decode the `<io>` node under the cursor. `ctx` defaults to stdout.
pub fn decode_io<R: TreeReader + ?Sized>(reader: &R) -> Result<IoOutput> {
    expect_node(reader, "io")?;
    Ok(IoOutput {
        text: read_optional(reader, "s", "")?,
        context: read_optional_int(reader, "ctx", 1)?,
    })
}
