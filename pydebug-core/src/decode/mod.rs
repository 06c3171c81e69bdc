//! Decoders for pydevd wire messages
//!
//! Each message kind has two entry points:
//!
//! - `parse_*` takes a complete payload, opens an [`XmlTreeReader`] on it
//!   and decodes the message.
//! - `decode_*` takes any [`TreeReader`] already positioned where the
//!   message starts, so the same logic works over other reader backends.
//!
//! ## Supported Messages
//!
//! | Root tag | Entity | Module |
//! |----------|--------|--------|
//! | `call_signature` | [`CallSignature`](crate::types::CallSignature) | [`signature`] |
//! | `threading_event` | [`ThreadingEvent`](crate::types::ThreadingEvent) | [`threading`] |
//! | `thread` / `frame` | [`ThreadInfo`](crate::types::ThreadInfo) | [`frames`] |
//! | `var` | [`DebugValue`](crate::types::DebugValue) | [`values`] |
//! | `array` / `arraydata` | [`ArrayChunk`](crate::types::ArrayChunk) | [`array`] |
//! | `io` | [`IoOutput`](crate::types::IoOutput) | [`io`] |
//!
//! ## Error Handling
//!
//! Decoding fails fast. The first malformed node or attribute aborts the
//! whole message and no partially built entity is returned. Retrying cannot
//! help, so callers should log and drop the message.
//!
//! ## Reader Position
//!
//! Decoders that iterate children move back up after every child, leaving
//! the cursor at the depth they received it, ready for the next sibling.

pub mod array;
pub mod attributes;
pub mod frames;
pub mod io;
pub mod signature;
pub mod threading;
pub mod values;

pub use array::{parse_array_chunk, parse_array_header};
pub use frames::parse_thread;
pub use io::parse_io;
pub use signature::parse_call_signature;
pub use threading::parse_threading_event;
pub use values::{parse_referrers, parse_value, parse_values};

use crate::error::{Error, Result};
use crate::reader::{TreeReader, XmlTreeReader};

/// Open a reader on the payload envelope.
///
/// With `require_content`, an envelope without children is
/// [`Error::EmptyMessage`].
pub(crate) fn open_reader(payload: &str, require_content: bool) -> Result<XmlTreeReader> {
    let reader = XmlTreeReader::parse(payload)?;
    if require_content && !reader.has_more_children() {
        return Err(Error::EmptyMessage(payload.to_string()));
    }
    Ok(reader)
}

/// Visit every remaining child of the current node, moving back up after
/// each one.
pub(crate) fn for_each_child<R, F>(reader: &mut R, mut visit: F) -> Result<()>
where
    R: TreeReader + ?Sized,
    F: FnMut(&mut R) -> Result<()>,
{
    while reader.move_down() {
        visit(reader)?;
        reader.move_up();
    }
    Ok(())
}

/// Thread id of a tab-separated command payload (the text before the
/// first tab).
pub fn thread_id_of(payload: &str) -> &str {
    payload.split('\t').next().unwrap_or(payload)
}

/// Source content responses carry the file text as-is.
pub fn parse_source_content(payload: &str) -> &str {
    payload
}
