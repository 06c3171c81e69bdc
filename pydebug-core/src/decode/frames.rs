//! `<thread>` and `<frame>` decoding
//!
//! ```xml
//! <xml>
//!   <thread id="pid_1_id_2" name="MainThread" stop_reason="111" message="None">
//!     <frame id="140" name="main" file="%2Fapp%2Fmain.py" line="12"></frame>
//!   </thread>
//! </xml>
//! ```

use super::attributes::{expect_node, read_optional, read_optional_int, read_required};
use super::{for_each_child, open_reader};
use crate::error::Result;
use crate::position::PositionConverter;
use crate::reader::TreeReader;
use crate::types::{StackFrameInfo, ThreadInfo};

/// Wire text pydevd sends when a thread carries no message.
const NO_MESSAGE: &str = "None";

/// Decode a thread from a complete payload.
pub fn parse_thread(payload: &str, converter: &dyn PositionConverter) -> Result<ThreadInfo> {
    let mut reader = open_reader(payload, true)?;
    reader.move_down();
    decode_thread(&mut reader, converter)
}

/// Decode the `<thread>` node under the cursor, including its frames.
pub fn decode_thread<R: TreeReader + ?Sized>(
    reader: &mut R,
    converter: &dyn PositionConverter,
) -> Result<ThreadInfo> {
    expect_node(reader, "thread")?;

    let id = read_required(reader, "id")?;
    let name = read_optional(reader, "name", "")?;
    let stop_reason = read_optional_int(reader, "stop_reason", 0)?;
    let message = Some(read_optional(reader, "message", NO_MESSAGE)?)
        .filter(|message| message != NO_MESSAGE);

    let mut frames = Vec::new();
    for_each_child(reader, |reader| {
        frames.push(decode_frame(reader, &id, converter)?);
        Ok(())
    })?;

    tracing::debug!(
        thread_id = %id,
        stop_reason,
        frames = frames.len(),
        "Decoded thread"
    );

    Ok(ThreadInfo {
        id,
        name,
        frames,
        stop_reason,
        message,
    })
}

/// Decode the `<frame>` node under the cursor.
///
/// `line` is passed to the converter exactly as sent. Only threading events
/// shift their own line to zero-based.
pub fn decode_frame<R: TreeReader + ?Sized>(
    reader: &R,
    thread_id: &str,
    converter: &dyn PositionConverter,
) -> Result<StackFrameInfo> {
    expect_node(reader, "frame")?;

    let frame_id = read_required(reader, "id")?;
    let name = read_required(reader, "name")?;
    let file = read_required(reader, "file")?;
    let line = read_optional_int(reader, "line", 0)?;

    Ok(StackFrameInfo {
        thread_id: thread_id.to_string(),
        frame_id,
        name,
        position: converter.to_position(&file, line),
    })
}
