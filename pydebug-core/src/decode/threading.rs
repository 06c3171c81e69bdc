//! `<threading_event>` decoding
//!
//! The concurrency logger sends the event followed by the stack of the
//! thread that produced it, as siblings inside the envelope:
//!
//! ```xml
//! <xml>
//!   <threading_event time="1042" name="Thread-1" thread_id="t1" type="lock" lock_id="7"
//!                    event="acquire_begin" file="%2Fapp%2Fw.py" line="18"></threading_event>
//!   <frame id="1" name="run" file="%2Fapp%2Fw.py" line="18"></frame>
//! </xml>
//! ```

use super::attributes::{expect_node, parse_number, read_optional, read_required};
use super::frames::decode_frame;
use super::{for_each_child, open_reader};
use crate::error::{Error, Result};
use crate::position::PositionConverter;
use crate::reader::TreeReader;
use crate::types::{EventType, ThreadingEvent, ThreadingSubject};

/// Decode a threading event from a complete payload.
pub fn parse_threading_event(
    payload: &str,
    converter: &dyn PositionConverter,
) -> Result<ThreadingEvent> {
    let mut reader = open_reader(payload, true)?;
    decode_threading_event(&mut reader, converter)
}

/// Decode a threading event from the envelope under the cursor.
///
/// Unlike the other decoders this one starts on the envelope rather than on
/// the event node, since the event's frames are its siblings.
pub fn decode_threading_event<R: TreeReader + ?Sized>(
    reader: &mut R,
    converter: &dyn PositionConverter,
) -> Result<ThreadingEvent> {
    if !reader.move_down() {
        return Err(Error::EmptyMessage(format!(
            "<{}> has no threading event",
            reader.node_name()
        )));
    }
    expect_node(reader, "threading_event")?;

    let time = parse_number::<i64>("time", &read_optional(reader, "time", "")?)?;
    let name = read_optional(reader, "name", "")?;
    let thread_id = read_optional(reader, "thread_id", "")?;

    let kind = read_required(reader, "type")?;
    let subject = match kind.as_str() {
        "lock" => ThreadingSubject::Lock {
            lock_id: read_optional(reader, "lock_id", "0")?,
        },
        "thread" => ThreadingSubject::Thread,
        _ => {
            return Err(Error::UnknownVariant {
                kind: "type".to_string(),
                value: kind,
            })
        }
    };

    let event_name = read_required(reader, "event")?;
    let Some(event) = EventType::from_wire(&event_name) else {
        return Err(Error::UnknownVariant {
            kind: "event".to_string(),
            value: event_name,
        });
    };

    let file = read_optional(reader, "file", "")?;
    // the logger reports 1-based lines
    let raw_line = read_optional(reader, "line", "")?;
    let line = parse_number::<i32>("line", &raw_line)?
        .checked_sub(1)
        .ok_or_else(|| Error::MalformedNumber {
            attribute: "line".to_string(),
            value: raw_line.clone(),
        })?;
    reader.move_up();

    let mut frames = Vec::new();
    for_each_child(reader, |reader| {
        frames.push(decode_frame(reader, &thread_id, converter)?);
        Ok(())
    })?;

    tracing::debug!(
        thread_id = %thread_id,
        event = %event,
        time,
        "Decoded threading event"
    );

    Ok(ThreadingEvent {
        time,
        thread_id,
        name,
        subject,
        event,
        file,
        line,
        frames,
    })
}
