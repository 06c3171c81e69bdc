//! Core domain types for pydebug
//!
//! These types are immutable snapshots of the remote interpreter's state at
//! the moment pydevd produced the message. They are built by one decode call
//! and handed to the caller by value.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Wire message** | One `<xml>` envelope sent by pydevd |
//! | **Frame** | One level of a thread's call stack |
//! | **Value** | A variable, expression result, or container element (`<var>`) |
//! | **Slice** | The array expression an [`ArrayChunk`] is a view over |
//! | **Referrer** | A value that holds a reference to another value |

use crate::accessor::AccessorLink;
use crate::position::SourcePosition;
use serde::Serialize;

// ============================================
// Call Signatures
// ============================================

/// One collected call signature: which types a function was called with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSignature {
    pub file: String,
    pub name: String,
    /// Arguments in declaration order. Duplicates are kept.
    pub args: Vec<SignatureArg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureArg {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl CallSignature {
    pub fn new(file: String, name: String) -> Self {
        Self {
            file,
            name,
            args: Vec::new(),
        }
    }

    pub fn add_argument(&mut self, name: String, type_name: String) {
        self.args.push(SignatureArg { name, type_name });
    }
}

// ============================================
// Threading Events
// ============================================

/// What a threading event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThreadingSubject {
    Lock { lock_id: String },
    Thread,
}

/// Lifecycle step reported by the concurrency logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Create,
    Start,
    Join,
    Stop,
    AcquireBegin,
    AcquireEnd,
    Release,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Create => "CREATE",
            EventType::Start => "START",
            EventType::Join => "JOIN",
            EventType::Stop => "STOP",
            EventType::AcquireBegin => "ACQUIRE_BEGIN",
            EventType::AcquireEnd => "ACQUIRE_END",
            EventType::Release => "RELEASE",
        }
    }

    /// Map a wire-level event name.
    ///
    /// Lock context managers report `__enter__`/`__exit__` where plain locks
    /// report `acquire`/`release`. Release begin and end are both recorded
    /// remotely but collapse to [`EventType::Release`].
    pub fn from_wire(event: &str) -> Option<Self> {
        match event {
            "__init__" => Some(EventType::Create),
            "start" => Some(EventType::Start),
            "join" => Some(EventType::Join),
            "stop" => Some(EventType::Stop),
            "acquire_begin" | "__enter___begin" => Some(EventType::AcquireBegin),
            "acquire_end" | "__enter___end" => Some(EventType::AcquireEnd),
            e if e.starts_with("release") || e.starts_with("__exit__") => Some(EventType::Release),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A thread or lock lifecycle event from the concurrency visualizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadingEvent {
    /// Ticks since the logger started
    pub time: i64,
    pub thread_id: String,
    /// Name of the thread or lock
    pub name: String,
    pub subject: ThreadingSubject,
    pub event: EventType,
    pub file: String,
    /// Zero-based line of the call site
    pub line: i32,
    /// Stack at the time of the event, in wire order
    pub frames: Vec<StackFrameInfo>,
}

impl ThreadingEvent {
    pub fn is_lock_event(&self) -> bool {
        matches!(self.subject, ThreadingSubject::Lock { .. })
    }

    pub fn lock_id(&self) -> Option<&str> {
        match &self.subject {
            ThreadingSubject::Lock { lock_id } => Some(lock_id),
            ThreadingSubject::Thread => None,
        }
    }
}

// ============================================
// Threads and Frames
// ============================================

/// A suspended (or just created) thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadInfo {
    pub id: String,
    pub name: String,
    pub frames: Vec<StackFrameInfo>,
    /// pydevd command id that caused the stop (e.g. 111 for a breakpoint)
    pub stop_reason: i32,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrameInfo {
    pub thread_id: String,
    pub frame_id: String,
    pub name: String,
    pub position: SourcePosition,
}

// ============================================
// Values
// ============================================

/// A variable or expression value.
///
/// Equality is left to the consuming layer; the decoder defines none.
#[derive(Debug, Clone, Serialize)]
pub struct DebugValue {
    pub name: String,
    /// Absent only on array slice placeholders
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub value: Option<String>,
    pub is_container: bool,
    pub is_error_on_eval: bool,
    /// Referrer id, when the value came from a referrers listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip)]
    pub accessor: AccessorLink,
}

impl DebugValue {
    pub fn new(
        name: String,
        type_name: String,
        value: String,
        is_container: bool,
        is_error_on_eval: bool,
        accessor: AccessorLink,
    ) -> Self {
        Self {
            name,
            type_name: Some(type_name),
            value: Some(value),
            is_container,
            is_error_on_eval,
            id: None,
            accessor,
        }
    }

    /// Stand-in value for the slice an array chunk was requested for.
    pub fn slice(slice: String, accessor: AccessorLink) -> Self {
        Self {
            name: slice,
            type_name: None,
            value: None,
            is_container: false,
            is_error_on_eval: false,
            id: None,
            accessor,
        }
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    pub fn type_str(&self) -> &str {
        self.type_name.as_deref().unwrap_or_default()
    }
}

// ============================================
// Arrays
// ============================================

/// Raw element values of an array slice, `grid[row][col]`.
///
/// Slots stay `None` when the payload never filled them.
pub type ArrayGrid = Vec<Vec<Option<String>>>;

/// A window onto a numpy-like array, as used by the array viewer.
#[derive(Debug, Clone, Serialize)]
pub struct ArrayChunk {
    pub value: DebugValue,
    pub slice: String,
    pub rows: i32,
    pub cols: i32,
    /// printf-style element format, e.g. `%.5f`
    pub format: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub max: String,
    pub min: String,
    pub data: Option<ArrayGrid>,
}

// ============================================
// Console I/O
// ============================================

/// Output the debuggee wrote to stdout or stderr.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IoOutput {
    pub text: String,
    /// 1 for stdout, 2 for stderr
    pub context: i32,
}

impl IoOutput {
    pub fn is_stderr(&self) -> bool {
        self.context == 2
    }
}
