//! Frame accessor handle
//!
//! A [`DebugValue`](crate::types::DebugValue) remembers which accessor it
//! came from so the session layer can fetch its children later. The
//! decoders only store the link and never call through it.

use crate::error::Result;
use crate::types::DebugValue;
use std::sync::{Arc, Weak};

/// Capability through which a decoded value can later load its children.
///
/// Implemented by the session layer that owns the connection to pydevd.
pub trait FrameAccessor: Send + Sync {
    /// Fetch the children of a container value.
    fn load_children(&self, value: &DebugValue) -> Result<Vec<DebugValue>>;
}

/// Non-owning link from a value back to its accessor.
///
/// Upgrading fails once the session that owned the accessor is gone.
#[derive(Clone, Default)]
pub struct AccessorLink(Option<Weak<dyn FrameAccessor>>);

impl AccessorLink {
    /// A link that points at nothing, for values decoded outside a session.
    pub fn detached() -> Self {
        Self(None)
    }

    pub fn to(accessor: &Arc<dyn FrameAccessor>) -> Self {
        Self(Some(Arc::downgrade(accessor)))
    }

    pub fn upgrade(&self) -> Option<Arc<dyn FrameAccessor>> {
        self.0.as_ref().and_then(Weak::upgrade)
    }
}

impl std::fmt::Debug for AccessorLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.upgrade() {
            Some(_) => "live",
            None if self.0.is_some() => "dropped",
            None => "detached",
        };
        f.debug_tuple("AccessorLink").field(&state).finish()
    }
}
