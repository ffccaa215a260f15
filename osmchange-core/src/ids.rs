//! Placeholder identifiers for elements that do not exist on the server yet.
//!
//! The OSM API resolves negative ids inside a single upload, so every entity
//! created through an [`OsmChange`](crate::OsmChange) receives a fresh
//! negative id from one shared counter. Ids are never reused.

use std::fmt;

macro_rules! placeholder_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            /// The raw negative identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

placeholder_id!(
    /// Placeholder id of a node created in this change.
    NodeId
);
placeholder_id!(
    /// Placeholder id of a way created in this change.
    WayId
);
placeholder_id!(
    /// Placeholder id of a multipolygon relation created in this change.
    RelationId
);

/// Hands out strictly decreasing negative ids: `-1`, `-2`, ...
#[derive(Debug, Default, Clone)]
pub(crate) struct IdAllocator {
    last: i64,
}

impl IdAllocator {
    fn next(&mut self) -> i64 {
        self.last -= 1;
        self.last
    }

    pub(crate) fn node(&mut self) -> NodeId {
        NodeId(self.next())
    }

    pub(crate) fn way(&mut self) -> WayId {
        WayId(self.next())
    }

    pub(crate) fn relation(&mut self) -> RelationId {
        RelationId(self.next())
    }
}
