//! Strongly typed, zero-cost identifier wrappers.
//!
//! Every entity in the pipeline lives in an arena `Vec` owned by the model
//! store, and all cross-references between entities are these index types
//! rather than pointers.  That keeps the colocation/concurrency webs cycle
//! free and lets the spatial structures reorder freely.  All IDs are
//! `Copy + Ord + Hash` so they can be used as map keys and sorted collection
//! elements without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a highway system.  `u16` suffices for a few hundred systems.
    pub struct SystemId(u16);
}

typed_id! {
    /// Index of a chopped route.
    pub struct RouteId(u32);
}

typed_id! {
    /// Index of a connected (end-to-end) route.
    pub struct ConRouteId(u32);
}

typed_id! {
    /// Index of a waypoint.  The corpus holds on the order of 10⁶ points.
    pub struct WaypointId(u32);
}

typed_id! {
    /// Index of a highway segment (the edge between two consecutive
    /// waypoints of one route).
    pub struct SegmentId(u32);
}

typed_id! {
    /// Index of a traveler list, assigned after sorting travelers by name.
    pub struct TravelerId(u32);
}

typed_id! {
    /// Index of a colocation group (all waypoints at one exact coordinate).
    pub struct GroupId(u32);
}

typed_id! {
    /// Index of a highway-graph vertex.
    pub struct VertexId(u32);
}

typed_id! {
    /// Index of a highway-graph edge.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Index of a concurrency list (all segments sharing one physical
    /// stretch of road).
    pub struct ConcId(u32);
}
