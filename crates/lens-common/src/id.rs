use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier the backend assigns to a live rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceHandle(pub u32);

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Identifier of a mounted placeholder region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_handle_display() {
        assert_eq!(SurfaceHandle(7).to_string(), "surface-7");
    }

    #[test]
    fn region_id_display() {
        assert_eq!(RegionId(42).to_string(), "region-42");
    }

    #[test]
    fn surface_handle_hash_and_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(SurfaceHandle(1));
        set.insert(SurfaceHandle(2));
        set.insert(SurfaceHandle(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn surface_handle_serializes_as_bare_number() {
        let json = serde_json::to_string(&SurfaceHandle(3)).unwrap();
        assert_eq!(json, "3");
        let back: SurfaceHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SurfaceHandle(3));
    }
}
