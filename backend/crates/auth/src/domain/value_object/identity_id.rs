//! Identity ID value object

use kernel::id::{markers::Identity as IdentityMarker, Id};

/// Strongly typed identity (user) ID
pub type IdentityId = Id<IdentityMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_id_unique() {
        let a = IdentityId::new();
        let b = IdentityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_id_roundtrip() {
        let id = IdentityId::new();
        let parsed: IdentityId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
