//! Recognized root anchors.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// Name of the conventional global root.
pub const ISO: &str = "iso";

/// Arc prefix of the conventional global root.
pub const ISO_ARCS: &[u32] = &[1];

/// Set of root tokens, each mapped to the arcs it stands for.
///
/// A symbol whose parent is a root token is a top-level arc. Its OID is the
/// root's arcs followed by its own arc. Chains that end at an unknown name are
/// prefixed with the global prefix instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootSet {
    roots: BTreeMap<String, Vec<u32>>,
    global: Vec<u32>,
}

impl RootSet {
    /// Only `iso` (arc 1), which is also the global prefix.
    #[must_use]
    pub fn iso() -> Self {
        let mut roots = BTreeMap::new();
        roots.insert(ISO.into(), ISO_ARCS.to_vec());
        Self {
            roots,
            global: ISO_ARCS.to_vec(),
        }
    }

    /// The three ITU-T/ISO top-level arcs: `ccitt` (0), `iso` (1) and
    /// `joint-iso-ccitt` (2).
    #[must_use]
    pub fn standard() -> Self {
        Self::iso()
            .with_root("ccitt", vec![0])
            .with_root("joint-iso-ccitt", vec![2])
    }

    /// Add a root, replacing an existing one with the same name.
    #[must_use]
    pub fn with_root(mut self, name: impl Into<String>, arcs: Vec<u32>) -> Self {
        self.insert(name, arcs);
        self
    }

    /// Add a root, replacing an existing one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, arcs: Vec<u32>) {
        self.roots.insert(name.into(), arcs);
    }

    /// Check whether a name is a root token.
    #[must_use]
    pub fn is_root(&self, name: &str) -> bool {
        self.roots.contains_key(name)
    }

    /// Arcs of a root token.
    #[must_use]
    pub fn prefix(&self, name: &str) -> Option<&[u32]> {
        self.roots.get(name).map(Vec::as_slice)
    }

    /// Prefix used for chains that end at an unknown name.
    #[must_use]
    pub fn global_prefix(&self) -> &[u32] {
        &self.global
    }

    /// Iterate over root names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }
}

impl Default for RootSet {
    fn default() -> Self {
        Self::iso()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_default() {
        let roots = RootSet::default();
        assert!(roots.is_root("iso"));
        assert!(!roots.is_root("ccitt"));
        assert_eq!(roots.prefix("iso"), Some(&[1][..]));
        assert_eq!(roots.global_prefix(), &[1]);
    }

    #[test]
    fn test_standard_roots() {
        let roots = RootSet::standard();
        let names: Vec<_> = roots.names().collect();
        assert_eq!(names, ["ccitt", "iso", "joint-iso-ccitt"]);
        assert_eq!(roots.prefix("joint-iso-ccitt"), Some(&[2][..]));
    }

    #[test]
    fn test_custom_root_with_multi_arc_prefix() {
        let roots = RootSet::iso().with_root("internet", vec![1, 3, 6, 1]);
        assert_eq!(roots.prefix("internet"), Some(&[1, 3, 6, 1][..]));
    }
}
