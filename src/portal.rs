//! The shared root that overlays portal into.
//!
//! Overlays are owned by whoever created them (a list row, the toast
//! service) but paint from the root, above everything else. The root only
//! records which mount nodes are attached and in what order; it never owns the
//! components themselves.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MountKind {
    Menu,
    Toast,
}

/// Identity of a mountable node. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId {
    kind: MountKind,
    seq: u64,
}

impl MountId {
    pub fn new(kind: MountKind) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self {
            kind,
            seq: COUNTER.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn kind(&self) -> MountKind {
        self.kind
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            MountKind::Menu => "menu",
            MountKind::Toast => "toast",
        };
        write!(f, "{kind}#{}", self.seq)
    }
}

/// Attachment point shared by every overlay. Later layers paint on top.
#[derive(Debug, Default, Clone)]
pub struct PortalRoot {
    layers: Vec<MountId>,
}

impl PortalRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` on top. Attaching an attached node is a no-op.
    pub fn attach(&mut self, id: MountId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.layers.push(id);
        true
    }

    /// Remove `id`. Detaching a detached node is a no-op.
    pub fn detach(&mut self, id: MountId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|layer| *layer != id);
        self.layers.len() != before
    }

    pub fn contains(&self, id: MountId) -> bool {
        self.layers.contains(&id)
    }

    pub fn layers(&self) -> &[MountId] {
        &self.layers
    }

    pub fn count(&self, kind: MountKind) -> usize {
        self.layers.iter().filter(|id| id.kind == kind).count()
    }

    /// Detach every node of `kind` for which `keep` returns `false`.
    /// Returns the detached ids.
    pub fn sweep<F>(&mut self, kind: MountKind, mut keep: F) -> Vec<MountId>
    where
        F: FnMut(MountId) -> bool,
    {
        let mut removed = Vec::new();
        self.layers.retain(|id| {
            if id.kind != kind || keep(*id) {
                true
            } else {
                removed.push(*id);
                false
            }
        });
        removed
    }
}

/// Something that can be re-parented into the [`PortalRoot`].
pub trait Mountable {
    fn mount_id(&self) -> MountId;

    fn attach_to(&self, root: &mut PortalRoot) -> bool {
        root.attach(self.mount_id())
    }

    fn detach_from(&self, root: &mut PortalRoot) -> bool {
        root.detach(self.mount_id())
    }

    fn is_mounted(&self, root: &PortalRoot) -> bool {
        root.contains(self.mount_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_and_detach_are_idempotent() {
        let mut root = PortalRoot::new();
        let id = MountId::new(MountKind::Menu);
        assert!(root.attach(id));
        assert!(!root.attach(id));
        assert_eq!(root.layers(), &[id]);
        assert!(root.detach(id));
        assert!(!root.detach(id));
        assert!(root.layers().is_empty());
    }

    #[test]
    fn layers_keep_attach_order() {
        let mut root = PortalRoot::new();
        let a = MountId::new(MountKind::Toast);
        let b = MountId::new(MountKind::Menu);
        let c = MountId::new(MountKind::Toast);
        root.attach(a);
        root.attach(b);
        root.attach(c);
        root.detach(b);
        assert_eq!(root.layers(), &[a, c]);
        assert_eq!(root.count(MountKind::Toast), 2);
    }

    #[test]
    fn sweep_only_touches_requested_kind() {
        let mut root = PortalRoot::new();
        let menu = MountId::new(MountKind::Menu);
        let keep = MountId::new(MountKind::Toast);
        let orphan = MountId::new(MountKind::Toast);
        root.attach(menu);
        root.attach(keep);
        root.attach(orphan);
        let removed = root.sweep(MountKind::Toast, |id| id == keep);
        assert_eq!(removed, vec![orphan]);
        assert_eq!(root.layers(), &[menu, keep]);
    }

    #[test]
    fn ids_are_unique_and_display_their_kind() {
        let a = MountId::new(MountKind::Toast);
        let b = MountId::new(MountKind::Toast);
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("toast#"));
    }
}
