//! Single-slot holder for the record shown in the detail view.

use crate::record::PaperId;

/// At most one active record; selecting again replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active: Option<PaperId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: PaperId) {
        self.active = Some(id);
    }

    /// Dismiss the detail view (close button, overlay or background click).
    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&PaperId> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
