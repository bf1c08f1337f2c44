//! Single-instance modal slots.
//!
//! Each trigger path owns one slot. A slot holds at most one payload; opening an occupied
//! slot is refused (or, for [`ModalSlot::replace`], swaps the payload in one step) so rapid
//! double triggers never stack overlays.

use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ModalSlot<T> {
    current: Option<T>,
}

impl<T> Default for ModalSlot<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T: std::fmt::Debug> ModalSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open with `payload` unless already open. Returns whether the modal was opened.
    pub fn open(&mut self, payload: T) -> bool {
        if let Some(existing) = &self.current {
            debug!("Modal already open with {:?}, ignoring {:?}", existing, payload);
            return false;
        }
        self.current = Some(payload);
        true
    }

    /// Destroy the current modal (if any) and open `payload` in its place.
    pub fn replace(&mut self, payload: T) -> Option<T> {
        self.current.replace(payload)
    }

    pub fn close(&mut self) -> Option<T> {
        self.current.take()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

impl<T: PartialEq + std::fmt::Debug> ModalSlot<T> {
    /// Close only if the slot currently shows `payload`.
    pub fn close_if(&mut self, payload: &T) -> bool {
        if self.current.as_ref() == Some(payload) {
            self.current = None;
            true
        } else {
            false
        }
    }
}

/// Whether a click landed on the backdrop itself rather than on something inside it.
///
/// `target` is the element the click originated from and `backdrop` the overlay element.
/// A missing side (unmounted overlay, non-element target) never counts as a backdrop click.
pub fn is_backdrop_click<E: PartialEq>(target: Option<&E>, backdrop: Option<&E>) -> bool {
    matches!((target, backdrop), (Some(target), Some(backdrop)) if target == backdrop)
}
