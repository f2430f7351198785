// Lightbox navigation over the items currently shown in the grid.
//
// Keys:
// - Escape: close
// - ArrowRight: next image
// - ArrowLeft: previous image
//
// Navigation stops at both ends; it does not wrap.

use std::sync::Arc;

use tracing::debug;

use crate::models::GalleryItem;

/// Keys the lightbox reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    Escape,
    ArrowRight,
    ArrowLeft,
}

impl LightboxKey {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Escape" => Some(Self::Escape),
            "ArrowRight" => Some(Self::ArrowRight),
            "ArrowLeft" => Some(Self::ArrowLeft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lightbox {
    items: Arc<Vec<GalleryItem>>,
    index: usize,
    open: bool,
}

impl Lightbox {
    pub fn new(items: Arc<Vec<GalleryItem>>) -> Self {
        Self {
            items,
            index: 0,
            open: false,
        }
    }

    /// Opens on the item with `id`. Returns false if no such item is shown.
    pub fn open(&mut self, id: &str) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(index) => {
                self.index = index;
                self.open = true;
                debug!(id, index, "opened lightbox");
                true
            }
            None => false,
        }
    }

    /// Opens on the item at a grid position.
    pub fn open_at(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.index = index;
        self.open = true;
        true
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn current(&self) -> Option<&GalleryItem> {
        if !self.open {
            return None;
        }
        self.items.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn has_prev(&self) -> bool {
        self.open && self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.open && self.index + 1 < self.items.len()
    }

    pub fn next(&mut self) -> Option<&GalleryItem> {
        if self.has_next() {
            self.index += 1;
        }
        self.current()
    }

    pub fn prev(&mut self) -> Option<&GalleryItem> {
        if self.has_prev() {
            self.index -= 1;
        }
        self.current()
    }

    /// Applies a key press. Keys are ignored while closed.
    pub fn handle_key(&mut self, key: LightboxKey) -> bool {
        if !self.open {
            return false;
        }
        match key {
            LightboxKey::Escape => self.close(),
            LightboxKey::ArrowRight => {
                self.next();
            }
            LightboxKey::ArrowLeft => {
                self.prev();
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lightbox(ids: &[&str]) -> Lightbox {
        let items = ids
            .iter()
            .map(|id| GalleryItem::new(*id, *id, "2024-01-01", "t", "f"))
            .collect();
        Lightbox::new(Arc::new(items))
    }

    #[test]
    fn test_open_by_id() {
        let mut lb = lightbox(&["a", "b", "c"]);
        assert!(lb.current().is_none());
        assert!(lb.open("b"));
        assert_eq!(lb.current().unwrap().id, "b");
        assert!(lb.has_prev());
        assert!(lb.has_next());
        assert!(!lb.open("zzz"));
        // A failed open leaves the lightbox where it was.
        assert_eq!(lb.current().unwrap().id, "b");
    }

    #[test]
    fn test_navigation_stops_at_ends() {
        let mut lb = lightbox(&["a", "b"]);
        lb.open("a");
        assert!(!lb.has_prev());
        assert_eq!(lb.prev().unwrap().id, "a");
        assert_eq!(lb.next().unwrap().id, "b");
        assert!(!lb.has_next());
        assert_eq!(lb.next().unwrap().id, "b");
    }

    #[test]
    fn test_keys() {
        let mut lb = lightbox(&["a", "b", "c"]);
        assert!(!lb.handle_key(LightboxKey::ArrowRight));

        lb.open_at(0);
        lb.handle_key(LightboxKey::ArrowRight);
        lb.handle_key(LightboxKey::ArrowRight);
        assert_eq!(lb.index(), 2);
        lb.handle_key(LightboxKey::ArrowLeft);
        assert_eq!(lb.current().unwrap().id, "b");

        lb.handle_key(LightboxKey::Escape);
        assert!(!lb.is_open());
        assert!(!lb.has_next());
        assert_eq!(LightboxKey::from_name("Escape"), Some(LightboxKey::Escape));
        assert_eq!(LightboxKey::from_name("Enter"), None);
    }

    #[test]
    fn test_empty() {
        let mut lb = lightbox(&[]);
        assert!(!lb.open_at(0));
        assert!(lb.next().is_none());
    }
}
