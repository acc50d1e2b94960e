use std::cell::Cell;

use crate::interface::NavView;

/// Hamburger menu: flips `aria-expanded` and the menu's `active` class together
pub struct NavToggle<V> {
    view: V,
    expanded: Cell<bool>,
}

impl<V: NavView> NavToggle<V> {
    pub fn new(view: V, expanded: bool) -> Self {
        Self {
            view,
            expanded: Cell::new(expanded),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    pub fn toggle(&self) {
        let expanded = !self.expanded.get();
        self.expanded.set(expanded);
        self.view.set_expanded(expanded);
    }
}
