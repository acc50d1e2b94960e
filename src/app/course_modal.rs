//! "Know more" modal for the course tiles

use std::cell::Cell;

use crate::catalog;
use crate::interface::ModalView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    /// Button on a tile; carries the tile's visible title
    KnowMore(String),
    CloseIcon,
    OutsideClick,
    KeyDown(String),
}

pub struct CourseModal<V> {
    view: V,
    /// Course currently shown, if the modal is open
    shown: Cell<Option<&'static str>>,
}

impl<V: ModalView> CourseModal<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            shown: Cell::new(None),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn shown(&self) -> Option<&'static str> {
        self.shown.get()
    }

    pub fn handle(&self, event: ModalEvent) {
        match event {
            ModalEvent::KnowMore(title) => self.open(&title),
            ModalEvent::CloseIcon | ModalEvent::OutsideClick => self.close(),
            ModalEvent::KeyDown(key) if key == "Escape" => self.close(),
            ModalEvent::KeyDown(_) => {}
        }
    }

    /// Fill and show the modal; unknown titles leave everything as it was
    pub fn open(&self, title: &str) {
        let Some((name, detail)) = catalog::lookup(title) else {
            log::debug!("No course details for {title:?}");
            return;
        };

        self.view.fill(name, detail);
        self.view.set_visible(true);
        self.shown.set(Some(name));
    }

    pub fn close(&self) {
        if self.shown.take().is_some() {
            self.view.set_visible(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::COURSES;
    use crate::testing::RecordingModalView;

    #[test]
    fn every_course_fills_all_five_fields() {
        for (name, detail) in COURSES {
            let modal = CourseModal::new(RecordingModalView::default());
            modal.handle(ModalEvent::KnowMore(format!("  {name} ")));

            let filled = modal.view().filled.borrow().clone().unwrap();
            assert_eq!(filled.0, *name);
            assert_eq!(filled.1.description, detail.description);
            assert_eq!(filled.1.eligibility, detail.eligibility);
            assert_eq!(filled.1.duration, detail.duration);
            assert_eq!(filled.1.admission_process, detail.admission_process);
            assert_eq!(filled.1.fees, detail.fees);
            assert!(modal.view().visible.get());
            assert_eq!(modal.shown(), Some(*name));
        }
    }

    #[test]
    fn unknown_course_leaves_modal_untouched() {
        let modal = CourseModal::new(RecordingModalView::default());
        modal.open("MBA");
        modal.open("Diploma in Astrology");

        assert_eq!(modal.view().fills.get(), 1);
        assert_eq!(modal.view().filled.borrow().as_ref().unwrap().0, "MBA");
        assert!(modal.view().visible.get());
        assert_eq!(modal.shown(), Some("MBA"));

        let closed = CourseModal::new(RecordingModalView::default());
        closed.open("Diploma in Astrology");
        assert_eq!(closed.view().fills.get(), 0);
        assert!(!closed.view().visible.get());
        assert_eq!(closed.shown(), None);
    }

    #[test]
    fn three_ways_to_dismiss() {
        let dismissals = [
            ModalEvent::CloseIcon,
            ModalEvent::OutsideClick,
            ModalEvent::KeyDown("Escape".to_string()),
        ];
        for dismissal in dismissals {
            let modal = CourseModal::new(RecordingModalView::default());
            modal.open("BCA");
            modal.handle(dismissal);
            assert!(!modal.view().visible.get());
            assert_eq!(modal.shown(), None);
        }
    }

    #[test]
    fn other_keys_keep_it_open() {
        let modal = CourseModal::new(RecordingModalView::default());
        modal.open("MCA");
        modal.handle(ModalEvent::KeyDown("Enter".to_string()));
        assert!(modal.view().visible.get());
    }
}
