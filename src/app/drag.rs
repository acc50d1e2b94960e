use crate::model::structs::Point;

/// Pointer bookkeeping for moving the popup around
#[derive(Debug, Default, Clone)]
pub struct DragTracker {
    /// Pointer position relative to the element's top-left while dragging
    grab_offset: Option<Point>,
}

impl DragTracker {
    pub fn begin(&mut self, pointer: Point, element_origin: Point) {
        self.grab_offset = Some(Point::new(
            pointer.x - element_origin.x,
            pointer.y - element_origin.y,
        ));
    }

    /// New top-left for the element, or `None` when no drag is in progress
    pub fn update(&self, pointer: Point) -> Option<Point> {
        self.grab_offset
            .map(|offset| Point::new(pointer.x - offset.x, pointer.y - offset.y))
    }

    pub fn end(&mut self) {
        self.grab_offset = None;
    }
}
