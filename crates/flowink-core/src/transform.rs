//! Canvas view transform.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Uniform scale followed by a translation, mapping canvas (model)
/// coordinates to container pixels.
///
/// The canvas overlay and every layer that tracks the canvas carry
/// [`ViewTransform::affine`]; drag-and-drop maps the pointer back with
/// [`ViewTransform::container_to_canvas`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Position of the canvas origin in the container.
    pub offset: Vec2,
    /// Container pixels per canvas unit.
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { offset: Vec2::ZERO, scale: 1.0 }
    }
}

impl ViewTransform {
    /// Identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas to container.
    pub fn affine(&self) -> Affine {
        Affine::scale(self.scale).then_translate(self.offset)
    }

    /// Map a container point (for example a pointer position) onto the canvas.
    pub fn container_to_canvas(&self, point: Point) -> Point {
        ((point - self.offset).to_vec2() / self.scale).to_point()
    }

    /// Shift the canvas origin by `delta` container pixels.
    pub fn translate(&mut self, delta: Vec2) {
        self.offset += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let transform = ViewTransform::new();
        let p = Point::new(100.0, 200.0);
        assert_eq!(transform.container_to_canvas(p), p);
        assert_eq!(transform.affine(), Affine::IDENTITY);
    }

    #[test]
    fn test_pointer_maps_back_onto_canvas() {
        let transform = ViewTransform { offset: Vec2::new(50.0, 100.0), scale: 2.0 };
        let canvas = Point::new(50.0, 100.0);

        let container = transform.affine() * canvas;
        assert_eq!(container, Point::new(150.0, 300.0));

        let back = transform.container_to_canvas(container);
        assert!((back - canvas).hypot() < 1e-10);
    }

    #[test]
    fn test_translate_accumulates() {
        let mut transform = ViewTransform::new();
        transform.translate(Vec2::new(10.0, -5.0));
        transform.translate(Vec2::new(2.0, 5.0));
        assert_eq!(transform.offset, Vec2::new(12.0, 0.0));
        assert_eq!(transform.affine() * Point::ZERO, Point::new(12.0, 0.0));
    }
}
