use glam::Vec2;

/// Pointer input accumulated between frames and applied to the orbit camera.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraInput {
    /// Drag distance in physical pixels while the rotate button is held.
    pub drag: Vec2,
    /// Wheel notches; positive zooms in.
    pub wheel: f32,
}

impl CameraInput {
    pub fn add_drag(&mut self, delta: Vec2) {
        self.drag += delta;
    }

    pub fn add_wheel(&mut self, notches: f32) {
        self.wheel += notches;
    }

    pub fn is_empty(&self) -> bool {
        self.drag == Vec2::ZERO && self.wheel == 0.0
    }

    /// Return the accumulated input and reset the accumulator.
    pub fn take(&mut self) -> CameraInput {
        std::mem::take(self)
    }
}
