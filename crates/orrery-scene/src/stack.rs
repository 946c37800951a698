//! Matrix stack used while walking the body hierarchy.

use glam::{Mat4, Vec3};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StackError {
    /// `pop` would remove the baseline matrix.
    #[error("transform stack underflow: the baseline matrix cannot be popped")]
    Underflow,
}

/// A stack of 4x4 matrices. Operations right-multiply the top, so the most
/// recently applied transform acts first on geometry.
///
/// The stack never becomes empty: it starts with one baseline matrix and
/// refuses to pop it.
#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Mat4>,
}

impl TransformStack {
    pub fn new(baseline: Mat4) -> Self {
        let mut stack = Vec::with_capacity(8);
        stack.push(baseline);
        Self { stack }
    }

    /// Drop everything and start again from `baseline`.
    pub fn reset(&mut self, baseline: Mat4) {
        self.stack.clear();
        self.stack.push(baseline);
    }

    pub fn top(&self) -> Mat4 {
        self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Duplicate the top matrix.
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    pub fn pop(&mut self) -> Result<Mat4, StackError> {
        if self.stack.len() <= 1 {
            return Err(StackError::Underflow);
        }
        self.stack.pop().ok_or(StackError::Underflow)
    }

    pub fn multiply(&mut self, m: Mat4) {
        let top = self.top_mut();
        *top *= m;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.multiply(Mat4::from_translation(offset));
    }

    pub fn rotate_x(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_x(degrees.to_radians()));
    }

    pub fn rotate_y(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_y(degrees.to_radians()));
    }

    pub fn rotate_z(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_z(degrees.to_radians()));
    }

    /// Pop back down to `depth`, never below the baseline.
    pub fn restore(&mut self, depth: usize) {
        self.stack.truncate(depth.max(1));
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_duplicates_top() {
        let base = Mat4::from_translation(Vec3::new(0.0, 0.0, -11.0));
        let mut stack = TransformStack::new(base);
        stack.push();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top(), base);
    }

    #[test]
    fn test_pop_restores_previous() {
        let mut stack = TransformStack::default();
        stack.push();
        stack.translate(Vec3::X);
        stack.rotate_z(30.0);
        let popped = stack.pop().unwrap();
        assert_ne!(popped, Mat4::IDENTITY);
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }

    #[test]
    fn test_baseline_pop_refused() {
        let mut stack = TransformStack::default();
        assert_eq!(stack.pop(), Err(StackError::Underflow));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_right_multiplication_order() {
        let mut stack = TransformStack::default();
        stack.rotate_z(90.0);
        stack.translate(Vec3::X);
        // Translate acts first, then the rotation carries +X onto +Y.
        let p = stack.top().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_restore_unwinds_nested_pushes() {
        let mut stack = TransformStack::default();
        let mark = stack.depth();
        stack.push();
        stack.rotate_x(45.0);
        stack.push();
        stack.rotate_y(10.0);
        assert_eq!(stack.depth(), 3);
        stack.restore(mark);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Mat4::IDENTITY);

        stack.restore(0);
        assert_eq!(stack.depth(), 1);
    }
}
