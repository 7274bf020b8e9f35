//! Render-side transform scoping.
//!
//! The view never draws. It hands its matrix to a host [`RenderTarget`] inside
//! a [`TransformGuard`], which pops the matrix again when dropped, so every
//! push is matched by exactly one pop.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::ops::{Deref, DerefMut};

use glam::DAffine2;

/// A host drawing surface with a matrix stack.
pub trait RenderTarget {
    /// Save the current transform and multiply `matrix` onto it.
    fn push_transform(&mut self, matrix: &DAffine2);
    /// Restore the transform saved by the matching push.
    fn pop_transform(&mut self);
}

/// Scoped transform: pushed on creation, popped on drop.
///
/// Derefs to the target so drawing happens through the guard while the
/// transform is in effect.
pub struct TransformGuard<'a, T: RenderTarget + ?Sized> {
    target: &'a mut T,
}

impl<'a, T: RenderTarget + ?Sized> TransformGuard<'a, T> {
    pub fn new(target: &'a mut T, matrix: &DAffine2) -> Self {
        target.push_transform(matrix);
        Self { target }
    }
}

impl<T: RenderTarget + ?Sized> Deref for TransformGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: RenderTarget + ?Sized> DerefMut for TransformGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: RenderTarget + ?Sized> Drop for TransformGuard<'_, T> {
    fn drop(&mut self) {
        self.target.pop_transform();
    }
}

/// Software matrix stack for hosts without one of their own.
#[derive(Debug, Clone, Default)]
pub struct MatrixStack {
    current: DAffine2,
    saved: Vec<DAffine2>,
}

impl MatrixStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Composed transform currently in effect.
    #[must_use]
    pub fn current(&self) -> DAffine2 {
        self.current
    }

    /// Number of pushes not yet popped.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

impl RenderTarget for MatrixStack {
    fn push_transform(&mut self, matrix: &DAffine2) {
        self.saved.push(self.current);
        self.current = self.current * *matrix;
    }

    fn pop_transform(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }
}
