//! Pan/zoom viewport controller.
//!
//! A [`engine::ScrollView`] maps a large content rectangle into a smaller window
//! rectangle. Hosts feed it pointer events (single-contact drags, two-contact
//! pinches, double-taps, mouse buttons) and call [`engine::ScrollView::update`]
//! once per frame. Each update produces the scroll rect and a 2D affine render
//! matrix that the host applies when drawing content. Nothing here draws; the
//! host owns the window and the graphics context.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`engine::ScrollView`] orchestrator and its per-frame update |
//! | [`geometry`] | Points, rects and the pure scroll/zoom rect math |
//! | [`input`] | Contact tracking and gesture classification |
//! | [`scroll`] | Drag, momentum, bounce-back and easing physics |
//! | [`zoom`] | Scale bounds, pinch mapping and animated zoom |
//! | [`render`] | Scoped transform push/pop against a host render target |
//! | [`clock`] | Time source for animations and double-tap timing |
//! | [`config`] | Tunables, JSON loading and environment overrides |
//! | [`consts`] | Shared numeric defaults |

pub mod clock;
pub mod config;
pub mod consts;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod render;
pub mod scroll;
pub mod zoom;

pub use engine::ScrollView;
pub use geometry::{Point, Rect};
