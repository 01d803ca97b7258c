//! Motion core: the clock, smooth scrolling, scroll triggers and the
//! effects built on them.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Units are
//! abstract "scroll units" and "horizontal units"; the page maps them to
//! terminal rows and columns.  Everything is single-threaded: shared objects
//! are `Rc<RefCell<_>>` owned by a [`context::MotionContext`].

pub mod carousel;
pub mod clock;
pub mod context;
pub mod easing;
pub mod emitter;
pub mod magnetic;
pub mod pin;
pub mod props;
pub mod scroll;
pub mod timeline;
pub mod timer;
pub mod trigger;
pub mod tween;
