//! UI surface seam.
//!
//! The front-end toolkit lives outside this crate; everything the
//! control layer needs from it is expressed by the [`UiSurface`] trait.

mod surface;

pub use surface::{CollectingSurface, LoggingSurface, NoOpSurface, SurfaceUpdate, UiSurface};
