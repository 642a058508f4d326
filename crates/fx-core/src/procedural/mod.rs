//! Pure procedural generators used by specific effect handlers.
//!
//! Nothing here touches engine-wide state; each generator is data in,
//! geometry out, rendered through the abstract [`crate::surface::Surface`].

pub mod crack;
pub mod lattice;
pub mod noise;
pub mod textrain;
