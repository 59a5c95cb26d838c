//! Convert module - Scalar and collection converters.
//!
//! Stateless helpers between the generic configuration representation and
//! typed API values: string maps, byte maps, base64, optional wrappers,
//! resource quantities and access modes.

mod access_modes;
mod maps;
mod quantity;
mod resources;

pub use access_modes::*;
pub use maps::*;
pub use quantity::*;
pub use resources::*;
