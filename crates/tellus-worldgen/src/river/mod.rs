//! River carving.
//!
//! Rivers are straight segments from high ground toward water, with shorter
//! tributaries that end on their parent. Each carves three nested profiles:
//! a wide valley that lowers land toward a bank height, banks that fall to the
//! bed, and the bed itself.

mod channel;
mod line;
mod network;

pub use channel::{River, RiverShape, RiverTags};
pub use line::Line;
pub use network::{RiverNetwork, Rivers};
