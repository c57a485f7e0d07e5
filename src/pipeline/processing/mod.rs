//! The matching stages, in pipeline order.

pub mod size;
pub mod normalize;
pub mod expand;
pub mod exact;
pub mod brands;
pub mod alias;
pub mod merge;
pub mod similarity;
