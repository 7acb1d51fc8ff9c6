pub mod compare;
pub mod highlight;
pub mod normalize;

pub use compare::{compare, compare_with, Alignment, WordMark};
pub use highlight::render;
pub use normalize::normalize;
