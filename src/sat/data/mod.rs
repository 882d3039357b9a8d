mod litvec;
mod varvec;

pub use litvec::{LitVec, Remaining};
pub use varvec::VarVec;
