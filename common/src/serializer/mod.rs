mod rlp;

pub use rlp::*;
