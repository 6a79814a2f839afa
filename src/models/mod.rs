pub mod combo;

pub use combo::*;
