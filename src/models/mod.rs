pub mod check_in;
pub mod enums;

pub use check_in::*;
pub use enums::*;
