pub mod commit;
pub mod input;
pub mod refs;

pub use commit::*;
pub use input::*;
pub use refs::*;
