pub mod diff;
pub mod openai;
pub mod review;

pub use diff::*;
pub use openai::*;
pub use review::*;
