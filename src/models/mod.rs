pub mod contract;
pub mod user;

pub use contract::*;
pub use user::*;
