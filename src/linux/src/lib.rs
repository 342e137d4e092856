mod cap_user;
mod capability;
pub mod proc;

pub use cap_user::*;
pub use capability::*;
