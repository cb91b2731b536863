mod password;
mod slug;

pub use password::{hash_password, verify_password, PasswordError};
pub use slug::slugify;
