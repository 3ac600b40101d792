pub mod user;

pub use user::{NewUser, Permission, User};
