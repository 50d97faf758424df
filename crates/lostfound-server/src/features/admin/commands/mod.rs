pub mod create_user;

pub use create_user::{CreateUserCommand, CreateUserError, CreateUserResponse};
