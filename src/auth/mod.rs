//! Authentication: credential hashing, bearer tokens and caller resolution.

mod gateway;
pub mod password;
pub mod token;

pub use gateway::AuthGateway;
pub use password::{CredentialHasher, MIN_PASSWORD_LENGTH};
pub use token::{Claims, TokenService};
