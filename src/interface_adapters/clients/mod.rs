pub mod authority;

pub use authority::{AuthorityClient, AuthorityClientError};
