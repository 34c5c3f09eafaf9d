pub mod claims;
pub mod codec;
pub mod error;
pub mod extractors;
pub mod policy;
pub mod roles;

pub use claims::Claims;
pub use codec::{SignedToken, TokenCodec, TokenConfig};
pub use error::{AuthError, AuthResult};
pub use extractors::{parse_bearer, BearerToken};
pub use policy::AccessPolicy;
pub use roles::{Role, UnknownRole};
