//! Service layer: business workflows built on the repository traits

pub mod auth;
pub mod clock;
pub mod otp;
pub mod password;
pub mod token;

pub use auth::AuthService;
pub use clock::{Clock, SystemClock};
pub use otp::OtpLifecycle;
pub use password::BcryptPasswordHasher;
pub use token::JwtTokenIssuer;
