//! Repository interfaces and their in-memory reference implementations.

pub mod lockout;
pub mod otp;
pub mod user;

pub use lockout::{InMemoryLockoutRepository, LockoutRepository};
pub use otp::{InMemoryOtpRepository, OtpRepository};
pub use user::{InMemoryUserRepository, UserRepository};
