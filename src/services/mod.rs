pub mod account_service;
pub mod otp_service;
pub mod password;
pub mod token;

pub use account_service::AccountService;
pub use otp_service::{OTPService, OtpSessionStore, SingleSlotStore};
pub use password::{BcryptHasher, PasswordHasher};
pub use token::TokenIssuer;
