pub mod auth;
pub mod auth_otp;
pub mod health;
