//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, zeroized clear text)
//! - Signed bearer tokens (JWT, HS256)
//! - Cookie management
//! - One-time password codes
//! - Outbound mail delivery boundary
//! - Blob store boundary for media uploads

pub mod cookie;
pub mod mailer;
pub mod media;
pub mod otp;
pub mod password;
pub mod token;
