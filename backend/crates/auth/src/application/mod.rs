pub mod change_password;
pub mod claims;
pub mod config;
pub mod link_oauth;
pub mod login;
pub mod profile;
pub mod register;
pub mod request_reset;
pub mod reset_password;
pub mod verify_otp;
