pub mod email;
pub mod identity_id;
pub mod password;
pub mod provider;
