pub mod oauth;
pub mod postgres;
