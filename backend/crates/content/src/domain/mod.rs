pub mod entity;
pub mod id;
pub mod repository;
