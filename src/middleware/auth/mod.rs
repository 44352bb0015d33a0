pub mod access;
pub mod context;
