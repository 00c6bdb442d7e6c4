pub mod session;
pub mod vault;
