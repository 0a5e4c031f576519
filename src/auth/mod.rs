pub mod csrf;
pub mod validate;
