//! Server-rendered account registration form.
//!
//! One page, `/sign-up`, collects username, email, password, confirmation and
//! consent, validates them, hands valid input to the external registration
//! endpoint and renders whatever field errors it sends back.

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod registrar;
pub mod templates_structs;
