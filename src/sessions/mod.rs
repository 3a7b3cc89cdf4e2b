mod store;
mod token;

pub use store::{SessionLookup, SessionStore, SESSION_COOKIE};
