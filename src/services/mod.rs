pub mod activity;
pub mod cache;
pub mod clock;
pub mod executor;
pub mod remote;
pub mod reviews;
pub mod transitions;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;
