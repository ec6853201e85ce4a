//! Application services - orchestrate ports on behalf of the HTTP layer.

mod accounts;
mod posts;

#[cfg(test)]
mod fakes;

pub use accounts::AccountService;
pub use posts::PostService;
