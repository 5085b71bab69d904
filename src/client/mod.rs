//! GitHub client modules
//!
//! A thin REST/GraphQL client plus the higher-level operations the report
//! needs: walking a user's recent pushes and publishing to a gist.

pub mod api;
pub mod config;
pub mod error;
pub mod service;

pub use api::GithubApi;
pub use config::ClientConfig;
pub use error::ClientError;
pub use service::GithubService;
