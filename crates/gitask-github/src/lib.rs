//! Authenticated access to the GitHub REST API.
//!
//! [`GithubClient::call`] is the raw transport; the [`GithubApi`] trait is the
//! typed surface the query engine depends on.

pub mod api;
pub mod client;
pub mod error;
pub mod models;

pub use api::{GithubApi, ListReposQuery, RepoSort};
pub use client::{GithubClient, RequestOptions, GITHUB_ACCEPT, GITHUB_API_URL};
pub use error::GithubError;
pub use models::*;
