//! multi-repo-sync: promote a branch across a fleet of GitHub repositories
//!
//! For every configured repository the pipeline checks that both branches
//! exist, opens a pull request from `origin` into `target`, merges it and
//! optionally cuts a release from the merge commit. Each repository fails
//! independently; failures are collected per stage and reported at the end.

pub mod auth;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod types;
