//! Core repository components
//!
//! This module contains the areas a repository is made of:
//!
//! - `database`: Content store for blobs and commits
//! - `stage`: Staging area of pending additions and removals
//! - `refs`: Branch registry and HEAD
//! - `remotes`: Registry of remote repositories
//! - `repository`: Context object owning every area
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod refs;
pub mod remotes;
pub mod repository;
pub mod stage;
pub mod workspace;
