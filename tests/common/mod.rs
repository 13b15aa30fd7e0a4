#![allow(dead_code)]

pub mod command;
pub mod file;
pub mod repository;

use twig::errors::TwigError;

/// Failure kind of a command error, panicking on unexpected failures
pub fn kind(error: anyhow::Error) -> TwigError {
    error
        .downcast::<TwigError>()
        .unwrap_or_else(|error| panic!("expected a user error, got: {:#}", error))
}
