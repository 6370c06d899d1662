//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Keep the server on loopback
//! - Validate value ranges (chunk sizes, line caps)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::HarnessConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("server.bind_address '{0}' is not a loopback address")]
    NotLoopback(String),

    #[error("server.max_line_bytes must be greater than zero")]
    ZeroLineCap,

    #[error("server.max_head_bytes ({head}) must be at least server.max_line_bytes ({line})")]
    HeadCapBelowLineCap { head: usize, line: usize },

    #[error("client.upload_chunk_bytes must be greater than zero")]
    ZeroChunkSize,

    #[error("client.path '{0}' must start with '/'")]
    RelativePath(String),
}

pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.server.bind_address.parse::<SocketAddr>() {
        Ok(addr) if !addr.ip().is_loopback() => {
            errors.push(ValidationError::NotLoopback(config.server.bind_address.clone()));
        }
        Ok(_) => {}
        Err(_) => {
            errors.push(ValidationError::InvalidBindAddress(
                config.server.bind_address.clone(),
            ));
        }
    }

    if config.server.max_line_bytes == 0 {
        errors.push(ValidationError::ZeroLineCap);
    }

    if config.server.max_head_bytes < config.server.max_line_bytes {
        errors.push(ValidationError::HeadCapBelowLineCap {
            head: config.server.max_head_bytes,
            line: config.server.max_line_bytes,
        });
    }

    if config.client.upload_chunk_bytes == 0 {
        errors.push(ValidationError::ZeroChunkSize);
    }

    if !config.client.path.starts_with('/') {
        errors.push(ValidationError::RelativePath(config.client.path.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
