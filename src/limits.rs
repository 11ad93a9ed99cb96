//! Limits for XSD conversion
//!
//! This module defines limits that keep pathological sources (huge files,
//! runaway nesting, include cycles) from exhausting resources.

use crate::error::{Error, Result};

/// Limits configuration
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum XSD file size in bytes
    pub max_source_size: usize,

    /// Maximum element nesting depth visited by the traversal
    pub max_depth: usize,

    /// Maximum include/import chain length
    pub max_include_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_source_size: 50 * 1024 * 1024, // 50 MB
            max_depth: 512,
            max_include_depth: 32,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_source_size: 5 * 1024 * 1024, // 5 MB
            max_depth: 64,
            max_include_depth: 8,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_source_size: 1024 * 1024 * 1024, // 1 GB
            max_depth: 4096,
            max_include_depth: 256,
        }
    }

    /// Check if a source file size is within limits
    pub fn check_source_size(&self, size: usize) -> Result<()> {
        if size > self.max_source_size {
            Err(Error::LimitExceeded(format!(
                "XSD size {} bytes exceeds maximum {} bytes",
                size, self.max_source_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if a traversal depth is within limits
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            Err(Error::LimitExceeded(format!(
                "nesting depth {} exceeds maximum {}",
                depth, self.max_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if an include chain is within limits
    pub fn check_include_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_include_depth {
            Err(Error::LimitExceeded(format!(
                "include depth {} exceeds maximum {}",
                depth, self.max_include_depth
            )))
        } else {
            Ok(())
        }
    }
}
