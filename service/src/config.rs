//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Connection manager configuration
//!
//! # Example
//!
//! ```
//! use switchyard_service::{ManagerConfig, PlatformWidth};
//!
//! let config = ManagerConfig::default()
//!     .with_platform(PlatformWidth::Bits32)
//!     .with_default_link_capacity(500);
//!
//! assert!(config.validate().is_ok());
//! ```

use crate::consts::{DEFAULT_LINK_CAPACITY, MIN_MAX_FRAME_SIZE, UNLIMITED_SESSION_FRAMES};

/// Addressable width of the host platform
///
/// Incoming session capacity is a byte count handed to the protocol engine, so
/// it must stay within the platform's signed size range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformWidth {
    /// 32-bit addressing
    Bits32,
    /// 64-bit addressing
    Bits64,
}

impl PlatformWidth {
    /// Width of the platform this binary was compiled for
    pub fn native() -> Self {
        if cfg!(target_pointer_width = "64") {
            PlatformWidth::Bits64
        } else {
            PlatformWidth::Bits32
        }
    }

    /// Largest incoming capacity the platform can represent
    pub fn size_limit(self) -> u64 {
        match self {
            PlatformWidth::Bits32 => i32::MAX as u64,
            PlatformWidth::Bits64 => i64::MAX as u64,
        }
    }

    /// Incoming capacity used when no session frame count is configured
    pub fn unlimited_capacity(self, max_frame_size: u32) -> u64 {
        match self {
            PlatformWidth::Bits32 => UNLIMITED_SESSION_FRAMES,
            PlatformWidth::Bits64 => {
                UNLIMITED_SESSION_FRAMES * u64::from(max_frame_size.max(MIN_MAX_FRAME_SIZE))
            }
        }
    }
}

impl Default for PlatformWidth {
    fn default() -> Self {
        Self::native()
    }
}

/// Connection manager configuration
///
/// Controls the defaults applied while resolving endpoint configuration and how
/// fatal startup failures terminate the process.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Platform width used for incoming capacity derivation
    pub platform: PlatformWidth,

    /// Link capacity applied when an endpoint configures none
    pub default_link_capacity: u32,

    /// Process exit code used when a listener fails to bind during the first start
    pub fatal_exit_code: i32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            platform: PlatformWidth::native(),
            default_link_capacity: DEFAULT_LINK_CAPACITY,
            fatal_exit_code: 1,
        }
    }
}

impl ManagerConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the platform width
    pub fn with_platform(mut self, platform: PlatformWidth) -> Self {
        self.platform = platform;
        self
    }

    /// Set the default link capacity
    pub fn with_default_link_capacity(mut self, capacity: u32) -> Self {
        self.default_link_capacity = capacity;
        self
    }

    /// Set the exit code for fatal startup failures
    pub fn with_fatal_exit_code(mut self, code: i32) -> Self {
        self.fatal_exit_code = code;
        self
    }

    /// Validate the configuration
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_link_capacity == 0 {
            return Err("default_link_capacity must be greater than 0".to_string());
        }

        if self.fatal_exit_code == 0 {
            return Err("fatal_exit_code must be non-zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ManagerConfig::default();
        assert_eq!(config.platform, PlatformWidth::native());
        assert_eq!(config.default_link_capacity, 250);
        assert_eq!(config.fatal_exit_code, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ManagerConfig::new()
            .with_platform(PlatformWidth::Bits32)
            .with_default_link_capacity(1000)
            .with_fatal_exit_code(3);

        assert_eq!(config.platform, PlatformWidth::Bits32);
        assert_eq!(config.default_link_capacity, 1000);
        assert_eq!(config.fatal_exit_code, 3);
    }

    #[test]
    fn test_validation() {
        let mut config = ManagerConfig::default();
        config.default_link_capacity = 0;
        assert!(config.validate().is_err());

        config.default_link_capacity = 10;
        config.fatal_exit_code = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_platform_limits() {
        assert_eq!(PlatformWidth::Bits32.size_limit(), 0x7FFF_FFFF);
        assert_eq!(PlatformWidth::Bits64.size_limit(), 0x7FFF_FFFF_FFFF_FFFF);
        assert_eq!(PlatformWidth::Bits32.unlimited_capacity(16384), 0x7FFF_FFFF);
        assert_eq!(
            PlatformWidth::Bits64.unlimited_capacity(16384),
            0x7FFF_FFFF * 16384
        );
    }
}
