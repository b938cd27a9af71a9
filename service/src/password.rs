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

//! SSL password resolution
//!
//! A configured password is one of:
//!
//! - `env:NAME` - the value of environment variable `NAME`
//! - `literal:TEXT` - `TEXT` verbatim, used when the password itself starts
//!   with `env:`
//! - anything else - used as-is
//!
//! Leading spaces after either prefix are skipped. A password may also be read
//! from a file when no inline value is configured.

use crate::consts::PASSWORD_FILE_MAX;
use crate::{ManagerError, Result};
use std::io::Read;
use std::path::Path;

const ENV_PREFIX: &str = "env:";
const LITERAL_PREFIX: &str = "literal:";

/// Where the plaintext of a configured password comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    /// Read from the named environment variable
    EnvRef(String),
    /// Prefix stripped, remainder used verbatim
    Literal(String),
    /// No recognized prefix
    Plain(String),
}

impl PasswordSource {
    /// Classify a configured password value
    pub fn parse(raw: &str) -> Self {
        if let Some(var) = raw.strip_prefix(ENV_PREFIX) {
            PasswordSource::EnvRef(var.trim_start_matches(' ').to_string())
        } else if let Some(text) = raw.strip_prefix(LITERAL_PREFIX) {
            PasswordSource::Literal(text.trim_start_matches(' ').to_string())
        } else {
            PasswordSource::Plain(raw.to_string())
        }
    }

    /// Produce the plaintext password
    ///
    /// Fails with [`ManagerError::NotFound`] when an environment reference names
    /// a variable that is not set.
    pub fn resolve(&self) -> Result<String> {
        match self {
            PasswordSource::EnvRef(var) => std::env::var(var).map_err(|_| {
                ManagerError::NotFound(format!("Password environment variable '{}'", var))
            }),
            PasswordSource::Literal(text) | PasswordSource::Plain(text) => Ok(text.clone()),
        }
    }
}

/// Read a password from the first line of a file
///
/// At most 199 bytes are read, stopping at the first newline. Returns `None` if
/// the file cannot be opened or read, if the first line is empty, or if it is
/// not valid UTF-8.
pub fn read_password_file(path: impl AsRef<Path>) -> Option<String> {
    let file = std::fs::File::open(path.as_ref()).ok()?;
    let mut buffer = Vec::with_capacity(PASSWORD_FILE_MAX);
    file.take(PASSWORD_FILE_MAX as u64)
        .read_to_end(&mut buffer)
        .ok()?;

    if let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
        buffer.truncate(newline);
    }

    if buffer.is_empty() {
        None
    } else {
        String::from_utf8(buffer).ok()
    }
}

/// Resolve a configured password, keeping the raw value when resolution fails
///
/// The failure is logged and otherwise tolerated so that profile creation can
/// proceed.
pub fn resolve_password(raw: String) -> String {
    match PasswordSource::parse(&raw).resolve() {
        Ok(plaintext) => plaintext,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to find a password in the environment variable");
            raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_variants() {
        assert_eq!(
            PasswordSource::parse("env:  SECRET"),
            PasswordSource::EnvRef("SECRET".to_string())
        );
        assert_eq!(
            PasswordSource::parse("literal: secret123"),
            PasswordSource::Literal("secret123".to_string())
        );
        assert_eq!(
            PasswordSource::parse("hunter2"),
            PasswordSource::Plain("hunter2".to_string())
        );
        // Prefixes are case sensitive and anchored
        assert_eq!(
            PasswordSource::parse("ENV:X"),
            PasswordSource::Plain("ENV:X".to_string())
        );
    }

    #[test]
    fn test_literal_protects_env_prefix() {
        let source = PasswordSource::parse("literal:env:NOT_A_VAR");
        assert_eq!(source.resolve().unwrap(), "env:NOT_A_VAR");
    }

    /// Any variable already present in the process environment
    fn existing_env_var() -> (String, String) {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .find(|(name, value)| !name.is_empty() && !name.starts_with(' ') && !value.is_empty())
            .expect("process environment has no usable variables")
    }

    #[test]
    fn test_env_resolution() {
        let (name, value) = existing_env_var();
        assert_eq!(
            PasswordSource::parse(&format!("env:  {}", name)).resolve().unwrap(),
            value
        );

        let err = PasswordSource::parse("env: SWITCHYARD_PW_UNIT_UNSET")
            .resolve()
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_resolve_password_keeps_raw_on_failure() {
        assert_eq!(
            resolve_password("env:SWITCHYARD_PW_UNIT_MISSING".to_string()),
            "env:SWITCHYARD_PW_UNIT_MISSING"
        );
        assert_eq!(resolve_password("literal:abc".to_string()), "abc");
    }

    #[test]
    fn test_read_password_file_first_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "s3cret\nsecond line\n").unwrap();
        assert_eq!(read_password_file(file.path()).as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_read_password_file_rejects_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, b'a', b'\n']).unwrap();
        assert_eq!(read_password_file(file.path()), None);
    }

    #[test]
    fn test_read_password_file_limits_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", "x".repeat(500)).unwrap();
        assert_eq!(read_password_file(file.path()).unwrap().len(), 199);
    }

    #[test]
    fn test_read_password_file_empty_or_missing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\nignored").unwrap();
        assert_eq!(read_password_file(file.path()), None);
        assert_eq!(read_password_file("/nonexistent/switchyard/password"), None);
    }
}
