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

//! SSL profiles
//!
//! A profile is a named bundle of TLS credentials and trust material. Endpoint
//! configuration refers to profiles by name and copies their fields at
//! resolution time, so deleting a profile never affects endpoints that already
//! exist.

use crate::password::{read_password_file, resolve_password};
use crate::types::ProfileId;
use crate::Result;
use dashmap::DashMap;
use metrics::gauge;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use switchyard_entity::Entity;
use tracing::{error, info, instrument};

/// TLS credential fields shared by profiles and resolved endpoint configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SslCredentials {
    /// Certificate file path
    pub certificate_file: Option<String>,
    /// Private key file path
    pub private_key_file: Option<String>,
    /// Private key password, in plaintext once resolved
    pub password: Option<String>,
    /// Trusted CA database path
    pub trusted_certificate_db: Option<String>,
    /// Trusted certificates path
    pub trusted_certificates: Option<String>,
    /// Format used to build a peer identity from its certificate
    pub uid_format: Option<String>,
    /// File mapping peer identities to display names
    pub display_name_file: Option<String>,
}

impl fmt::Debug for SslCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SslCredentials")
            .field("certificate_file", &self.certificate_file)
            .field("private_key_file", &self.private_key_file)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("trusted_certificate_db", &self.trusted_certificate_db)
            .field("trusted_certificates", &self.trusted_certificates)
            .field("uid_format", &self.uid_format)
            .field("display_name_file", &self.display_name_file)
            .finish()
    }
}

/// A named, identity-stamped TLS credential bundle
#[derive(Debug, Clone)]
pub struct SslProfile {
    id: ProfileId,
    name: Option<String>,
    credentials: SslCredentials,
}

impl SslProfile {
    /// Build a profile from its administrative attributes
    ///
    /// When no inline `password` is configured the `passwordFile` attribute is
    /// consulted; an unreadable file leaves the password unset. The password,
    /// wherever it came from, is then resolved through
    /// [`PasswordSource`](crate::PasswordSource).
    pub fn from_entity(id: ProfileId, entity: &Entity) -> Result<Self> {
        let name = entity.opt_string("name", None)?;
        let certificate_file = entity.opt_string("certFile", None)?;
        let private_key_file = entity.opt_string("keyFile", None)?;

        let password = match entity.opt_string("password", None)? {
            Some(password) => Some(password),
            None => entity
                .opt_string("passwordFile", None)?
                .and_then(|path| read_password_file(&path)),
        };

        let credentials = SslCredentials {
            certificate_file,
            private_key_file,
            password: password.map(resolve_password),
            trusted_certificate_db: entity.opt_string("certDb", None)?,
            trusted_certificates: entity.opt_string("trustedCerts", None)?,
            uid_format: entity.opt_string("uidFormat", None)?,
            display_name_file: entity.opt_string("displayNameFile", None)?,
        };

        Ok(Self {
            id,
            name,
            credentials,
        })
    }

    /// Profile identity
    pub fn id(&self) -> ProfileId {
        self.id
    }

    /// Profile name, if one was configured
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Credential fields
    pub fn credentials(&self) -> &SslCredentials {
        &self.credentials
    }
}

/// Registry of SSL profiles, looked up by name during endpoint configuration
pub struct SslProfileRegistry {
    profiles: DashMap<ProfileId, Arc<SslProfile>>,
    next_id: AtomicU64,
}

impl Default for SslProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SslProfileRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a profile from its attributes and register it
    #[instrument(skip_all)]
    pub fn create(&self, entity: &Entity) -> Result<Arc<SslProfile>> {
        let id = ProfileId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let profile = match SslProfile::from_entity(id, entity) {
            Ok(profile) => Arc::new(profile),
            Err(e) => {
                error!("Unable to create ssl profile: {}", e);
                return Err(e);
            }
        };

        self.profiles.insert(id, profile.clone());
        gauge!("switchyard.ssl_profiles.active").set(self.profiles.len() as f64);
        info!(
            profile_id = %id,
            "Created SSL Profile with name {}",
            profile.name().unwrap_or("")
        );
        Ok(profile)
    }

    /// Find a profile by exact name
    ///
    /// If several profiles share a name the earliest created wins.
    pub fn find(&self, name: &str) -> Option<Arc<SslProfile>> {
        self.profiles
            .iter()
            .filter(|entry| entry.value().name() == Some(name))
            .min_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone())
    }

    /// Look up a profile by identity
    pub fn get(&self, id: ProfileId) -> Option<Arc<SslProfile>> {
        self.profiles.get(&id).map(|entry| entry.value().clone())
    }

    /// Remove a profile
    pub fn delete(&self, id: ProfileId) -> Option<Arc<SslProfile>> {
        let removed = self.profiles.remove(&id).map(|(_, profile)| profile);
        if removed.is_some() {
            gauge!("switchyard.ssl_profiles.active").set(self.profiles.len() as f64);
            info!(profile_id = %id, "Deleted SSL Profile");
        }
        removed
    }

    /// All profiles in creation order
    pub fn profiles(&self) -> Vec<Arc<SslProfile>> {
        let mut profiles: Vec<_> = self
            .profiles
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        profiles.sort_by_key(|p| p.id());
        profiles
    }

    /// Number of registered profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if no profile is registered
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Remove every profile
    pub fn clear(&self) {
        self.profiles.clear();
        gauge!("switchyard.ssl_profiles.active").set(0.0);
    }
}

impl fmt::Debug for SslProfileRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SslProfileRegistry")
            .field("profile_count", &self.len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn profile_entity(name: &str) -> Entity {
        Entity::new()
            .with("name", name)
            .with("certFile", "/etc/certs/server.pem")
            .with("keyFile", "/etc/certs/server-key.pem")
            .with("certDb", "/etc/certs/ca.pem")
    }

    #[test]
    fn test_create_and_find() {
        let registry = SslProfileRegistry::new();
        let created = registry.create(&profile_entity("server-ssl")).unwrap();

        let found = registry.find("server-ssl").unwrap();
        assert_eq!(found.id(), created.id());
        assert_eq!(
            found.credentials().certificate_file.as_deref(),
            Some("/etc/certs/server.pem")
        );
        assert!(registry.find("SERVER-SSL").is_none());
        assert!(registry.find("server").is_none());
    }

    #[test]
    fn test_duplicate_names_earliest_wins() {
        let registry = SslProfileRegistry::new();
        let first = registry.create(&profile_entity("dup")).unwrap();
        let _second = registry.create(&profile_entity("dup")).unwrap();

        assert_eq!(registry.find("dup").unwrap().id(), first.id());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_delete() {
        let registry = SslProfileRegistry::new();
        let profile = registry.create(&profile_entity("gone")).unwrap();

        assert!(registry.delete(profile.id()).is_some());
        assert!(registry.find("gone").is_none());
        assert!(registry.delete(profile.id()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_password_file_used_when_no_inline_password() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file-secret").unwrap();

        let registry = SslProfileRegistry::new();
        let entity = profile_entity("pwfile")
            .with("passwordFile", file.path().to_string_lossy().into_owned());
        let profile = registry.create(&entity).unwrap();
        assert_eq!(profile.credentials().password.as_deref(), Some("file-secret"));
    }

    #[test]
    fn test_inline_password_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file-secret").unwrap();

        let registry = SslProfileRegistry::new();
        let entity = profile_entity("inline")
            .with("password", "inline-secret")
            .with("passwordFile", file.path().to_string_lossy().into_owned());
        let profile = registry.create(&entity).unwrap();
        assert_eq!(
            profile.credentials().password.as_deref(),
            Some("inline-secret")
        );
    }

    #[test]
    fn test_password_file_contents_are_post_processed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "literal:  padded").unwrap();

        let registry = SslProfileRegistry::new();
        let entity = profile_entity("filelit")
            .with("passwordFile", file.path().to_string_lossy().into_owned());
        let profile = registry.create(&entity).unwrap();
        assert_eq!(profile.credentials().password.as_deref(), Some("padded"));
    }

    #[test]
    fn test_unreadable_password_file_is_tolerated() {
        let registry = SslProfileRegistry::new();
        let entity = profile_entity("nofile").with("passwordFile", "/nonexistent/pw.txt");
        let profile = registry.create(&entity).unwrap();
        assert_eq!(profile.credentials().password, None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let credentials = SslCredentials {
            password: Some("top-secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", credentials);
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
