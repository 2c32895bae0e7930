//! Fully-qualified service instance name.
//!
//! [`ServiceIdentity`] pairs an interface name with an instance name. It
//! is the map key in [`super::InstanceRegistry`], the subject of every
//! [`super::RegistryEvent`] and the display key used in logs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Immutable `(interface, instance)` pair naming one registered service.
///
/// Both halves are non-empty opaque strings. Displayed as
/// `"{interface}/{instance}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceIdentity {
    interface: String,
    instance: String,
}

impl ServiceIdentity {
    /// Creates a new identity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidIdentity`] if either name is empty.
    pub fn new(
        interface: impl Into<String>,
        instance: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let interface = interface.into();
        let instance = instance.into();
        if interface.is_empty() || instance.is_empty() {
            return Err(RegistryError::InvalidIdentity(format!(
                "{interface}/{instance}"
            )));
        }
        Ok(Self {
            interface,
            instance,
        })
    }

    /// Returns the interface name (e.g. `android.hardware.foo@1.0::IFoo`).
    #[must_use]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Returns the instance name (e.g. `default`).
    #[must_use]
    pub fn instance(&self) -> &str {
        &self.instance
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.interface, self.instance)
    }
}

impl FromStr for ServiceIdentity {
    type Err = RegistryError;

    /// Parses `"interface/instance"`. The split happens on the last `/`
    /// since instance names never contain one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((interface, instance)) = s.rsplit_once('/') else {
            return Err(RegistryError::InvalidIdentity(s.to_string()));
        };
        Self::new(interface, instance)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_with_slash() {
        let Ok(id) = ServiceIdentity::new("android.hardware.foo@1.0::IFoo", "default") else {
            panic!("valid identity");
        };
        assert_eq!(id.to_string(), "android.hardware.foo@1.0::IFoo/default");
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(ServiceIdentity::new("", "default").is_err());
        assert!(ServiceIdentity::new("IFoo", "").is_err());
    }

    #[test]
    fn parse_splits_on_last_slash() {
        let Ok(id) = "a/b/c".parse::<ServiceIdentity>() else {
            panic!("valid identity");
        };
        assert_eq!(id.interface(), "a/b");
        assert_eq!(id.instance(), "c");
    }

    #[test]
    fn parse_without_slash_fails() {
        assert!("nothing".parse::<ServiceIdentity>().is_err());
        assert!("IFoo/".parse::<ServiceIdentity>().is_err());
    }

    #[test]
    fn equal_names_hash_equal() {
        use std::collections::HashMap;
        let Ok(a) = ServiceIdentity::new("IFoo", "default") else {
            panic!("valid identity");
        };
        let Ok(b) = ServiceIdentity::new("IFoo", "default") else {
            panic!("valid identity");
        };
        let mut map = HashMap::new();
        map.insert(a, 1);
        assert_eq!(map.get(&b), Some(&1));
    }
}
