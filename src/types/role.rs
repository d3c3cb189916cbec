use std::fmt;

/// The caller's role.
///
/// `Admin` bypasses policy compilation entirely. `Client` is denied
/// everything when it has no policies for the resource. Any other role name
/// is carried as `Other` and goes through normal compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    #[default]
    Client,
    Other(String),
}

impl Role {
    #[must_use]
    pub fn from_name(name: &str) -> Role {
        match name {
            "admin" => Role::Admin,
            "client" => Role::Client,
            other => Role::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
            Role::Other(name) => name,
        }
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Role::from_name(name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_names() {
        assert_eq!(Role::from_name("admin"), Role::Admin);
        assert_eq!(Role::from_name("client"), Role::Client);
    }

    #[test]
    fn other_names_are_kept() {
        assert_eq!(Role::from("auditor"), Role::Other("auditor".into()));
        // Sentinels are case-sensitive.
        assert_eq!(Role::from("Admin"), Role::Other("Admin".into()));
    }

    #[test]
    fn default_is_client() {
        assert_eq!(Role::default(), Role::Client);
    }

    #[test]
    fn display_round_trips() {
        for name in ["admin", "client", "auditor"] {
            assert_eq!(Role::from(name).to_string(), name);
        }
    }
}
