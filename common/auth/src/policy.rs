use crate::roles::Role;

/// Access requirements attached to a route at registration time.
///
/// The guard reads this descriptor instead of discovering metadata at
/// request time: `public` routes skip token handling entirely, an empty
/// role set admits any verified identity, and a non-empty set requires the
/// caller's role claim to be a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub public: bool,
    pub required_roles: &'static [Role],
}

impl AccessPolicy {
    /// No token required.
    pub const PUBLIC: Self = Self {
        public: true,
        required_roles: &[],
    };

    /// Valid token required; any role is accepted.
    pub const fn authenticated() -> Self {
        Self {
            public: false,
            required_roles: &[],
        }
    }

    /// Valid token whose role claim is one of `roles`.
    pub const fn any_of(roles: &'static [Role]) -> Self {
        Self {
            public: false,
            required_roles: roles,
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.required_roles.is_empty() || self.required_roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_role_set_admits_any_role() {
        let policy = AccessPolicy::authenticated();
        assert!(policy.allows(Role::Viewer));
        assert!(policy.allows(Role::Admin));
    }

    #[test]
    fn role_set_restricts_membership() {
        let policy = AccessPolicy::any_of(&[Role::Admin, Role::Editor]);
        assert!(policy.allows(Role::Admin));
        assert!(policy.allows(Role::Editor));
        assert!(!policy.allows(Role::Viewer));
    }

    #[test]
    fn public_policy_is_marked_public() {
        assert!(AccessPolicy::PUBLIC.public);
        assert!(!AccessPolicy::any_of(&[Role::Admin]).public);
    }
}
