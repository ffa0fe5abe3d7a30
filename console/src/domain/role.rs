//! Staff and student roles used for dashboard access decisions.
//!
//! Role labels arrive from the backend as free-form strings. They are parsed
//! into the closed [`Role`] enumeration at the adapter boundary so access
//! checks are exhaustive matches rather than string comparisons.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A role granted to a console user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Finance,
    Secretary,
    Student,
    Trainer,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Admin,
        Self::Finance,
        Self::Secretary,
        Self::Student,
        Self::Trainer,
    ];

    /// Backend label for this role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Finance => "finance",
            Self::Secretary => "secretary",
            Self::Student => "student",
            Self::Trainer => "trainer",
        }
    }
}

/// Error returned when parsing an unknown role label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    label: String,
}

impl ParseRoleError {
    /// The label that failed to parse.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.label)
    }
}

impl std::error::Error for ParseRoleError {}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "finance" => Ok(Self::Finance),
            "secretary" => Ok(Self::Secretary),
            "student" => Ok(Self::Student),
            "trainer" => Ok(Self::Trainer),
            _ => Err(ParseRoleError {
                label: value.to_owned(),
            }),
        }
    }
}

/// Ordered, duplicate-free set of roles held by one user.
///
/// The first role is the user's *primary* role.
///
/// # Examples
/// ```
/// use edtech_console::domain::{Role, RoleSet};
///
/// let roles = RoleSet::from_iter([Role::Trainer, Role::Admin, Role::Trainer]);
/// assert_eq!(roles.primary(), Some(Role::Trainer));
/// assert_eq!(roles.len(), 2);
/// assert!(roles.intersects(&[Role::Admin, Role::Finance]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    /// An empty role set.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// The first granted role, if any.
    pub fn primary(&self) -> Option<Role> {
        self.0.first().copied()
    }

    /// Whether `role` is granted.
    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Whether any of `allowed` is granted.
    pub fn intersects(&self, allowed: &[Role]) -> bool {
        allowed.iter().any(|role| self.contains(*role))
    }

    /// Number of distinct roles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no role is granted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate roles in grant order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut roles = Vec::new();
        for role in iter {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        Self(roles)
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(value: Vec<Role>) -> Self {
        value.into_iter().collect()
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(value: RoleSet) -> Self {
        value.0
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(|role| role.as_str()).collect();
        f.write_str(&labels.join(", "))
    }
}
