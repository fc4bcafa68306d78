mod id;
mod role;
mod token;

pub use self::{id::*, role::*, token::*};
use destructure::Destructure;
use vodca::References;

/// Identity resolved from a bearer token for the duration of one request.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Caller {
    user_id: UserId,
    role: UserRole,
}

impl Caller {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether the caller may read a resource owned by `owner`.
    pub fn can_access(&self, owner: &UserId) -> bool {
        self.is_admin() || &self.user_id == owner
    }
}
