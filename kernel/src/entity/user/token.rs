use vodca::{AsRefln, Fromln};

/// Signed bearer token as sent in the `Authorization` header.
#[derive(Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}
