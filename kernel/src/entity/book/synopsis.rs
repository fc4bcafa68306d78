use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookSynopsis(String);

impl BookSynopsis {
    pub fn new(synopsis: impl Into<String>) -> Self {
        Self(synopsis.into())
    }
}
