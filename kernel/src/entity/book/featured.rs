use vodca::{AsRefln, Fromln};

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookFeatured(bool);

impl BookFeatured {
    pub fn new(featured: impl Into<bool>) -> Self {
        Self(featured.into())
    }
}
