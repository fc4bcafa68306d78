use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookSlug(String);

impl BookSlug {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Lowercase, ASCII-alphanumeric words joined by single dashes.
    /// Accented latin letters are folded to their base letter.
    pub fn from_title(title: &str) -> Self {
        let mut slug = String::with_capacity(title.len());
        for c in title.chars().flat_map(char::to_lowercase) {
            let c = fold_accent(c);
            if c.is_ascii_alphanumeric() {
                slug.push(c);
            } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        Self(slug.trim_matches('-').to_string())
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && !self.0.starts_with('-')
            && !self.0.ends_with('-')
            && !self.0.contains("--")
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl std::fmt::Display for BookSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod test {
    use super::BookSlug;

    #[test]
    fn slug_from_title() {
        assert_eq!(
            BookSlug::from_title("Cien años de soledad"),
            BookSlug::new("cien-anos-de-soledad")
        );
        assert_eq!(
            BookSlug::from_title("  ¿Quién se  llevó mi queso?  "),
            BookSlug::new("quien-se-llevo-mi-queso")
        );
        assert!(BookSlug::from_title("El Aleph").is_valid());
    }

    #[test]
    fn invalid_slugs() {
        assert!(!BookSlug::new("").is_valid());
        assert!(!BookSlug::new("Upper").is_valid());
        assert!(!BookSlug::new("double--dash").is_valid());
        assert!(!BookSlug::new("-leading").is_valid());
    }
}
