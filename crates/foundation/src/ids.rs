/// Short identifier of a georeferenced map, e.g. `a38b4ed7ea01a36a`.
///
/// Accepted input forms:
/// - a bare id: one or more ASCII letters, digits, `-` or `_`
/// - an absolute URL whose path ends in `/maps/<id>`; a trailing `/`, a query
///   string and a fragment are ignored
///
/// `Display` always prints the short form.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationId(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    InvalidCharacter(char),
    NotAMapUrl(String),
}

impl std::fmt::Display for IdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdError::Empty => write!(f, "annotation id is empty"),
            IdError::InvalidCharacter(c) => write!(f, "invalid character {c:?} in annotation id"),
            IdError::NotAMapUrl(url) => write!(f, "not a map annotation url: {url}"),
        }
    }
}

impl std::error::Error for IdError {}

impl AnnotationId {
    pub fn parse(input: &str) -> Result<Self, IdError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(IdError::Empty);
        }
        match input.split_once("://") {
            Some((_scheme, rest)) => Self::from_url_rest(input, rest),
            None => Self::from_short(input),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_short(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(IdError::InvalidCharacter(c));
        }
        Ok(Self(s.to_string()))
    }

    fn from_url_rest(full: &str, rest: &str) -> Result<Self, IdError> {
        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        // Drop the authority, keep the path segments.
        let mut segments: Vec<&str> = rest.split('/').skip(1).collect();
        if segments.last() == Some(&"") {
            segments.pop();
        }
        match segments.as_slice() {
            [.., "maps", id] => Self::from_short(id),
            _ => Err(IdError::NotAMapUrl(full.to_string())),
        }
    }
}

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AnnotationId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
