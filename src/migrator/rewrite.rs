use std::borrow::Cow;
use std::str::FromStr;

/// Relocates member paths that live under a different root in the
/// destination library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRewrite {
    from: String,
    to: String,
}

impl PathRewrite {
    /// An empty `from` prefixes every path with `to`.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns `Cow::Owned` only when the path was changed.
    pub fn apply<'a>(&self, relative_path: &'a str) -> Cow<'a, str> {
        match relative_path.strip_prefix(self.from.as_str()) {
            Some(rest) if self.from != self.to => Cow::Owned(format!("{}{}", self.to, rest)),
            _ => Cow::Borrowed(relative_path),
        }
    }
}

impl FromStr for PathRewrite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once('=')
            .ok_or_else(|| format!("expected OLD=NEW, got '{}'", s))?;
        Ok(Self::new(from, to))
    }
}
