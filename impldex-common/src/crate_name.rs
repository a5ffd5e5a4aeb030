use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    ops::Deref,
};

/// A crate name as it appears in implementor tables.
///
/// Rustdoc always writes the underscored form (`gw2_mumble`), while users tend to type the
/// package name (`gw2-mumble`). Comparison and hashing treat `-` and `_` as the same character,
/// but the original spelling is retained so that tables re-serialize byte-for-byte.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrateName<'a>(Cow<'a, str>);

impl CrateName<'_> {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_owned(self) -> CrateName<'static> {
        CrateName(Cow::Owned(self.0.into_owned()))
    }

    /// The spelling used in rustdoc output paths
    pub fn underscored(&self) -> Cow<'_, str> {
        if self.0.contains('-') {
            Cow::Owned(self.0.replace('-', "_"))
        } else {
            Cow::Borrowed(&self.0)
        }
    }

    fn normalized_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.0
            .bytes()
            .map(|byte| if byte == b'-' { b'_' } else { byte })
    }
}

impl PartialEq for CrateName<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.normalized_bytes().eq(other.normalized_bytes())
    }
}

impl PartialEq<str> for CrateName<'_> {
    fn eq(&self, other: &str) -> bool {
        *self == CrateName::from(other)
    }
}

impl PartialEq<&str> for CrateName<'_> {
    fn eq(&self, other: &&str) -> bool {
        *self == CrateName::from(*other)
    }
}

impl Hash for CrateName<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.normalized_bytes() {
            state.write_u8(byte);
        }
    }
}

impl Deref for CrateName<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Ord for CrateName<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized_bytes().cmp(other.normalized_bytes())
    }
}

impl PartialOrd for CrateName<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for CrateName<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'a> From<&'a str> for CrateName<'a> {
    fn from(value: &'a str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for CrateName<'static> {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}
