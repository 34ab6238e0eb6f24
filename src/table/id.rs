use std::{fmt, sync::Arc};

/// Canonical width of ZIP/ZCTA identifiers.
const ID_WIDTH: usize = 5;

/// Stable key for a ZIP or ZCTA code.
/// Keeps the original text (with leading zeros) but avoids repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaId(Arc<str>);

impl AreaId {
    /// Normalize a raw token into an identifier.
    ///
    /// Trims whitespace, strips a zero-valued fraction left behind by
    /// spreadsheet exports ("52240.0"), and left-pads digit-only tokens
    /// shorter than five characters ("984" becomes "00984").
    pub fn new(raw: &str) -> Self {
        let token = raw.trim();
        let token = match token.split_once('.') {
            Some((int, frac))
                if !int.is_empty()
                    && int.bytes().all(|b| b.is_ascii_digit())
                    && frac.bytes().all(|b| b == b'0') => int,
            _ => token,
        };
        if !token.is_empty() && token.len() < ID_WIDTH && token.bytes().all(|b| b.is_ascii_digit()) {
            AreaId(Arc::from(format!("{:0>width$}", token, width = ID_WIDTH).as_str()))
        } else {
            AreaId(Arc::from(token))
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AreaId {
    fn from(raw: &str) -> Self { AreaId::new(raw) }
}

impl serde::Serialize for AreaId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
