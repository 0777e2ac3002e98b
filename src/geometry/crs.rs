use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Reference to a coordinate reference system by authority and code.
///
/// `name` is descriptive metadata only; two references naming the same
/// authority/code pair describe the same system (see [`CrsRef::same_crs`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrsRef {
    pub authority: String,
    pub code: String,
    pub name: Option<String>,
}

impl CrsRef {
    pub fn new(authority: &str, code: &str) -> Self {
        Self {
            authority: authority.to_ascii_uppercase(),
            code: code.to_string(),
            name: None,
        }
    }

    pub fn epsg(code: i64) -> Self {
        Self::new("EPSG", &code.to_string())
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Accepts `EPSG:4326`, `urn:ogc:def:crs:EPSG::4326`,
    /// `urn:ogc:def:crs:EPSG:6.6:4326`, `http://www.opengis.net/def/crs/EPSG/0/4326`
    /// and `CRS:84`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let lower = text.to_ascii_lowercase();
        if lower.starts_with("urn:ogc:def:crs:") || lower.starts_with("urn:x-ogc:def:crs:") {
            let parts: Vec<&str> = text.split(':').collect();
            let authority = parts.get(4)?;
            let code = parts.last()?;
            if code.is_empty() {
                return None;
            }
            return Some(Self::new(authority, code));
        }

        if lower.starts_with("http://") || lower.starts_with("https://") {
            let parts: Vec<&str> = text.trim_end_matches('/').split('/').collect();
            if parts.len() < 3 {
                return None;
            }
            let code = parts[parts.len() - 1];
            let authority = parts[parts.len() - 3];
            return Some(Self::new(authority, code));
        }

        let (authority, code) = text.split_once(':')?;
        if authority.is_empty() || code.is_empty() {
            return None;
        }
        Some(Self::new(authority, code))
    }

    /// Integer spatial reference id, when the reference maps onto one.
    /// `CRS:84` maps to 4326 although it declares longitude/latitude axis
    /// order; coordinates are always read as x/y, so axis order is not kept.
    pub fn srid(&self) -> Option<i64> {
        match self.authority.as_str() {
            "EPSG" => self.code.parse().ok(),
            "CRS" if self.code == "84" => Some(4326),
            _ => None,
        }
    }

    /// Equality on authority and code, or on the SRID both map onto.
    /// Axis order is ignored: `CRS:84` and `EPSG:4326` are the same system
    /// and no coordinate swap happens between them.
    pub fn same_crs(&self, other: &CrsRef) -> bool {
        if self.authority == other.authority && self.code == other.code {
            return true;
        }
        matches!((self.srid(), other.srid()), (Some(a), Some(b)) if a == b)
    }
}

impl Display for CrsRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_form() {
        let crs = CrsRef::parse("epsg:4326").expect("Failed to parse crs");
        assert_eq!(crs.authority, "EPSG");
        assert_eq!(crs.code, "4326");
        assert_eq!(crs.srid(), Some(4326));
    }

    #[test]
    fn test_parse_urn_form() {
        let crs = CrsRef::parse("urn:ogc:def:crs:EPSG::3857").expect("Failed to parse crs");
        assert_eq!(crs, CrsRef::epsg(3857));
    }

    #[test]
    fn test_parse_http_form() {
        let crs = CrsRef::parse("http://www.opengis.net/def/crs/EPSG/0/32633").expect("Failed to parse crs");
        assert_eq!(crs.srid(), Some(32633));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CrsRef::parse("").is_none());
        assert!(CrsRef::parse("4326").is_none());
        assert!(CrsRef::parse("EPSG:").is_none());
    }

    #[test]
    fn test_same_crs_ignores_name() {
        let a = CrsRef::epsg(4326).with_name("WGS 84");
        let b = CrsRef::epsg(4326);
        assert!(a.same_crs(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_crs84_matches_epsg_4326() {
        let crs84 = CrsRef::parse("CRS:84").expect("Failed to parse crs");
        assert!(crs84.same_crs(&CrsRef::epsg(4326)));
        assert_eq!(crs84.srid(), Some(4326));
        assert!(!crs84.same_crs(&CrsRef::epsg(3857)));
    }
}
