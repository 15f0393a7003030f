use serde::{Deserialize, Serialize};

/// Minimal catalog entry from a listing page: a name and where to find
/// the full detail resource. Write-once per snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRef {
    pub name: String,
    pub url: String,
}

impl CatalogRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One window of a listing endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPage {
    /// Total records upstream claims to have for the endpoint.
    pub count: Option<u64>,
    #[serde(default)]
    pub results: Vec<CatalogRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ref_roundtrip() {
        let r = CatalogRef::new("pikachu", "https://pokeapi.co/api/v2/pokemon/25/");
        let json = serde_json::to_string(&r).expect("serialize");
        let back: CatalogRef = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, r);
    }

    #[test]
    fn test_list_page_missing_results_defaults_empty() {
        let page: ListPage = serde_json::from_str(r#"{"count": 0}"#).expect("parse");
        assert!(page.results.is_empty());
    }
}
