//! Gallery wire models

use serde::{Deserialize, Serialize};

/// Filter criterion type selecting an exact `publisher.package` name
pub const FILTER_TYPE_EXTENSION_NAME: u32 = 7;

/// Response detail flags: include versions, files, version properties and
/// asset URIs, and exclude non-validated extensions
pub const QUERY_FLAGS: u32 = 914;

/// Request body for `extensionquery`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionQuery {
    pub filters: Vec<QueryFilter>,
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub criteria: Vec<FilterCriterion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriterion {
    pub filter_type: u32,
    pub value: String,
}

impl ExtensionQuery {
    /// Query for exactly one extension by `publisher.package`
    #[must_use]
    pub fn for_extension(extension_id: &str) -> Self {
        Self {
            filters: vec![QueryFilter {
                criteria: vec![FilterCriterion {
                    filter_type: FILTER_TYPE_EXTENSION_NAME,
                    value: extension_id.to_string(),
                }],
            }],
            flags: QUERY_FLAGS,
        }
    }
}

/// Response body of `extensionquery`; only the fields vsixget reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<QueryResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub extensions: Vec<GalleryExtension>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryExtension {
    #[serde(default)]
    pub versions: Vec<GalleryVersion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryVersion {
    pub version: String,
    #[serde(default)]
    pub target_platform: Option<String>,
}

impl QueryResponse {
    /// `results[0].extensions[0]`, when it lists at least one version
    #[must_use]
    pub fn into_first_extension(self) -> Option<GalleryExtension> {
        self.results
            .into_iter()
            .next()?
            .extensions
            .into_iter()
            .next()
            .filter(|ext| !ext.versions.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(ExtensionQuery::for_extension("acme.widget")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "filters": [{"criteria": [{"filterType": 7, "value": "acme.widget"}]}],
                "flags": 914
            })
        );
    }

    #[test]
    fn test_response_extraction() {
        let json = r#"{"results": [{"extensions": [{"extensionName": "widget",
            "versions": [{"version": "2.0.0", "targetPlatform": "linux-x64", "files": []},
                         {"version": "1.9.0"}]}],
            "resultMetadata": []}]}"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        let ext = response.into_first_extension().unwrap();
        assert_eq!(ext.versions.len(), 2);
        assert_eq!(ext.versions[0].target_platform.as_deref(), Some("linux-x64"));
        assert_eq!(ext.versions[1].target_platform, None);
    }

    #[test]
    fn test_empty_results() {
        let empty: QueryResponse =
            serde_json::from_str(r#"{"results": [{"extensions": []}]}"#).unwrap();
        assert!(empty.into_first_extension().is_none());
        let none: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(none.into_first_extension().is_none());
    }
}
