//! WFS GetFeature requests.
//!
//! The fetchers here never fall back between formats. The JSON-then-GML
//! fallback lives in [`integration`](crate::integration) so JSON-only
//! callers keep JSON-only semantics.

use serde_json::Value;
use tracing::{info, instrument};

use ogc_common::{FeatureCollection, GeoServerError, GeoServerResult};
use ogc_protocol::{OutputFormat, WfsParams, XmlNode};

use crate::client::GeoServerClient;

impl GeoServerClient {
    /// Fetch features as GeoJSON.
    ///
    /// The body must be a JSON object with `"type": "FeatureCollection"`.
    /// Anything else, including HTML error pages served with HTTP 200, is
    /// [`GeoServerError::InvalidResponseShape`]. Transport failures come
    /// back as [`GeoServerError::FeatureRequest`] naming the type.
    #[instrument(skip(self, params), fields(type_name = %params.type_name))]
    pub async fn fetch_features(&self, params: &WfsParams) -> GeoServerResult<FeatureCollection> {
        let params = params.clone().with_output_format(OutputFormat::GeoJson);
        let body = self.get_feature(&params).await?;

        let collection = parse_feature_collection(&params.type_name, &body)?;
        info!(features = collection.len(), "Fetched WFS features as GeoJSON");
        Ok(collection)
    }

    /// Fetch the same request as GML2 and return the raw XML body.
    #[instrument(skip(self, params), fields(type_name = %params.type_name))]
    pub async fn fetch_features_gml(&self, params: &WfsParams) -> GeoServerResult<String> {
        let params = params.clone().with_output_format(OutputFormat::Gml2);
        let body = self.get_feature(&params).await?;

        if !body.trim_start().starts_with('<') {
            return Err(GeoServerError::InvalidResponseShape {
                type_name: params.type_name.clone(),
                message: "GML response body is not XML".to_string(),
            });
        }
        info!(bytes = body.len(), "Fetched WFS features as GML");
        Ok(body)
    }

    async fn get_feature(&self, params: &WfsParams) -> GeoServerResult<String> {
        self.get_text("wfs", &params.to_query(), params.output_format.accept())
            .await
            .map_err(|e| GeoServerError::FeatureRequest {
                type_name: params.type_name.clone(),
                source: Box::new(e),
            })
    }
}

/// Validate a GetFeature JSON body and decode it.
pub fn parse_feature_collection(type_name: &str, body: &str) -> GeoServerResult<FeatureCollection> {
    let shape_error = |message: String| GeoServerError::InvalidResponseShape {
        type_name: type_name.to_string(),
        message,
    };

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            // GeoServer answers unknown types and bad filters with an XML
            // exception report, even for JSON requests.
            if let Some(message) = exception_text(body) {
                return Err(GeoServerError::ServiceException {
                    message: format!("{}: {}", type_name, message),
                });
            }
            return Err(shape_error(format!("response is not JSON: {}", e)));
        }
    };

    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        Some(other) => {
            return Err(shape_error(format!(
                "expected a FeatureCollection, got type '{}'",
                other
            )))
        }
        None => {
            return Err(shape_error(
                "expected a FeatureCollection, got an object without 'type'".to_string(),
            ))
        }
    }

    serde_json::from_value(value).map_err(|e| shape_error(format!("invalid FeatureCollection: {}", e)))
}

fn exception_text(body: &str) -> Option<String> {
    if !body.trim_start().starts_with('<') {
        return None;
    }
    XmlNode::parse(body, "WFS response")
        .ok()
        .and_then(|root| root.exception_report())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_accepted() {
        let fc = parse_feature_collection("ws:a", r#"{"type":"FeatureCollection","features":[]}"#)
            .unwrap();
        assert!(fc.is_empty());
    }

    #[test]
    fn test_other_shapes_rejected() {
        for body in [
            r#"{"error":"bad request"}"#,
            r#"{"type":"Feature","geometry":null,"properties":{}}"#,
            r#"[1, 2]"#,
            "<html><body>oops</body></html>",
        ] {
            let err = parse_feature_collection("ws:a", body).unwrap_err();
            assert!(
                matches!(err, GeoServerError::InvalidResponseShape { ref type_name, .. } if type_name == "ws:a"),
                "{}: {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_exception_report_surfaced() {
        let body = r#"<ServiceExceptionReport><ServiceException>Unknown namespace [ws]</ServiceException></ServiceExceptionReport>"#;
        let err = parse_feature_collection("ws:a", body).unwrap_err();
        assert!(matches!(err, GeoServerError::ServiceException { .. }));
        assert!(err.to_string().contains("ws:a: Unknown namespace [ws]"));
    }
}
