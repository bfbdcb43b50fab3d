//! WMS and WFS GetCapabilities requests.

use tracing::{info, instrument};

use ogc_common::GeoServerResult;
use ogc_protocol::{
    parse_capabilities, parse_wfs_capabilities, GeoServerCapabilities, WfsCapabilities,
};

use crate::client::{GeoServerClient, CAPABILITIES_QUERY};
use crate::config::GeoServerConfig;

const WFS_CAPABILITIES_QUERY: &str = "service=WFS&version=2.0.0&request=GetCapabilities";

impl GeoServerClient {
    /// Fetch and parse the WMS 1.1.1 capabilities document.
    #[instrument(skip(self), fields(base_url = %self.base_url()))]
    pub async fn get_capabilities(&self) -> GeoServerResult<GeoServerCapabilities> {
        let body = self
            .get_text(
                "wms",
                CAPABILITIES_QUERY,
                "application/vnd.ogc.wms_xml, application/xml, text/xml",
            )
            .await?;

        let capabilities = parse_capabilities(&body)?;
        info!(
            layers = capabilities.layers.len(),
            "Retrieved WMS capabilities"
        );
        Ok(capabilities)
    }

    /// Fetch and parse the WFS 2.0.0 capabilities document, listing the
    /// feature types the server offers.
    #[instrument(skip(self), fields(base_url = %self.base_url()))]
    pub async fn get_wfs_capabilities(&self) -> GeoServerResult<WfsCapabilities> {
        let body = self
            .get_text("wfs", WFS_CAPABILITIES_QUERY, "application/xml, text/xml")
            .await?;

        let capabilities = parse_wfs_capabilities(&body)?;
        info!(
            feature_types = capabilities.feature_types.len(),
            "Retrieved WFS capabilities"
        );
        Ok(capabilities)
    }
}

/// One-off capabilities request against `base_url` with default settings
/// and no credentials.
pub async fn get_wms_capabilities(base_url: &str) -> GeoServerResult<GeoServerCapabilities> {
    GeoServerClient::new(GeoServerConfig::new(base_url))?
        .get_capabilities()
        .await
}
