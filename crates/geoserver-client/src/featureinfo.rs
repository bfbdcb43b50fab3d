//! WMS GetFeatureInfo requests.

use tracing::{info, instrument};

use ogc_common::{FeatureCollection, GeoServerResult};
use ogc_protocol::{FeatureInfoParams, INFO_FORMAT};

use crate::client::GeoServerClient;
use crate::wfs::parse_feature_collection;

impl GeoServerClient {
    /// Query the features under one pixel of a WMS image.
    ///
    /// The response goes through the same validation as a GeoJSON
    /// GetFeature body, so an HTML page or an exception report is an error
    /// naming the queried layers. A pixel with nothing under it is an empty
    /// collection.
    #[instrument(skip(self, params), fields(layers = %params.queried_layers(), x = params.x, y = params.y))]
    pub async fn get_feature_info(
        &self,
        params: &FeatureInfoParams,
    ) -> GeoServerResult<FeatureCollection> {
        let body = self
            .get_text("wms", &params.to_query(), INFO_FORMAT)
            .await?;

        let collection = parse_feature_collection(params.queried_layers(), &body)?;
        info!(features = collection.len(), "Retrieved feature info");
        Ok(collection)
    }
}
