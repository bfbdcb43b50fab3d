//! Subcommand implementations. Results go to stdout as JSON or plain text;
//! logs go to stderr.

use anyhow::{Context, Result};
use geoserver_client::{
    fetch_features_with_fallback, FeatureInfoParams, GeoServerClient, WfsParams,
};
use ogc_common::{BoundingBox, QualifiedName};
use ogc_protocol::{build_wms_url, WmsUrlParams};
use tracing::info;

/// Options for the `features` subcommand.
#[derive(Debug, Clone, Default)]
pub struct FeatureQuery {
    pub type_name: String,
    pub max_features: Option<u32>,
    pub start_index: Option<u32>,
    pub bbox: Option<String>,
    pub cql: Option<String>,
    pub no_fallback: bool,
}

/// Options for the `feature-info` subcommand.
#[derive(Debug, Clone, Default)]
pub struct FeatureInfoQuery {
    pub layer: String,
    /// Image extent as W,S,E,N in `srs` units.
    pub bbox: String,
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
    pub srs: Option<String>,
    pub feature_count: Option<u32>,
}

/// Options for the `wms-url` subcommand.
#[derive(Debug, Clone, Default)]
pub struct WmsUrlQuery {
    pub layer: String,
    pub format: Option<String>,
    pub style: Option<String>,
    pub cql: Option<String>,
    pub srs: Option<String>,
}

pub async fn capabilities(client: &GeoServerClient) -> Result<()> {
    let capabilities = client
        .get_capabilities()
        .await
        .context("GetCapabilities failed")?;
    println!("{}", serde_json::to_string_pretty(&capabilities)?);
    Ok(())
}

pub async fn feature_types(client: &GeoServerClient) -> Result<()> {
    let capabilities = client
        .get_wfs_capabilities()
        .await
        .context("WFS GetCapabilities failed")?;
    println!("{}", serde_json::to_string_pretty(&capabilities)?);
    Ok(())
}

pub async fn feature_info(client: &GeoServerClient, query: &FeatureInfoQuery) -> Result<()> {
    let params = feature_info_params(query, client.config().workspace.as_deref())?;
    let collection = client
        .get_feature_info(&params)
        .await
        .with_context(|| format!("GetFeatureInfo failed for {}", params.layers))?;
    println!("{}", serde_json::to_string_pretty(&collection)?);
    Ok(())
}

pub async fn features(client: &GeoServerClient, query: &FeatureQuery) -> Result<()> {
    let params = wfs_params(query, client.config().workspace.as_deref())?;

    let collection = if query.no_fallback {
        client.fetch_features(&params).await
    } else {
        fetch_features_with_fallback(client, &params).await
    }
    .with_context(|| format!("GetFeature failed for {}", params.type_name))?;

    info!(type_name = %params.type_name, features = collection.len(), "Fetched features");
    println!("{}", serde_json::to_string_pretty(&collection)?);
    Ok(())
}

pub fn wms_url(base_url: &str, workspace: Option<&str>, query: &WmsUrlQuery) -> String {
    let layer = QualifiedName::parse_with_default(&query.layer, workspace);
    let mut params = WmsUrlParams::new(base_url, layer.to_string());
    if let Some(format) = &query.format {
        params = params.with_format(format);
    }
    if let Some(srs) = &query.srs {
        params = params.with_srs(srs);
    }
    params.styles = query.style.clone();
    params.cql_filter = query.cql.clone();
    build_wms_url(&params)
}

pub async fn ping(client: &GeoServerClient) -> bool {
    let reachable = client.test_connection().await;
    println!(
        "{} is {}",
        client.base_url(),
        if reachable { "reachable" } else { "unreachable" }
    );
    reachable
}

fn wfs_params(query: &FeatureQuery, workspace: Option<&str>) -> Result<WfsParams> {
    let type_name = QualifiedName::parse_with_default(&query.type_name, workspace);
    let mut params = WfsParams::new(type_name.to_string());
    params.max_features = query.max_features;
    params.start_index = query.start_index;
    params.cql_filter = query.cql.clone();
    if let Some(bbox) = &query.bbox {
        let parsed = BoundingBox::from_wms_string(bbox)
            .with_context(|| format!("Invalid --bbox '{}'", bbox))?;
        params.bbox = Some(parsed.to_wms_string());
    }
    Ok(params)
}

fn feature_info_params(
    query: &FeatureInfoQuery,
    workspace: Option<&str>,
) -> Result<FeatureInfoParams> {
    let layer = QualifiedName::parse_with_default(&query.layer, workspace);
    let bbox = BoundingBox::from_wms_string(&query.bbox)
        .with_context(|| format!("Invalid --bbox '{}'", query.bbox))?;
    if query.x >= query.width || query.y >= query.height {
        anyhow::bail!(
            "Pixel ({}, {}) lies outside the {}x{} image",
            query.x,
            query.y,
            query.width,
            query.height
        );
    }
    let mut params = FeatureInfoParams::new(
        layer.to_string(),
        bbox,
        query.width,
        query.height,
        query.x,
        query.y,
    );
    if let Some(srs) = &query.srs {
        params = params.with_srs(srs);
    }
    params.feature_count = query.feature_count;
    Ok(params)
}
