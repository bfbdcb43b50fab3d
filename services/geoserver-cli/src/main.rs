//! GeoServer operator CLI.
//!
//! Inspects a GeoServer instance through the same client the map
//! integration uses:
//! - `capabilities`: parsed WMS capabilities as JSON
//! - `features`: a WFS FeatureCollection, with the GML fallback
//! - `feature-types`: parsed WFS capabilities as JSON
//! - `feature-info`: features under one pixel of a WMS image
//! - `wms-url`: the raster tile URL template for a layer
//! - `ping`: connection test

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use commands::{FeatureInfoQuery, FeatureQuery, WmsUrlQuery};
use config::ConnectionArgs;
use geoserver_client::GeoServerClient;

#[derive(Parser, Debug)]
#[command(name = "geoserver-cli")]
#[command(about = "Query a GeoServer instance over WMS and WFS")]
struct Args {
    /// YAML file with GeoServer connection settings
    #[arg(long, global = true, env = "GEOSERVER_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log level
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parsed WMS capabilities
    Capabilities,

    /// Fetch features from a WFS feature type
    Features {
        /// Feature type, optionally workspace-qualified (topp:states)
        type_name: String,

        #[arg(long)]
        max_features: Option<u32>,

        #[arg(long)]
        start_index: Option<u32>,

        /// Extent filter as W,S,E,N
        #[arg(long)]
        bbox: Option<String>,

        /// CQL filter expression
        #[arg(long)]
        cql: Option<String>,

        /// Request GeoJSON only, without retrying as GML
        #[arg(long)]
        no_fallback: bool,
    },

    /// Print the feature types listed in the WFS capabilities
    FeatureTypes,

    /// Query the features under one pixel of a WMS image
    FeatureInfo {
        layer: String,

        /// Image extent as W,S,E,N
        #[arg(long)]
        bbox: String,

        #[arg(long, default_value_t = 256)]
        width: u32,

        #[arg(long, default_value_t = 256)]
        height: u32,

        /// Pixel column from the left
        #[arg(long)]
        x: u32,

        /// Pixel row from the top
        #[arg(long)]
        y: u32,

        #[arg(long)]
        srs: Option<String>,

        #[arg(long)]
        feature_count: Option<u32>,
    },

    /// Print the WMS tile URL template for a layer
    WmsUrl {
        layer: String,

        #[arg(long)]
        format: Option<String>,

        #[arg(long)]
        style: Option<String>,

        #[arg(long)]
        cql: Option<String>,

        #[arg(long)]
        srs: Option<String>,
    },

    /// Check that the server answers GetCapabilities
    Ping,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // stdout carries command output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = config::resolve(args.config.as_deref(), &args.connection)?;
    debug!(base_url = %config.base_url, workspace = ?config.workspace, "Resolved GeoServer settings");

    match args.command {
        Command::WmsUrl {
            layer,
            format,
            style,
            cql,
            srs,
        } => {
            let query = WmsUrlQuery {
                layer,
                format,
                style,
                cql,
                srs,
            };
            println!(
                "{}",
                commands::wms_url(&config.base_url, config.workspace.as_deref(), &query)
            );
        }
        Command::Capabilities => {
            let client = GeoServerClient::new(config)?;
            commands::capabilities(&client).await?;
        }
        Command::Features {
            type_name,
            max_features,
            start_index,
            bbox,
            cql,
            no_fallback,
        } => {
            let client = GeoServerClient::new(config)?;
            let query = FeatureQuery {
                type_name,
                max_features,
                start_index,
                bbox,
                cql,
                no_fallback,
            };
            commands::features(&client, &query).await?;
        }
        Command::FeatureTypes => {
            let client = GeoServerClient::new(config)?;
            commands::feature_types(&client).await?;
        }
        Command::FeatureInfo {
            layer,
            bbox,
            width,
            height,
            x,
            y,
            srs,
            feature_count,
        } => {
            let client = GeoServerClient::new(config)?;
            let query = FeatureInfoQuery {
                layer,
                bbox,
                width,
                height,
                x,
                y,
                srs,
                feature_count,
            };
            commands::feature_info(&client, &query).await?;
        }
        Command::Ping => {
            let client = GeoServerClient::new(config)?;
            if !commands::ping(&client).await {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
