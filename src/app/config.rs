//! Resolved server configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::cli::ServeArgs;
use crate::error::AppError;
use crate::plot::PlotSize;

/// Public URL prefix rendered images are served under.
pub const STATIC_URL_PREFIX: &str = "/static";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
    pub plot_size: PlotSize,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn from_args(args: &ServeArgs) -> Result<Self, AppError> {
        let ip: IpAddr = args
            .bind
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("bind address '{}': {e}", args.bind)))?;

        Ok(Self {
            addr: SocketAddr::new(ip, args.port),
            static_dir: args.static_dir.clone(),
            plot_size: plot_size(args.width, args.height)?,
            max_upload_bytes: args.max_upload_bytes.max(1024),
        })
    }
}

/// Validate image dimensions.
pub fn plot_size(width: u32, height: u32) -> Result<PlotSize, AppError> {
    if !(200..=8000).contains(&width) || !(150..=8000).contains(&height) {
        return Err(AppError::Config(format!(
            "image size {width}x{height} is outside 200x150..8000x8000"
        )));
    }
    Ok(PlotSize { width, height })
}
