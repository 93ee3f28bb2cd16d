//! Cover image download and decoding.
//!
//! Covers are fetched once per game and decoded to RGBA on the runtime, then
//! uploaded as textures on the UI thread.

use thiserror::Error;

use crate::catalog::USER_AGENT;

/// Decoded cover pixels, ready to become a texture
#[derive(Debug, Clone, PartialEq)]
pub struct CoverImage {
    pub width: u32,
    pub height: u32,
    /// Unmultiplied RGBA, row-major
    pub pixels: Vec<u8>,
}

impl CoverImage {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Cover request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cover server returned {0}")]
    Status(reqwest::StatusCode),

    #[error("Cover is not a supported image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decode PNG or JPEG bytes
pub fn decode_cover(bytes: &[u8]) -> Result<CoverImage, CoverError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    Ok(CoverImage {
        width: image.width(),
        height: image.height(),
        pixels: image.into_raw(),
    })
}

/// HTTP client for cover requests
pub fn cover_client() -> Result<reqwest::Client, CoverError> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}

/// Download and decode one cover
pub async fn fetch_cover(client: &reqwest::Client, url: &str) -> Result<CoverImage, CoverError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(CoverError::Status(response.status()));
    }

    let bytes = response.bytes().await?;
    decode_cover(&bytes)
}
