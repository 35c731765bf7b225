use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{
    raster::{buffer::RasterImage, decode::load_image},
    source::{ImageSource, ImageSourceError},
};

/// Returns the same still for every prompt. Useful offline and in tests.
#[derive(Clone, Debug)]
pub struct FileImageSource {
    path: PathBuf,
    image: RasterImage,
}

impl FileImageSource {
    /// Read and decode the still once. Failures surface as unavailable.
    pub fn load(path: &Path) -> Result<Self, ImageSourceError> {
        let image = load_image(path).map_err(|e| ImageSourceError::unavailable(e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            image,
        })
    }

    /// Serve an image already in memory.
    pub fn from_image(image: RasterImage) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            image,
        }
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    fn describe(&self) -> String {
        format!(
            "file still '{}' ({}x{})",
            self.path.display(),
            self.image.width(),
            self.image.height()
        )
    }

    async fn synthesize(&self, prompt: &str) -> Result<RasterImage, ImageSourceError> {
        tracing::debug!(prompt, "serving fixed still");
        Ok(self.image.clone())
    }
}
