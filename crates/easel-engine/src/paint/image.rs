use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Error returned by [`Image::from_premul_rgba8`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageError(pub String);

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image error: {}", self.0)
    }
}

impl std::error::Error for ImageError {}

/// Process-unique image identity, used as the GPU texture cache key.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageId(u64);

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Immutable CPU bitmap: premultiplied RGBA8, row-major, no padding.
///
/// Cloning is cheap (pixels are shared). Two clones keep the same [`ImageId`],
/// so the image renderer uploads the texture only once.
#[derive(Debug, Clone)]
pub struct Image {
    id: ImageId,
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Image {
    /// Wraps premultiplied RGBA8 pixels.
    ///
    /// Fails if either dimension is zero or `pixels.len() != width * height * 4`.
    pub fn from_premul_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError(format!("zero-sized image ({width}x{height})")));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ImageError(format!(
                "expected {expected} bytes for {width}x{height} RGBA8, got {}",
                pixels.len()
            )));
        }

        Ok(Self {
            id: ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
            pixels: pixels.into(),
        })
    }

    #[inline]
    pub fn id(&self) -> ImageId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = Image::from_premul_rgba8(2, 2, vec![0; 15]).unwrap_err();
        assert!(err.to_string().contains("expected 16 bytes"));
    }

    #[test]
    fn rejects_zero_size() {
        assert!(Image::from_premul_rgba8(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn clones_share_identity_and_new_images_do_not() {
        let a = Image::from_premul_rgba8(1, 1, vec![0, 0, 0, 255]).unwrap();
        let b = a.clone();
        let c = Image::from_premul_rgba8(1, 1, vec![0, 0, 0, 255]).unwrap();
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
        assert_eq!(a.pixels(), &[0, 0, 0, 255]);
    }
}
