//! GPU-side image resources.
//!
//! Uploading is split from pixel extraction: [`Texture::upload`] takes
//! whatever the backend accepts as a pixel source, while the desktop-only
//! constructors first flatten a decoded image into tightly packed RGBA8
//! bytes (row-major, top row first).

use crate::backend::Backend;
use crate::consts;
use crate::error::GgError;
use crate::registry::Registered;

/// An immutable image living on the GPU.
///
/// Shared by any number of sprites; see [`crate::sprite::Sprite`].
#[derive(Debug)]
pub struct Texture<B: Backend> {
    handle: B::Texture,
    width: u32,
    height: u32,
}

impl<B: Backend> Texture<B> {
    /// Creates a texture and uploads `pixels` into it.
    ///
    /// Sampling always clamps to the edge and filters linearly in both
    /// directions; no mipmaps are generated. Backends whose pixel source is
    /// self-describing ignore `width` and `height` during the upload, but the
    /// texture still reports them.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Resource` if the texture cannot be created or the
    /// upload is rejected.
    pub fn upload(
        backend: Registered<'_, B>,
        width: u32,
        height: u32,
        pixels: &B::PixelSource,
    ) -> Result<Self, GgError> {
        let w = i32::try_from(width)
            .map_err(|_| GgError::Resource(format!("texture width {width} too large")))?;
        let h = i32::try_from(height)
            .map_err(|_| GgError::Resource(format!("texture height {height} too large")))?;

        let handle = backend.create_texture()?;
        backend.active_texture(consts::TEXTURE0);
        backend.bind_texture(consts::TEXTURE_2D, Some(&handle));
        if let Err(e) = backend.tex_image_2d(
            consts::TEXTURE_2D,
            0,
            consts::RGBA,
            w,
            h,
            0,
            consts::RGBA,
            consts::UNSIGNED_BYTE,
            pixels,
        ) {
            backend.bind_texture(consts::TEXTURE_2D, None);
            backend.delete_texture(handle);
            return Err(e);
        }
        for (pname, param) in [
            (consts::TEXTURE_WRAP_S, consts::CLAMP_TO_EDGE),
            (consts::TEXTURE_WRAP_T, consts::CLAMP_TO_EDGE),
            (consts::TEXTURE_MAG_FILTER, consts::LINEAR),
            (consts::TEXTURE_MIN_FILTER, consts::LINEAR),
        ] {
            backend.tex_parameteri(consts::TEXTURE_2D, pname, param);
        }

        log::debug!("gg: uploaded {width}x{height} texture {handle:?}");
        Ok(Self {
            handle,
            width,
            height,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The backend's texture object.
    pub fn handle(&self) -> &B::Texture {
        &self.handle
    }

    /// Releases the GPU texture.
    pub fn destroy(self, backend: Registered<'_, B>) {
        backend.delete_texture(self.handle);
    }
}

impl<B: Backend<PixelSource = [u8]>> Texture<B> {
    /// Uploads tightly packed RGBA8 bytes.
    ///
    /// # Errors
    ///
    /// Returns `GgError::Resource` if `rgba` is not `width * height * 4`
    /// bytes long or the upload fails.
    pub fn from_rgba8(
        backend: Registered<'_, B>,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Self, GgError> {
        let expected = u64::from(width) * u64::from(height) * 4;
        if rgba.len() as u64 != expected {
            return Err(GgError::Resource(format!(
                "texture: {width}x{height} RGBA needs {expected} bytes, got {}",
                rgba.len()
            )));
        }
        Self::upload(backend, width, height, rgba)
    }
}

#[cfg(feature = "png")]
mod decode {
    use std::path::Path;

    use image::DynamicImage;

    use super::Texture;
    use crate::backend::Backend;
    use crate::error::GgError;
    use crate::registry::Registered;

    /// Flattens an image into packed, alpha-premultiplied RGBA8.
    ///
    /// Each color channel is scaled by alpha at 16-bit precision and then
    /// narrowed to its high byte, so a half-transparent white pixel packs to
    /// `[128, 128, 128, 128]`.
    pub fn pack_rgba8(img: &DynamicImage) -> Vec<u8> {
        img.to_rgba16()
            .pixels()
            .flat_map(|p| {
                let [r, g, b, a] = p.0.map(u32::from);
                let premultiply = |c: u32| ((c * a / 0xFFFF) >> 8) as u8;
                [premultiply(r), premultiply(g), premultiply(b), (a >> 8) as u8]
            })
            .collect()
    }

    impl<B: Backend<PixelSource = [u8]>> Texture<B> {
        /// Uploads a decoded image.
        ///
        /// # Errors
        ///
        /// Returns `GgError::Resource` if the upload fails.
        pub fn from_image(
            backend: Registered<'_, B>,
            img: &DynamicImage,
        ) -> Result<Self, GgError> {
            Self::from_rgba8(backend, img.width(), img.height(), &pack_rgba8(img))
        }

        /// Decodes encoded image bytes (PNG) and uploads them.
        ///
        /// # Errors
        ///
        /// Returns `GgError::Decode` if the bytes are not a supported image.
        pub fn from_png_bytes(
            backend: Registered<'_, B>,
            bytes: &[u8],
        ) -> Result<Self, GgError> {
            let img =
                image::load_from_memory(bytes).map_err(|e| GgError::Decode(e.to_string()))?;
            Self::from_image(backend, &img)
        }

        /// Reads and decodes an image file, then uploads it.
        ///
        /// # Errors
        ///
        /// Returns `GgError::Decode` if the file cannot be read or decoded.
        pub fn open(backend: Registered<'_, B>, path: &Path) -> Result<Self, GgError> {
            let img = image::open(path)
                .map_err(|e| GgError::Decode(format!("{}: {e}", path.display())))?;
            Self::from_image(backend, &img)
        }
    }
}

#[cfg(feature = "png")]
pub use decode::pack_rgba8;
