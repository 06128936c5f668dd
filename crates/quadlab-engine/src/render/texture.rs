use crate::device::Release;
use crate::pixels::{DecodedImage, PixelBuffer};

use super::error::RenderError;

const BYTES_PER_PIXEL: u32 = 4;

/// Sampler setup for a quad texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Sampling {
    /// Linear filtering, repeat addressing. Used for decoded images.
    Smooth,
    /// Nearest filtering, clamped. Used for pixel buffers so every texel
    /// stays a hard-edged block when scaled up.
    Pixelated,
}

impl Sampling {
    pub(crate) fn descriptor(self) -> wgpu::SamplerDescriptor<'static> {
        let (filter, address) = match self {
            Sampling::Smooth => (wgpu::FilterMode::Linear, wgpu::AddressMode::Repeat),
            Sampling::Pixelated => (wgpu::FilterMode::Nearest, wgpu::AddressMode::ClampToEdge),
        };
        wgpu::SamplerDescriptor {
            label: Some(match self {
                Sampling::Smooth => "quadlab smooth sampler",
                Sampling::Pixelated => "quadlab pixelated sampler",
            }),
            address_mode_u: address,
            address_mode_v: address,
            address_mode_w: address,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }
    }
}

/// RGBA8 texture plus its view and sampler.
///
/// Sized once at creation; later uploads replace the whole image.
pub struct QuadTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    width: u32,
    height: u32,
}

impl QuadTexture {
    /// Creates a texture and uploads `rgba` (tightly packed, top row first).
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
        sampling: Sampling,
    ) -> Result<Self, RenderError> {
        check_len(width, height, rgba.len())?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&sampling.descriptor());

        let tex = Self {
            texture,
            view,
            sampler,
            width,
            height,
        };
        tex.write(queue, rgba);

        log::debug!("uploaded texture {label} ({width}x{height}, {sampling:?})");
        Ok(tex)
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        sampling: Sampling,
    ) -> Result<Self, RenderError> {
        Self::from_rgba(
            device,
            queue,
            "quadlab image texture",
            image.width,
            image.height,
            &image.pixels,
            sampling,
        )
    }

    pub fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &PixelBuffer,
        sampling: Sampling,
    ) -> Result<Self, RenderError> {
        Self::from_rgba(
            device,
            queue,
            "quadlab pixel buffer texture",
            pixels.width(),
            pixels.height(),
            &pixels.to_rgba(),
            sampling,
        )
    }

    /// 1×1 fully transparent texture, bound where no overlay is configured.
    pub fn transparent(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self, RenderError> {
        Self::from_rgba(
            device,
            queue,
            "quadlab empty overlay",
            1,
            1,
            &[0, 0, 0, 0],
            Sampling::Pixelated,
        )
    }

    /// Replaces the whole image.
    pub fn upload_rgba(&self, queue: &wgpu::Queue, rgba: &[u8]) -> Result<(), RenderError> {
        check_len(self.width, self.height, rgba.len())?;
        self.write(queue, rgba);
        Ok(())
    }

    /// Replaces the whole image with the contents of `pixels`.
    pub fn upload_pixels(&self, queue: &wgpu::Queue, pixels: &PixelBuffer) -> Result<(), RenderError> {
        self.upload_rgba(queue, &pixels.to_rgba())
    }

    fn write(&self, queue: &wgpu::Queue, rgba: &[u8]) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * BYTES_PER_PIXEL),
                rows_per_image: Some(self.height),
            },
            extent(self.width, self.height),
        );
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Release for QuadTexture {
    fn release(self) {
        drop(self.view);
        drop(self.sampler);
        self.texture.release();
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

fn check_len(width: u32, height: u32, len: usize) -> Result<(), RenderError> {
    let expected = width as usize * height as usize * BYTES_PER_PIXEL as usize;
    if width == 0 || height == 0 || len != expected {
        return Err(RenderError::PixelBufferSize {
            expected,
            actual: len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_length_must_match_size() {
        assert!(check_len(640, 480, 640 * 480 * 4).is_ok());
        assert!(matches!(
            check_len(640, 480, 640 * 480 * 3),
            Err(RenderError::PixelBufferSize { expected, actual })
                if expected == 640 * 480 * 4 && actual == 640 * 480 * 3
        ));
    }

    #[test]
    fn empty_textures_are_rejected() {
        assert!(check_len(0, 10, 0).is_err());
        assert!(check_len(10, 0, 0).is_err());
    }

    #[test]
    fn images_filter_linearly_and_repeat() {
        let d = Sampling::Smooth.descriptor();
        assert_eq!(d.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(d.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(d.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(d.address_mode_v, wgpu::AddressMode::Repeat);
    }

    #[test]
    fn pixel_buffers_filter_nearest() {
        let d = Sampling::Pixelated.descriptor();
        assert_eq!(d.mag_filter, wgpu::FilterMode::Nearest);
        assert_eq!(d.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(d.address_mode_u, wgpu::AddressMode::ClampToEdge);
    }
}
