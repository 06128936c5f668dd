use crate::render::RenderError;

/// Produces the color of one pixel.
///
/// Implementations must be pure: the same `(x, y, frame)` always yields the
/// same bytes, so a buffer regenerated with the same counter is identical.
pub trait PixelGenerator {
    fn pixel(&self, x: u32, y: u32, frame: u64) -> [u8; 3];
}

impl<F> PixelGenerator for F
where
    F: Fn(u32, u32, u64) -> [u8; 3],
{
    fn pixel(&self, x: u32, y: u32, frame: u64) -> [u8; 3] {
        self(x, y, frame)
    }
}

/// RGB8 pixel array, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub const CHANNELS: usize = 3;

    /// Black buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * Self::CHANNELS],
        }
    }

    /// Wraps existing RGB8 bytes, checking the length against the size.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize * Self::CHANNELS;
        if data.len() != expected {
            return Err(RenderError::PixelBufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
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
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Regenerates every pixel from `generator` for the given frame counter.
    pub fn fill(&mut self, generator: &dyn PixelGenerator, frame: u64) {
        let width = self.width as usize;
        for (i, px) in self.data.chunks_exact_mut(Self::CHANNELS).enumerate() {
            let x = (i % width) as u32;
            let y = (i / width) as u32;
            px.copy_from_slice(&generator.pixel(x, y, frame));
        }
    }

    /// RGBA8 copy of the buffer with opaque alpha.
    pub fn to_rgba(&self) -> Vec<u8> {
        expand_to_rgba(&self.data, Self::CHANNELS)
    }
}

/// Expands 1-, 2-, 3- or 4-channel 8-bit pixels to RGBA8.
///
/// Gray is replicated into RGB; a second channel is treated as alpha.
/// Four-channel input is returned as is.
pub fn expand_to_rgba(pixels: &[u8], channels: usize) -> Vec<u8> {
    match channels {
        4 => pixels.to_vec(),
        3 => {
            let mut rgba = Vec::with_capacity(pixels.len() / 3 * 4);
            for rgb in pixels.chunks_exact(3) {
                rgba.extend_from_slice(rgb);
                rgba.push(u8::MAX);
            }
            rgba
        }
        2 => {
            let mut rgba = Vec::with_capacity(pixels.len() * 2);
            for la in pixels.chunks_exact(2) {
                rgba.extend_from_slice(&[la[0], la[0], la[0], la[1]]);
            }
            rgba
        }
        1 => {
            let mut rgba = Vec::with_capacity(pixels.len() * 4);
            for &l in pixels {
                rgba.extend_from_slice(&[l, l, l, u8::MAX]);
            }
            rgba
        }
        _ => {
            log::warn!("unsupported channel count {channels}; producing an empty image");
            Vec::new()
        }
    }
}
