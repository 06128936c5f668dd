use wgpu::util::DeviceExt;

use crate::coords::{Rect, Viewport};
use crate::device::{Release, ReleaseQueue};
use crate::pixels::{DecodedImage, PixelBuffer};

use super::ctx::{RenderCtx, RenderTarget};
use super::error::RenderError;
use super::geometry::{QuadGeometry, QUAD_INDICES};
use super::shader::ShaderProgram;
use super::texture::{QuadTexture, Sampling};
use super::uniforms::FrameUniforms;

/// Pixel source for one of the renderer's textures.
#[derive(Debug, Copy, Clone)]
pub enum TextureInit<'a> {
    /// Decoded image; sampled smoothly and uploaded once.
    Image(&'a DecodedImage),
    /// Pixel buffer; sampled nearest and re-uploadable through
    /// [`QuadRenderer::upload_pixels`].
    Pixels(&'a PixelBuffer),
}

impl TextureInit<'_> {
    fn create(self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<QuadTexture, RenderError> {
        match self {
            TextureInit::Image(image) => QuadTexture::from_image(device, queue, image, Sampling::Smooth),
            TextureInit::Pixels(pixels) => {
                QuadTexture::from_pixels(device, queue, pixels, Sampling::Pixelated)
            }
        }
    }
}

/// GPU objects behind one quad.
///
/// Fields are declared newest-first so a plain drop also runs in reverse
/// creation order.
struct QuadParts<P, B, T, G> {
    bind_group: G,
    overlay: T,
    primary: T,
    uniforms: B,
    index_buffer: B,
    vertex_buffer: B,
    program: P,
}

impl<P, B, T, G> QuadParts<P, B, T, G>
where
    P: Release + 'static,
    B: Release + 'static,
    T: Release + 'static,
    G: Release + 'static,
{
    /// Hands every object to a queue in creation order.
    fn into_release_queue(self) -> ReleaseQueue {
        let mut queue = ReleaseQueue::new();
        queue.push_owned("shader program", self.program);
        queue.push_owned("vertex buffer", self.vertex_buffer);
        queue.push_owned("index buffer", self.index_buffer);
        queue.push_owned("uniform buffer", self.uniforms);
        queue.push_owned("primary texture", self.primary);
        queue.push_owned("overlay texture", self.overlay);
        queue.push_owned("bind group", self.bind_group);
        queue
    }
}

/// Everything one window needs to draw its quad.
///
/// Resources are created program → buffers → textures → bindings;
/// [`release`](Self::release) (or drop) tears them down in reverse.
pub struct QuadRenderer {
    parts: QuadParts<ShaderProgram, wgpu::Buffer, QuadTexture, wgpu::BindGroup>,
    has_overlay: bool,
}

impl QuadRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        program: ShaderProgram,
        geometry: &QuadGeometry,
        primary: TextureInit<'_>,
        overlay: Option<TextureInit<'_>>,
    ) -> Result<Self, RenderError> {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadlab quad vbo"),
            contents: bytemuck::cast_slice(&geometry.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadlab quad ibo"),
            contents: bytemuck::cast_slice(&geometry.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadlab frame ubo"),
            size: FrameUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let primary = primary.create(device, queue)?;

        let has_overlay = overlay.is_some();
        let overlay = match overlay {
            Some(init) => init.create(device, queue)?,
            None => QuadTexture::transparent(device, queue)?,
        };

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadlab quad bind group"),
            layout: program.bind_group_layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(primary.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(primary.sampler()),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(overlay.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(overlay.sampler()),
                },
            ],
        });

        log::debug!(
            "quad renderer ready: content {}x{}, overlay {}",
            primary.width(),
            primary.height(),
            has_overlay
        );

        Ok(Self {
            parts: QuadParts {
                bind_group,
                overlay,
                primary,
                uniforms,
                index_buffer,
                vertex_buffer,
                program,
            },
            has_overlay,
        })
    }

    /// Size of the primary texture in pixels.
    pub fn content_size(&self) -> Viewport {
        let primary = &self.parts.primary;
        Viewport::from_u32(primary.width(), primary.height())
    }

    /// Size of the overlay texture, if one was configured.
    pub fn overlay_size(&self) -> Option<Viewport> {
        let overlay = &self.parts.overlay;
        self.has_overlay
            .then(|| Viewport::from_u32(overlay.width(), overlay.height()))
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &FrameUniforms) {
        queue.write_buffer(&self.parts.uniforms, 0, bytemuck::bytes_of(uniforms));
    }

    /// Replaces the primary texture with a regenerated pixel buffer.
    pub fn upload_pixels(&self, queue: &wgpu::Queue, pixels: &PixelBuffer) -> Result<(), RenderError> {
        self.parts.primary.upload_pixels(queue, pixels)
    }

    /// Records one indexed draw of the quad into `viewport` (surface pixels).
    pub fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, viewport: Rect) {
        let Some(vp) = clamp_viewport(viewport, ctx.surface) else {
            return;
        };
        let parts = &self.parts;

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quadlab quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(vp.origin.x, vp.origin.y, vp.size.x, vp.size.y, 0.0, 1.0);
        rpass.set_pipeline(parts.program.pipeline());
        rpass.set_bind_group(0, &parts.bind_group, &[]);
        rpass.set_vertex_buffer(0, parts.vertex_buffer.slice(..));
        rpass.set_index_buffer(parts.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }

    /// Releases every GPU object, newest first, and returns the labels in
    /// release order.
    pub fn release(self) -> Vec<&'static str> {
        self.parts.into_release_queue().release_all()
    }
}

/// Clips `viewport` to the surface; `None` when nothing is left to draw.
fn clamp_viewport(viewport: Rect, surface: Viewport) -> Option<Rect> {
    if !viewport.is_finite() || !surface.is_valid() {
        return None;
    }
    let x0 = viewport.origin.x.clamp(0.0, surface.width);
    let y0 = viewport.origin.y.clamp(0.0, surface.height);
    let max = viewport.max();
    let x1 = max.x.clamp(0.0, surface.width);
    let y1 = max.y.clamp(0.0, surface.height);
    let clipped = Rect::new(x0, y0, x1 - x0, y1 - y0);
    (!clipped.is_empty()).then_some(clipped)
}
