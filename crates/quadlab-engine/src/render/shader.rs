use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::device::Release;

use super::error::{RenderError, ShaderStage};
use super::geometry::QuadVertex;
use super::uniforms::FrameUniforms;

/// Vertex stage entry point every program must define.
pub const VS_ENTRY: &str = "vs_main";
/// Fragment stage entry point every program must define.
pub const FS_ENTRY: &str = "fs_main";

/// Where a program's WGSL text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderSource {
    Files { vertex: PathBuf, fragment: PathBuf },
    Inline {
        vertex: Cow<'static, str>,
        fragment: Cow<'static, str>,
    },
}

impl ShaderSource {
    pub fn files(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self::Files {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn inline(vertex: impl Into<Cow<'static, str>>, fragment: impl Into<Cow<'static, str>>) -> Self {
        Self::Inline {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Reads the WGSL text of both stages.
    pub fn load(&self) -> Result<ShaderCode, RenderError> {
        match self {
            Self::Files { vertex, fragment } => Ok(ShaderCode {
                vertex: read_stage(ShaderStage::Vertex, vertex)?,
                fragment: read_stage(ShaderStage::Fragment, fragment)?,
            }),
            Self::Inline { vertex, fragment } => Ok(ShaderCode {
                vertex: vertex.to_string(),
                fragment: fragment.to_string(),
            }),
        }
    }
}

fn read_stage(stage: ShaderStage, path: &Path) -> Result<String, RenderError> {
    let text = std::fs::read_to_string(path).map_err(|source| RenderError::ShaderRead {
        stage,
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {stage} shader {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

/// WGSL text of a vertex/fragment pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderCode {
    pub vertex: String,
    pub fragment: String,
}

/// Compiled and linked vertex/fragment pair with the fixed quad bindings.
///
/// Group 0:
/// - 0: [`FrameUniforms`] (vertex + fragment)
/// - 1: primary texture, 2: primary sampler
/// - 3: overlay texture, 4: overlay sampler
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl ShaderProgram {
    /// Compiles both stages and links them into a render pipeline.
    ///
    /// Each step runs inside its own validation error scope so failures
    /// surface here instead of through the device's uncaptured error handler.
    pub fn build(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        code: &ShaderCode,
    ) -> Result<Self, RenderError> {
        let vs = compile_stage(device, ShaderStage::Vertex, &code.vertex)?;
        let fs = compile_stage(device, ShaderStage::Fragment, &code.fragment)?;

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quadlab quad bgl"),
            entries: &layout_entries(),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quadlab quad pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quadlab quad pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(VS_ENTRY),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(FS_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(RenderError::ShaderLink {
                message: err.to_string(),
            });
        }

        log::info!("shader program built ({surface_format:?})");

        Ok(Self {
            pipeline,
            bind_group_layout,
        })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}

impl Release for ShaderProgram {
    fn release(self) {
        self.pipeline.release();
        drop(self.bind_group_layout);
    }
}

fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, RenderError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "quadlab vertex shader",
            ShaderStage::Fragment => "quadlab fragment shader",
        }),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(scope.pop()) {
        Some(err) => Err(RenderError::ShaderCompile {
            stage,
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

pub(super) fn layout_entries() -> [wgpu::BindGroupLayoutEntry; 5] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: FrameUniforms::min_binding_size(),
            },
            count: None,
        },
        texture_entry(1),
        sampler_entry(2),
        texture_entry(3),
        sampler_entry(4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── sources ───────────────────────────────────────────────────────────

    #[test]
    fn inline_source_loads_verbatim() {
        let code = ShaderSource::inline("// vs", "// fs").load().unwrap();
        assert_eq!(code.vertex, "// vs");
        assert_eq!(code.fragment, "// fs");
    }

    #[test]
    fn file_source_reads_both_stages() {
        let dir = tempfile::tempdir().unwrap();
        let vs = dir.path().join("vertex.wgsl");
        let fs = dir.path().join("fragment.wgsl");
        std::fs::write(&vs, "@vertex fn vs_main() {}").unwrap();
        std::fs::write(&fs, "@fragment fn fs_main() {}").unwrap();

        let code = ShaderSource::files(&vs, &fs).load().unwrap();
        assert!(code.vertex.contains(VS_ENTRY));
        assert!(code.fragment.contains(FS_ENTRY));
    }

    #[test]
    fn missing_fragment_file_names_stage_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let vs = dir.path().join("vertex.wgsl");
        std::fs::write(&vs, "").unwrap();
        let fs = dir.path().join("nope.wgsl");

        let err = ShaderSource::files(&vs, &fs).load().unwrap_err();
        match &err {
            RenderError::ShaderRead { stage, path, .. } => {
                assert_eq!(*stage, ShaderStage::Fragment);
                assert_eq!(path, &fs);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("fragment"));
        assert!(msg.contains("nope.wgsl"));
    }

    // ── bindings ──────────────────────────────────────────────────────────

    #[test]
    fn layout_has_uniforms_then_two_texture_sampler_pairs() {
        let entries = layout_entries();
        let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(bindings, vec![0, 1, 2, 3, 4]);

        assert!(matches!(entries[0].ty, wgpu::BindingType::Buffer { .. }));
        assert_eq!(entries[0].visibility, wgpu::ShaderStages::VERTEX_FRAGMENT);
        for i in [1, 3] {
            assert!(matches!(entries[i].ty, wgpu::BindingType::Texture { .. }));
        }
        for i in [2, 4] {
            assert!(matches!(entries[i].ty, wgpu::BindingType::Sampler(_)));
        }
    }
}
