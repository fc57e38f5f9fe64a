mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use swgl_device::state::{
    AddressAxis, AddressMode, DrawType, FilterType, IndexFormat, PrimitiveType, SamplerType,
    Viewport,
};
use swgl_device::{
    Device, DeviceConfig, DeviceError, ErrorCategory, Format, PipelineViewport, Rect,
    ShaderStage,
};

use common::{init_tracing, surface, Call, RecordingPipeline, TestShader};

fn triangles() -> DrawType {
    DrawType::indexed(PrimitiveType::TriangleList, IndexFormat::U16)
}

fn device_with_viewport(width: i32, height: i32) -> Device<RecordingPipeline> {
    let mut device = Device::new(RecordingPipeline::new());
    device.set_viewport(Viewport {
        width,
        height,
        ..Viewport::default()
    });
    device
}

#[test]
fn draw_forwards_bindings_in_order() {
    init_tracing();
    let mut device = device_with_viewport(64, 64);
    let rt = surface(32, 32, Format::A8R8G8B8);
    device.set_render_target(0, Some(&rt)).unwrap();

    device.draw_indexed_primitive(triangles(), 3, 2);
    let viewport = PipelineViewport {
        x0: 0.0,
        y0: 0.0,
        width: 64.0,
        height: 64.0,
        min_z: 0.0,
        max_z: 1.0,
    };
    assert_eq!(
        device.pipeline_mut().take(),
        vec![
            Call::SetRenderTarget {
                index: 0,
                bound: true
            },
            Call::SetScissor(Rect::new(0, 0, 32, 32)),
            Call::SetViewport(viewport),
            Call::SetShader {
                stage: ShaderStage::Pixel,
                bound: false
            },
            Call::SetShader {
                stage: ShaderStage::Vertex,
                bound: false
            },
            Call::Draw {
                draw_type: triangles(),
                index_offset: 3,
                primitive_count: 2
            },
        ]
    );

    device.draw_indexed_primitive(triangles(), 0, 1);
    assert_eq!(
        device.pipeline_mut().take(),
        vec![
            Call::SetScissor(Rect::new(0, 0, 32, 32)),
            Call::SetViewport(viewport),
            Call::Draw {
                draw_type: triangles(),
                index_offset: 0,
                primitive_count: 1
            },
        ]
    );
}

#[test]
fn zero_area_viewport_skips_everything() {
    let mut device = device_with_viewport(0, 16);
    device.set_pixel_shader(Some(TestShader::new(1)));

    assert!(!device.bind_resources());
    device.draw_indexed_primitive(triangles(), 0, 4);
    device.draw_primitive(DrawType::non_indexed(PrimitiveType::PointList), 4);
    assert!(device.pipeline().calls.is_empty());
}

#[test]
fn degenerate_scissor_skips_the_draw() {
    let mut device = device_with_viewport(16, 16);
    device.set_scissor_enable(true);
    device.set_scissor_rect(Rect::new(8, 8, 8, 12));

    device.draw_indexed_primitive(triangles(), 0, 1);
    assert!(device.pipeline().calls.is_empty());
}

#[test]
fn scissor_is_clipped_to_targets() {
    let mut device = device_with_viewport(64, 64);
    let rt = surface(32, 32, Format::A8R8G8B8);
    let depth = surface(24, 40, Format::D32FLockable);
    device.set_render_target(0, Some(&rt)).unwrap();
    device.set_depth_buffer(Some(&depth));
    device.set_scissor_enable(true);
    device.set_scissor_rect(Rect::new(4, 4, 100, 100));
    device.pipeline_mut().take();

    assert!(device.bind_resources());
    assert_eq!(
        device.pipeline().calls[0],
        Call::SetScissor(Rect::new(4, 4, 24, 32))
    );
}

#[test]
fn far_off_screen_viewport_clips_to_nothing() {
    let mut device = Device::new(RecordingPipeline::new());
    let rt = surface(32, 32, Format::A8R8G8B8);
    device.set_render_target(0, Some(&rt)).unwrap();
    device.set_viewport(Viewport {
        x0: i32::MAX - 1,
        width: 10,
        height: 10,
        ..Viewport::default()
    });
    device.pipeline_mut().take();

    assert!(device.bind_resources());
    let Call::SetScissor(clip) = &device.pipeline().calls[0] else {
        panic!("expected the clip rectangle first");
    };
    assert!(clip.is_empty());
}

#[test]
fn zero_primitives_binds_but_does_not_draw() {
    let mut device = device_with_viewport(8, 8);
    device.draw_indexed_primitive(triangles(), 0, 0);
    device.draw_primitive(DrawType::non_indexed(PrimitiveType::LineList), 0);

    let pipeline = device.pipeline();
    assert_eq!(pipeline.draws(), 0);
    assert!(!pipeline.calls.contains(&Call::ClearIndexBuffer));
    assert!(pipeline
        .calls
        .iter()
        .any(|call| matches!(call, Call::SetScissor(_))));
}

#[test]
fn non_indexed_draw_drops_the_index_buffer_first() {
    let mut device = device_with_viewport(8, 8);
    let draw_type = DrawType::non_indexed(PrimitiveType::TriangleStrip);
    device.draw_primitive(draw_type, 5);

    let calls = device.pipeline_mut().take();
    assert_eq!(
        &calls[calls.len() - 2..],
        &[
            Call::ClearIndexBuffer,
            Call::Draw {
                draw_type,
                index_offset: 0,
                primitive_count: 5
            }
        ]
    );
}

#[test]
fn bindings_hold_references_until_released() {
    let rt = surface(4, 4, Format::A8R8G8B8);
    let depth = surface(4, 4, Format::D24S8);
    {
        let mut device = Device::new(RecordingPipeline::new());
        device.set_render_target(1, Some(&rt)).unwrap();
        device.set_depth_buffer(Some(&depth));
        device.set_stencil_buffer(Some(&depth));
        assert_eq!(Arc::strong_count(&rt), 2);
        assert_eq!(Arc::strong_count(&depth), 3);

        device.set_render_target(1, None).unwrap();
        assert_eq!(Arc::strong_count(&rt), 1);
        assert!(device.bindings().render_target(1).is_none());

        device.set_render_target(2, Some(&rt)).unwrap();
    }
    assert_eq!(Arc::strong_count(&rt), 1);
    assert_eq!(Arc::strong_count(&depth), 1);
}

#[test]
fn rebinding_the_same_depth_target_is_not_forwarded() {
    let mut device = Device::new(RecordingPipeline::new());
    let depth = surface(4, 4, Format::D24S8);
    device.set_depth_buffer(Some(&depth));
    device.set_depth_buffer(Some(&depth));
    device.set_stencil_buffer(None);

    assert_eq!(
        device.pipeline().calls,
        vec![Call::SetDepthBuffer { bound: true }]
    );
    assert_eq!(Arc::strong_count(&depth), 2);

    // Color slots are always re-applied.
    let rt = surface(4, 4, Format::A8R8G8B8);
    device.pipeline_mut().take();
    device.set_render_target(0, Some(&rt)).unwrap();
    device.set_render_target(0, Some(&rt)).unwrap();
    assert_eq!(device.pipeline().calls.len(), 2);
    assert_eq!(Arc::strong_count(&rt), 2);
}

#[test]
fn render_target_index_is_checked() {
    let mut device = Device::new(RecordingPipeline::new());
    let rt = surface(4, 4, Format::A8R8G8B8);

    let err = device.set_render_target(8, Some(&rt)).unwrap_err();
    assert_eq!(
        err,
        DeviceError::RenderTargetIndexOutOfRange { index: 8, max: 7 }
    );
    assert!(device.pipeline().calls.is_empty());
    assert_eq!(Arc::strong_count(&rt), 1);
}

#[test]
fn sampler_indices_are_checked() {
    let mut device = Device::new(RecordingPipeline::new());

    device
        .set_texture_filter(SamplerType::Pixel, 15, FilterType::Linear)
        .unwrap();
    device
        .set_address_mode(SamplerType::Vertex, 3, AddressAxis::V, AddressMode::Mirror)
        .unwrap();
    device
        .set_border_color(SamplerType::Vertex, 3, 0xFF00_FF00)
        .unwrap();
    let err = device
        .set_texture_filter(SamplerType::Vertex, 4, FilterType::Linear)
        .unwrap_err();

    assert_eq!(
        err,
        DeviceError::SamplerIndexOutOfRange {
            kind: "vertex",
            index: 4,
            max: 3
        }
    );
    assert_eq!(err.category(), ErrorCategory::InvalidParameters);
    assert_eq!(
        device
            .sampler_state(SamplerType::Pixel, 15)
            .unwrap()
            .filter,
        FilterType::Linear
    );
    let vertex = device.sampler_state(SamplerType::Vertex, 3).unwrap();
    assert_eq!(vertex.address_v, AddressMode::Mirror);
    assert_eq!(vertex.border_color, 0xFF00_FF00);
    assert!(device.sampler_state(SamplerType::Pixel, 16).is_err());
}

#[test]
fn clip_plane_indices_are_checked() {
    let mut device = Device::new(RecordingPipeline::new());
    device.set_clip_plane(5, [0.0, 1.0, 0.0, -2.0]).unwrap();

    assert_eq!(
        device.set_clip_plane(6, [1.0; 4]),
        Err(DeviceError::ClipPlaneIndexOutOfRange { index: 6, max: 5 })
    );
    assert_eq!(device.render_state().clip_planes[5], [0.0, 1.0, 0.0, -2.0]);
}

#[test]
fn surface_height_is_limited() {
    let device = Device::new(RecordingPipeline::new());
    let err = device
        .create_render_target(16, 8193, Format::A8R8G8B8, 1, false)
        .unwrap_err();
    assert_eq!(
        err,
        DeviceError::SurfaceTooLarge {
            width: 16,
            height: 8193,
            max_height: 8192
        }
    );
    assert!(device
        .create_depth_stencil_surface(16, 8193, Format::D24S8, 1, false)
        .is_err());

    let small = Device::with_config(
        RecordingPipeline::new(),
        DeviceConfig {
            max_surface_height: 32,
            ..DeviceConfig::default()
        },
    );
    assert!(small
        .create_render_target(4, 33, Format::A8R8G8B8, 1, true)
        .is_err());
    let rt = small
        .create_render_target(4, 32, Format::A8R8G8B8, 4, true)
        .unwrap();
    assert_eq!(rt.sample_count(), 4);
    assert!(rt.is_lockable());
}

#[test]
fn depth_stencil_lockability_follows_format() {
    let device = Device::new(RecordingPipeline::new());
    let lockable = device
        .create_depth_stencil_surface(8, 8, Format::D32FS8Texture, 1, true)
        .unwrap();
    let private = device
        .create_depth_stencil_surface(8, 8, Format::D24S8, 1, false)
        .unwrap();

    assert!(lockable.is_lockable());
    assert!(lockable.stencil().is_some());
    assert!(!private.is_lockable());
    assert_eq!(
        device
            .create_depth_stencil_surface(8, 8, Format::X8R8G8B8, 1, false)
            .unwrap_err(),
        DeviceError::NotDepthStencil(Format::X8R8G8B8)
    );
}

#[test]
fn empty_surfaces_are_rejected() {
    let device = Device::new(RecordingPipeline::new());
    assert!(matches!(
        device.create_render_target(0, 4, Format::A8R8G8B8, 1, false),
        Err(DeviceError::EmptySurface { .. })
    ));
}

#[test]
fn finish_synchronizes_the_pipeline() {
    let mut device = Device::new(RecordingPipeline::new());
    device.finish();
    assert_eq!(device.pipeline().calls, vec![Call::Synchronize]);
}
