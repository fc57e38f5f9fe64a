mod common;

use proptest::prelude::*;
use swgl_device::{CopyFlags, Device, Format, SliceRect};

use common::{patterned, surface, RecordingPipeline};

fn mirrored(width: i32, height: i32, flip_x: bool, flip_y: bool) -> SliceRect {
    let (x0, x1) = if flip_x { (width, 0) } else { (0, width) };
    let (y0, y1) = if flip_y { (height, 0) } else { (0, height) };
    SliceRect::new(x0, y0, x1, y1, 0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn flipping_twice_restores_the_source(
        width in 1u32..24,
        height in 1u32..24,
        flip_x in any::<bool>(),
        flip_y in any::<bool>(),
        format in prop_oneof![
            Just(Format::L8),
            Just(Format::R5G6B5),
            Just(Format::A8R8G8B8),
            Just(Format::A16B16G16R16F),
        ],
    ) {
        let mut device = Device::new(RecordingPipeline::new());
        let src = patterned(width, height, format);
        let tmp = surface(width, height, format);
        let back = surface(width, height, format);
        let (w, h) = (width as i32, height as i32);

        device
            .copy_region(
                Some(&*src),
                Some(SliceRect::new(0, 0, w, h, 0)),
                Some(&*tmp),
                Some(mirrored(w, h, flip_x, flip_y)),
                CopyFlags::COLOR_BUFFER,
            )
            .unwrap();
        device
            .copy_region(
                Some(&*tmp),
                Some(SliceRect::new(0, 0, w, h, 0)),
                Some(&*back),
                Some(mirrored(w, h, flip_x, flip_y)),
                CopyFlags::COLOR_BUFFER,
            )
            .unwrap();

        prop_assert_eq!(back.internal().snapshot(), src.internal().snapshot());
        // Raw paths only: nothing reached the converting blitter.
        prop_assert!(device.pipeline().calls.is_empty());
    }

    #[test]
    fn single_flip_mirrors_columns(width in 1u32..16, height in 1u32..16) {
        let mut device = Device::new(RecordingPipeline::new());
        let src = patterned(width, height, Format::A8B8G8R8);
        let dst = surface(width, height, Format::A8B8G8R8);
        let (w, h) = (width as i32, height as i32);

        device
            .copy_region(
                Some(&*src),
                None,
                Some(&*dst),
                Some(mirrored(w, h, true, false)),
                CopyFlags::COLOR_BUFFER,
            )
            .unwrap();

        for y in 0..height {
            for x in 0..width {
                prop_assert_eq!(dst.texel(x, y, 0), src.texel(width - 1 - x, y, 0));
            }
        }
    }
}
