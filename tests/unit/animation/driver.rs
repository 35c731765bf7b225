use super::*;
use crate::{animation::spec::ZoomRange, raster::buffer::PixelLayout};

fn stripes(w: u32, h: u32) -> RasterImage {
    RasterImage::from_fn(w, h, PixelLayout::Rgb8, |x, y, px| {
        px.copy_from_slice(&[(x * 7) as u8, (y * 5) as u8, ((x + y) % 2 * 255) as u8]);
    })
    .unwrap()
}

struct IndexRecorder(Vec<u64>);

impl FrameSink for IndexRecorder {
    fn write_frame(&mut self, frame: &Frame) -> StillResult<()> {
        self.0.push(frame.index.0);
        Ok(())
    }
}

struct FailAt(u64);

impl FrameSink for FailAt {
    fn write_frame(&mut self, frame: &Frame) -> StillResult<()> {
        if frame.index.0 == self.0 {
            return Err(StillError::encoding("sink closed"));
        }
        Ok(())
    }
}

#[test]
fn sequential_writes_every_index_in_order() {
    let spec = AnimationSpec::new(1.0, 10, ZoomRange::default()).unwrap();
    let mut rec = IndexRecorder(Vec::new());
    let stats = animate(&stripes(8, 8), &spec, &mut rec, &AnimateThreading::default()).unwrap();
    assert_eq!(rec.0, (0..10).collect::<Vec<_>>());
    assert_eq!(stats.frames_written, 10);
    assert_eq!(stats.fps.get(), 10);
}

#[test]
fn parallel_matches_sequential() {
    let base = stripes(16, 12);
    let spec = AnimationSpec::new(1.0, 13, ZoomRange::new(1.0, 1.5).unwrap()).unwrap();

    let sequential = animate_frames(&base, &spec).unwrap();

    let mut parallel = Vec::new();
    let threading = AnimateThreading {
        parallel: true,
        chunk_size: 4,
        threads: Some(2),
    };
    animate(&base, &spec, &mut parallel, &threading).unwrap();

    assert_eq!(parallel.len(), 13);
    assert_eq!(parallel, sequential);
}

#[test]
fn zero_threads_is_rejected() {
    let spec = AnimationSpec::new(1.0, 2, ZoomRange::default()).unwrap();
    let threading = AnimateThreading {
        parallel: true,
        chunk_size: 4,
        threads: Some(0),
    };
    let err = animate(&stripes(4, 4), &spec, &mut Vec::new(), &threading).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn sink_errors_stop_the_pass() {
    let spec = AnimationSpec::new(1.0, 10, ZoomRange::default()).unwrap();
    let err = animate(
        &stripes(4, 4),
        &spec,
        &mut FailAt(3),
        &AnimateThreading::default(),
    )
    .unwrap_err();
    assert!(err.is_encoding());
}

#[test]
fn chunk_size_zero_still_progresses() {
    assert_eq!(normalized_chunk_size(0), 1);
    assert_eq!(normalized_chunk_size(64), 64);
}
