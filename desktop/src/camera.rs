use std::thread;
use std::time::Duration;

use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::{Camera, NokhwaError};
use sensor_monitor_common::vision::{AnnotatedFrame, Detector};
use sensor_monitor_common::ValueStore;

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;

/// A capture device delivering RGB frames at the fixed monitor resolution
/// (the driver picks the closest format it can).
pub struct CameraSource {
    camera: Camera,
}

impl CameraSource {
    pub fn open(index: u32) -> Result<Self, NokhwaError> {
        let format = CameraFormat::new(
            Resolution::new(FRAME_WIDTH, FRAME_HEIGHT),
            FrameFormat::MJPEG,
            30,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));
        let camera = Camera::new(CameraIndex::Index(index), requested)?;
        Ok(Self { camera })
    }

    pub fn start(&mut self) -> Result<(), NokhwaError> {
        self.camera.open_stream()
    }

    pub fn grab(&mut self) -> Result<RgbImage, NokhwaError> {
        let frame = self.camera.frame()?;
        frame.decode_image::<RgbFormat>()
    }
}

/// Capture loop: grab a frame, run the detector, publish the annotated
/// frame for the UI to drain. A failed grab or decode is logged and the
/// frame skipped.
pub fn capture_loop(
    mut camera: CameraSource,
    mut detector: Detector,
    frames: ValueStore<AnnotatedFrame>,
) {
    loop {
        let frame = match camera.grab() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("camera read failed, skipping frame: {err}");
                thread::sleep(Duration::from_millis(100));
                continue;
            }
        };

        let detections = match detector.detect(&frame) {
            Ok(detections) => detections,
            Err(err) => {
                log::warn!("detector error: {err}");
                Vec::new()
            }
        };

        frames.set(AnnotatedFrame {
            width: frame.width(),
            height: frame.height(),
            pixels: frame.into_raw(),
            detections,
        });
    }
}
