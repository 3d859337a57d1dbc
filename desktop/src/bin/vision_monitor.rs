// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use sensor_monitor_common::config::{MonitorConfig, VisionConfig};
use sensor_monitor_common::vision::Detector;
use sensor_monitor_common::ValueStore;
use sensor_monitor_desktop::camera::{self, CameraSource};
use sensor_monitor_desktop::{app, DetectionMark, ViewModel, VisionWindow};

const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

// The light sensor is digital; sample it about once a second.
const LIGHT_SAMPLE_TICKS: u32 = 10;

fn main() -> Result<()> {
    env_logger::init();

    let config = MonitorConfig::from_env();
    config.log();
    let vision = VisionConfig::from_env();
    vision.log();

    let ui = VisionWindow::new()?;

    // Sensor side, identical to the sensor-monitor binary.
    let alert_output = app::open_alert_output(config.alert_pin)?;
    let mut source = app::build_source(&config, alert_output.clone())?;
    let updates = ValueStore::default();
    let link = ValueStore::default();
    source
        .start(updates.clone(), link.clone())
        .map_err(|err| anyhow!("failed to start sensor source: {err}"))?;

    // Detection side: camera and model are opened up front so a missing
    // model file or camera fails startup instead of a background thread.
    let detector = Detector::from_files(
        &vision.model_path,
        &vision.classes_path,
        vision.confidence_threshold,
        vision.iou_threshold,
    )
    .context("loading detector model")?;

    let mut camera_source = CameraSource::open(vision.camera_index)
        .map_err(|err| anyhow!("failed to open camera {}: {err}", vision.camera_index))?;
    camera_source
        .start()
        .map_err(|err| anyhow!("failed to start camera stream: {err}"))?;

    let frames = ValueStore::default();
    {
        let frames = frames.clone();
        thread::spawn(move || camera::capture_loop(camera_source, detector, frames));
    }

    let mut light_sensor = sensor_monitor_hardware::light_sensor(vision.light_sensor_pin)
        .map_err(|err| anyhow!("failed to open light sensor: {err}"))?;

    let ui_handle = ui.as_weak();
    let timer = slint::Timer::default();
    let mut last_update = None;
    let mut ticks: u32 = 0;

    timer.start(slint::TimerMode::Repeated, DRAIN_INTERVAL, move || {
        let ui = ui_handle.unwrap();
        let vm = ui.global::<ViewModel>();

        if let Some(update) = updates.take() {
            last_update = Some(update.received);
            app::apply_update(&vm, &update);
        }
        vm.set_status_text(app::status_text(link.peek().as_ref(), last_update).into());

        if let Some(frame) = frames.take() {
            let buffer = slint::SharedPixelBuffer::<slint::Rgb8Pixel>::clone_from_slice(
                &frame.pixels,
                frame.width,
                frame.height,
            );
            ui.set_frame(slint::Image::from_rgb8(buffer));

            let marks: Vec<DetectionMark> = frame
                .detections
                .iter()
                .map(|detection| DetectionMark {
                    x: detection.x1,
                    y: detection.y1,
                    width: detection.width(),
                    height: detection.height(),
                    label: detection.label.clone().into(),
                    score_text: slint::format!("{:.0}%", detection.score * 100.0),
                })
                .collect();
            ui.set_detections(slint::ModelRc::from(Rc::new(slint::VecModel::from(marks))));
        }

        ticks += 1;
        if ticks % LIGHT_SAMPLE_TICKS == 0 {
            let level: f32 = if light_sensor.is_bright() { 100.0 } else { 0.0 };
            vm.set_light_text(slint::format!("Light: {level} %"));
        }
    });

    ui.run()?;

    if let Ok(mut output) = alert_output.lock() {
        output.set_active(false);
    }
    Ok(())
}
