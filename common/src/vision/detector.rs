use std::io;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::RgbImage;
use ndarray::{s, Array4, Axis};
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;
use thiserror::Error;

use crate::vision::{load_class_names, Detection};

/// Side length of the square detector input.
const INPUT_SIZE: u32 = 640;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("onnx runtime error: {0}")]
    Onnx(#[from] ort::Error),
    #[error("failed to read class list {path}: {source}")]
    Classes { path: PathBuf, source: io::Error },
}

/// An ONNX bounding-box detector in the Ultralytics export layout: input
/// `images` of shape `1x3x640x640`, output `output0` of shape
/// `1x(4+classes)xN`. Both model artifacts are read once at construction.
pub struct Detector {
    session: Session,
    class_names: Vec<String>,
    confidence_threshold: f32,
    iou_threshold: f32,
}

impl Detector {
    pub fn from_files(
        model_path: &Path,
        classes_path: &Path,
        confidence_threshold: f32,
        iou_threshold: f32,
    ) -> Result<Self, DetectorError> {
        let class_names =
            load_class_names(classes_path).map_err(|source| DetectorError::Classes {
                path: classes_path.to_path_buf(),
                source,
            })?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)?;

        log::info!(
            "loaded detector from {} with {} classes",
            model_path.display(),
            class_names.len()
        );

        Ok(Self {
            session,
            class_names,
            confidence_threshold,
            iou_threshold,
        })
    }

    /// Runs the detector over one RGB frame and returns the surviving
    /// boxes in frame pixel coordinates.
    pub fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Detection>, DetectorError> {
        let resized = image::imageops::resize(frame, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

        let mut input = Array4::<f32>::zeros((1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            input[[0, 0, y as usize, x as usize]] = r as f32 / 255.0;
            input[[0, 1, y as usize, x as usize]] = g as f32 / 255.0;
            input[[0, 2, y as usize, x as usize]] = b as f32 / 255.0;
        }

        let outputs = self
            .session
            .run(inputs!["images" => TensorRef::from_array_view(&input)?])?;
        let output = outputs["output0"].try_extract_array::<f32>()?.t().into_owned();

        let frame_width = frame.width() as f32;
        let frame_height = frame.height() as f32;
        let x_scale = frame_width / INPUT_SIZE as f32;
        let y_scale = frame_height / INPUT_SIZE as f32;

        let mut candidates = Vec::new();
        for row in output.slice(s![.., .., 0]).axis_iter(Axis(0)) {
            let (class_id, score) = row
                .iter()
                .skip(4)
                .copied()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .unwrap_or((0, 0.0));
            if score < self.confidence_threshold {
                continue;
            }

            let (cx, cy, w, h) = (row[0], row[1], row[2], row[3]);
            candidates.push(Detection {
                x1: ((cx - w / 2.0) * x_scale).clamp(0.0, frame_width),
                y1: ((cy - h / 2.0) * y_scale).clamp(0.0, frame_height),
                x2: ((cx + w / 2.0) * x_scale).clamp(0.0, frame_width),
                y2: ((cy + h / 2.0) * y_scale).clamp(0.0, frame_height),
                score,
                class_id,
                label: self
                    .class_names
                    .get(class_id)
                    .cloned()
                    .unwrap_or_else(|| format!("class {class_id}")),
            });
        }

        Ok(non_max_suppression(candidates, self.iou_threshold))
    }
}

/// Greedy suppression: keep boxes in descending score order, dropping any
/// that overlap an already kept box beyond `iou_threshold`.
fn non_max_suppression(mut candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Detection> = Vec::new();
    for candidate in candidates {
        if kept.iter().all(|other| iou(other, &candidate) < iou_threshold) {
            kept.push(candidate);
        }
    }
    kept
}

fn iou(a: &Detection, b: &Detection) -> f32 {
    let left = a.x1.max(b.x1);
    let top = a.y1.max(b.y1);
    let right = a.x2.min(b.x2);
    let bottom = a.y2.min(b.y2);

    let intersection = (right - left).max(0.0) * (bottom - top).max(0.0);
    let union = a.width() * a.height() + b.width() * b.height() - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    intersection / union
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(x1: f32, y1: f32, x2: f32, y2: f32, score: f32) -> Detection {
        Detection {
            x1,
            y1,
            x2,
            y2,
            score,
            class_id: 0,
            label: "person".to_string(),
        }
    }

    #[test]
    fn identical_boxes_have_full_overlap() {
        let a = detection(0.0, 0.0, 10.0, 10.0, 0.9);

        assert_eq!(iou(&a, &a), 1.0);
    }

    #[test]
    fn disjoint_boxes_have_no_overlap() {
        let a = detection(0.0, 0.0, 10.0, 10.0, 0.9);
        let b = detection(20.0, 20.0, 30.0, 30.0, 0.8);

        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn suppression_keeps_the_higher_scored_of_two_overlapping_boxes() {
        let strong = detection(0.0, 0.0, 10.0, 10.0, 0.9);
        let weak = detection(1.0, 1.0, 11.0, 11.0, 0.6);

        let kept = non_max_suppression(vec![weak, strong.clone()], 0.45);

        assert_eq!(kept, vec![strong]);
    }

    #[test]
    fn suppression_keeps_disjoint_boxes() {
        let a = detection(0.0, 0.0, 10.0, 10.0, 0.9);
        let b = detection(50.0, 50.0, 60.0, 60.0, 0.8);

        let kept = non_max_suppression(vec![a.clone(), b.clone()], 0.45);

        assert_eq!(kept.len(), 2);
        assert!(kept.contains(&a));
        assert!(kept.contains(&b));
    }
}
