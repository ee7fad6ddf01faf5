//! Pending animation tracks and the keyframes they expand into.
//!
//! An [`IntermediateAnimation`] is everything produced by one
//! `ANIM_trans_begin`/`ANIM_rotate_begin` block, one show/hide directive or
//! one static `ANIM_trans`/`ANIM_rotate` shorthand. It owns exactly one
//! [`IntermediateDataref`] driving it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xpimp_math::{AxisKey, Vec3};

/// What a dataref does to the node it drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimType {
    #[default]
    Transform,
    Show,
    Hide,
}

impl AnimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimType::Transform => "transform",
            AnimType::Show => "show",
            AnimType::Hide => "hide",
        }
    }
}

impl std::fmt::Display for AnimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One animation driver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntermediateDataref {
    pub anim_type: AnimType,
    /// Loop period, 0 means no looping.
    pub loop_period: f32,
    pub path: String,
    /// Show/hide thresholds; unused for transform drivers.
    pub show_hide_v1: f32,
    pub show_hide_v2: f32,
    /// Sampled driver values; unused for show/hide drivers.
    pub values: Vec<f32>,
}

impl IntermediateDataref {
    /// A transform driver with no samples yet.
    pub fn transform(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn show_hide(anim_type: AnimType, v1: f32, v2: f32, path: impl Into<String>) -> Self {
        Self {
            anim_type,
            path: path.into(),
            show_hide_v1: v1,
            show_hide_v2: v2,
            ..Default::default()
        }
    }
}

/// Degree samples for one rotation axis.
#[derive(Clone, Debug, PartialEq)]
pub struct RotationTrack {
    pub key: AxisKey,
    /// Axis as first seen; scales each degree sample on recomposition.
    pub axis: Vec3,
    pub degrees: Vec<f32>,
}

/// The per-sample lengths of an animation whose locations or rotation
/// tracks disagree with its driver's value count.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{locations} locations and rotation tracks of {rotations:?} samples for {values} dataref values")]
pub struct SampleCountMismatch {
    pub locations: usize,
    pub rotations: Vec<usize>,
    pub values: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntermediateAnimation {
    /// One location per transform sample; empty for pure rotations and
    /// show/hide animations.
    pub locations: Vec<Vec3>,
    /// Rotation samples grouped by axis, in first-seen axis order.
    pub rotations: Vec<RotationTrack>,
    pub dataref: IntermediateDataref,
}

impl IntermediateAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_location(&mut self, location: Vec3) {
        self.locations.push(location);
    }

    /// Append a degree sample to `axis`'s track, creating the track on first
    /// use. Axes are grouped by [`AxisKey`].
    pub fn push_rotation(&mut self, axis: Vec3, degrees: f32) {
        let key = AxisKey::new(axis);
        match self.rotations.iter_mut().find(|track| track.key == key) {
            Some(track) => track.degrees.push(degrees),
            None => self.rotations.push(RotationTrack {
                key,
                axis,
                degrees: vec![degrees],
            }),
        }
    }

    pub fn rotation_degrees(&self, axis: Vec3) -> Option<&[f32]> {
        let key = AxisKey::new(axis);
        self.rotations
            .iter()
            .find(|track| track.key == key)
            .map(|track| track.degrees.as_slice())
    }

    /// Number of keyframe samples.
    ///
    /// Every populated location list and rotation track must be exactly as
    /// long as the dataref's value list.
    pub fn sample_count(&self) -> Result<usize, SampleCountMismatch> {
        let values = self.dataref.values.len();
        let locations_ok = self.locations.is_empty() || self.locations.len() == values;
        let rotations_ok = self.rotations.iter().all(|t| t.degrees.len() == values);

        if locations_ok && rotations_ok {
            Ok(values)
        } else {
            Err(SampleCountMismatch {
                locations: self.locations.len(),
                rotations: self.rotations.iter().map(|t| t.degrees.len()).collect(),
                values,
            })
        }
    }

    /// Sum of every axis scaled by its degree value at `sample`.
    fn recompose_rotation(&self, sample: usize) -> Vec3 {
        self.rotations
            .iter()
            .fold(Vec3::ZERO, |total, track| total + track.axis * track.degrees[sample])
    }

    /// Expand this animation into keyframe records.
    ///
    /// Transform drivers produce one keyframe per sample at indices `1..=N`.
    /// Show/hide drivers produce a single keyframe at index 1 carrying the
    /// two thresholds.
    pub fn keyframes(&self) -> Result<Vec<KeyframeInfo>, SampleCountMismatch> {
        let dataref = &self.dataref;

        if dataref.anim_type != AnimType::Transform {
            return Ok(vec![KeyframeInfo {
                idx: 1,
                dataref_path: dataref.path.clone(),
                dataref_anim_type: dataref.anim_type,
                dataref_value: None,
                dataref_loop: dataref.loop_period,
                location: None,
                rotation: None,
                show_hide: Some([dataref.show_hide_v1, dataref.show_hide_v2]),
            }]);
        }

        let count = self.sample_count()?;
        let keyframes = (0..count)
            .map(|sample| KeyframeInfo {
                idx: sample as u32 + 1,
                dataref_path: dataref.path.clone(),
                dataref_anim_type: dataref.anim_type,
                dataref_value: Some(dataref.values[sample]),
                dataref_loop: dataref.loop_period,
                location: (!self.locations.is_empty()).then(|| self.locations[sample]),
                rotation: (!self.rotations.is_empty()).then(|| self.recompose_rotation(sample)),
                show_hide: None,
            })
            .collect();

        Ok(keyframes)
    }
}

/// One keyframe handed to the host for a materialized node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeInfo {
    /// Timeline position, starting at 1.
    pub idx: u32,
    pub dataref_path: String,
    pub dataref_anim_type: AnimType,
    /// Driver value; `None` for show/hide keyframes.
    pub dataref_value: Option<f32>,
    pub dataref_loop: f32,
    pub location: Option<Vec3>,
    /// Euler rotation in degrees.
    pub rotation: Option<Vec3>,
    /// `[v1, v2]` thresholds, only for show/hide keyframes.
    pub show_hide: Option<[f32; 2]>,
}
