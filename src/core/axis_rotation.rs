use serde::{Deserialize, Serialize};

const ANGLE_CANDIDATES: [f64; 5] = [0.0, 25.0, 45.0, 65.0, 85.0];

/// Whether x-axis labels must be rotated to fit, and by how much.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationData {
    pub need_rotate_label: bool,
    pub radian: f64,
    pub rotation_height: f64,
}

fn rotated_width(degree: f64, width: f64, height: f64) -> f64 {
    let center_half = degree.to_radians().cos() * width / 2.0;
    let side_half = (90.0 - degree).to_radians().cos() * height / 2.0;
    (center_half + side_half) * 2.0
}

fn rotated_height(degree: f64, width: f64, height: f64) -> f64 {
    let axis = degree.to_radians().sin() * width / 2.0;
    let side_half = (90.0 - degree).to_radians().sin() * height / 2.0;
    (axis + side_half) * 2.0
}

/// Smallest candidate angle whose rotated width fits into `distance`,
/// or the steepest candidate when none does.
fn rotation_degree(distance: f64, label_width: f64, label_height: f64) -> f64 {
    if distance >= label_width {
        return 0.0;
    }
    ANGLE_CANDIDATES
        .iter()
        .copied()
        .find(|angle| rotated_width(*angle, label_width, label_height) <= distance)
        .unwrap_or(ANGLE_CANDIDATES[ANGLE_CANDIDATES.len() - 1])
}

#[must_use]
pub fn make_rotation_data(
    max_label_width: f64,
    max_label_height: f64,
    distance: f64,
    rotatable: bool,
) -> RotationData {
    let degree = rotation_degree(distance, max_label_width, max_label_height);
    if !rotatable || degree == 0.0 {
        return RotationData {
            need_rotate_label: false,
            radian: 0.0,
            rotation_height: max_label_height,
        };
    }

    RotationData {
        need_rotate_label: true,
        radian: degree.to_radians(),
        rotation_height: rotated_height(degree, max_label_width, max_label_height),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn labels_that_fit_stay_flat() {
        let rotation = make_rotation_data(40.0, 11.0, 100.0, true);
        assert!(!rotation.need_rotate_label);
        assert_eq!(rotation.rotation_height, 11.0);
    }

    #[test]
    fn crowded_labels_pick_first_fitting_angle() {
        let rotation = make_rotation_data(100.0, 10.0, 80.0, true);

        assert!(rotation.need_rotate_label);
        assert_relative_eq!(rotation.radian, 45f64.to_radians());
        assert_relative_eq!(
            rotation.rotation_height,
            (45f64.to_radians().sin() * 50.0 + 45f64.to_radians().sin() * 5.0) * 2.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn non_rotatable_labels_keep_their_height() {
        let rotation = make_rotation_data(100.0, 10.0, 20.0, false);
        assert!(!rotation.need_rotate_label);
        assert_eq!(rotation.radian, 0.0);
    }
}
