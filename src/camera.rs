use glam::Vec3;

/// Starting viewpoint handed to the orbit-control host.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
}

impl Camera {
    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 50.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view() {
        let camera = Camera::default();
        assert_eq!(camera.fov_degrees, 50.0);
        assert!((camera.distance() - 104.0_f32.sqrt()).abs() < 1e-5);
    }
}
