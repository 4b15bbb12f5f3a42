use glam::Mat4;

/// Perspective camera parameters plus the cached projection they produce.
/// `fov` is the vertical field of view in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
    projection_matrix: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            zoom: 1.0,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn update_projection_matrix(&mut self) {
        let half_fov = (self.fov.to_radians() * 0.5).tan() / self.zoom.max(1e-6);
        let fov_y = 2.0 * half_fov.atan();
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 {
            self.aspect
        } else {
            1.0
        };
        self.projection_matrix = Mat4::perspective_rh_gl(fov_y, aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// Overwrites the cached projection without touching the parameters.
    pub fn copy_projection_matrix(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicCamera {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
    projection_matrix: Mat4,
}

impl OrthographicCamera {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            left,
            right,
            top,
            bottom,
            near,
            far,
            zoom: 1.0,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn update_projection_matrix(&mut self) {
        let zoom = self.zoom.max(1e-6);
        let cx = (self.right + self.left) * 0.5;
        let cy = (self.top + self.bottom) * 0.5;
        let dx = (self.right - self.left) / (2.0 * zoom);
        let dy = (self.top - self.bottom) / (2.0 * zoom);
        self.projection_matrix =
            Mat4::orthographic_rh_gl(cx - dx, cx + dx, cy - dy, cy + dy, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::PerspectiveCamera;

    #[test]
    fn projection_follows_aspect_after_update() {
        let mut camera = PerspectiveCamera::new(50.0, 1.0, 0.01, 1000.0);
        let square = camera.projection_matrix();
        camera.aspect = 2.0;
        assert_eq!(camera.projection_matrix(), square);
        camera.update_projection_matrix();
        let wide = camera.projection_matrix();
        assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-5);
    }

    #[test]
    fn degenerate_aspect_keeps_matrix_finite() {
        let mut camera = PerspectiveCamera::new(50.0, 1.0, 0.01, 1000.0);
        camera.aspect = f32::NAN;
        camera.update_projection_matrix();
        assert!(camera.projection_matrix().is_finite());
    }
}
