use voxgrid::glam::FloatExt;
use voxgrid::glam::Quat;
use voxgrid::glam::Vec3;
use voxgrid::Ray;

/// Pinhole camera. Orientation is yaw about the world y axis applied
/// after pitch about the camera's x axis; positive pitch looks down.
pub struct Camera {
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub vfov_degrees: f32,
}

impl Camera {
    /// Primary ray through a pixel center. Pixel rows grow upward:
    /// `y == 0` is the bottom row.
    pub fn ray_for_pixel(&self, x: u32, y: u32, width: u32, height: u32, length: f32) -> Ray {
        let v_extent = (self.vfov_degrees.to_radians() / 2.0).tan();
        let h_extent = v_extent * width as f32 / height as f32;

        let u = x as f32 / (width - 1) as f32;
        let v = y as f32 / (height - 1) as f32;
        let camera_space = Vec3::new(
            (-h_extent).lerp(h_extent, u),
            (-v_extent).lerp(v_extent, v),
            1.0,
        );

        let orientation = Quat::from_rotation_y(self.yaw_degrees.to_radians())
            * Quat::from_rotation_x(self.pitch_degrees.to_radians());
        Ray::new(self.position, orientation * camera_space, length)
    }
}
