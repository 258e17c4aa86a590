//! Camera rotation induced perspective warps.
//!
//! The image is placed on the plane `z = 0`, centered on the origin, and viewed
//! by a pinhole camera at distance `Z` whose focal length is also `Z`. With a
//! zero rotation the projection reproduces the image unscaled.

use dataug_image::{Image, ImageSize, RectF};
use dataug_imgproc::interpolation::{remap, BorderMode, CoordinateMap, InterpolationMode};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::{
    error::AugmentError,
    linalg::{Mat3, Mat3x4, Mat4, Mat4x3},
};

/// Default distance between the camera and the image plane.
pub const DEFAULT_CAMERA_DISTANCE: f64 = 1000.0;

// below this value a homogeneous depth is treated as zero
const DEPTH_EPSILON: f64 = 1e-12;

/// Largest warped canvas side, as a multiple of `width + height` of the source.
///
/// An in-plane rotation never exceeds `width + height`; larger canvases come
/// from corners close to the camera plane.
pub const MAX_CANVAS_SCALE: f64 = 4.0;

/// Camera rotation angles, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    /// In-plane rotation, around the optical axis.
    pub yaw: f64,
    /// Rotation around the vertical axis.
    pub pitch: f64,
    /// Rotation around the horizontal axis.
    pub roll: f64,
}

impl Pose {
    /// Create a new pose.
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Sample a pose from zero-mean gaussians.
    ///
    /// The angles are drawn in the order yaw, pitch, roll. A zero sigma still
    /// consumes one draw from the generator.
    pub fn sample<R: Rng + ?Sized>(
        yaw_sigma: f64,
        pitch_sigma: f64,
        roll_sigma: f64,
        rng: &mut R,
    ) -> Self {
        let yaw = yaw_sigma * rng.sample::<f64, _>(StandardNormal);
        let pitch = pitch_sigma * rng.sample::<f64, _>(StandardNormal);
        let roll = roll_sigma * rng.sample::<f64, _>(StandardNormal);
        Self { yaw, pitch, roll }
    }
}

/// Parameters of the resampling step of a warp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpParams {
    /// Distance between the camera and the image plane, also the focal length.
    pub distance: f64,
    /// Interpolation used when resampling.
    pub interpolation: InterpolationMode,
    /// Policy for samples outside of the source image.
    pub border: BorderMode,
    /// Fill value for [`BorderMode::Constant`].
    pub border_value: f32,
}

impl Default for WarpParams {
    fn default() -> Self {
        Self {
            distance: DEFAULT_CAMERA_DISTANCE,
            interpolation: InterpolationMode::Bilinear,
            border: BorderMode::Constant,
            border_value: 0.0,
        }
    }
}

/// Compose the camera external matrix from rotation angles and a translation.
///
/// # Arguments
///
/// * `yaw`, `pitch`, `roll` - The rotation angles in degrees.
/// * `tx`, `ty`, `tz` - The translation.
///
/// # Returns
///
/// The 3x4 matrix `[R | t]`.
pub fn compose_external_matrix(
    yaw: f64,
    pitch: f64,
    roll: f64,
    tx: f64,
    ty: f64,
    tz: f64,
) -> Mat3x4 {
    let (sy, cy) = yaw.to_radians().sin_cos();
    let (sp, cp) = pitch.to_radians().sin_cos();
    let (sr, cr) = roll.to_radians().sin_cos();

    #[rustfmt::skip]
    let m = Mat3x4::from_rows([
        [cp * cy,                -cp * sy,                 sp,       tx],
        [cr * sy + sr * sp * cy,  cr * cy - sr * sp * sy, -sr * cp,  ty],
        [sr * sy - cr * sp * cy,  sr * cy + cr * sp * sy,  cr * cp,  tz],
    ]);
    m
}

/// Embed a 3x4 external matrix into a 4x4 homogeneous transform.
pub fn homogeneous_rotation(external: &Mat3x4) -> Mat4 {
    let mut m = Mat4::identity();
    m[0] = external[0];
    m[1] = external[1];
    m[2] = external[2];
    m
}

/// Lift homogeneous pixel coordinates to the plane `z = 0`, centered on the image center.
#[rustfmt::skip]
pub fn inverse_perspective_matrix(size: ImageSize) -> Mat4x3 {
    let (w, h) = (size.width as f64, size.height as f64);
    Mat4x3::from_rows([
        [1.0, 0.0, -w / 2.0],
        [0.0, 1.0, -h / 2.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
    ])
}

/// Pinhole projection with focal length `z`.
#[rustfmt::skip]
pub fn perspective_matrix(z: f64) -> Mat3x4 {
    Mat3x4::from_rows([
        [z, 0.0, 0.0, 0.0],
        [0.0, z, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
    ])
}

/// The full pixel to pixel chain `persp * rotation * inv_persp`.
pub fn projection_chain(size: ImageSize, rotation: &Mat4, distance: f64) -> Mat3 {
    perspective_matrix(distance)
        .matmul(rotation)
        .matmul(&inverse_perspective_matrix(size))
}

// project a 2D point with homogeneous divide, the point must lie in front of the camera
fn transform_point(m: &Mat3, x: f64, y: f64) -> Result<[f64; 2], AugmentError> {
    let [u, v, w] = m.mul_vec(&[x, y, 1.0]);
    if !w.is_finite() || w <= DEPTH_EPSILON {
        return Err(AugmentError::SingularProjection);
    }
    let (u, v) = (u / w, v / w);
    if !u.is_finite() || !v.is_finite() {
        return Err(AugmentError::SingularProjection);
    }
    Ok([u, v])
}

/// The bounding box of the image footprint after the 2D projective transform.
///
/// # Arguments
///
/// * `img_size` - The size of the source image.
/// * `transform` - The 3x3 projective transform.
///
/// # Errors
///
/// [`AugmentError::SingularProjection`] when a corner lies on or behind the
/// camera plane.
pub fn circum_trans_img_rect(img_size: ImageSize, transform: &Mat3) -> Result<RectF, AugmentError> {
    let (w, h) = (img_size.width as f64, img_size.height as f64);

    let corners = [
        transform_point(transform, 0.0, 0.0)?,
        transform_point(transform, w, 0.0)?,
        transform_point(transform, w, h)?,
        transform_point(transform, 0.0, h)?,
    ];

    RectF::bounding(&corners).ok_or(AugmentError::SingularProjection)
}

/// The pixel size of a warped canvas, bounded by [`MAX_CANVAS_SCALE`].
///
/// # Errors
///
/// [`AugmentError::OversizedWarp`] when a side exceeds the bound.
pub fn canvas_size(src_size: ImageSize, dst_rect: &RectF) -> Result<ImageSize, AugmentError> {
    let limit = MAX_CANVAS_SCALE * (src_size.width + src_size.height) as f64;
    if dst_rect.width.round() > limit || dst_rect.height.round() > limit {
        return Err(AugmentError::OversizedWarp(dst_rect.width, dst_rect.height));
    }
    Ok(dst_rect.pixel_size())
}

/// Compute the source coordinates of every pixel of the warped image.
///
/// Each destination pixel of `dst_rect` lies on the projection plane at depth
/// `Z = rotation[2][3]`. The ray from the camera through it is intersected
/// with the rotated image plane, and the hit point is expressed in source
/// pixel coordinates. Coordinates outside of the source are kept as they are.
///
/// # Arguments
///
/// * `src_size` - The size of the source image.
/// * `dst_rect` - The circumscribing rectangle of the warped image.
/// * `rotation` - The 4x4 homogeneous camera transform.
///
/// # Errors
///
/// [`AugmentError::SingularProjection`] for a singular `rotation`, a ray
/// parallel to the image plane, or a ray hitting it behind the camera.
/// [`AugmentError::OversizedWarp`] when `dst_rect` exceeds [`canvas_size`].
pub fn create_map(
    src_size: ImageSize,
    dst_rect: &RectF,
    rotation: &Mat4,
) -> Result<CoordinateMap, AugmentError> {
    let inv = rotation.inverse()?;
    let z = rotation[2][3];
    let (half_w, half_h) = (src_size.width as f64 / 2.0, src_size.height as f64 / 2.0);

    CoordinateMap::par_from_fn(canvas_size(src_size, dst_rect)?, |dx, dy| {
        let p = [dst_rect.x + dx as f64, dst_rect.y + dy as f64, z];

        let denom = inv[2][0] * p[0] + inv[2][1] * p[1] + inv[2][2] * p[2];
        if denom.abs() < DEPTH_EPSILON {
            return Err(AugmentError::SingularProjection);
        }
        let r = -inv[2][3] / denom;
        if !r.is_finite() || r <= 0.0 {
            return Err(AugmentError::SingularProjection);
        }

        let sx = (inv[0][0] * p[0] + inv[0][1] * p[1] + inv[0][2] * p[2]) * r + inv[0][3];
        let sy = (inv[1][0] * p[0] + inv[1][1] * p[1] + inv[1][2] * p[2]) * r + inv[1][3];

        Ok(((sx + half_w) as f32, (sy + half_h) as f32))
    })
}

/// Rotate the camera looking at an image and render the new view.
///
/// The output has the size of the circumscribing rectangle of the warped
/// footprint, so the whole source stays visible.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `pose` - The camera rotation.
/// * `params` - The camera distance and the resampling policy.
///
/// # Returns
///
/// The warped image.
pub fn rotate_image<const C: usize>(
    src: &Image<u8, C>,
    pose: &Pose,
    params: &WarpParams,
) -> Result<Image<u8, C>, AugmentError> {
    let external =
        compose_external_matrix(pose.yaw, pose.pitch, pose.roll, 0.0, 0.0, params.distance);
    let rotation = homogeneous_rotation(&external);
    let transform = projection_chain(src.size(), &rotation, params.distance);

    let dst_rect = circum_trans_img_rect(src.size(), &transform)?;
    let map = create_map(src.size(), &dst_rect, &rotation)?;

    let src_f32 = src.map_dtype::<f32>();
    let mut dst = Image::<f32, C>::from_size_val(map.size(), 0.0)?;
    remap(
        &src_f32,
        &mut dst,
        &map,
        params.interpolation,
        params.border,
        [params.border_value; C],
    )?;

    Ok(dst.map_dtype())
}
