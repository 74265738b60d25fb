// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

//! 2D affine transform for the quad: a rotation block plus a translation,
//! expanded to the column-major 4x4 the `rotateMatrix` uniform expects.
//! Convention: x' = m00*x + m10*y + m20, y' = m01*x + m11*y + m21,
//! rotation is counterclockwise for positive angles.

#[derive(Clone, Copy)]
pub struct GlTransform {
    pub m00: f32,
    pub m10: f32,
    pub m20: f32,
    pub m01: f32,
    pub m11: f32,
    pub m21: f32,
}

impl Default for GlTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl GlTransform {
    pub fn new() -> Self {
        Self {
            m00: 1.0,
            m10: 0.0,
            m20: 0.0,
            m01: 0.0,
            m11: 1.0,
            m21: 0.0,
        }
    }

    pub fn identity(&mut self) {
        *self = Self::new();
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.m20 += self.m00 * x + self.m10 * y;
        self.m21 += self.m01 * x + self.m11 * y;
    }

    pub fn rotate(&mut self, angle: f32) {
        let cos = angle.cos();
        let sin = angle.sin();

        let m00 = self.m00;
        let m01 = self.m01;

        self.m00 = m00 * cos + self.m10 * sin;
        self.m10 = -m00 * sin + self.m10 * cos;
        self.m01 = m01 * cos + self.m11 * sin;
        self.m11 = -m01 * sin + self.m11 * cos;
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.m00 *= x;
        self.m10 *= y;
        self.m01 *= x;
        self.m11 *= y;
    }

    /// column-major 4x4 for glUniformMatrix4fv with transpose off:
    /// rotation block in the upper left, translation in the last column,
    /// z untouched
    pub fn to_mat4(&self) -> [f32; 16] {
        [
            self.m00, self.m01, 0.0, 0.0, //
            self.m10, self.m11, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            self.m20, self.m21, 0.0, 1.0, //
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_near(a: f32, b: f32) {
        assert!((a - b).abs() < EPS, "{} != {}", a, b);
    }

    #[test]
    fn test_zero_angle_is_identity_plus_offset() {
        let mut t = GlTransform::new();
        t.translate(0.2, 0.0);
        t.rotate(0.0);
        let m = t.to_mat4();

        let expect = [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.2, 0.0, 0.0, 1.0, //
        ];
        for i in 0..16 {
            assert_near(m[i], expect[i]);
        }
    }

    #[test]
    fn test_quarter_turn_rotation_block() {
        let mut t = GlTransform::new();
        t.rotate(std::f32::consts::FRAC_PI_2);
        let m = t.to_mat4();

        // row-major block [[0,-1],[1,0]]
        assert_near(m[0], 0.0); // m00
        assert_near(m[4], -1.0); // m01 (column 1, row 0)
        assert_near(m[1], 1.0); // m10 (column 0, row 1)
        assert_near(m[5], 0.0); // m11
    }

    #[test]
    fn test_rotation_keeps_translation() {
        let mut t = GlTransform::new();
        t.translate(0.2, 0.0);
        t.rotate(1.234);
        let m = t.to_mat4();
        assert_near(m[12], 0.2);
        assert_near(m[13], 0.0);
    }

    #[test]
    fn test_rotate_moves_unit_x_counterclockwise() {
        let mut t = GlTransform::new();
        t.rotate(std::f32::consts::FRAC_PI_2);
        // apply to (1, 0)
        let x = t.m00;
        let y = t.m01;
        assert_near(x, 0.0);
        assert_near(y, 1.0);
    }

    #[test]
    fn test_identity_resets_rotation_and_translation() {
        let mut t = GlTransform::new();
        t.translate(1.0, 2.0);
        t.rotate(0.7);
        t.identity();
        let m = t.to_mat4();
        let expect = [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, //
        ];
        for i in 0..16 {
            assert_near(m[i], expect[i]);
        }
    }

    #[test]
    fn test_scale() {
        let mut t = GlTransform::new();
        t.scale(2.0, 3.0);
        let m = t.to_mat4();
        assert_near(m[0], 2.0);
        assert_near(m[5], 3.0);
    }
}
