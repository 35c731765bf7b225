#[inline]
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Round a sampled channel value back into `u8` range.
#[inline]
pub(crate) fn quantize_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
