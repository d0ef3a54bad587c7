pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Blend straight `fg` over opaque `bg` with 8-bit coverage `a`.
pub(crate) fn blend_channel(fg: u8, bg: u8, a: u8) -> u8 {
    let a = u16::from(a);
    let inv = 255 - a;
    (mul_div255_u16(u16::from(fg), a) + mul_div255_u16(u16::from(bg), inv)).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div255_rounds_to_nearest() {
        assert_eq!(mul_div255_u16(255, 255), 255);
        assert_eq!(mul_div255_u16(255, 128), 128);
        assert_eq!(mul_div255_u16(0, 200), 0);
    }

    #[test]
    fn blend_channel_endpoints() {
        assert_eq!(blend_channel(200, 10, 255), 200);
        assert_eq!(blend_channel(200, 10, 0), 10);
        assert_eq!(blend_channel(255, 0, 128), 128);
    }
}
