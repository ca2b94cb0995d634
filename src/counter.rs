/// A `u32` occurrence counter that sticks at `u32::MAX` instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SaturatingCount(u32);

impl SaturatingCount {
    pub const MAX: u32 = u32::MAX;

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_saturated(self) -> bool {
        self.0 == Self::MAX
    }

    /// Returns `false` once the counter is saturated and the increment was dropped.
    pub fn incr(&mut self) -> bool {
        if self.is_saturated() {
            return false;
        }
        self.0 += 1;
        true
    }
}

/// Clamps to the narrow width used by compact per-page histograms.
pub fn saturate_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incr_counts_up() {
        let mut c = SaturatingCount::default();
        assert!(c.incr());
        assert!(c.incr());
        assert_eq!(c.get(), 2);
    }

    #[test]
    fn incr_at_max_is_a_no_op() {
        let mut c = SaturatingCount::new(u32::MAX);
        assert!(!c.incr());
        assert_eq!(c.get(), u32::MAX);
    }

    #[test]
    fn incr_reaches_max_then_sticks() {
        let mut c = SaturatingCount::new(u32::MAX - 1);
        assert!(c.incr());
        assert!(c.is_saturated());
        assert!(!c.incr());
        assert_eq!(c.get(), u32::MAX);
    }

    #[test]
    fn saturate_u16_boundaries() {
        assert_eq!(saturate_u16(0), 0);
        assert_eq!(saturate_u16(65_535), 65_535);
        assert_eq!(saturate_u16(65_536), 65_535);
        assert_eq!(saturate_u16(u32::MAX), 65_535);
    }
}
