/// Padding recorded by `pad_batch`, used to recover the original frame.
///
/// Coordinates are in padded-image pixels; `bottom` and `right` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropRegion {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl CropRegion {
    pub fn new(top: usize, left: usize, bottom: usize, right: usize) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }

    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    /// `[top, left, bottom, right]`.
    pub fn to_array(self) -> [usize; 4] {
        [self.top, self.left, self.bottom, self.right]
    }

    pub fn fits(&self, height: usize, width: usize) -> bool {
        self.top <= self.bottom
            && self.left <= self.right
            && self.bottom <= height
            && self.right <= width
    }
}

impl From<CropRegion> for (usize, usize, usize, usize) {
    fn from(r: CropRegion) -> Self {
        (r.top, r.left, r.bottom, r.right)
    }
}

impl From<[usize; 4]> for CropRegion {
    fn from(v: [usize; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

#[cfg(test)]
mod tests {
    use super::CropRegion;

    #[test]
    fn extent_and_fit() {
        let r = CropRegion::new(2, 3, 12, 8);
        assert_eq!(r.height(), 10);
        assert_eq!(r.width(), 5);
        assert!(r.fits(12, 8));
        assert!(!r.fits(11, 8));
        assert_eq!(<(usize, usize, usize, usize)>::from(r), (2, 3, 12, 8));
        assert_eq!(CropRegion::from(r.to_array()), r);
    }
}
