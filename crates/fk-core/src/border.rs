/// Out-of-bounds policy for sampling and padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderMode<T> {
    /// Repeat the nearest edge element.
    Clamp,
    /// Read a fixed value outside the image.
    Constant(T),
}

/// Maps a possibly out-of-range index into `[0, len)`.
///
/// Returns `None` when the mode has no in-image source for `i` (constant
/// fill, or an empty axis).
pub fn map_index<T>(i: isize, len: usize, mode: &BorderMode<T>) -> Option<usize> {
    match mode {
        BorderMode::Constant(_) => {
            if i < 0 || i as usize >= len {
                None
            } else {
                Some(i as usize)
            }
        }
        BorderMode::Clamp => {
            if len == 0 {
                return None;
            }
            if i < 0 {
                Some(0)
            } else {
                Some((i as usize).min(len - 1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BorderMode, map_index};

    #[test]
    fn clamp_mapping_handles_negative_and_overflow() {
        let mode = BorderMode::<f32>::Clamp;

        assert_eq!(map_index(-3, 5, &mode), Some(0));
        assert_eq!(map_index(-1, 5, &mode), Some(0));
        assert_eq!(map_index(0, 5, &mode), Some(0));
        assert_eq!(map_index(4, 5, &mode), Some(4));
        assert_eq!(map_index(5, 5, &mode), Some(4));
        assert_eq!(map_index(99, 5, &mode), Some(4));
        assert_eq!(map_index(0, 0, &mode), None);
    }

    #[test]
    fn constant_mapping_only_resolves_in_range() {
        let mode = BorderMode::Constant(0.0f32);

        assert_eq!(map_index(-1, 3, &mode), None);
        assert_eq!(map_index(0, 3, &mode), Some(0));
        assert_eq!(map_index(2, 3, &mode), Some(2));
        assert_eq!(map_index(3, 3, &mode), None);
    }
}
