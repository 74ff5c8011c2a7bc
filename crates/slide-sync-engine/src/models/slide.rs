use serde::{Deserialize, Serialize};

/// A position in a slide grid, either local to one document or global to a deck.
///
/// Ordering is lexicographic on `(horizontal, vertical)`. Every comparison of
/// slide positions in the crate goes through this `Ord` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SlideCoord {
    #[serde(rename = "horiz")]
    pub horizontal: usize,
    #[serde(rename = "vert")]
    pub vertical: usize,
}

impl SlideCoord {
    pub const FIRST: SlideCoord = SlideCoord::new(0, 0);

    pub const fn new(horizontal: usize, vertical: usize) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Move the coordinate `n` horizontal slides forward. Vertical is unchanged.
    pub fn shift(self, n: usize) -> Self {
        Self::new(self.horizontal + n, self.vertical)
    }

    /// Move the coordinate `n` horizontal slides back, or `None` if that would
    /// go before the first slide.
    pub fn unshift(self, n: usize) -> Option<Self> {
        self.horizontal
            .checked_sub(n)
            .map(|horizontal| Self::new(horizontal, self.vertical))
    }
}

impl std::fmt::Display for SlideCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.horizontal, self.vertical)
    }
}

/// A slide anchored in a document's text.
///
/// `offset` is the character offset where the slide's content starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub horizontal: usize,
    pub vertical: usize,
    pub offset: usize,
}

impl Slide {
    /// The slide every document starts with, whether or not it has any boundary markers.
    pub const FIRST: Slide = Slide::new(0, 0, 0);

    pub const fn new(horizontal: usize, vertical: usize, offset: usize) -> Self {
        Self {
            horizontal,
            vertical,
            offset,
        }
    }

    pub fn coord(&self) -> SlideCoord {
        SlideCoord::new(self.horizontal, self.vertical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cmp::Ordering;

    #[rstest]
    #[case(SlideCoord::new(0, 0), SlideCoord::new(0, 0), Ordering::Equal)]
    #[case(SlideCoord::new(0, 5), SlideCoord::new(1, 0), Ordering::Less)]
    #[case(SlideCoord::new(2, 0), SlideCoord::new(1, 9), Ordering::Greater)]
    #[case(SlideCoord::new(1, 1), SlideCoord::new(1, 2), Ordering::Less)]
    #[case(SlideCoord::new(1, 3), SlideCoord::new(1, 2), Ordering::Greater)]
    fn test_coord_ordering_is_lexicographic(
        #[case] a: SlideCoord,
        #[case] b: SlideCoord,
        #[case] expected: Ordering,
    ) {
        assert_eq!(a.cmp(&b), expected);
    }

    #[test]
    fn test_shift_only_moves_horizontal() {
        let coord = SlideCoord::new(2, 3);
        assert_eq!(coord.shift(4), SlideCoord::new(6, 3));
        assert_eq!(coord.unshift(2), Some(SlideCoord::new(0, 3)));
        assert_eq!(coord.unshift(3), None);
    }

    #[test]
    fn test_coord_serializes_with_short_field_names() {
        let json = serde_json::to_string(&SlideCoord::new(3, 1)).unwrap();
        assert_eq!(json, r#"{"horiz":3,"vert":1}"#);
    }
}
