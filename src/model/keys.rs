//! Point indices and the canonical keys of the relations built on them.

/// Index of an annotation point. Always positive; zero never names a point.
pub type PointIndex = u32;

/// An undirected segment between two points, stored as `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey {
    a: PointIndex,
    b: PointIndex,
}

impl LineKey {
    pub fn new(a: PointIndex, b: PointIndex) -> Self {
        Self {
            a: a.min(b),
            b: a.max(b),
        }
    }

    pub fn a(&self) -> PointIndex {
        self.a
    }

    pub fn b(&self) -> PointIndex {
        self.b
    }

    pub fn contains(&self, index: PointIndex) -> bool {
        self.a == index || self.b == index
    }

    /// The same segment with `old` swapped for `new`, re-canonicalized.
    pub fn relabeled(&self, old: PointIndex, new: PointIndex) -> Self {
        let swap = |i: PointIndex| if i == old { new } else { i };
        Self::new(swap(self.a), swap(self.b))
    }
}

/// An angle ∠abc with `vertex` as its apex. The two arms are sorted so that
/// `a < c`; the vertex never moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AngleKey {
    a: PointIndex,
    vertex: PointIndex,
    c: PointIndex,
}

impl AngleKey {
    pub fn new(a: PointIndex, vertex: PointIndex, c: PointIndex) -> Self {
        Self {
            a: a.min(c),
            vertex,
            c: a.max(c),
        }
    }

    pub fn a(&self) -> PointIndex {
        self.a
    }

    pub fn vertex(&self) -> PointIndex {
        self.vertex
    }

    pub fn c(&self) -> PointIndex {
        self.c
    }

    pub fn contains(&self, index: PointIndex) -> bool {
        self.a == index || self.vertex == index || self.c == index
    }

    /// The two arms of this angle as segment keys.
    pub fn arms(&self) -> (LineKey, LineKey) {
        (
            LineKey::new(self.a, self.vertex),
            LineKey::new(self.vertex, self.c),
        )
    }

    /// The same angle with `old` swapped for `new`. The vertex keeps its role;
    /// arms are re-sorted.
    pub fn relabeled(&self, old: PointIndex, new: PointIndex) -> Self {
        let swap = |i: PointIndex| if i == old { new } else { i };
        Self::new(swap(self.a), swap(self.vertex), swap(self.c))
    }

    pub fn as_tuple(&self) -> (PointIndex, PointIndex, PointIndex) {
        (self.a, self.vertex, self.c)
    }
}

/// A circle around `center` whose radius reaches `rim`. Order is meaningful,
/// so this key is never swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CircleKey {
    pub center: PointIndex,
    pub rim: PointIndex,
}

impl CircleKey {
    pub fn new(center: PointIndex, rim: PointIndex) -> Self {
        Self { center, rim }
    }

    pub fn contains(&self, index: PointIndex) -> bool {
        self.center == index || self.rim == index
    }

    pub fn relabeled(&self, old: PointIndex, new: PointIndex) -> Self {
        let swap = |i: PointIndex| if i == old { new } else { i };
        Self::new(swap(self.center), swap(self.rim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_key_is_symmetric() {
        for (a, b) in [(1, 2), (7, 3), (5, 5), (10, 100)] {
            assert_eq!(LineKey::new(a, b), LineKey::new(b, a));
        }
        let key = LineKey::new(9, 4);
        assert_eq!((key.a(), key.b()), (4, 9));
    }

    #[test]
    fn test_angle_key_keeps_vertex() {
        let key = AngleKey::new(7, 5, 2);
        assert_eq!(key.as_tuple(), (2, 5, 7));
        assert_eq!(AngleKey::new(2, 5, 7), key);
        assert_ne!(AngleKey::new(5, 2, 7), key);
    }

    #[test]
    fn test_relabel_recanonicalizes() {
        assert_eq!(LineKey::new(3, 5).relabeled(5, 1), LineKey::new(1, 3));
        assert_eq!(
            AngleKey::new(2, 5, 7).relabeled(5, 9).as_tuple(),
            (2, 9, 7)
        );
        assert_eq!(
            AngleKey::new(2, 5, 7).relabeled(2, 8).as_tuple(),
            (7, 5, 8)
        );
    }

    #[test]
    fn test_circle_key_is_ordered() {
        assert_ne!(CircleKey::new(1, 2), CircleKey::new(2, 1));
        assert_eq!(CircleKey::new(1, 2).relabeled(1, 4), CircleKey::new(4, 2));
    }
}
