/// A rectangle of cells, `min` inclusive and `max` exclusive
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rect {
    pub minx: usize,
    pub miny: usize,
    pub maxx: usize,
    pub maxy: usize,
}

impl Rect {
    /// Rectangle with the top-left corner at the origin
    #[inline(always)]
    #[must_use]
    pub const fn with_shape(width: usize, height: usize) -> Self {
        Self {
            minx: 0,
            miny: 0,
            maxx: width,
            maxy: height,
        }
    }

    /// Check if a points is inside this rect
    /// ```
    /// use mazegen::Rect;
    ///
    /// let rect = Rect { minx: 1, miny: 4, maxx: 5, maxy: 7};
    /// assert!(rect.contains(&[1,5]));
    /// assert!(!rect.contains(&[5,5]));
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn contains(&self, [x, y]: &[usize; 2]) -> bool {
        self.minx <= *x && *x < self.maxx && self.miny <= *y && *y < self.maxy
    }

    #[inline(always)]
    #[must_use]
    pub const fn covers(&self, other: &Rect) -> bool {
        self.minx <= other.minx
            && other.maxx <= self.maxx
            && self.miny <= other.miny
            && other.maxy <= self.maxy
    }

    #[inline(always)]
    #[must_use]
    pub const fn collide(&self, other: &Rect) -> bool {
        self.maxx > other.minx
            && self.minx < other.maxx
            && self.maxy > other.miny
            && self.miny < other.maxy
    }

    #[inline(always)]
    #[must_use]
    pub const fn shape(&self) -> [usize; 2] {
        [
            self.maxx.saturating_sub(self.minx),
            self.maxy.saturating_sub(self.miny),
        ]
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.maxx <= self.minx || self.maxy <= self.miny
    }

    /// Common part of two rects, if any
    /// ```
    /// use mazegen::Rect;
    ///
    /// let a = Rect { minx: 0, miny: 0, maxx: 4, maxy: 4};
    /// let b = Rect { minx: 2, miny: 3, maxx: 6, maxy: 9};
    /// assert_eq!(a.intersection(&b), Some(Rect { minx: 2, miny: 3, maxx: 4, maxy: 4}));
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.collide(other) {
            return None;
        }
        Some(Rect {
            minx: self.minx.max(other.minx),
            miny: self.miny.max(other.miny),
            maxx: self.maxx.min(other.maxx),
            maxy: self.maxy.min(other.maxy),
        })
    }

    /// Rect grown by `margin` on every side, stopping at zero
    #[must_use]
    pub const fn grown(&self, margin: usize) -> Rect {
        Rect {
            minx: self.minx.saturating_sub(margin),
            miny: self.miny.saturating_sub(margin),
            maxx: self.maxx.saturating_add(margin),
            maxy: self.maxy.saturating_add(margin),
        }
    }

    /// Rect without the outermost ring of cells, if anything is left
    #[must_use]
    pub const fn inner(&self) -> Option<Rect> {
        let [w, h] = self.shape();
        if w <= 2 || h <= 2 {
            return None;
        }
        Some(Rect {
            minx: self.minx + 1,
            miny: self.miny + 1,
            maxx: self.maxx - 1,
            maxy: self.maxy - 1,
        })
    }

    /// Convert global coordinates to internal ones
    /// ```
    /// use mazegen::Rect;
    ///
    /// let rect = Rect { minx: 3, miny: 4, maxx: 7, maxy: 7};
    /// assert_eq!(rect.global_to_internal(&[3,5]), [0,1])
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn global_to_internal(&self, pos: &[usize; 2]) -> [usize; 2] {
        debug_assert!(self.contains(pos));
        [pos[0] - self.minx, pos[1] - self.miny]
    }

    /// Convert internal coordinates to global ones
    #[inline(always)]
    #[must_use]
    pub const fn internal_to_global(&self, pos: &[usize; 2]) -> [usize; 2] {
        debug_assert!(pos[0] < self.shape()[0] && pos[1] < self.shape()[1]);
        [self.minx + pos[0], self.miny + pos[1]]
    }

    /// Get a row-major linearized map of the rect
    #[inline(always)]
    #[must_use]
    pub const fn linearized(&self) -> Linearized {
        Linearized(self)
    }
}

/// Row-major iteration over the cells of the rect
impl IntoIterator for Rect {
    type Item = [usize; 2];
    type IntoIter = Cells;

    fn into_iter(self) -> Self::IntoIter {
        Cells {
            rect: self,
            next: if self.is_empty() {
                None
            } else {
                Some([self.minx, self.miny])
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cells {
    rect: Rect,
    next: Option<[usize; 2]>,
}

impl Iterator for Cells {
    type Item = [usize; 2];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let [x, y] = current;
        self.next = if x + 1 < self.rect.maxx {
            Some([x + 1, y])
        } else if y + 1 < self.rect.maxy {
            Some([self.rect.minx, y + 1])
        } else {
            None
        };
        Some(current)
    }
}

pub struct Linearized<'a>(&'a Rect);

impl Linearized<'_> {
    /// Number of cells covered
    ///
    /// ```
    /// use mazegen::Rect;
    ///
    /// let rect = Rect { minx: 3, miny: 4, maxx: 7, maxy: 7};
    /// assert_eq!(rect.linearized().len(), 12);
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        let [x, y] = self.0.shape();
        x * y
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert global coordinates to linearized ones
    ///
    /// ```
    /// use mazegen::Rect;
    ///
    /// let rect = Rect { minx: 3, miny: 4, maxx: 7, maxy: 7};
    /// assert_eq!(rect.linearized().global_to_linear(&[4,5]), 5);
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn global_to_linear(&self, pos: &[usize; 2]) -> usize {
        self.internal_to_linear(&self.0.global_to_internal(pos))
    }

    /// Convert internal coordinates to linearized ones
    #[inline(always)]
    #[must_use]
    pub const fn internal_to_linear(&self, pos: &[usize; 2]) -> usize {
        debug_assert!(pos[0] < self.0.shape()[0] && pos[1] < self.0.shape()[1]);
        let stride = self.0.shape()[0];
        pos[1] * stride + pos[0]
    }

    /// Convert linearized coordinates to global ones
    ///
    /// ```
    /// use mazegen::Rect;
    ///
    /// let rect = Rect { minx: 3, miny: 4, maxx: 7, maxy: 7};
    /// assert_eq!(rect.linearized().linear_to_global(5), [4,5]);
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn linear_to_global(&self, pos: usize) -> [usize; 2] {
        self.0.internal_to_global(&self.linear_to_internal(pos))
    }

    /// Convert linearized coordinates to internal ones
    #[inline(always)]
    #[must_use]
    pub const fn linear_to_internal(&self, pos: usize) -> [usize; 2] {
        debug_assert!(pos < self.len());
        let stride = self.0.shape()[0];
        [pos % stride, pos / stride]
    }
}
