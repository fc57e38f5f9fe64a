use std::fmt;

/// Half-open integer rectangle `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// `[0, width) × [0, height)`.
    pub fn from_extent(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Intersect in place with `[x0, x1) × [y0, y1)`. The result may be empty.
    pub fn clip(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.x0 = self.x0.max(x0);
        self.y0 = self.y0.max(y0);
        self.x1 = self.x1.min(x1);
        self.y1 = self.y1.min(y1);
    }

    pub fn intersect(mut self, other: &Rect) -> Rect {
        self.clip(other.x0, other.y0, other.x1, other.y1);
        self
    }

    /// Swap endpoints so that `x0 <= x1` and `y0 <= y1`.
    pub fn normalized(mut self) -> Rect {
        if self.x0 > self.x1 {
            std::mem::swap(&mut self.x0, &mut self.x1);
        }
        if self.y0 > self.y1 {
            std::mem::swap(&mut self.y0, &mut self.y1);
        }
        self
    }

    /// Non-empty and fully inside `[0, width) × [0, height)`.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        !self.is_empty()
            && self.x0 >= 0
            && self.y0 >= 0
            && self.x1 <= width as i32
            && self.y1 <= height as i32
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{})", self.x0, self.y0, self.x1, self.y1)
    }
}

/// Integer rectangle addressing one slice of a (possibly volume) surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SliceRect {
    pub rect: Rect,
    pub slice: u32,
}

impl SliceRect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32, slice: u32) -> Self {
        Self {
            rect: Rect::new(x0, y0, x1, y1),
            slice,
        }
    }
}

impl From<Rect> for SliceRect {
    fn from(rect: Rect) -> Self {
        Self { rect, slice: 0 }
    }
}

/// Float rectangle used for source coordinates, which stay fractional after proportional
/// clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectF {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl RectF {
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn normalized(mut self) -> RectF {
        if self.x0 > self.x1 {
            std::mem::swap(&mut self.x0, &mut self.x1);
        }
        if self.y0 > self.y1 {
            std::mem::swap(&mut self.y0, &mut self.y1);
        }
        self
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x1 > self.x0
            && self.y1 > self.y0
            && self.x0 >= 0.0
            && self.y0 >= 0.0
            && self.x1 <= width as f32
            && self.y1 <= height as f32
    }
}

impl From<Rect> for RectF {
    fn from(r: Rect) -> Self {
        Self::new(r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32)
    }
}

impl fmt::Display for RectF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{})", self.x0, self.y0, self.x1, self.y1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliceRectF {
    pub rect: RectF,
    pub slice: u32,
}

impl From<SliceRect> for SliceRectF {
    fn from(r: SliceRect) -> Self {
        Self {
            rect: r.rect.into(),
            slice: r.slice,
        }
    }
}
