pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// Zips parallel coordinate slices into points, truncating to the shorter one.
pub fn zip_points(xs: &[f64], ys: &[f64]) -> Vec<Point> {
    xs.iter().zip(ys).map(|(&x, &y)| point(x, y)).collect()
}

/// Axis-aligned extent of a point set, ignoring non-finite coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn of<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut out: Option<Self> = None;
        for p in points {
            if !p.x.is_finite() || !p.y.is_finite() {
                continue;
            }
            out = Some(match out {
                None => Self {
                    min_x: p.x,
                    max_x: p.x,
                    min_y: p.y,
                    max_y: p.y,
                },
                Some(e) => e.include(*p),
            });
        }
        out
    }

    pub fn include(self, p: Point) -> Self {
        Self {
            min_x: self.min_x.min(p.x),
            max_x: self.max_x.max(p.x),
            min_y: self.min_y.min(p.y),
            max_y: self.max_y.max(p.y),
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
