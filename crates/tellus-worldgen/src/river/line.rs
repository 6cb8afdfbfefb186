/// A 2D segment from `(x1, z1)` to `(x2, z2)` with cached projection terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub z1: f64,
    pub x2: f64,
    pub z2: f64,
    dx: f64,
    dz: f64,
    length_sq: f64,
}

impl Line {
    pub fn new(x1: f64, z1: f64, x2: f64, z2: f64) -> Self {
        let dx = x2 - x1;
        let dz = z2 - z1;
        Self {
            x1,
            z1,
            x2,
            z2,
            dx,
            dz,
            length_sq: dx * dx + dz * dz,
        }
    }

    pub fn length(&self) -> f64 {
        self.length_sq.sqrt()
    }

    /// Direction angle in radians.
    pub fn angle(&self) -> f64 {
        libm::atan2(self.dz, self.dx)
    }

    /// Point at parameter `t` (`0` = start, `1` = end).
    pub fn at(&self, t: f64) -> (f64, f64) {
        (self.x1 + self.dx * t, self.z1 + self.dz * t)
    }

    /// Unclamped projection parameter of `(x, z)` onto the line.
    #[inline]
    pub fn project(&self, x: f64, z: f64) -> f64 {
        if self.length_sq == 0.0 {
            return 0.0;
        }
        ((x - self.x1) * self.dx + (z - self.z1) * self.dz) / self.length_sq
    }

    /// Squared distance from `(x, z)` to the point at parameter `t`.
    #[inline]
    pub fn distance_sq_at(&self, x: f64, z: f64, t: f64) -> f64 {
        let (px, pz) = self.at(t);
        let ex = x - px;
        let ez = z - pz;
        ex * ex + ez * ez
    }

    /// Squared distance from `(x, z)` to the segment.
    pub fn distance_sq(&self, x: f64, z: f64) -> f64 {
        self.distance_sq_at(x, z, self.project(x, z).clamp(0.0, 1.0))
    }

    /// Whether `(x, z)` lies within the segment's bounding box grown by `pad`.
    #[inline]
    pub fn near(&self, x: f64, z: f64, pad: f64) -> bool {
        x >= self.x1.min(self.x2) - pad
            && x <= self.x1.max(self.x2) + pad
            && z >= self.z1.min(self.z2) - pad
            && z <= self.z1.max(self.z2) + pad
    }
}
