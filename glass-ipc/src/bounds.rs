use serde::{Deserialize, Serialize};

/// Window or surface rectangle in host coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size anchored at the origin.
    pub fn at_origin(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Largest rectangle no bigger than `preferred` that fits in `area`,
    /// centred on it.
    pub fn centered(area: Size, preferred: Size) -> Self {
        let width = preferred.width.min(area.width);
        let height = preferred.height.min(area.height);
        Self {
            x: ((area.width - width) / 2) as i32,
            y: ((area.height - height) / 2) as i32,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} @ ({},{})", self.width, self.height, self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSizeError(String);

impl std::fmt::Display for ParseSizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid size '{}', expected WIDTHxHEIGHT", self.0)
    }
}

impl std::error::Error for ParseSizeError {}

impl std::str::FromStr for Size {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSizeError(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let width = w.trim().parse().map_err(|_| err())?;
        let height = h.trim().parse().map_err(|_| err())?;
        Ok(Self { width, height })
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_preferred_size() {
        let b = Bounds::centered(Size::new(1920, 1080), Size::new(1280, 720));
        assert_eq!(b, Bounds::new(320, 180, 1280, 720));
    }

    #[test]
    fn test_centered_clamps_to_small_area() {
        let b = Bounds::centered(Size::new(1024, 600), Size::new(1280, 720));
        assert_eq!(b, Bounds::new(0, 0, 1024, 600));
    }

    #[test]
    fn test_centered_floors_odd_margins() {
        let b = Bounds::centered(Size::new(1281, 721), Size::new(1280, 720));
        assert_eq!(b.x, 0);
        assert_eq!(b.y, 0);
    }

    #[test]
    fn test_size_from_str() {
        assert_eq!("1920x1080".parse::<Size>().unwrap(), Size::new(1920, 1080));
        assert_eq!(" 800X600 ".parse::<Size>().unwrap(), Size::new(800, 600));
        assert!("1920".parse::<Size>().is_err());
        assert!("axb".parse::<Size>().is_err());
    }

    #[test]
    fn test_bounds_display() {
        assert_eq!(format!("{}", Bounds::new(10, 20, 300, 400)), "300x400 @ (10,20)");
    }

    #[test]
    fn test_bounds_serialization() {
        let b = Bounds::new(-5, 10, 1280, 720);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "{\"x\":-5,\"y\":10,\"width\":1280,\"height\":720}");
    }
}
