/// Placement strategy used when choosing among free extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Best,
    First,
    Worst,
}

impl Fit {
    pub fn from_u8(byte: u8) -> Option<Self> {
        return match byte {
            b'B' => Some(Fit::Best),
            b'F' => Some(Fit::First),
            b'W' => Some(Fit::Worst),
            _ => None,
        };
    }

    pub fn to_u8(&self) -> u8 {
        return match self {
            Fit::Best => b'B',
            Fit::First => b'F',
            Fit::Worst => b'W',
        };
    }

    /// Accepts "BF", "FF", "WF" or their first letter, in any case.
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();

        return match upper.as_str() {
            "BF" | "B" => Some(Fit::Best),
            "FF" | "F" => Some(Fit::First),
            "WF" | "W" => Some(Fit::Worst),
            _ => None,
        };
    }

    /// Returns the start of the chosen extent, or None if no extent can hold `size` bytes.
    /// Ties go to the lowest offset.
    pub fn place(&self, spaces: &[Space], size: i64) -> Option<i64> {
        let mut candidates = spaces.iter().filter(|s| s.len() >= size);

        let chosen = match self {
            Fit::First => candidates.next(),
            Fit::Best => candidates.fold(None, |best: Option<&Space>, s| match best {
                Some(b) if b.len() <= s.len() => Some(b),
                _ => Some(s),
            }),
            Fit::Worst => candidates.fold(None, |worst: Option<&Space>, s| match worst {
                Some(w) if w.len() >= s.len() => Some(w),
                _ => Some(s),
            }),
        };

        return chosen.map(|s| s.start);
    }
}

/// Anything that occupies a byte range of the disk.
pub trait Span {
    fn span_start(&self) -> i64;
    fn span_size(&self) -> i64;

    /// Unused slots keep a negative start.
    fn is_allocated(&self) -> bool {
        return self.span_start() >= 0 && self.span_size() > 0;
    }
}

/// An inclusive byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Space {
    pub start: i64,
    pub end: i64,
}

impl Space {
    pub fn len(&self) -> i64 {
        return self.end - self.start + 1;
    }
}

/// Computes the free extents of `[start, end]` around the occupied spans, in ascending order.
pub fn free_spaces(occupied: &[&dyn Span], start: i64, end: i64) -> Vec<Space> {
    let mut used: Vec<Space> = occupied
        .iter()
        .filter(|s| s.is_allocated())
        .map(|s| Space {
            start: s.span_start(),
            end: s.span_start() + s.span_size() - 1,
        })
        .filter(|s| s.end >= start && s.start <= end)
        .map(|s| Space {
            start: core::cmp::max(s.start, start),
            end: core::cmp::min(s.end, end),
        })
        .collect();

    used.sort_by_key(|s| s.start);

    let mut free = Vec::new();
    let mut cursor = start;

    for space in used.iter() {
        if space.start > cursor {
            free.push(Space {
                start: cursor,
                end: space.start - 1,
            });
        }

        cursor = core::cmp::max(cursor, space.end + 1);
    }

    if cursor <= end {
        free.push(Space { start: cursor, end });
    }

    return free;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Region(i64, i64);

    impl Span for Region {
        fn span_start(&self) -> i64 {
            return self.0;
        }

        fn span_size(&self) -> i64 {
            return self.1;
        }
    }

    #[test]
    fn test_empty_disk() {
        let spaces = free_spaces(&[], 153, 999);
        assert_eq!(spaces, vec![Space { start: 153, end: 999 }]);
    }

    #[test]
    fn test_gaps() {
        let a = Region(200, 100);
        let b = Region(500, 100);
        let unused = Region(-1, -1);
        let spaces = free_spaces(&[&b, &unused, &a], 153, 999);

        assert_eq!(
            spaces,
            vec![
                Space { start: 153, end: 199 },
                Space { start: 300, end: 499 },
                Space { start: 600, end: 999 },
            ]
        );
    }

    #[test]
    fn test_overlap_and_clamp() {
        let a = Region(100, 200);
        let b = Region(250, 100);
        let spaces = free_spaces(&[&a, &b], 153, 400);

        assert_eq!(spaces, vec![Space { start: 350, end: 400 }]);
    }

    #[test]
    fn test_full() {
        let a = Region(0, 1000);
        assert!(free_spaces(&[&a], 153, 999).is_empty());
    }

    #[test]
    fn test_strategies() {
        let spaces = vec![
            Space { start: 0, end: 99 },
            Space { start: 200, end: 249 },
            Space { start: 300, end: 599 },
        ];

        assert_eq!(Fit::First.place(&spaces, 40), Some(0));
        assert_eq!(Fit::Best.place(&spaces, 40), Some(200));
        assert_eq!(Fit::Worst.place(&spaces, 40), Some(300));
        assert_eq!(Fit::Best.place(&spaces, 60), Some(0));
        assert_eq!(Fit::First.place(&spaces, 301), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Fit::parse("bf"), Some(Fit::Best));
        assert_eq!(Fit::parse("FF"), Some(Fit::First));
        assert_eq!(Fit::parse("w"), Some(Fit::Worst));
        assert_eq!(Fit::parse("XF"), None);
    }

    #[test]
    fn test_first_fit_never_overlaps() {
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            return seed;
        };

        for _ in 0..50 {
            let mut placed: Vec<Region> = Vec::new();

            for _ in 0..20 {
                let size = (next() % 400 + 1) as i64;
                let occupied: Vec<&dyn Span> = placed.iter().map(|r| r as &dyn Span).collect();
                let spaces = free_spaces(&occupied, 153, 4_999);

                if let Some(start) = Fit::First.place(&spaces, size) {
                    assert!(start >= 153 && start + size - 1 <= 4_999);

                    for r in placed.iter() {
                        assert!(start + size <= r.0 || r.0 + r.1 <= start);
                    }

                    placed.push(Region(start, size));
                }
            }
        }
    }
}
