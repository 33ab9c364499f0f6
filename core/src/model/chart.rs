/// The chart renderings a series can be shown as. Dispatch is always an
/// exhaustive `match`, so adding a kind breaks every renderer loudly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Column,
    Line,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Pie,
        ChartKind::Column,
        ChartKind::Line,
        ChartKind::Scatter,
    ];

    /// The day-detail overlay starts here every time it opens.
    pub const DAY_DETAIL_DEFAULT: ChartKind = ChartKind::Pie;

    /// The category-trend view starts here.
    pub const TREND_DEFAULT: ChartKind = ChartKind::Column;

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Pie => "Pie",
            ChartKind::Column => "Column",
            ChartKind::Line => "Line",
            ChartKind::Scatter => "Scatter",
        }
    }

    pub fn next(self) -> ChartKind {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> ChartKind {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_through_every_kind_and_wraps() {
        let mut seen = Vec::new();
        let mut kind = ChartKind::Pie;
        for _ in 0..ChartKind::ALL.len() {
            seen.push(kind);
            kind = kind.next();
        }
        assert_eq!(seen, ChartKind::ALL);
        assert_eq!(kind, ChartKind::Pie);
    }

    #[test]
    fn prev_is_the_inverse_of_next() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.next().prev(), kind);
        }
    }
}
