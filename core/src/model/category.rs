/// The fixed set of activity categories the service knows about.
///
/// This is the single owner of the category configuration: wire names,
/// display colors, and the ASCII keys the CLI accepts. Every view refers to
/// this module instead of carrying its own list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    StudyWork,
    Sleep,
    Exercise,
    Leisure,
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Category::StudyWork
    }
}

impl Category {
    /// Declaration order matches the order the service presents categories.
    pub const ALL: [Category; 5] = [
        Category::StudyWork,
        Category::Sleep,
        Category::Exercise,
        Category::Leisure,
        Category::Other,
    ];

    /// The name the backend stores and returns.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Category::StudyWork => "공부/일",
            Category::Sleep => "수면",
            Category::Exercise => "운동",
            Category::Leisure => "여가",
            Category::Other => "기타",
        }
    }

    /// ASCII key used on the command line (e.g. `sleep:7h30m`).
    pub fn key(&self) -> &'static str {
        match self {
            Category::StudyWork => "study",
            Category::Sleep => "sleep",
            Category::Exercise => "exercise",
            Category::Leisure => "leisure",
            Category::Other => "other",
        }
    }

    /// Display color as RGB, shared by every chart and table.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Category::StudyWork => (0x88, 0x84, 0xd8),
            Category::Sleep => (0x82, 0xca, 0x9d),
            Category::Exercise => (0xff, 0xc6, 0x58),
            Category::Leisure => (0xff, 0x80, 0x42),
            Category::Other => (0xa4, 0xde, 0x6c),
        }
    }

    /// Resolves a wire name. Unknown names are not an error here; entries
    /// outside the fixed set are simply skipped by aggregation.
    pub fn parse(name: &str) -> Option<Category> {
        Category::ALL.iter().find(|c| c.wire_name() == name).copied()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_wire_name() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.wire_name()), Some(category));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(Category::parse("낮잠"), None);
        assert_eq!(Category::parse(""), None);
        assert_eq!(Category::parse("sleep"), None); // keys are not wire names
    }

    #[test]
    fn default_is_the_first_category() {
        assert_eq!(Category::default(), Category::ALL[0]);
    }
}
