/// Fixed, ordered color catalog. The selector only ever picks from a prefix
/// of `ALL`, so the order matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CueColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl CueColor {
    pub const ALL: [CueColor; 5] = [
        CueColor::Red,
        CueColor::Green,
        CueColor::Blue,
        CueColor::Yellow,
        CueColor::Purple,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CueColor::Red => "Red",
            CueColor::Green => "Green",
            CueColor::Blue => "Blue",
            CueColor::Yellow => "Yellow",
            CueColor::Purple => "Purple",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            CueColor::Red => (0xff, 0x3b, 0x30),
            CueColor::Green => (0x34, 0xc7, 0x59),
            CueColor::Blue => (0x00, 0x7a, 0xff),
            CueColor::Yellow => (0xff, 0xcc, 0x00),
            CueColor::Purple => (0xaf, 0x52, 0xde),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn palette_entries_are_distinct() {
        let names: HashSet<_> = CueColor::ALL.iter().map(|c| c.name()).collect();
        let rgbs: HashSet<_> = CueColor::ALL.iter().map(|c| c.rgb()).collect();
        assert_eq!(names.len(), CueColor::ALL.len());
        assert_eq!(rgbs.len(), CueColor::ALL.len());
    }
}
