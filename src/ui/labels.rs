use crate::atom::catalog::ElementEntry;
use glam::Vec3;

pub const SYMBOL_SIZE: f32 = 2.0;
pub const NUMBER_SIZE: f32 = 0.8;

/// A piece of text anchored in world space, sized in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: &'static str,
    pub anchor: Vec3,
    pub size: f32,
}

/// The two floating labels for an element: the symbol below center and the
/// atomic number above it. Two-character symbols shift further left so the
/// text stays visually centered on the atom.
pub fn element_labels(entry: &ElementEntry) -> [Label; 2] {
    let single_char = entry.symbol.len() < 2;

    let symbol = Label {
        text: entry.symbol,
        anchor: Vec3::new(if single_char { -0.5 } else { -2.2 }, -0.5, 0.0),
        size: SYMBOL_SIZE,
    };
    let number = Label {
        text: entry.atomic_number,
        anchor: Vec3::new(if single_char { -0.3 } else { -2.0 }, 2.0, 0.0),
        size: NUMBER_SIZE,
    };

    [symbol, number]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::catalog;

    #[test]
    fn single_character_symbol_offsets() {
        let entry = catalog::lookup("C").unwrap();
        let [symbol, number] = element_labels(entry);
        assert_eq!(symbol.text, "C");
        assert_eq!(number.text, "6");
        assert_eq!(symbol.anchor.x, -0.5);
        assert_eq!(number.anchor.x, -0.3);
    }

    #[test]
    fn two_character_symbol_offsets() {
        let entry = catalog::lookup("Mg").unwrap();
        let [symbol, number] = element_labels(entry);
        assert_eq!(symbol.anchor.x, -2.2);
        assert_eq!(number.anchor.x, -2.0);
    }

    #[test]
    fn label_sizes_and_heights() {
        let entry = catalog::lookup("H").unwrap();
        let [symbol, number] = element_labels(entry);
        assert_eq!(symbol.size, 2.0);
        assert_eq!(symbol.anchor.y, -0.5);
        assert_eq!(number.size, 0.8);
        assert_eq!(number.anchor.y, 2.0);
    }
}
