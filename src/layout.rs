use crate::model::CardType;

pub const CANVAS_WIDTH: u32 = 1500;
pub const CANVAS_HEIGHT: u32 = 2100;

pub const TITLE_FONT_MAX: f32 = 90.0;
pub const COST_GLYPH_SIZE: u32 = 50;
pub const TYPE_LINE_FONT: f32 = 80.0;
pub const ABILITY_FONT_START: f32 = 50.0;
pub const ABILITY_FONT_MIN: f32 = 10.0;
pub const ABILITY_LINE_SPACING: f32 = 10.0;
pub const ABILITY_PAD_TOP: f32 = 20.0;
pub const POWER_TOUGHNESS_FONT: f32 = 80.0;
pub const FLAVOR_FONT: f32 = 40.0;

/// Fixed pixel rectangle in canvas coordinates, `(x0, y0)` inclusive top-left
/// to `(x1, y1)` exclusive bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl LayoutBox {
    pub const fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub const fn width(self) -> u32 {
        self.x1 - self.x0
    }

    pub const fn height(self) -> u32 {
        self.y1 - self.y0
    }

    pub const fn contains(self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Box geometry for one card type. Entries are data: nothing here is derived
/// from card content.
#[derive(Clone, Copy, Debug)]
pub struct CardLayout {
    pub title: LayoutBox,
    pub art: LayoutBox,
    /// Top-left anchor of the single-line type text.
    pub type_line: (u32, u32),
    pub abilities: LayoutBox,
    pub power_toughness: Option<LayoutBox>,
    pub flavor: Option<LayoutBox>,
}

const CREATURE_LAYOUT: CardLayout = CardLayout {
    title: LayoutBox::new(120, 111, 1392, 207),
    art: LayoutBox::new(117, 237, 1383, 1164),
    type_line: (147, 1197),
    abilities: LayoutBox::new(120, 1323, 1386, 1943),
    power_toughness: Some(LayoutBox::new(1150, 1955, 1380, 2045)),
    flavor: Some(LayoutBox::new(120, 1955, 1110, 2045)),
};

const SPELL_LAYOUT: CardLayout = CardLayout {
    title: LayoutBox::new(120, 111, 1392, 207),
    art: LayoutBox::new(117, 237, 1383, 1164),
    type_line: (147, 1197),
    abilities: LayoutBox::new(120, 1323, 1386, 1943),
    power_toughness: None,
    flavor: Some(LayoutBox::new(120, 1955, 1380, 2045)),
};

impl CardType {
    /// Static geometry for this card type.
    pub fn layout(self) -> &'static CardLayout {
        match self {
            CardType::Creature => &CREATURE_LAYOUT,
            CardType::Instant
            | CardType::Sorcery
            | CardType::Enchantment
            | CardType::Artifact
            | CardType::Land => &SPELL_LAYOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_card_type_has_in_bounds_geometry() {
        for ty in CardType::ALL {
            let layout = ty.layout();
            for bx in [layout.title, layout.art, layout.abilities] {
                assert!(bx.x0 < bx.x1 && bx.y0 < bx.y1, "{ty:?} {bx:?}");
                assert!(bx.x1 <= CANVAS_WIDTH && bx.y1 <= CANVAS_HEIGHT, "{ty:?} {bx:?}");
            }
            for bx in [layout.power_toughness, layout.flavor].into_iter().flatten() {
                assert!(bx.x1 <= CANVAS_WIDTH && bx.y1 <= CANVAS_HEIGHT, "{ty:?} {bx:?}");
            }
            let (tx, ty_anchor) = layout.type_line;
            assert!(tx < CANVAS_WIDTH && ty_anchor < CANVAS_HEIGHT);
        }
    }

    #[test]
    fn only_creatures_carry_power_toughness() {
        for ty in CardType::ALL {
            let has_pt = ty.layout().power_toughness.is_some();
            assert_eq!(has_pt, ty == CardType::Creature, "{ty:?}");
        }
    }

    #[test]
    fn layout_box_accessors() {
        let bx = LayoutBox::new(10, 20, 110, 70);
        assert_eq!(bx.width(), 100);
        assert_eq!(bx.height(), 50);
        assert!(bx.contains(10, 20));
        assert!(bx.contains(109, 69));
        assert!(!bx.contains(110, 69));
        assert!(!bx.contains(10, 70));
    }
}
