use crate::error::{CardwrightError, CardwrightResult};

/// Structured card data produced by the text-generation collaborator.
///
/// The JSON shape matches what that service emits: lowercase snake_case keys
/// with the type line under `type`. The record is immutable once built;
/// [`CardSpec::validate`] is the gate every render passes through before any
/// painting starts.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CardSpec {
    pub name: String,
    pub mana_cost: String,
    #[serde(rename = "type")]
    pub type_line: String,
    pub abilities: Vec<String>,
    #[serde(default)]
    pub power_toughness: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub rarity: String,
    pub color: ColorCategory,
}

/// Closed set of color categories a card can carry.
///
/// Colorless non-artifact cards use `void`, matching the card-data contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCategory {
    White,
    Blue,
    Black,
    Red,
    Green,
    Void,
    Artifact,
    Land,
    Multicolored,
}

impl ColorCategory {
    pub const ALL: [ColorCategory; 9] = [
        ColorCategory::White,
        ColorCategory::Blue,
        ColorCategory::Black,
        ColorCategory::Red,
        ColorCategory::Green,
        ColorCategory::Void,
        ColorCategory::Artifact,
        ColorCategory::Land,
        ColorCategory::Multicolored,
    ];

    /// Lowercase stem used for frame asset file names.
    pub fn file_stem(self) -> &'static str {
        match self {
            ColorCategory::White => "white",
            ColorCategory::Blue => "blue",
            ColorCategory::Black => "black",
            ColorCategory::Red => "red",
            ColorCategory::Green => "green",
            ColorCategory::Void => "void",
            ColorCategory::Artifact => "artifact",
            ColorCategory::Land => "land",
            ColorCategory::Multicolored => "multicolored",
        }
    }
}

/// Card types the layout table defines geometry for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Land,
}

impl CardType {
    pub const ALL: [CardType; 6] = [
        CardType::Creature,
        CardType::Instant,
        CardType::Sorcery,
        CardType::Enchantment,
        CardType::Artifact,
        CardType::Land,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CardType::Creature => "Creature",
            CardType::Instant => "Instant",
            CardType::Sorcery => "Sorcery",
            CardType::Enchantment => "Enchantment",
            CardType::Artifact => "Artifact",
            CardType::Land => "Land",
        }
    }

    /// Parse the leading word of a type line ("Creature — Goblin" => Creature).
    pub fn parse(type_line: &str) -> Option<CardType> {
        let head = type_line.split_whitespace().next()?;
        CardType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(head))
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl CardSpec {
    /// Deserialize a card record from collaborator JSON.
    pub fn from_json(json: &str) -> CardwrightResult<CardSpec> {
        serde_json::from_str(json)
            .map_err(|e| CardwrightError::validation(format!("invalid card json: {e}")))
    }

    /// Card type derived from the type line.
    ///
    /// An unrecognized type is fatal: there is no layout geometry to paint it
    /// into.
    pub fn card_type(&self) -> CardwrightResult<CardType> {
        CardType::parse(&self.type_line).ok_or_else(|| {
            CardwrightError::validation(format!("unrecognized card type '{}'", self.type_line))
        })
    }

    pub fn validate(&self) -> CardwrightResult<()> {
        if self.name.trim().is_empty() {
            return Err(CardwrightError::validation("card name must be non-empty"));
        }
        if self.type_line.trim().is_empty() {
            return Err(CardwrightError::validation("type line must be non-empty"));
        }
        self.card_type()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_spec() -> CardSpec {
        CardSpec {
            name: "Test".to_string(),
            mana_cost: "{2}{G}".to_string(),
            type_line: "Creature".to_string(),
            abilities: vec!["Trample".to_string()],
            power_toughness: Some("3/3".to_string()),
            flavor_text: None,
            rarity: "common".to_string(),
            color: ColorCategory::Green,
        }
    }

    #[test]
    fn json_roundtrip() {
        let spec = basic_spec();
        let s = serde_json::to_string_pretty(&spec).unwrap();
        let de = CardSpec::from_json(&s).unwrap();
        assert_eq!(de.name, "Test");
        assert_eq!(de.type_line, "Creature");
        assert_eq!(de.color, ColorCategory::Green);
    }

    #[test]
    fn from_json_accepts_collaborator_shape() {
        let json = r#"{
            "name": "Emberfang Raider",
            "mana_cost": "{1}{R}",
            "type": "Creature",
            "abilities": ["Haste", "When this creature attacks, it deals 1 damage."],
            "power_toughness": "2/1",
            "flavor_text": "It bites first.",
            "rarity": "uncommon",
            "color": "red"
        }"#;
        let spec = CardSpec::from_json(json).unwrap();
        assert_eq!(spec.card_type().unwrap(), CardType::Creature);
        assert_eq!(spec.color, ColorCategory::Red);
        assert_eq!(spec.abilities.len(), 2);
    }

    #[test]
    fn from_json_rejects_out_of_set_color() {
        let json = r#"{
            "name": "X", "mana_cost": "", "type": "Land",
            "abilities": [], "color": "purple"
        }"#;
        assert!(matches!(
            CardSpec::from_json(json),
            Err(CardwrightError::Validation(_))
        ));
    }

    #[test]
    fn from_json_rejects_missing_required_field() {
        let json = r#"{ "name": "X", "type": "Land", "abilities": [], "color": "land" }"#;
        assert!(CardSpec::from_json(json).is_err());
    }

    #[test]
    fn card_type_parses_leading_word() {
        let mut spec = basic_spec();
        spec.type_line = "Creature — Goblin Shaman".to_string();
        assert_eq!(spec.card_type().unwrap(), CardType::Creature);

        spec.type_line = "creature".to_string();
        assert_eq!(spec.card_type().unwrap(), CardType::Creature);
    }

    #[test]
    fn validate_rejects_unknown_type_and_blank_name() {
        let mut spec = basic_spec();
        spec.type_line = "Planeswalker".to_string();
        assert!(spec.validate().is_err());

        let mut spec = basic_spec();
        spec.name = "  ".to_string();
        assert!(spec.validate().is_err());
    }
}
