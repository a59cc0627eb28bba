use std::path::{Path, PathBuf};

use crate::{
    error::{CardwrightError, CardwrightResult},
    model::{CardType, ColorCategory},
};

/// Maps (card type, color category) to a staged frame background.
///
/// Creature frames live in a `creature/` subdirectory of the frame root,
/// every other type shares the root; both are keyed by the color stem. The
/// mapping itself is pure; only [`FrameSelector::select`] touches the
/// filesystem to reject paths with no backing asset.
#[derive(Clone, Debug)]
pub struct FrameSelector {
    root: PathBuf,
}

impl FrameSelector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic path for a (type, color) pair, independent of what is on
    /// disk.
    pub fn frame_path(&self, card_type: CardType, color: ColorCategory) -> PathBuf {
        let file = format!("{}.png", color.file_stem());
        match card_type {
            CardType::Creature => self.root.join("creature").join(file),
            _ => self.root.join(file),
        }
    }

    /// Resolve and verify the frame asset for a card.
    pub fn select(&self, card_type: CardType, color: ColorCategory) -> CardwrightResult<PathBuf> {
        let path = self.frame_path(card_type, color);
        if !path.is_file() {
            return Err(CardwrightError::asset(format!(
                "frame '{}' has no backing asset",
                path.display()
            )));
        }
        Ok(path)
    }
}
