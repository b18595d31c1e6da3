use crate::foundation::error::{SkinampError, SkinampResult};

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One image region referenced by a sprite declaration.
pub struct SpriteDecl {
    /// Optional region identifier (diagnostics only).
    #[serde(default)]
    pub id: String,
    /// Skin file holding the region, e.g. `cbuttons.bmp`.
    pub file: String,
    /// Left edge of the region inside the decoded bitmap.
    #[serde(default)]
    pub sprite_position_x: u32,
    /// Top edge of the region inside the decoded bitmap.
    #[serde(default)]
    pub sprite_position_y: u32,
    /// Region width in pixels.
    pub sprite_width: u32,
    /// Region height in pixels.
    pub sprite_height: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Declarative record for one placed control.
///
/// The JSON layout matches the skin sprite lists:
///
/// ```json
/// { "id": "player.button.play", "action": "PLAY",
///   "absolutePositionX": 39, "absolutePositionY": 88,
///   "image": { "file": "cbuttons.bmp", "spritePositionX": 23, "spritePositionY": 0,
///              "spriteWidth": 23, "spriteHeight": 18 },
///   "downImage": { "file": "cbuttons.bmp", "spritePositionX": 23, "spritePositionY": 18,
///                  "spriteWidth": 23, "spriteHeight": 18 } }
/// ```
pub struct AnimatedSpriteDecl {
    /// Identifier, unique within a stack.
    pub id: String,
    /// Action fired on release; empty means display-only.
    #[serde(default)]
    pub action: String,
    /// Placement, left edge.
    #[serde(default)]
    pub absolute_position_x: i32,
    /// Placement, top edge.
    #[serde(default)]
    pub absolute_position_y: i32,
    /// Normal frame.
    pub image: SpriteDecl,
    /// Frame shown while pressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_image: Option<SpriteDecl>,
    /// Frame shown while toggled on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_image: Option<SpriteDecl>,
    /// Hover text.
    #[serde(default)]
    pub tooltip: String,
    /// Release flips a persistent on/off state.
    #[serde(default, rename = "isToggle")]
    pub toggleable: bool,
    /// Horizontal dragging allowed within `[min_drag, max_drag]`.
    #[serde(default, rename = "isDrag")]
    pub draggable: bool,
    /// Leftmost x reachable by dragging.
    #[serde(default, rename = "minDrag")]
    pub min_drag_x: i32,
    /// Rightmost x reachable by dragging.
    #[serde(default, rename = "maxDrag")]
    pub max_drag_x: i32,
}

/// Parse a JSON sprite list. Order is z-order, first = bottom.
pub fn parse_sprite_decls(json: &[u8]) -> SkinampResult<Vec<AnimatedSpriteDecl>> {
    serde_json::from_slice(json).map_err(|e| SkinampError::serde(format!("sprite list: {e}")))
}

/// Structural checks run before any bitmap is decoded.
pub fn validate_decls(decls: &[AnimatedSpriteDecl]) -> SkinampResult<()> {
    if decls.is_empty() {
        return Err(SkinampError::validation(
            "sprite list must contain at least the background sprite",
        ));
    }

    let mut seen = std::collections::HashSet::with_capacity(decls.len());
    for decl in decls {
        if decl.id.is_empty() {
            return Err(SkinampError::validation("sprite id must be non-empty"));
        }
        if !seen.insert(decl.id.as_str()) {
            return Err(SkinampError::validation(format!(
                "duplicate sprite id '{}'",
                decl.id
            )));
        }
        if decl.image.sprite_width == 0 || decl.image.sprite_height == 0 {
            return Err(SkinampError::validation(format!(
                "sprite '{}' has an empty base image",
                decl.id
            )));
        }
        if decl.draggable && decl.min_drag_x > decl.max_drag_x {
            return Err(SkinampError::validation(format!(
                "sprite '{}' has minDrag {} > maxDrag {}",
                decl.id, decl.min_drag_x, decl.max_drag_x
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/model.rs"]
mod tests;
