//! Desktop/mobile rendering mode selection.

use serde::Deserialize;
use serde::Serialize;

/// The declared layout variant of a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Follow the viewport: mobile on narrow screens, desktop otherwise.
    #[default]
    Auto,
    /// Always render the mobile card list.
    Mobile,
    /// Always render the desktop table.
    Web,
}

/// The rendering strategy that receives the reconciled state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Desktop,
    Mobile,
}

/// Derives the render mode from the variant and the viewport.
///
/// `viewport_is_narrow` is `None` until the host has measured the viewport;
/// an `Auto` grid keeps `previous` in that case instead of flipping.
///
/// # Example
///
/// ```
/// use datagrid_lib::mode::{derive_mode, RenderMode, Variant};
///
/// assert_eq!(derive_mode(Variant::Auto, true, RenderMode::Desktop), RenderMode::Mobile);
/// assert_eq!(derive_mode(Variant::Web, true, RenderMode::Mobile), RenderMode::Desktop);
/// assert_eq!(derive_mode(Variant::Auto, None, RenderMode::Mobile), RenderMode::Mobile);
/// ```
pub fn derive_mode(
    variant: Variant,
    viewport_is_narrow: impl Into<Option<bool>>,
    previous: RenderMode,
) -> RenderMode {
    match variant {
        Variant::Mobile => RenderMode::Mobile,
        Variant::Web => RenderMode::Desktop,
        Variant::Auto => match viewport_is_narrow.into() {
            Some(true) => RenderMode::Mobile,
            Some(false) => RenderMode::Desktop,
            None => previous,
        },
    }
}
