//! Label layout: resolve → solve → compose.
//!
//! Pure and synchronous. The same config and content always give the same
//! scene, so batch callers may run labels in any order or in parallel.

pub mod compose;
pub mod metrics;
pub mod resolve;
pub mod solver;

pub use compose::compose;
pub use resolve::resolve;
pub use solver::layout;

use crate::error::LabelError;
use crate::types::{ContentSet, LabelConfig, LabelScene, PROGRESS_SLOTS};

/// Lay out one label and place every drawable item.
///
/// Fails only on content that cannot be drawn (a level above 4). Long text
/// or crowded labels never fail; they shrink.
pub fn generate_label(
    config: &LabelConfig,
    content: &ContentSet,
) -> Result<LabelScene, LabelError> {
    check_level("water_level", content.water_level)?;
    check_level("light_level", content.light_level)?;

    let solved = layout(config, content);
    let items = compose(config, content, &solved);

    Ok(LabelScene {
        config: config.clone(),
        layout: solved,
        items,
    })
}

fn check_level(field: &'static str, level: u8) -> Result<(), LabelError> {
    if level > PROGRESS_SLOTS {
        return Err(LabelError::InvalidContent {
            field,
            reason: format!("must be between 0 and {} (got {})", PROGRESS_SLOTS, level),
        });
    }
    Ok(())
}
