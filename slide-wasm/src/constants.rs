/// Rendering constants. Ratios are fractions of one cell.
/// Inset of the darker square drawn inside each block cell.
pub const CELL_INSET: f64 = 0.2;
/// Outline width for selectable blocks.
pub const OUTLINE_WIDTH: f64 = 0.04;
/// Font size of canvas block labels.
pub const LABEL_SIZE: f64 = 0.4;
pub const CELL_SHADE: &str = "rgba(0, 0, 0, 0.1)";
pub const OUTLINE_COLOR: &str = "rgba(0, 0, 0, 0.5)";
/// Element ids looked up at start-up.
pub const CANVAS_ID: &str = "cv";
pub const CONTAINER_ID: &str = "container";
