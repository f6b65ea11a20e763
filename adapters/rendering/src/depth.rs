/// Distance to the nearest wall seen through each ray column.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthBuffer {
    depths: Vec<f32>,
    view_distance: f32,
}

impl DepthBuffer {
    /// Creates a buffer with one cleared entry per column.
    #[must_use]
    pub fn new(columns: usize, view_distance: f32) -> Self {
        Self {
            depths: vec![view_distance; columns],
            view_distance,
        }
    }

    /// Clears every column back to the view distance.
    pub fn reset(&mut self) {
        self.depths.fill(self.view_distance);
    }

    /// Stores the wall distance seen through `column`.
    pub fn record(&mut self, column: usize, depth: f32) {
        if let Some(slot) = self.depths.get_mut(column) {
            *slot = depth;
        }
    }

    /// Wall distance stored for `column`.
    #[must_use]
    pub fn depth(&self, column: usize) -> Option<f32> {
        self.depths.get(column).copied()
    }

    /// Whether something `distance` away is in front of the wall in `column`.
    ///
    /// Columns outside the buffer are never visible.
    #[must_use]
    pub fn is_visible(&self, column: usize, distance: f32) -> bool {
        self.depth(column).is_some_and(|depth| distance < depth)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Whether the buffer holds no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Stored distances in column order.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.depths
    }
}
