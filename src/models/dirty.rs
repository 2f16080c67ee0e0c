//! Per-layer stale markers shared between progress state and the render cache.
//!
//! Progress mutations set flags; the render cache reads and clears each flag
//! in a single `take` right after it redraws that layer. All access goes
//! through `&mut`, so a write can never overlap a read-and-clear.

/// Semi-static presentation layers that are cached between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Score,
    Health,
    Illustration,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Score, Layer::Health, Layer::Illustration];

    fn bit(self) -> u8 {
        match self {
            Layer::Score => 1 << 0,
            Layer::Health => 1 << 1,
            Layer::Illustration => 1 << 2,
        }
    }
}

/// Cache state of a semi-static layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerStatus {
    Clean,
    Dirty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    bits: u8,
}

impl DirtyFlags {
    /// No layer stale.
    pub fn clean() -> Self {
        Self { bits: 0 }
    }

    /// Every layer stale; used at round start so the first frame draws everything.
    pub fn all_dirty() -> Self {
        let mut flags = Self::clean();
        for layer in Layer::ALL {
            flags.mark(layer);
        }
        flags
    }

    pub fn mark(&mut self, layer: Layer) {
        self.bits |= layer.bit();
    }

    pub fn is_dirty(&self, layer: Layer) -> bool {
        self.bits & layer.bit() != 0
    }

    pub fn status(&self, layer: Layer) -> LayerStatus {
        if self.is_dirty(layer) {
            LayerStatus::Dirty
        } else {
            LayerStatus::Clean
        }
    }

    /// Reads and clears one flag in a single step.
    pub fn take(&mut self, layer: Layer) -> bool {
        let was_dirty = self.is_dirty(layer);
        self.bits &= !layer.bit();
        was_dirty
    }

    pub fn any(&self) -> bool {
        self.bits != 0
    }
}
