//! Layered render cache.
//!
//! The static backdrop is composed once. Score, health and illustration are
//! kept in their own surfaces and only redrawn when their dirty flag is set.
//! The drummer strip and the track are redrawn every frame.

use crate::models::dirty::{DirtyFlags, Layer};
use crate::render::draw;
use crate::render::layout::{Palette, Rect, ScreenLayout};
use crate::render::surface::Surface;
use crate::state::game::GameplaySnapshot;

/// How many times each surface was recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedrawCounts {
    pub score: u64,
    pub health: u64,
    pub illustration: u64,
    pub dynamic: u64,
}

impl RedrawCounts {
    pub fn layer(&self, layer: Layer) -> u64 {
        match layer {
            Layer::Score => self.score,
            Layer::Health => self.health,
            Layer::Illustration => self.illustration,
        }
    }
}

pub struct LayeredRenderCache {
    layout: ScreenLayout,
    palette: Palette,
    static_layer: Surface,
    score: Surface,
    health: Surface,
    illustration: Surface,
    drummer: Surface,
    track: Surface,
    counts: RedrawCounts,
}

impl LayeredRenderCache {
    pub fn new(layout: ScreenLayout, palette: Palette) -> Self {
        let static_layer = draw::draw_static(&layout, &palette);
        log::info!(
            "RENDER: Static layer composed ({}x{})",
            layout.screen_width,
            layout.screen_height
        );
        Self {
            static_layer,
            // Placeholders until the first render (the round starts all dirty).
            score: Surface::new(layout.score.width, layout.score.height),
            health: Surface::new(layout.health.width, layout.health.height),
            illustration: Surface::new(layout.illustration.width, layout.illustration.height),
            drummer: Surface::new(layout.drummer.width, layout.drummer.height),
            track: Surface::new(layout.track.width, layout.track.height),
            layout,
            palette,
            counts: RedrawCounts::default(),
        }
    }

    /// A screen-sized frame to render into.
    pub fn new_frame(&self) -> Surface {
        Surface::new(self.layout.screen_width, self.layout.screen_height)
    }

    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    pub fn counts(&self) -> RedrawCounts {
        self.counts
    }

    /// Composes one frame.
    ///
    /// Each dirty semi-static layer is redrawn from `snapshot` and its flag
    /// cleared in the same step; clean layers are blitted from their cached
    /// surface. Rendering never sets a flag.
    pub fn render(&mut self, frame: &mut Surface, snapshot: &GameplaySnapshot, dirty: &mut DirtyFlags) {
        frame.blit(&self.static_layer, 0, 0);

        for layer in Layer::ALL {
            if dirty.take(layer) {
                self.redraw(layer, snapshot);
            }
            let (surface, area) = self.layer_surface(layer);
            frame.blit_at(surface, area);
        }

        draw::draw_drummer(&mut self.drummer, snapshot.drummer_frame(), &self.palette);
        draw::draw_track(&mut self.track, &self.layout, snapshot, &self.palette);
        self.counts.dynamic += 1;
        frame.blit_at(&self.drummer, self.layout.drummer);
        frame.blit_at(&self.track, self.layout.track);
    }

    fn redraw(&mut self, layer: Layer, snapshot: &GameplaySnapshot) {
        match layer {
            Layer::Score => {
                self.score = draw::draw_score(self.layout.score, snapshot.score, &self.palette);
                self.counts.score += 1;
            }
            Layer::Health => {
                self.health = draw::draw_health(
                    self.layout.health,
                    snapshot.health,
                    snapshot.health_max,
                    &self.palette,
                );
                self.counts.health += 1;
            }
            Layer::Illustration => {
                self.illustration =
                    draw::draw_illustration(self.layout.illustration, snapshot.mood, &self.palette);
                self.counts.illustration += 1;
            }
        }
        log::trace!("RENDER: Redrew {:?} layer", layer);
    }

    fn layer_surface(&self, layer: Layer) -> (&Surface, Rect) {
        match layer {
            Layer::Score => (&self.score, self.layout.score),
            Layer::Health => (&self.health, self.layout.health),
            Layer::Illustration => (&self.illustration, self.layout.illustration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::PressedDirections;
    use crate::models::engine::{Chart, Direction, HitWindow, Note};
    use crate::models::progress::ScoreRules;
    use crate::state::game::{RoundState, TickInput};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn round() -> RoundState {
        let chart = Chart::new(
            60,
            (1..=8)
                .map(|beat| Note::new(Direction::ALL[beat % 4], beat as f64))
                .collect(),
        )
        .unwrap();
        RoundState::new(Arc::new(chart), HitWindow::new(), ScoreRules::default(), 2.0)
    }

    fn render(cache: &mut LayeredRenderCache, state: &mut RoundState) -> Surface {
        let snapshot = GameplaySnapshot::capture(state, PressedDirections::empty());
        let mut frame = cache.new_frame();
        cache.render(&mut frame, &snapshot, state.dirty_mut());
        frame
    }

    #[test]
    fn first_frame_draws_every_layer() {
        let mut cache = LayeredRenderCache::new(ScreenLayout::default(), Palette::default());
        let mut state = round();
        render(&mut cache, &mut state);

        let counts = cache.counts();
        assert_eq!((counts.score, counts.health, counts.illustration), (1, 1, 1));
        assert_eq!(counts.dynamic, 1);
        assert!(!state.dirty().any());
    }

    #[test]
    fn clean_layers_are_not_recomputed() {
        let mut cache = LayeredRenderCache::new(ScreenLayout::default(), Palette::default());
        let mut state = round();
        render(&mut cache, &mut state);

        for tick in 0..10 {
            state.update(TickInput::idle(tick as f64 * 0.01));
            render(&mut cache, &mut state);
        }
        let counts = cache.counts();
        assert_eq!((counts.score, counts.health, counts.illustration), (1, 1, 1));
        assert_eq!(counts.dynamic, 11);
    }

    #[test]
    fn miss_redraws_health_and_illustration_only() {
        let layout = ScreenLayout::default();
        let mut cache = LayeredRenderCache::new(layout, Palette::default());
        let mut state = round();
        let before = render(&mut cache, &mut state);

        let stray = PressedDirections::empty().with(Direction::Up);
        state.update(TickInput::new(0.0, stray));
        let after = render(&mut cache, &mut state);

        let counts = cache.counts();
        assert_eq!(counts.score, 1);
        assert_eq!(counts.health, 2);
        assert_eq!(counts.illustration, 2);
        assert!(after.region_eq(&before, layout.score));
        assert!(!after.region_eq(&before, layout.illustration));
    }

    #[test]
    fn cached_layer_is_blitted_unchanged() {
        let layout = ScreenLayout::default();
        let mut cache = LayeredRenderCache::new(layout, Palette::default());
        let mut state = round();
        let first = render(&mut cache, &mut state);
        state.update(TickInput::idle(0.5));
        let second = render(&mut cache, &mut state);

        for area in [layout.score, layout.health, layout.illustration] {
            assert!(first.region_eq(&second, area));
        }
    }

    proptest! {
        #[test]
        fn render_only_clears_flags(
            bits in proptest::collection::vec(any::<(bool, bool, bool)>(), 1..20),
        ) {
            let mut cache = LayeredRenderCache::new(ScreenLayout::default(), Palette::default());
            let state = round();
            let snapshot = GameplaySnapshot::capture(&state, PressedDirections::empty());
            let mut frame = cache.new_frame();

            for (score, health, illustration) in bits {
                let mut flags = DirtyFlags::clean();
                for (set, layer) in [(score, Layer::Score), (health, Layer::Health), (illustration, Layer::Illustration)] {
                    if set {
                        flags.mark(layer);
                    }
                }
                let before = cache.counts();
                cache.render(&mut frame, &snapshot, &mut flags);

                prop_assert!(!flags.any());
                for (set, layer) in [(score, Layer::Score), (health, Layer::Health), (illustration, Layer::Illustration)] {
                    prop_assert_eq!(cache.counts().layer(layer) - before.layer(layer), u64::from(set));
                }
            }
        }
    }
}
