use std::collections::HashMap;

use super::tween::Tween;

/// Per-node radius scale driven by pointer enter/leave.
#[derive(Debug, Default)]
pub struct HoverGrowth {
    scales: HashMap<usize, Tween>,
}

impl HoverGrowth {
    pub fn scale(&self, node: usize, now: f64) -> f32 {
        self.scales.get(&node).map_or(1.0, |tween| tween.value(now))
    }

    pub fn enter(&mut self, node: usize, now: f64, scale: f32, duration: f32) {
        let current = self.scale(node, now);
        self.scales.insert(node, Tween::new(current, scale, now, duration));
    }

    /// Shrinks back unless `keep` is set.
    pub fn leave(&mut self, node: usize, now: f64, duration: f32, keep: bool) {
        if keep || !self.scales.contains_key(&node) {
            return;
        }
        let current = self.scale(node, now);
        self.scales.insert(node, Tween::new(current, 1.0, now, duration));
    }

    /// Drops growth immediately for every node `keep` rejects.
    pub fn snap_back_except(&mut self, keep: impl Fn(usize) -> bool) {
        self.scales.retain(|&node, _| keep(node));
    }

    pub fn clear(&mut self) {
        self.scales.clear();
    }

    /// Forgets finished shrink tweens. Returns `true` while anything moves.
    pub fn tick(&mut self, now: f64) -> bool {
        self.scales
            .retain(|_, tween| !(tween.is_finished(now) && tween.target() == 1.0));
        self.scales.values().any(|tween| !tween.is_finished(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_then_shrinks() {
        let mut hover = HoverGrowth::default();
        hover.enter(3, 0.0, 1.4, 0.2);
        assert!(hover.tick(0.1));
        assert!(!hover.tick(0.3));
        assert!((hover.scale(3, 0.3) - 1.4).abs() < 1e-6);

        hover.leave(3, 1.0, 0.2, false);
        assert!(hover.scale(3, 1.1) < 1.4);
        assert!(!hover.tick(2.0));
        assert_eq!(hover.scale(3, 2.0), 1.0);
        assert!(hover.scales.is_empty());
    }

    #[test]
    fn kept_nodes_stay_grown() {
        let mut hover = HoverGrowth::default();
        hover.enter(1, 0.0, 1.4, 0.2);
        hover.leave(1, 0.5, 0.2, true);
        hover.tick(5.0);
        assert!((hover.scale(1, 5.0) - 1.4).abs() < 1e-6);

        hover.snap_back_except(|node| node != 1);
        assert_eq!(hover.scale(1, 5.0), 1.0);
    }

    #[test]
    fn re_entering_mid_shrink_starts_from_current_scale() {
        let mut hover = HoverGrowth::default();
        hover.enter(0, 0.0, 1.4, 0.2);
        hover.leave(0, 1.0, 0.2, false);
        let mid = hover.scale(0, 1.1);
        hover.enter(0, 1.1, 1.4, 0.2);
        assert!((hover.scale(0, 1.1) - mid).abs() < 1e-6);
    }
}
