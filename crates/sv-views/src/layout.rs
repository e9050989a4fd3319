//! Force-directed bubble packing
//!
//! Pairwise charge, band steering, collision and vertical centering on
//! nalgebra vectors. The simulation cools through `alpha` and stops by itself.

use nalgebra::Vector2;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceConfig {
    /// Pairwise strength; positive pulls nodes together
    pub charge: f32,
    /// Strength of the pull towards the horizontal band target
    pub x_strength: f32,
    /// Strength of the pull towards the vertical middle
    pub y_strength: f32,
    /// Fraction of alpha lost per tick
    pub alpha_decay: f32,
    /// Fraction of velocity lost per tick
    pub velocity_decay: f32,
    /// Extra gap kept between touching bubbles
    pub collision_padding: f32,
    /// Alpha below which the simulation stops
    pub alpha_min: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            charge: 5.0,
            x_strength: 0.1,
            y_strength: 0.05,
            alpha_decay: 0.01,
            velocity_decay: 0.6,
            collision_padding: 2.0,
            alpha_min: 0.001,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutNode<K> {
    pub key: K,
    pub radius: f32,
    /// Horizontal target as a fraction of the panel width
    pub target_x: f32,
    pub position: Vector2<f32>,
    velocity: Vector2<f32>,
}

pub struct ForceLayout<K> {
    nodes: Vec<LayoutNode<K>>,
    size: Vector2<f32>,
    alpha: f32,
    config: ForceConfig,
}

impl<K: Clone + PartialEq> ForceLayout<K> {
    pub fn new(config: ForceConfig) -> Self {
        Self {
            nodes: Vec::new(),
            size: Vector2::new(1.0, 1.0),
            alpha: 0.0,
            config,
        }
    }

    pub fn nodes(&self) -> &[LayoutNode<K>] {
        &self.nodes
    }

    pub fn is_running(&self) -> bool {
        self.alpha >= self.config.alpha_min && !self.nodes.is_empty()
    }

    /// Replace the node set and restart the simulation.
    ///
    /// Nodes whose key survives keep their position; new ones start at a
    /// random spot near their horizontal target.
    pub fn reset(&mut self, config: ForceConfig, nodes: impl IntoIterator<Item = (K, f32, f32)>) {
        let mut rng = rand::thread_rng();
        let previous = std::mem::take(&mut self.nodes);
        let (width, height) = (self.size.x, self.size.y);

        self.nodes = nodes
            .into_iter()
            .map(|(key, radius, target_x)| {
                let position = previous
                    .iter()
                    .find(|node| node.key == key)
                    .map(|node| node.position)
                    .unwrap_or_else(|| {
                        Vector2::new(
                            target_x * width + rng.gen_range(-0.1..0.1) * width,
                            height * 0.5 + rng.gen_range(-0.3..0.3) * height,
                        )
                    });
                LayoutNode {
                    key,
                    radius,
                    target_x,
                    position,
                    velocity: Vector2::zeros(),
                }
            })
            .collect();

        self.config = config;
        self.alpha = 1.0;
    }

    /// Update the panel size. Existing positions are rescaled.
    pub fn set_size(&mut self, width: f32, height: f32) {
        let new_size = Vector2::new(width.max(1.0), height.max(1.0));
        if (new_size - self.size).norm() < 0.5 {
            return;
        }
        let scale = new_size.component_div(&self.size);
        for node in &mut self.nodes {
            node.position = node.position.component_mul(&scale);
        }
        self.size = new_size;
    }

    /// Run one simulation step.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }
        let alpha = self.alpha;
        let config = self.config;
        let center = self.size * 0.5;
        let n = self.nodes.len();

        // Pairwise charge
        for i in 0..n {
            let mut force = Vector2::zeros();
            for j in 0..n {
                if i == j {
                    continue;
                }
                let diff = self.nodes[j].position - self.nodes[i].position;
                let dist_sq = diff.norm_squared().max(1.0);
                force += diff / dist_sq.sqrt() * (config.charge * alpha / dist_sq.sqrt()).min(10.0);
            }
            self.nodes[i].velocity += force;
        }

        // Band steering
        for node in &mut self.nodes {
            let target = Vector2::new(node.target_x * self.size.x, center.y);
            node.velocity.x += (target.x - node.position.x) * config.x_strength * alpha;
            node.velocity.y += (target.y - node.position.y) * config.y_strength * alpha;
        }

        // Integrate
        for node in &mut self.nodes {
            node.velocity *= 1.0 - config.velocity_decay;
            node.position += node.velocity;
        }

        self.resolve_collisions();
        self.recenter(center);
        self.clamp_to_bounds();

        self.alpha += (0.0 - self.alpha) * config.alpha_decay;
    }

    /// Run `steps` ticks at once, e.g. to settle before the first frame.
    pub fn advance(&mut self, steps: usize) {
        for _ in 0..steps {
            if !self.is_running() {
                break;
            }
            self.tick();
        }
    }

    fn resolve_collisions(&mut self) {
        let padding = self.config.collision_padding;
        let n = self.nodes.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let min_dist = self.nodes[i].radius + self.nodes[j].radius + padding;
                let diff = self.nodes[j].position - self.nodes[i].position;
                let dist = diff.norm();
                if dist >= min_dist {
                    continue;
                }
                let direction = if dist > f32::EPSILON {
                    diff / dist
                } else {
                    // Coincident nodes: separate along a fixed axis
                    Vector2::new(1.0, 0.0)
                };
                let push = direction * ((min_dist - dist) * 0.5);
                self.nodes[i].position -= push;
                self.nodes[j].position += push;
            }
        }
    }

    /// Move the vertical centroid onto the middle of the panel.
    fn recenter(&mut self, center: Vector2<f32>) {
        if self.nodes.is_empty() {
            return;
        }
        let mean_y = self.nodes.iter().map(|node| node.position.y).sum::<f32>() / self.nodes.len() as f32;
        let shift = center.y - mean_y;
        for node in &mut self.nodes {
            node.position.y += shift;
        }
    }

    fn clamp_to_bounds(&mut self) {
        let (width, height) = (self.size.x, self.size.y);
        for node in &mut self.nodes {
            let r = node.radius.min(width * 0.5).min(height * 0.5);
            node.position.x = node.position.x.clamp(r, (width - r).max(r));
            node.position.y = node.position.y.clamp(r, (height - r).max(r));
        }
    }

    /// Key of the node under `point` (layout coordinates), topmost first.
    pub fn hit_test(&self, point: Vector2<f32>) -> Option<&K> {
        self.nodes
            .iter()
            .rev()
            .find(|node| (node.position - point).norm() <= node.radius)
            .map(|node| &node.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(nodes: Vec<(u32, f32, f32)>) -> ForceLayout<u32> {
        let mut layout = ForceLayout::new(ForceConfig::default());
        layout.set_size(800.0, 400.0);
        layout.reset(ForceConfig::default(), nodes);
        layout.advance(2000);
        layout
    }

    #[test]
    fn test_simulation_cools_down() {
        let layout = settled(vec![(1, 20.0, 0.5), (2, 30.0, 0.5)]);
        assert!(!layout.is_running());
    }

    #[test]
    fn test_nodes_stay_inside_panel() {
        let layout = settled((0..20).map(|i| (i, 25.0, if i % 2 == 0 { 0.1 } else { 0.9 })).collect());
        for node in layout.nodes() {
            assert!(node.position.x >= node.radius - 0.01 && node.position.x <= 800.0 - node.radius + 0.01);
            assert!(node.position.y >= node.radius - 0.01 && node.position.y <= 400.0 - node.radius + 0.01);
        }
    }

    #[test]
    fn test_band_targets_order_nodes() {
        let layout = settled(vec![(1, 20.0, 0.1), (2, 20.0, 0.9)]);
        let left = &layout.nodes()[0];
        let right = &layout.nodes()[1];
        assert!(left.position.x < right.position.x);
    }

    #[test]
    fn test_hit_test() {
        let layout = settled(vec![(7, 30.0, 0.5)]);
        let node = &layout.nodes()[0];
        assert_eq!(layout.hit_test(node.position), Some(&7));
        assert_eq!(layout.hit_test(node.position + Vector2::new(100.0, 100.0)), None);
    }

    #[test]
    fn test_surviving_nodes_keep_position() {
        let mut layout = settled(vec![(1, 20.0, 0.3), (2, 20.0, 0.7)]);
        let before = layout.nodes()[0].position;
        layout.reset(ForceConfig::default(), vec![(1, 20.0, 0.3), (3, 20.0, 0.5)]);
        assert_eq!(layout.nodes()[0].position, before);
        assert!(layout.is_running());
    }
}
