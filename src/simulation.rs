use log::{debug, warn};
use nalgebra::point;
use rand::Rng;

use crate::{
    body::Body,
    config::{Config, ConfigError},
    detect::{brute_force, PassStats, StepReport},
    quadtree::QuadTree,
    shapes::BoundingBox,
};

/// Headless driver owning the bodies and running one step at a time.
///
/// Every step moves each body, rebuilds the tree from scratch, flags collisions through
/// the tree and then again through the brute-force pass so the two can be compared. The
/// tree from the latest step is kept around for overlays and hit-testing until the next
/// step replaces it.
pub struct Simulation<R> {
    config: Config,
    bodies: Vec<Body>,
    rng: R,
    tree: Option<QuadTree>,
}

impl<R: Rng> Simulation<R> {
    /// Create an empty simulation drawing its randomness from `rng`
    pub fn new(config: Config, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            bodies: Vec::new(),
            rng,
            tree: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access to the bodies. Moving them invalidates [`hit_test`](Self::hit_test)
    /// until the next step.
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The tree built by the latest step
    pub fn tree(&self) -> Option<&QuadTree> {
        self.tree.as_ref()
    }

    pub fn push(&mut self, body: Body) {
        self.bodies.push(body);
    }

    /// Spawn a batch of configured bodies at `(x, y)`, each with a random heading
    ///
    /// **Returns** the number of bodies created
    pub fn spawn(&mut self, x: f64, y: f64) -> usize {
        if !self.config.arena().contains(&point![x, y]) {
            warn!("spawning at ({}, {}) outside the arena", x, y);
        }

        let Config {
            body_half_width: hw,
            body_half_height: hh,
            spawn_batch,
            ..
        } = self.config;
        self.bodies.reserve(spawn_batch);
        for _ in 0..spawn_batch {
            let body = Body::spawn_random(x, y, hw, hh, &mut self.rng);
            self.bodies.push(body);
        }
        spawn_batch
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.tree = None;
    }

    /// Advance every body and run both detection passes
    pub fn step(&mut self) -> StepReport {
        for body in &mut self.bodies {
            body.advance(&self.config, &mut self.rng);
            body.reset_collision();
        }

        let mut tree = QuadTree::new(
            self.config.arena(),
            self.config.capacity,
            self.config.max_depth,
        );
        let tree_stats = PassStats::time(|| {
            tree.insert_all(&self.bodies);
            tree.check_collisions(&mut self.bodies)
        });
        let brute_stats = PassStats::time(|| brute_force(&mut self.bodies));

        let report = StepReport {
            tree: tree_stats,
            brute: brute_stats,
        };
        debug!(
            "step: {} bodies, {} leaves, tree {} pairs in {:?}, brute {} pairs in {:?}",
            self.bodies.len(),
            tree.leaf_count(),
            report.tree.pairs,
            report.tree.elapsed,
            report.brute.pairs,
            report.brute.elapsed
        );

        self.tree = Some(tree);
        report
    }

    /// Indices of the bodies under `region`, sorted and without duplicates.
    ///
    /// Answered from the latest step's tree, so bodies added since then are not seen.
    /// Before the first step nothing is found.
    pub fn hit_test(&self, region: &BoundingBox) -> Vec<usize> {
        match &self.tree {
            Some(tree) => tree.query_unique(&self.bodies, region),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        shapes::{Bounded, Collidable},
        util::tests::{flags, make_box, seeded_rng},
    };

    use super::*;

    fn simulation() -> Simulation<rand_chacha::ChaChaRng> {
        Simulation::new(Config::default(), seeded_rng(0)).expect("default config is valid")
    }

    #[test]
    fn rejects_invalid_config() {
        let config = Config {
            speed: f64::INFINITY,
            ..Config::default()
        };
        assert!(
            Simulation::new(config, seeded_rng(0)).is_err(),
            "Invalid config should be rejected"
        );
    }

    #[test]
    fn spawn_creates_a_batch() {
        let mut sim = simulation();
        assert!(sim.is_empty(), "New simulation should have no bodies");
        assert_eq!(sim.spawn(120.0, 80.0), 100, "Default batch should be 100");
        assert_eq!(sim.len(), 100, "All spawned bodies should be kept");
        for body in sim.bodies() {
            assert_eq!(
                body.bounds(),
                &make_box(120.0, 80.0, 5.0, 5.0),
                "Bodies should spawn at the requested point with configured extents"
            );
        }
        let distinct = sim
            .bodies()
            .iter()
            .map(|b| b.heading() as i64)
            .collect::<std::collections::BTreeSet<_>>();
        assert!(distinct.len() > 1, "Headings should be randomised");
    }

    #[test]
    fn step_reports_both_passes() {
        let mut sim = simulation();
        sim.spawn(300.0, 300.0);
        let report = sim.step();
        assert_eq!(report.brute.pairs, 4950, "Brute force should see every pair");
        assert!(report.tree.pairs > 0, "Clustered bodies should share leaves");
        assert!(
            sim.bodies().iter().all(|b| b.is_colliding()),
            "Bodies that just spawned on one point all overlap"
        );
        assert!(sim.tree().is_some(), "The step's tree should be kept");
    }

    #[test]
    fn step_resets_flags() {
        let mut sim = simulation();
        sim.push(Body::spawn(100.0, 100.0, 5.0, 5.0, 0.0));
        sim.push(Body::spawn(108.0, 100.0, 5.0, 5.0, 0.0));
        sim.step();
        assert_eq!(flags(sim.bodies()), &[true, true], "Overlapping bodies get flagged");

        sim.clear();
        sim.push(Body::spawn(100.0, 100.0, 5.0, 5.0, 180.0));
        sim.push(Body::spawn(111.0, 100.0, 5.0, 5.0, 0.0));
        for body in sim.bodies_mut() {
            body.mark_colliding();
        }
        sim.step();
        assert_eq!(
            flags(sim.bodies()),
            &[false, false],
            "Bodies that moved apart should be unflagged by the next step"
        );
    }

    #[test]
    fn hit_test_uses_latest_tree() {
        let mut sim = simulation();
        sim.push(Body::spawn(100.0, 100.0, 5.0, 5.0, 0.0));
        sim.push(Body::spawn(500.0, 500.0, 5.0, 5.0, 0.0));
        assert!(
            sim.hit_test(&make_box(100.0, 100.0, 1.0, 1.0)).is_empty(),
            "Nothing can be hit before the first step"
        );

        sim.step();
        assert_eq!(
            sim.hit_test(&make_box(101.5, 100.0, 1.0, 1.0)),
            &[0],
            "Should hit the body under the cursor"
        );
        assert!(
            sim.hit_test(&make_box(300.0, 300.0, 1.0, 1.0)).is_empty(),
            "Should hit nothing on empty ground"
        );

        sim.clear();
        assert!(sim.tree().is_none(), "Clearing should drop the tree");
    }

    #[test]
    fn config_is_kept() {
        let sim = simulation();
        assert_eq!(sim.config(), &Config::default(), "Config should be stored as given");
    }
}
