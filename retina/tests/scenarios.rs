//! End-to-end behaviour of the wired retina.

use rand::SeedableRng;
use rand::rngs::StdRng;
use retina::topology::NEIGHBOURS;
use retina::{
    Image, LayerId, NodeKind, Orientation, Position, Retina, RetinaParams, Schedule, Simulation,
    SimulationConfig,
};

fn config(rows: usize, cols: usize) -> SimulationConfig {
    SimulationConfig {
        rows,
        cols,
        dt: 0.01,
        membrane_tau: 1.0,
        ..Default::default()
    }
}

fn params(rows: usize, cols: usize) -> RetinaParams {
    RetinaParams {
        rows,
        cols,
        ..Default::default()
    }
}

#[test]
fn single_lit_photoreceptor_beats_its_bipolar_neighbours() {
    let mut sim = Simulation::new(config(4, 4)).unwrap();
    let lit = Position::new(1, 1);
    // gain 10 * brightness 1 = injected current 10
    let image = Image::spot(4, 4, lit.row, lit.col, 1.0);
    for _ in 0..100 {
        sim.tick(Some(&image));
    }

    let retina = sim.retina();
    let net = retina.network();
    let photo_v = net.potential(retina.layer(LayerId::Photoreceptor).node(lit).unwrap());
    assert!(photo_v > 6.0 && photo_v < 7.0, "photoreceptor at {photo_v}");

    for id in [LayerId::OnCenter, LayerId::OffCenter] {
        let layer = retina.layer(id);
        let mut cells = vec![lit];
        cells.extend(
            NEIGHBOURS
                .iter()
                .filter_map(|&(dr, dc)| lit.offset(dr, dc, 4, 4)),
        );
        for pos in cells {
            let v = net.potential(layer.node(pos).unwrap());
            assert!(photo_v > v, "{id} at {pos:?} has {v} >= {photo_v}");
        }
    }

    let on = net.output(retina.layer(LayerId::OnCenter).node(lit).unwrap());
    let off = net.output(retina.layer(LayerId::OffCenter).node(lit).unwrap());
    assert!(off < on, "off-center {off} not below on-center {on}");
}

#[test]
fn grid_of_28_has_expected_counts() {
    let retina = Retina::build(&params(28, 28)).unwrap();
    let net = retina.network();

    let photo = retina.layer(LayerId::Photoreceptor);
    assert_eq!(photo.len(), 784);
    for i in photo.nodes() {
        let node = retina::NodeId(i as u32);
        assert_eq!(net.kind(node), NodeKind::Input);
        assert_eq!(net.incoming_count(node), 0);
    }

    let bipolar: Vec<_> = [LayerId::OnCenter, LayerId::OffCenter]
        .into_iter()
        .flat_map(|id| retina.layer(id).nodes())
        .collect();
    assert_eq!(bipolar.len(), 784 * 2);
    for i in bipolar {
        let n = net.incoming_count(retina::NodeId(i as u32));
        assert!((1..=9).contains(&n), "bipolar node with {n} synapses");
    }
}

#[test]
fn line_detector_synapse_counts_account_for_skips() {
    for block_size in [1, 3, 5] {
        let retina = Retina::build(&RetinaParams {
            block_size,
            ..params(6, 7)
        })
        .unwrap();
        let net = retina.network();
        let h = (block_size / 2) as isize;

        for orientation in Orientation::ALL {
            let layer = retina.layer(orientation.layer());
            for pos in layer.positions() {
                let mut skipped = 0;
                for dr in -h..=h {
                    for dc in -h..=h {
                        if pos.offset(dr, dc, 6, 7).is_none() {
                            skipped += 2;
                        }
                    }
                }
                let expected = 2 * block_size * block_size - skipped;
                assert_eq!(net.incoming_count(layer.node(pos).unwrap()), expected);
            }
        }
    }
}

#[test]
fn photoreceptors_only_track_injected_current() {
    let mut sim = Simulation::new(config(3, 3)).unwrap();
    let image = Image::from_fn(3, 3, |r, c| (r * 3 + c) as f32 / 10.0);
    for _ in 0..200 {
        sim.tick(Some(&image));
    }

    let retina = sim.retina();
    let photo = retina.layer(LayerId::Photoreceptor);
    // v_k = I * tau_m * (1 - (1 - dt / tau_m)^k)
    let settle = 1.0 - 0.99f32.powi(200);
    for pos in photo.positions() {
        let node = photo.node(pos).unwrap();
        let expected = 10.0 * image.get(pos.row, pos.col) * settle;
        let v = retina.network().potential(node);
        assert!((v - expected).abs() < 1e-3, "{pos:?}: {v} vs {expected}");
        assert_eq!(retina.network().incoming_count(node), 0);
    }
}

#[test]
fn unstimulated_network_decays_to_rest() {
    let mut sim = Simulation::new(config(5, 5)).unwrap();
    let image = Image::from_fn(5, 5, |r, c| ((r + c) % 2) as f32);
    for _ in 0..100 {
        sim.tick(Some(&image));
    }
    for _ in 0..3000 {
        sim.tick(None);
    }
    for &v in sim.retina().network().potentials() {
        assert!(v.is_finite());
        assert!(v.abs() < 0.05, "potential {v} did not decay");
    }
}

#[test]
fn row_parallel_matches_sequential() {
    for (rows, cols) in [(2, 2), (5, 7), (16, 16)] {
        let mut rng = StdRng::seed_from_u64((rows * 100 + cols) as u64);
        let images: Vec<_> = (0..4).map(|_| Image::noise(rows, cols, &mut rng)).collect();

        let mut sequential = Simulation::new(SimulationConfig {
            schedule: Schedule::Sequential,
            ..config(rows, cols)
        })
        .unwrap();
        let mut parallel = Simulation::new(SimulationConfig {
            schedule: Schedule::RowParallel,
            ..config(rows, cols)
        })
        .unwrap();

        for image in &images {
            for _ in 0..25 {
                sequential.tick(Some(image));
                parallel.tick(Some(image));
            }
        }

        assert_eq!(
            sequential.retina().network().potentials(),
            parallel.retina().network().potentials(),
            "{rows}x{cols} diverged"
        );
    }
}

#[test]
fn layer_step_reads_committed_upstream_state() {
    let mut retina = Retina::build(&params(3, 3)).unwrap();
    let photo = *retina.layer(LayerId::Photoreceptor);
    let mut injection = vec![0.0; retina.network().len()];
    for i in photo.nodes() {
        injection[i] = 10.0;
    }

    // Bipolar cells see nothing until the photoreceptors have committed output.
    retina.step_layer(LayerId::OnCenter, 0.01, Some(&injection), Schedule::Sequential);
    let on = *retina.layer(LayerId::OnCenter);
    assert!(on.nodes().all(|i| retina.network().potentials()[i] == 0.0));

    retina.step_layer(LayerId::Photoreceptor, 0.01, Some(&injection), Schedule::Sequential);
    assert!(photo.nodes().all(|i| retina.network().potentials()[i] > 0.0));

    retina.step_layer(LayerId::OnCenter, 0.01, Some(&injection), Schedule::RowParallel);
    let center = on.node(Position::new(1, 1)).unwrap();
    assert_ne!(retina.network().potential(center), 0.0);
}

#[test]
fn vertical_bar_prefers_vertical_detector() {
    let mut sim = Simulation::new(config(9, 9)).unwrap();
    let image = Image::bar(9, 9, Orientation::Vertical, 1.0);
    for _ in 0..300 {
        sim.tick(Some(&image));
    }

    let retina = sim.retina();
    let net = retina.network();
    let center = Position::new(4, 4);
    let vertical = net.potential(retina.layer(LayerId::Vertical).node(center).unwrap());
    let horizontal = net.potential(retina.layer(LayerId::Horizontal).node(center).unwrap());
    assert!(vertical > 0.0);
    assert!(vertical > horizontal, "vertical {vertical} <= horizontal {horizontal}");
}
