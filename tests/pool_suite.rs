use std::collections::HashSet;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chaoscope::config::{Dimension, Integrator, Palette};
use chaoscope::map::{PerturbationSpec, Scene, ViewMap};
use chaoscope::physics::{IntegratorConfig, PendulumState};
use chaoscope::pool::RenderPool;
use chaoscope::tile::{Shading, TileRequest, TileResult};

fn request(offset_x: u32, offset_y: u32, size: u32, max_iter: u32) -> TileRequest {
    let mut perturb = PerturbationSpec::none();
    perturb.d_theta1 = 1e-5;

    TileRequest {
        offset_x,
        offset_y,
        width: size,
        height: size,
        resolution: 64,
        scene: Scene {
            basis: PendulumState {
                theta1: 1.0,
                theta2: 0.5,
                omega1: 0.0,
                omega2: 0.0,
                l1: 1.0,
                l2: 1.0,
                m1: 1.0,
                m2: 1.0,
            },
            dim_x: Dimension::Theta1,
            dim_y: Dimension::Theta2,
            view: ViewMap {
                scale_x: 1.5,
                scale_y: 1.5,
                center_x: 0.0,
                center_y: 0.0,
            },
            perturb,
        },
        sim: IntegratorConfig {
            dt: 0.01,
            g: 9.81,
            integrator: Integrator::Rk4,
            max_iter,
            threshold: 0.05,
        },
        shading: Shading {
            palette: Palette::Grayscale,
            cycle_period: 300,
        },
    }
}

fn collect(rx: &mpsc::Receiver<TileResult>, n: usize) -> Vec<TileResult> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let result = rx
            .recv_timeout(Duration::from_secs(30))
            .expect("tile result within deadline");
        out.push(result);
    }
    out
}

#[test]
fn oversubscription_completes_without_deadlock() {
    let pool = RenderPool::new(2);
    let (tx, rx) = mpsc::channel();

    let mut expected = HashSet::new();
    for i in 0..8u32 {
        let req = request(i * 4, 0, 4, 30);
        expected.insert((req.offset_x, req.offset_y));
        let tx = tx.clone();
        pool.submit(req, move |r| {
            let _ = tx.send(r);
        })
        .expect("submit");
    }
    drop(tx);

    let results = collect(&rx, 8);
    let got: HashSet<(u32, u32)> = results.iter().map(|r| (r.offset_x, r.offset_y)).collect();
    assert_eq!(got, expected, "each result must match exactly one request");
    for r in &results {
        assert_eq!(r.pixels.len(), (r.width * r.height * 4) as usize);
    }
}

#[test]
fn single_worker_serializes_but_finishes_everything() {
    let pool = RenderPool::new(1);
    assert_eq!(pool.size(), 1);
    let (tx, rx) = mpsc::channel();

    for i in 0..5u32 {
        let tx = tx.clone();
        pool.submit(request(0, i * 4, 4, 20), move |r| {
            let _ = tx.send(r);
        })
        .expect("submit");
    }
    drop(tx);

    let results = collect(&rx, 5);
    let rows: HashSet<u32> = results.iter().map(|r| r.offset_y).collect();
    assert_eq!(rows.len(), 5);
}

#[test]
fn pending_drains_to_zero_after_delivery() {
    let pool = RenderPool::new(2);
    let (tx, rx) = mpsc::channel();

    for i in 0..4u32 {
        let tx = tx.clone();
        pool.submit(request(i * 4, 0, 4, 20), move |r| {
            let _ = tx.send(r);
        })
        .expect("submit");
    }
    drop(tx);
    let _ = collect(&rx, 4);

    // The counter is decremented after the callback fires; give the workers
    // a moment to finish their bookkeeping.
    let deadline = Instant::now() + Duration::from_secs(5);
    while pool.pending() != 0 {
        assert!(Instant::now() < deadline, "pending stuck at {}", pool.pending());
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn stop_mid_render_completes_promptly() {
    let pool = RenderPool::new(2);
    let (tx, rx) = mpsc::channel();

    // Expensive tiles: non-divergent pixels near the view center burn the
    // full step budget unless the stop flag cuts them short.
    for i in 0..4u32 {
        let tx = tx.clone();
        pool.submit(request(i * 8, 0, 8, 50_000), move |r| {
            let _ = tx.send(r);
        })
        .expect("submit");
    }
    drop(tx);

    pool.stop();
    assert!(pool.stopped());
    // Idempotent.
    pool.stop();

    // Every dispatched tile still comes back (possibly partial); the caller
    // is responsible for discarding everything collected after stop().
    let results = collect(&rx, 4);
    assert_eq!(results.len(), 4);
    for r in &results {
        assert_eq!(r.pixels.len(), (r.width * r.height * 4) as usize);
    }
}

#[test]
fn stopped_pool_returns_tiles_immediately() {
    let pool = RenderPool::new(1);
    pool.stop();

    let (tx, rx) = mpsc::channel();
    pool.submit(request(0, 0, 8, 1_000_000), move |r| {
        let _ = tx.send(r);
    })
    .expect("submit");

    let result = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("cancelled tile returned");
    // Nothing was rendered; the buffer keeps its shape but stays zeroed.
    assert!(result.pixels.iter().all(|&b| b == 0));
}
