//! Batch2d playground
//!
//! Drives the batching renderer through a busy 2D scene without a window. Frames go to a
//! simulated GPU by default, or are drawn offscreen on a headless wgpu device with `--gpu`.

mod assets;
mod gpu;
mod pipelines;
mod random;
mod scene;

use std::time::{Duration, Instant};

use batch2d::{FrameSubmitter, FrameTimer, Renderer, RendererConfig};
use gpu::{HeadlessGpu, SimulatedGpu};
use scene::DemoScene;

const VIEWPORT: [f32; 2] = [1920.0, 1080.0];
const DEFAULT_FRAMES: u64 = 240;
const CIRCLE_COUNT: usize = 3000;
const SIMULATED_FRAME_COST: Duration = Duration::from_millis(4);
const LOG_INTERVAL: u64 = 60;

struct Options {
    gpu: bool,
    frames: u64,
}

fn parse_args() -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options {
        gpu: false,
        frames: DEFAULT_FRAMES,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--gpu" => options.gpu = true,
            "--frames" => {
                let value = args.next().ok_or("--frames needs a value")?;
                options.frames = value.parse()?;
            }
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }

    Ok(options)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger (RUST_LOG=trace shows slot traffic)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args()?;
    log::info!("Starting batch2d playground...");

    let (sprites, font) = assets::load()?;
    let config = RendererConfig::default();

    let mut submitter: Box<dyn FrameSubmitter> = if options.gpu {
        Box::new(pollster::block_on(HeadlessGpu::new(
            &config,
            &font,
            [VIEWPORT[0] as u32, VIEWPORT[1] as u32],
        ))?)
    } else {
        log::info!(
            "Using simulated GPU ({:.1} ms per frame)",
            SIMULATED_FRAME_COST.as_secs_f32() * 1000.0
        );
        Box::new(SimulatedGpu::new(SIMULATED_FRAME_COST))
    };

    let mut renderer = Renderer::new(config, sprites, font)?;
    renderer.set_viewport(VIEWPORT[0], VIEWPORT[1]);

    let mut scene = DemoScene::new(CIRCLE_COUNT);
    let mut timer = FrameTimer::default();
    let mut last = Instant::now();

    for _ in 0..options.frames {
        let mut frame = renderer.begin_frame();
        scene.draw(&mut frame, VIEWPORT)?;

        let submission = frame.finish();
        let stats = submission.stats;
        let frame_number = submission.token.frame();
        submitter.submit(submission);

        let now = Instant::now();
        let dt = now - last;
        last = now;
        timer.record(dt);
        scene.advance(dt.as_secs_f32());

        if frame_number % LOG_INTERVAL == 0 {
            log::info!(
                "Frame {}: {:.0} FPS, {} batches, {} sprites, {} primitives, {} text vertices",
                frame_number,
                timer.fps(),
                stats.batches,
                stats.sprite_instances,
                stats.primitive_instances,
                stats.text_vertices
            );
        }
    }

    // Waits for the frames still in flight.
    drop(submitter);
    log::info!("✓ Rendered {} frames", options.frames);
    Ok(())
}
