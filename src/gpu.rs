//! Frame consumers for the playground: a simulated GPU that completes frames on a
//! worker thread after a fixed cost, and a headless wgpu device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use batch2d::{FrameSubmission, FrameSubmitter, RendererConfig, SlotToken};
use batch2d_text::FontAtlas;
use batch2d_wgpu::WgpuBackend;

use crate::pipelines::{PassthroughPipelines, TARGET_FORMAT};

/// Completes each submitted frame `frame_cost` after it arrives, in submission order.
pub struct SimulatedGpu {
    sender: Option<mpsc::Sender<SlotToken>>,
    worker: Option<JoinHandle<()>>,
}

impl SimulatedGpu {
    pub fn new(frame_cost: Duration) -> Self {
        let (sender, receiver) = mpsc::channel::<SlotToken>();
        let worker = std::thread::spawn(move || {
            for token in receiver {
                std::thread::sleep(frame_cost);
                log::trace!("Simulated GPU finished frame {}", token.frame());
                token.release();
            }
        });

        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }
}

impl FrameSubmitter for SimulatedGpu {
    fn submit(&mut self, submission: FrameSubmission<'_>) {
        let Some(sender) = &self.sender else {
            return;
        };
        // A send only fails once the worker is gone; the token then drops here and
        // releases its slot immediately.
        if sender.send(submission.token).is_err() {
            log::warn!("Simulated GPU worker stopped, releasing frame slot early");
        }
    }
}

impl Drop for SimulatedGpu {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Simulated GPU worker panicked");
            }
        }
    }
}

/// Draws every frame into an offscreen texture on a headless wgpu device. Slots are
/// released from the queue's completion callbacks, which a background thread drives
/// by polling.
pub struct HeadlessGpu {
    queue: wgpu::Queue,
    backend: WgpuBackend,
    pipelines: PassthroughPipelines,
    target: wgpu::TextureView,
    draw_calls: u64,
    device: wgpu::Device,
    stop: Arc<AtomicBool>,
    poller: Option<JoinHandle<()>>,
}

impl HeadlessGpu {
    pub async fn new(
        config: &RendererConfig,
        font: &FontAtlas,
        [width, height]: [u32; 2],
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Batch2d Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let backend = WgpuBackend::new(&device, config, font);
        let pipelines = PassthroughPipelines::new(&device, &backend);

        let target = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Batch2d Offscreen Target"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TARGET_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default());

        let stop = Arc::new(AtomicBool::new(false));
        let poller = {
            let device = device.clone();
            let stop = stop.clone();
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    if let Err(e) = device.poll(wgpu::PollType::Wait {
                        submission_index: None,
                        timeout: None,
                    }) {
                        log::error!("Device poll failed: {e}");
                        break;
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
            })
        };

        Ok(Self {
            queue,
            backend,
            pipelines,
            target,
            draw_calls: 0,
            device,
            stop,
            poller: Some(poller),
        })
    }
}

impl HeadlessGpu {
    /// Draw calls recorded across all submitted frames.
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }
}

impl FrameSubmitter for HeadlessGpu {
    fn submit(&mut self, submission: FrameSubmission<'_>) {
        self.backend.upload(&self.queue, &submission);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Batch2d Frame Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Batch2d Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.backend
                .encode(&mut pass, &self.pipelines.category_pipelines(), &submission);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        self.draw_calls += submission.batches.len() as u64;

        WgpuBackend::release_on_completion(&self.queue, submission.token);
    }
}

impl Drop for HeadlessGpu {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(poller) = self.poller.take() {
            if poller.join().is_err() {
                log::error!("Device poller panicked");
            }
        }
    }
}
