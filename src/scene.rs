use std::f32::consts::TAU;

use batch2d::{Color, Frame, Result};
use rand::Rng;

use crate::random::FastRandom;

const MAX_ORBIT_SPRITES: f32 = 100.0;
const TEXT_SIZE: f32 = 96.0;

/// The playground scene: a field of random primitives, an orbit of sprites, measured
/// text and a short run of interleaved draw calls.
#[derive(Debug)]
pub struct DemoScene {
    time: f32,
    frame: u64,
    circle_count: usize,
}

impl DemoScene {
    pub fn new(circle_count: usize) -> Self {
        Self {
            time: 0.0,
            frame: 0,
            circle_count,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
        self.frame += 1;
    }

    pub fn draw(&self, frame: &mut Frame<'_>, viewport: [f32; 2]) -> Result<()> {
        self.draw_primitives(frame, viewport);
        self.draw_sprite_orbit(frame, viewport)?;
        self.draw_text_with_bounds(frame);
        self.draw_interleaved(frame)
    }

    fn draw_primitives(&self, frame: &mut Frame<'_>, [width, height]: [f32; 2]) {
        let mut rng = FastRandom::new((self.time * 1_000_000.0) as u64);

        for _ in 0..self.circle_count {
            let x = rng.next_f32_range(-width, width);
            let y = rng.next_f32_range(-height, height);
            let radius = rng.next_f32_range(5.0, 25.0);
            let color = Color::rgb(
                rng.next_unit_f32(),
                rng.next_unit_f32(),
                rng.next_unit_f32(),
            );

            if rng.random_bool(0.1) {
                frame.draw_circle_outline(x, y, radius, 2.0, color);
            } else {
                frame.draw_circle(x, y, radius, color);
            }
        }

        for _ in 0..8 {
            let w = rng.next_i32_range(40, 240) as f32;
            let h = rng.next_i32_range(40, 240) as f32;
            let x = rng.next_f32_range(-width, width - w);
            let y = rng.next_f32_range(-height, height - h);
            let color = [rng.next_u8(), rng.next_u8(), rng.next_u8(), 255];
            frame.draw_rect_outline(x, y, w, h, 3.0, color);
        }

        frame.draw_line(-800.0, -600.0, 800.0, 600.0, 10.0, [200u8, 100, 0, 128]);
        frame.draw_rect_outline(-400.0, -300.0, 800.0, 600.0, 12.0, [0u8, 255, 255, 255]);
        frame.draw_rounded_rect(-150.0, -100.0, 300.0, 200.0, 24.0, Color::MAGENTA.with_alpha(0.25));
    }

    fn draw_sprite_orbit(&self, frame: &mut Frame<'_>, [width, _]: [f32; 2]) -> Result<()> {
        let count = (((self.time * 2.0).sin() + 1.0) * 0.5 * MAX_ORBIT_SPRITES) as usize;
        let orbit = width / 3.0;

        for i in 0..count {
            let angle = self.time + i as f32 * (TAU / count as f32);
            let size = 100.0 + 100.0 * angle.sin();
            let color = Color::rgb(
                0.5 + 0.5 * angle.sin(),
                0.5 + 0.5 * angle.cos(),
                0.5 + 0.5 * (angle * 0.5).sin(),
            );
            frame.draw_sprite_named(
                "Circle_White",
                angle.cos() * orbit,
                angle.sin() * orbit,
                size,
                size,
                angle * 2.0,
                color,
            )?;
        }

        frame.draw_sprite_named("player_1", 0.0, -300.0, 128.0, 128.0, 0.0, Color::WHITE)
    }

    fn draw_text_with_bounds(&self, frame: &mut Frame<'_>) {
        let text = format!("Hello, SDF\nWorld!\n\n{}", self.frame);
        let bounds = frame.measure_text(&text, TEXT_SIZE);
        let left = -bounds.width / 2.0;
        let top = bounds.height / 2.0;

        frame.draw_circle(left, top, 16.0, Color::WHITE);
        frame.draw_rect(
            left,
            -top,
            bounds.width,
            bounds.height,
            Color::CYAN.with_alpha(0.25),
        );
        frame.draw_text(&text, left, top, TEXT_SIZE, Color::rgb(0.9, 0.9, 0.1));
    }

    fn draw_interleaved(&self, frame: &mut Frame<'_>) -> Result<()> {
        frame.draw_sprite_named("player_2", 0.0, 0.0, 512.0, 512.0, 0.0, Color::WHITE)?;
        frame.draw_circle(-128.0, 0.0, 256.0, Color::RED);
        frame.draw_sprite_named("player_2", 0.0, 0.0, 256.0, 256.0, 0.0, Color::WHITE)?;
        frame.draw_circle(128.0, 0.0, 128.0, Color::CYAN);
        frame.draw_text("Interleaved\nTest", -50.0, 50.0, 48.0, Color::WHITE);
        frame.draw_sprite_named("player_2", 0.0, 0.0, 128.0, 128.0, 0.0, Color::WHITE)?;
        frame.draw_circle(-32.0, 0.0, 32.0, Color::GREEN);
        frame.draw_text("Another Test", -150.0, -50.0, 48.0, Color::MAGENTA);
        Ok(())
    }
}
