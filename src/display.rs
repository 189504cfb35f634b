pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// 64x32 monochrome cells, row-major: index = y * 64 + x.
#[derive(Clone)]
pub struct FrameBuffer {
    bit_buffer: [bool; WIDTH * HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [false; WIDTH * HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [false; WIDTH * HEIGHT];
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < WIDTH && y < HEIGHT, "pixel ({x}, {y}) off screen");
        self.bit_buffer[y * WIDTH + x]
    }

    pub fn cells(&self) -> &[bool] {
        &self.bit_buffer
    }

    pub fn is_blank(&self) -> bool {
        self.bit_buffer.iter().all(|&on| !on)
    }

    /// XORs `sprite` (one byte per row, MSB leftmost) onto the grid with its top-left corner
    /// at (x mod 64, y mod 32). Rows and columns past the edges are clipped, not wrapped.
    /// Returns true if any lit pixel was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let (x, y) = (x as usize % WIDTH, y as usize % HEIGHT);
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = y + i;
            if ny >= HEIGHT {
                break;
            }
            for j in 0..8 {
                let nx = x + j;
                if nx >= WIDTH {
                    break;
                }
                let bit = (row >> (7 - j)) & 1 == 1;
                let index = ny * WIDTH + nx;
                if bit && self.bit_buffer[index] {
                    vf = true;
                }
                self.bit_buffer[index] ^= bit;
            }
        }
        vf
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "frontend")]
pub use window::Screen;

#[cfg(feature = "frontend")]
mod window {
    use minifb::{Scale, Window, WindowOptions};

    use super::{FrameBuffer, HEIGHT, WIDTH};
    use crate::config::Settings;

    /// minifb window presenting the frame buffer, also the source of key events.
    pub struct Screen {
        pixel_buffer: Vec<u32>,
        fg: u32,
        bg: u32,
        pub window: Window,
    }

    impl Screen {
        pub fn new(settings: &Settings) -> Result<Self, minifb::Error> {
            let mut window = Window::new(
                "chipvm - ESC to exit, SPACE to pause",
                WIDTH,
                HEIGHT,
                WindowOptions {
                    scale: scale_from(settings.scale),
                    ..WindowOptions::default()
                },
            )?;
            // Limit to max ~60 fps update rate
            window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
            Ok(Self {
                pixel_buffer: vec![settings.bg_color; WIDTH * HEIGHT],
                fg: settings.fg_color,
                bg: settings.bg_color,
                window,
            })
        }

        pub fn is_open(&self) -> bool {
            self.window.is_open()
        }

        pub fn sync(&mut self, fb: &FrameBuffer) -> Result<(), minifb::Error> {
            for (px, &on) in self.pixel_buffer.iter_mut().zip(fb.cells()) {
                *px = if on { self.fg } else { self.bg };
            }
            self.window
                .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
        }

        // keeps key state fresh while nothing new was drawn
        pub fn idle(&mut self) {
            self.window.update();
        }
    }

    fn scale_from(factor: u32) -> Scale {
        match factor {
            0..=1 => Scale::X1,
            2..=3 => Scale::X2,
            4..=7 => Scale::X4,
            8..=15 => Scale::X8,
            16..=31 => Scale::X16,
            _ => Scale::X32,
        }
    }
}
