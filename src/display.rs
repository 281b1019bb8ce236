//! SDL2 window surface for the kiosk.
//!
//! Opens a borderless full-screen-desktop window whose logical size equals
//! the grid artifact, so frames are scaled by SDL and pointer coordinates
//! arrive already in canvas space. Raw key and mouse events are mapped to
//! [`InputCommand`]s here and nowhere else.

use std::time::Duration;

use image::RgbImage;
use sdl2::{
    EventPump, Sdl,
    event::Event,
    keyboard::Keycode,
    mouse::MouseButton,
    pixels::{Color, PixelFormatEnum},
    render::{Texture, TextureCreator, WindowCanvas},
    video::WindowContext,
};

use crate::controller::Surface;
use crate::error::VideoWallError;
use crate::selection::InputCommand;

fn display_error(error: impl ToString) -> VideoWallError {
    VideoWallError::Display(error.to_string())
}

/// A full-screen SDL2 window.
pub struct SdlSurface {
    _sdl: Sdl,
    canvas: WindowCanvas,
    _texture_creator: TextureCreator<WindowContext>,
    texture: Option<Texture>,
    event_pump: EventPump,
    size: (u32, u32),
}

impl std::fmt::Debug for SdlSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdlSurface")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl SdlSurface {
    /// Open a full-screen window for `size` (canvas width, height) frames.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::Display`] if SDL cannot create the window,
    /// renderer or texture.
    pub fn open(title: &str, size: (u32, u32)) -> Result<Self, VideoWallError> {
        let (width, height) = size;
        let sdl = sdl2::init().map_err(display_error)?;
        let video = sdl.video().map_err(display_error)?;
        let window = video
            .window(title, width, height)
            .fullscreen_desktop()
            .build()
            .map_err(display_error)?;
        let mut canvas = window.into_canvas().build().map_err(display_error)?;
        canvas.set_logical_size(width, height).map_err(display_error)?;
        let texture_creator = canvas.texture_creator();
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, width, height)
            .map_err(display_error)?;
        let event_pump = sdl.event_pump().map_err(display_error)?;
        log::debug!("Opened {width}x{height} display surface");

        Ok(Self {
            _sdl: sdl,
            canvas,
            _texture_creator: texture_creator,
            texture: Some(texture),
            event_pump,
            size,
        })
    }

    fn discard_events(&mut self) {
        for _ in self.event_pump.poll_iter() {}
    }
}

impl Surface for SdlSurface {
    fn present(&mut self, frame: &RgbImage) -> Result<(), VideoWallError> {
        let Some(texture) = self.texture.as_mut() else {
            return Err(display_error("surface is closed"));
        };
        if frame.dimensions() != self.size {
            return Err(display_error(format!(
                "frame is {}x{}, surface is {}x{}",
                frame.width(),
                frame.height(),
                self.size.0,
                self.size.1
            )));
        }
        texture
            .update(None, frame.as_raw(), self.size.0 as usize * 3)
            .map_err(display_error)?;
        self.canvas.set_draw_color(Color::RGB(0, 0, 0));
        self.canvas.clear();
        self.canvas.copy(texture, None, None).map_err(display_error)?;
        self.canvas.present();
        Ok(())
    }

    fn poll_commands(&mut self, timeout: Duration) -> Result<Vec<InputCommand>, VideoWallError> {
        let mut commands = Vec::new();
        let timeout_ms = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        if let Some(event) = self.event_pump.wait_event_timeout(timeout_ms) {
            commands.extend(map_event(&event));
            for event in self.event_pump.poll_iter() {
                commands.extend(map_event(&event));
            }
        }
        Ok(commands)
    }

    fn suspend(&mut self) -> Result<(), VideoWallError> {
        self.canvas.window_mut().hide();
        Ok(())
    }

    fn resume(&mut self) -> Result<(), VideoWallError> {
        let window = self.canvas.window_mut();
        window.show();
        window.raise();
        self.discard_events();
        Ok(())
    }

    fn close(&mut self) {
        if let Some(texture) = self.texture.take() {
            // Textures are not tied to the renderer's lifetime under
            // `unsafe_textures`; destroy before the renderer goes away.
            unsafe { texture.destroy() };
        }
        self.canvas.window_mut().hide();
    }
}

impl Drop for SdlSurface {
    fn drop(&mut self) {
        if let Some(texture) = self.texture.take() {
            unsafe { texture.destroy() };
        }
    }
}

/// Translate one SDL event into a command.
fn map_event(event: &Event) -> Option<InputCommand> {
    match *event {
        Event::Quit { .. } => Some(InputCommand::Quit),
        Event::KeyDown {
            keycode: Some(keycode),
            ..
        } => map_keycode(keycode),
        Event::MouseMotion { x, y, .. } => Some(InputCommand::PointerMove(x, y)),
        Event::MouseButtonDown {
            mouse_btn: MouseButton::Left,
            x,
            y,
            ..
        } => Some(InputCommand::PointerCommit(x, y)),
        _ => None,
    }
}

fn map_keycode(keycode: Keycode) -> Option<InputCommand> {
    match keycode {
        Keycode::Q | Keycode::Escape => Some(InputCommand::Quit),
        Keycode::Up => Some(InputCommand::Up),
        Keycode::Down => Some(InputCommand::Down),
        Keycode::Left => Some(InputCommand::Left),
        Keycode::Right => Some(InputCommand::Right),
        Keycode::Return | Keycode::Space | Keycode::KpEnter => Some(InputCommand::Commit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(map_keycode(Keycode::Q), Some(InputCommand::Quit));
        assert_eq!(map_keycode(Keycode::Escape), Some(InputCommand::Quit));
        assert_eq!(map_keycode(Keycode::Left), Some(InputCommand::Left));
        assert_eq!(map_keycode(Keycode::Return), Some(InputCommand::Commit));
        assert_eq!(map_keycode(Keycode::KpEnter), Some(InputCommand::Commit));
        assert_eq!(map_keycode(Keycode::A), None);
    }

    #[test]
    fn window_close_quits() {
        assert_eq!(
            map_event(&Event::Quit { timestamp: 0 }),
            Some(InputCommand::Quit)
        );
    }
}
