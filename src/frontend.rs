//! Host integration: the cancellation handler and the drivers that run a
//! machine against the outside world.
//!
//! Two drivers exist. The windowed one (behind the `gui` feature) presents
//! frames through winit + pixels and feeds keyboard input back into the
//! machine. The headless one runs the same loop with no presentation and
//! is what the tests and `--headless` use.
//!
//! Cancellation: a SIGINT handler stores into one process-wide atomic with
//! release ordering and nothing else. The frame callback polls the flag at
//! each frame boundary and turns it into a machine power-off, so shutdown
//! latency is bounded by one frame.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error, log_enabled, warn, Level};

use crate::gamegear::GameGear;
use crate::input::InputScript;

static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// True once the cancellation signal has arrived.
pub fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::Acquire)
}

#[cfg(unix)]
extern "C" fn handle_sigint(_signal: libc::c_int) {
    // Signal context: one release store and nothing else
    SHUTDOWN_REQUESTED.store(true, Ordering::Release);
}

/// Route SIGINT to the shutdown flag.
#[cfg(unix)]
pub fn install_signal_handler() {
    SHUTDOWN_REQUESTED.store(false, Ordering::Release);
    let handler = handle_sigint as extern "C" fn(libc::c_int);
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }
}

/// Put the default SIGINT disposition back.
#[cfg(unix)]
pub fn restore_signal_handler() {
    unsafe {
        libc::signal(libc::SIGINT, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
pub fn install_signal_handler() {
    SHUTDOWN_REQUESTED.store(false, Ordering::Release);
}

#[cfg(not(unix))]
pub fn restore_signal_handler() {}

/// Report how a run ended and dump state when debug logging is on.
fn report_outcome(gg: &GameGear) {
    match gg.get_exception() {
        Some(message) => error!("caught exception: {}", message),
        None => warn!("caught signal, stopping..."),
    }
    if log_enabled!(Level::Debug) {
        gg.print_state();
    }
}

/// Drive the machine with no presentation surface.
///
/// Runs until cancellation, the optional frame limit, or a CPU exception.
/// Returns `true` iff the run failed with an exception.
pub fn run_headless(
    gg: &mut GameGear,
    mut script: Option<InputScript>,
    frame_limit: Option<u64>,
) -> bool {
    install_signal_handler();

    debug!("powering GameGear (headless)");
    gg.power(true);

    gg.attach_callback(move |gg| {
        if shutdown_requested() {
            gg.power_off();
            return;
        }
        let frame = gg.frame_count();
        if let Some(script) = script.as_mut() {
            script.apply(frame, &mut gg.io.buttons);
        }
        if frame_limit.is_some_and(|limit| frame >= limit) {
            gg.power_off();
        }
    });

    let failed = gg.simulate();
    report_outcome(gg);

    gg.detach();
    gg.power(false);
    restore_signal_handler();
    failed
}

#[cfg(feature = "gui")]
pub use gui::run_windowed;

#[cfg(feature = "gui")]
mod gui {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;
    use std::time::Duration;

    use log::{debug, error};
    use pixels::{Pixels, SurfaceTexture};
    use winit::dpi::LogicalSize;
    use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
    use winit::event_loop::EventLoop;
    use winit::keyboard::{KeyCode, PhysicalKey};
    use winit::platform::pump_events::EventLoopExtPumpEvents;
    use winit::window::{Fullscreen, WindowBuilder};

    use super::{install_signal_handler, report_outcome, restore_signal_handler,
                shutdown_requested};
    use crate::gamegear::{create_display_buffer, GameGear};
    use crate::input::InputScript;
    use crate::vdp::{FRAME_WIDTH, VIEW_HEIGHT, VIEW_WIDTH, VIEW_X, VIEW_Y};

    /// Keyboard layout: D-pad on the arrows, buttons 1/2 on Z/X, START on
    /// Enter.
    fn keycode_to_button(code: KeyCode) -> Option<&'static str> {
        match code {
            KeyCode::ArrowUp => Some("up"),
            KeyCode::ArrowDown => Some("down"),
            KeyCode::ArrowLeft => Some("left"),
            KeyCode::ArrowRight => Some("right"),
            KeyCode::KeyZ => Some("1"),
            KeyCode::KeyX => Some("2"),
            KeyCode::Enter => Some("start"),
            _ => None,
        }
    }

    /// Drive the machine in a window at the LCD's aspect ratio.
    ///
    /// Returns `true` iff the run failed (CPU exception or presentation
    /// failure).
    pub fn run_windowed(
        gg: &mut GameGear,
        scale: u32,
        fullscreen: bool,
        mut script: Option<InputScript>,
    ) -> bool {
        let mut event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(err) => {
                error!("host display failed to initialize: {}", err);
                return true;
            }
        };

        let size = LogicalSize::new(
            (VIEW_WIDTH as u32 * scale) as f64,
            (VIEW_HEIGHT as u32 * scale) as f64,
        );
        let window = match WindowBuilder::new()
            .with_title("gearling")
            .with_inner_size(size)
            .with_min_inner_size(size)
            .build(&event_loop)
        {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("host display failed to create a window: {}", err);
                return true;
            }
        };
        if fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let inner = window.inner_size();
        let surface = SurfaceTexture::new(inner.width, inner.height, Arc::clone(&window));
        let mut pixels =
            match Pixels::new(VIEW_WIDTH as u32, VIEW_HEIGHT as u32, surface) {
                Ok(pixels) => pixels,
                Err(err) => {
                    error!("host display failed to create a surface: {}", err);
                    return true;
                }
            };

        install_signal_handler();

        let display = create_display_buffer();
        gg.attach_display(Rc::clone(&display));

        debug!("powering GameGear (windowed)");
        gg.power(true);

        let presentation_failed = Rc::new(Cell::new(false));
        let presentation_flag = Rc::clone(&presentation_failed);

        gg.attach_callback(move |gg| {
            if shutdown_requested() {
                gg.power_off();
                return;
            }

            let frame = gg.frame_count();
            if let Some(script) = script.as_mut() {
                script.apply(frame, &mut gg.io.buttons);
            }

            // Crop the 256x192 frame down to the LCD viewport
            {
                let source = display.borrow();
                let target = pixels.frame_mut();
                for y in 0..VIEW_HEIGHT {
                    for x in 0..VIEW_WIDTH {
                        let argb = source[(y + VIEW_Y) * FRAME_WIDTH + (x + VIEW_X)];
                        let offset = (y * VIEW_WIDTH + x) * 4;
                        target[offset] = (argb >> 16) as u8;
                        target[offset + 1] = (argb >> 8) as u8;
                        target[offset + 2] = argb as u8;
                        target[offset + 3] = 0xFF;
                    }
                }
            }
            if let Err(err) = pixels.render() {
                error!("presentation failed: {}", err);
                presentation_flag.set(true);
                gg.power_off();
                return;
            }

            // Translate host events into guest input
            event_loop.pump_events(Some(Duration::ZERO), |event, _| {
                let Event::WindowEvent { event, .. } = event else {
                    return;
                };
                match event {
                    WindowEvent::CloseRequested => gg.power_off(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state,
                                ..
                            },
                        ..
                    } => {
                        if code == KeyCode::Escape {
                            gg.power_off();
                        } else if let Some(button) = keycode_to_button(code) {
                            gg.io
                                .buttons
                                .set_button(button, state == ElementState::Pressed);
                        }
                    }
                    _ => {}
                }
            });
        });

        let mut failed = gg.simulate();
        report_outcome(gg);
        failed |= presentation_failed.get();

        gg.detach();
        gg.power(false);
        restore_signal_handler();
        failed
    }
}
