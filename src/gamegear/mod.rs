//! The Game Gear machine: CPU, MMU and peripherals under one roof, plus
//! the frame loop that drives them.
//!
//! `simulate` runs the CPU in frame-sized slices of T-states, ticking the
//! VDP along, invoking the host's frame callback at each boundary and
//! sleeping the remainder of each 1/60 s period. It returns when the
//! machine powers off or the CPU surfaces an exception. Power-off requests
//! are a single atomic store, so a signal handler may issue one from any
//! context.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, log_enabled, warn, Level};
use serde_json::json;

use crate::debugger::Debuggable;
use crate::io::Io;
use crate::memory::Mmu;
use crate::psg::Psg;
use crate::rom::Rom;
use crate::vdp::{Vdp, FRAME_HEIGHT, FRAME_WIDTH};
use crate::z80::Z80;

mod bus;

pub use bus::GgBus;

/// Z80 clock rate in the Game Gear.
pub const CPU_CLOCK_HZ: u64 = 3_579_545;

/// Presentation rate.
pub const FRAMES_PER_SECOND: u64 = 60;

/// T-states the CPU may execute between frame callbacks.
pub const T_STATES_PER_FRAME: u64 = CPU_CLOCK_HZ / FRAMES_PER_SECOND;

/// Upper bound on the stored exception text.
pub const EXCEPTION_BUFFER_SIZE: usize = 128;

/// Shared pixel buffer the VDP publishes each frame into.
pub type DisplayBuffer = Rc<RefCell<Vec<u32>>>;

/// Allocate a display buffer of the right size for `attach_display`.
pub fn create_display_buffer() -> DisplayBuffer {
    Rc::new(RefCell::new(vec![0; FRAME_WIDTH * FRAME_HEIGHT]))
}

/// A cloneable handle that can power the machine off from another thread
/// or from a signal handler's trampoline.
#[derive(Clone)]
pub struct PowerSwitch {
    powered: Arc<AtomicBool>,
}

impl PowerSwitch {
    /// Request shutdown. A single release-ordered store; safe anywhere.
    pub fn power_off(&self) {
        self.powered.store(false, Ordering::Release);
    }

    pub fn is_on(&self) -> bool {
        self.powered.load(Ordering::Acquire)
    }
}

type FrameCallback = Box<dyn FnMut(&mut GameGear)>;

/// The whole handheld.
pub struct GameGear {
    pub cpu: Z80,
    pub mmu: Mmu,
    pub vdp: Vdp,
    pub psg: Psg,
    pub io: Io,
    powered: Arc<AtomicBool>,
    callback: Option<FrameCallback>,
    display: Option<DisplayBuffer>,
    exception: String,
    in_callback: bool,
    frame: u64,
}

impl GameGear {
    pub fn new() -> Self {
        Self {
            cpu: Z80::new(),
            mmu: Mmu::new(),
            vdp: Vdp::new(),
            psg: Psg::new(),
            io: Io::new(),
            powered: Arc::new(AtomicBool::new(false)),
            callback: None,
            display: None,
            exception: String::new(),
            in_callback: false,
            frame: 0,
        }
    }

    /// Forward a cartridge image to the MMU.
    pub fn load(&mut self, rom: &Rom) {
        self.mmu.load_rom(rom.data());
    }

    /// Power the machine on or off. Powering on resets every component;
    /// powering off is observed at the next frame boundary.
    pub fn power(&mut self, on: bool) {
        if on {
            debug!("powering GameGear on");
            self.mmu.power_on();
            self.cpu.reset();
            self.vdp.reset();
            self.psg.reset();
            self.io.reset();
            self.exception.clear();
            self.frame = 0;
            self.powered.store(true, Ordering::Release);
        } else {
            debug!("powering GameGear off");
            self.powered.store(false, Ordering::Release);
        }
    }

    /// Request shutdown; equivalent to `power_switch().power_off()`.
    pub fn power_off(&self) {
        self.powered.store(false, Ordering::Release);
    }

    /// A handle for asynchronous shutdown requests.
    pub fn power_switch(&self) -> PowerSwitch {
        PowerSwitch {
            powered: Arc::clone(&self.powered),
        }
    }

    pub fn attach_callback(&mut self, callback: impl FnMut(&mut GameGear) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub fn attach_display(&mut self, display: DisplayBuffer) {
        self.display = Some(display);
    }

    /// Unbind the host: drops the callback and the display buffer.
    pub fn detach(&mut self) {
        self.callback = None;
        self.display = None;
    }

    /// Frames completed since power-on.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// The most recent exception, or `None` after a clean run.
    pub fn get_exception(&self) -> Option<&str> {
        if self.exception.is_empty() {
            None
        } else {
            Some(&self.exception)
        }
    }

    fn record_exception(&mut self, message: &str) {
        let mut end = message.len().min(EXCEPTION_BUFFER_SIZE);
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        self.exception.clear();
        self.exception.push_str(&message[..end]);
    }

    /// Run the machine until it powers off or the CPU faults. Returns
    /// `true` iff an exception occurred.
    ///
    /// Frame callbacks land between frames and must not re-enter
    /// `simulate`.
    pub fn simulate(&mut self) -> bool {
        if self.in_callback {
            warn!("simulate called from inside a frame callback; ignoring");
            return false;
        }

        let frame_duration = Duration::from_nanos(1_000_000_000 / FRAMES_PER_SECOND);
        let mut next_frame = Instant::now() + frame_duration;

        while self.powered.load(Ordering::Acquire) {
            if self.run_frame() {
                return true;
            }

            self.frame += 1;
            self.flush_display();
            self.invoke_callback();

            // Hold 60 Hz; the CPU slice above is far faster than real time
            let now = Instant::now();
            if now < next_frame {
                thread::sleep(next_frame - now);
            }
            next_frame += frame_duration;
        }
        false
    }

    /// One frame budget's worth of CPU work. Returns `true` on exception.
    fn run_frame(&mut self) -> bool {
        let mut budget = 0u64;
        while budget < T_STATES_PER_FRAME {
            if self.vdp.irq_line() {
                self.cpu.irq(0xFF);
            } else {
                self.cpu.clear_irq();
            }

            let mut bus = GgBus {
                mmu: &mut self.mmu,
                vdp: &mut self.vdp,
                psg: &mut self.psg,
                io: &mut self.io,
            };
            let t_states = self.cpu.step(&mut bus);

            if let Some(message) = self.cpu.exception() {
                let message = message.to_string();
                self.record_exception(&message);
                return true;
            }

            budget += t_states as u64;
            self.vdp.tick(t_states);
        }
        false
    }

    fn flush_display(&mut self) {
        if let Some(display) = &self.display {
            let mut target = display.borrow_mut();
            if target.len() == self.vdp.frame_buffer.len() {
                target.copy_from_slice(&self.vdp.frame_buffer);
            } else {
                warn!("attached display buffer has the wrong size; dropping frame");
            }
        }
    }

    fn invoke_callback(&mut self) {
        if let Some(mut callback) = self.callback.take() {
            self.in_callback = true;
            callback(self);
            self.in_callback = false;
            if self.callback.is_none() {
                self.callback = Some(callback);
            }
        }
    }

    /// Diagnostic dump: registers, the top of the stack and (at debug
    /// level) the MMU bank table.
    pub fn print_state(&self) {
        self.cpu.dump_registers();
        debug!(
            "stack: top dword at SP={:04X} is {:08X}",
            self.cpu.sp,
            self.mmu.read_dword(self.cpu.sp)
        );
        if log_enabled!(Level::Debug) {
            self.mmu.dump_bank_table();
        }
    }
}

impl Default for GameGear {
    fn default() -> Self {
        Self::new()
    }
}

impl Debuggable for GameGear {
    fn read_state(&self) -> serde_json::Value {
        json!({
            "powered": self.powered.load(Ordering::Acquire),
            "frame": self.frame,
            "exception": self.get_exception(),
            "cpu": self.cpu.read_state(),
            "mmu": self.mmu.read_state(),
        })
    }
}

#[cfg(test)]
mod tests_machine;
