/// OpenGL debug output - routes KHR_debug messages into the engine logger
///
/// Messages are counted per severity and identical messages are grouped so
/// the end-of-run report shows how noisy the driver was.

use colored::*;
use glow::HasContext;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use zenith_3d_engine::zenith3d::log::LogSeverity;
use zenith_3d_engine::zenith3d::Engine;

use crate::opengl_device::GlowDevice;

const SOURCE: &str = "zenith3d::opengl::debug";

/// Global debug message statistics
static DEBUG_STATS: DebugStatsTracker = DebugStatsTracker::new();

/// Occurrence count per message text
static MESSAGE_TRACKER: Mutex<Option<FxHashMap<String, u32>>> = Mutex::new(None);

/// Snapshot of driver debug message counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugMessageStats {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub notification: u32,
}

impl DebugMessageStats {
    pub fn total(&self) -> u32 {
        self.high + self.medium + self.low + self.notification
    }
}

struct DebugStatsTracker {
    high: AtomicU32,
    medium: AtomicU32,
    low: AtomicU32,
    notification: AtomicU32,
}

impl DebugStatsTracker {
    const fn new() -> Self {
        Self {
            high: AtomicU32::new(0),
            medium: AtomicU32::new(0),
            low: AtomicU32::new(0),
            notification: AtomicU32::new(0),
        }
    }

    fn increment(&self, severity: u32) {
        let counter = match severity {
            glow::DEBUG_SEVERITY_HIGH => &self.high,
            glow::DEBUG_SEVERITY_MEDIUM => &self.medium,
            glow::DEBUG_SEVERITY_LOW => &self.low,
            _ => &self.notification,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get_stats(&self) -> DebugMessageStats {
        DebugMessageStats {
            high: self.high.load(Ordering::Relaxed),
            medium: self.medium.load(Ordering::Relaxed),
            low: self.low.load(Ordering::Relaxed),
            notification: self.notification.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.high.store(0, Ordering::Relaxed);
        self.medium.store(0, Ordering::Relaxed);
        self.low.store(0, Ordering::Relaxed);
        self.notification.store(0, Ordering::Relaxed);
    }
}

/// Engine log severity for a GL_DEBUG_SEVERITY_* value
pub(crate) fn log_severity(gl_severity: u32) -> LogSeverity {
    match gl_severity {
        glow::DEBUG_SEVERITY_HIGH => LogSeverity::Error,
        glow::DEBUG_SEVERITY_MEDIUM => LogSeverity::Warn,
        glow::DEBUG_SEVERITY_LOW => LogSeverity::Info,
        _ => LogSeverity::Trace,
    }
}

pub(crate) fn message_type_name(gl_type: u32) -> &'static str {
    match gl_type {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        _ => "General",
    }
}

fn track_message(message: &str) -> u32 {
    let Ok(mut guard) = MESSAGE_TRACKER.lock() else {
        return 1;
    };
    let count = guard
        .get_or_insert_with(FxHashMap::default)
        .entry(message.to_string())
        .or_insert(0);
    *count += 1;
    *count
}

pub(crate) fn handle_debug_message(_source: u32, gl_type: u32, id: u32, severity: u32, message: &str) {
    DEBUG_STATS.increment(severity);
    let occurrences = track_message(message);

    let repeat = if occurrences > 1 {
        format!(" [x{}]", occurrences)
    } else {
        String::new()
    };

    Engine::log(
        log_severity(severity),
        SOURCE,
        format!("[{}] #{}{} {}", message_type_name(gl_type), id, repeat, message),
    );
}

/// Enable synchronous debug output on the device's context
///
/// Resets the message statistics.
pub fn install_debug_output(device: &mut GlowDevice) {
    DEBUG_STATS.reset();
    if let Ok(mut guard) = MESSAGE_TRACKER.lock() {
        *guard = Some(FxHashMap::default());
    }

    let gl = device.gl_mut();
    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(handle_debug_message);
    }
}

/// Get current debug message statistics
pub fn get_debug_message_stats() -> DebugMessageStats {
    DEBUG_STATS.get_stats()
}

/// Print debug message statistics report
pub fn print_debug_message_report() {
    let stats = get_debug_message_stats();

    if stats.total() == 0 {
        println!("\n{}", "✓ No OpenGL debug messages".green().bold());
        return;
    }

    println!("\n{}", "=== OpenGL Debug Message Report ===".bright_blue().bold());

    if stats.high > 0 {
        println!("  {} {}", "High:".red().bold(), stats.high);
    }
    if stats.medium > 0 {
        println!("  {} {}", "Medium:".yellow().bold(), stats.medium);
    }
    if stats.low > 0 {
        println!("  {} {}", "Low:".cyan(), stats.low);
    }
    if stats.notification > 0 {
        println!("  {} {}", "Notification:".bright_black(), stats.notification);
    }

    println!("  {} {}", "Total:".white().bold(), stats.total());

    if let Ok(guard) = MESSAGE_TRACKER.lock() {
        if let Some(messages) = guard.as_ref() {
            let duplicates = messages.values().filter(|&&count| count > 1).count();
            if duplicates > 0 {
                println!("\n  {} {} message(s) appeared multiple times", "ℹ".cyan(), duplicates);
            }
        }
    }

    println!("{}\n", "===================================".bright_blue().bold());
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
