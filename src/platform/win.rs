//! Windows shell: tray thread plus the polling loop on the main thread.
//!
//! The two threads share nothing but the audio subsystem. Menu actions
//! mute or unmute through their own endpoint handle; the polling loop sees
//! the result as the external mute state on its next tick.

mod audio;
mod com;
mod helpers;
mod pointer;
mod tray;
mod window;

use std::{cell::RefCell, io, sync::OnceLock, thread};

pub use audio::WinAudio;
pub use pointer::CursorPointer;
use sysmute_core::{AudioEnvironment, MuteController, PollingLoop, Schedule};
use tracing::{info, warn};
use windows::{
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            DefWindowProcW, DestroyWindow, PostQuitMessage, RegisterWindowMessageW,
            WM_CONTEXTMENU, WM_DESTROY,
        },
    },
    core::{Result, w},
};

use self::{
    com::ComApartment,
    tray::{TrayCommand, WM_APP_TRAY},
};
use crate::clock::SystemClock;

struct TrayState {
    audio: WinAudio,
    schedule: Schedule,
}

thread_local! {
    static TRAY_STATE: RefCell<Option<TrayState>> = const { RefCell::new(None) };
}

static TASKBAR_CREATED: OnceLock<u32> = OnceLock::new();

fn taskbar_created_msg() -> u32 {
    *TASKBAR_CREATED.get_or_init(|| unsafe { RegisterWindowMessageW(w!("TaskbarCreated")) })
}

fn tooltip(schedule: &Schedule) -> String {
    format!(
        "Sysmute {}, idle {} min",
        schedule.window,
        schedule.idle_threshold.minutes()
    )
}

/// Starts the tray thread, then runs the polling loop on this thread forever.
pub fn run(schedule: Schedule) -> io::Result<()> {
    let Some(_instance) = helpers::single_instance_guard().map_err(io::Error::other)? else {
        warn!(msg = "already_running", "another sysmute instance is already running");
        return Ok(());
    };

    let _com = ComApartment::multithreaded().map_err(io::Error::other)?;
    let audio = WinAudio::new().map_err(io::Error::other)?;

    spawn_tray(schedule)?;

    PollingLoop::new(
        MuteController::new(schedule),
        audio,
        CursorPointer::default(),
        SystemClock,
    )
    .run()
}

fn spawn_tray(schedule: Schedule) -> io::Result<()> {
    thread::Builder::new()
        .name("sysmute-tray".to_string())
        .spawn(move || match run_tray(schedule) {
            Ok(()) => {
                info!(msg = "exit_requested");
                crate::utils::tracing::flush();
                std::process::exit(0);
            }
            Err(e) => {
                // The scheduler keeps working without a tray icon.
                warn!(msg = "tray_failed", error = ?e);
            }
        })?;
    Ok(())
}

fn run_tray(schedule: Schedule) -> Result<()> {
    let _com = ComApartment::single_threaded()?;
    let audio = WinAudio::new()?;

    let module = unsafe { GetModuleHandleW(None) }?;
    let hinstance = HINSTANCE(module.0);
    let class_name = w!("SysmuteTrayWindow");

    window::register_tray_class(class_name, hinstance)?;
    let hwnd = window::create_hidden_window(class_name, hinstance)?;
    let _ = taskbar_created_msg();

    TRAY_STATE.with(|cell| *cell.borrow_mut() = Some(TrayState { audio, schedule }));

    tray::ensure_icon(hwnd, &tooltip(&schedule))?;
    let result = window::message_loop();

    tray::remove_icon(hwnd);
    TRAY_STATE.with(|cell| cell.borrow_mut().take());
    result
}

pub(crate) extern "system" fn wndproc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_APP_TRAY => {
            let event = u32::from(helpers::loword(lparam.0 as usize));
            if event == WM_CONTEXTMENU {
                on_tray_menu(hwnd);
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        m if m == taskbar_created_msg() => {
            // Explorer restarted; the old icon is gone.
            if let Some(schedule) = tray_schedule() {
                if let Err(e) = tray::ensure_icon(hwnd, &tooltip(&schedule)) {
                    warn!(msg = "tray_icon_restore_failed", error = ?e);
                }
            }
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

fn tray_audio() -> Option<WinAudio> {
    TRAY_STATE.with(|cell| cell.borrow().as_ref().map(|s| s.audio.clone()))
}

fn tray_schedule() -> Option<Schedule> {
    TRAY_STATE.with(|cell| cell.borrow().as_ref().map(|s| s.schedule))
}

fn on_tray_menu(hwnd: HWND) {
    let muted = tray_audio().and_then(|a| a.is_muted().ok());

    let cmd = match tray::show_context_menu(hwnd, muted) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!(msg = "tray_menu_failed", error = ?e);
            return;
        }
    };

    match cmd {
        TrayCommand::Mute => set_mute_from_tray(hwnd, true),
        TrayCommand::Unmute => set_mute_from_tray(hwnd, false),
        TrayCommand::About => show_about(hwnd),
        TrayCommand::Exit => {
            tray::remove_icon(hwnd);
            if let Err(e) = unsafe { DestroyWindow(hwnd) } {
                warn!(msg = "destroy_window_failed", error = ?e);
                unsafe { PostQuitMessage(0) };
            }
        }
        TrayCommand::None => {}
    }
}

fn set_mute_from_tray(hwnd: HWND, muted: bool) {
    let Some(audio) = tray_audio() else {
        return;
    };

    if let Err(e) = audio.set_master_mute(muted) {
        warn!(msg = "tray_mute_failed", muted = muted, error = %e);
        let text = if muted {
            "Could not mute the master volume"
        } else {
            "Could not unmute the master volume"
        };
        if let Err(e) = tray::balloon_error(hwnd, "Sysmute", text) {
            warn!(msg = "error_balloon_failed", error = ?e);
        }
    }
}

fn show_about(hwnd: HWND) {
    let Some(schedule) = tray_schedule() else {
        return;
    };

    let title = format!("Sysmute {}", env!("CARGO_PKG_VERSION"));
    let text = format!(
        "Mutes system audio between {} and {} after {} of mouse inactivity.",
        schedule.window.start, schedule.window.end, schedule.idle_threshold
    );

    if let Err(e) = tray::balloon_info(hwnd, &title, &text) {
        warn!(msg = "about_balloon_failed", error = ?e);
    }
}
