use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::{Mutex, OnceLock},
    time::{Duration, Instant},
};

use windows::{
    Win32::{
        Foundation::{HWND, LPARAM, POINT, WPARAM},
        UI::{
            Shell::{
                NIF_ICON, NIF_INFO, NIF_MESSAGE, NIF_SHOWTIP, NIF_TIP, NIIF_ERROR, NIIF_INFO,
                NIM_ADD, NIM_DELETE, NIM_MODIFY, NIM_SETVERSION, NOTIFY_ICON_INFOTIP_FLAGS,
                NOTIFY_ICON_MESSAGE, NOTIFYICON_VERSION_4, NOTIFYICONDATAW, Shell_NotifyIconW,
            },
            WindowsAndMessaging::{
                AppendMenuW, CreatePopupMenu, DestroyMenu, GetCursorPos, HMENU, IDI_APPLICATION,
                LoadIconW, MF_CHECKED, MF_SEPARATOR, MF_STRING, MF_UNCHECKED, PostMessageW,
                SetForegroundWindow, TPM_BOTTOMALIGN, TPM_NOANIMATION, TPM_RETURNCMD,
                TPM_RIGHTALIGN, TPM_RIGHTBUTTON, TrackPopupMenu, WM_APP, WM_NULL,
            },
        },
    },
    core::{HRESULT, PCWSTR, Result, w},
};

pub const WM_APP_TRAY: u32 = WM_APP + 1;
const TRAY_UID: u32 = 1;

const ID_MUTE: u32 = 1001;
const ID_UNMUTE: u32 = 1002;
const ID_ABOUT: u32 = 1003;
const ID_EXIT: u32 = 1004;

const BALLOON_REPEAT_WINDOW: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    None,
    Mute,
    Unmute,
    About,
    Exit,
}

impl TrayCommand {
    fn from_id(id: u32) -> Self {
        match id {
            ID_MUTE => Self::Mute,
            ID_UNMUTE => Self::Unmute,
            ID_ABOUT => Self::About,
            ID_EXIT => Self::Exit,
            _ => Self::None,
        }
    }
}

fn fill_wide(dst: &mut [u16], s: &str) {
    if let Some((last, body)) = dst.split_last_mut() {
        for (d, ch) in body
            .iter_mut()
            .zip(s.encode_utf16().chain(std::iter::repeat(0)))
        {
            *d = ch;
        }
        *last = 0;
    }
}

fn shell_notify(action: NOTIFY_ICON_MESSAGE, nid: &NOTIFYICONDATAW, what: &str) -> Result<()> {
    unsafe {
        if Shell_NotifyIconW(action, nid).as_bool() {
            Ok(())
        } else {
            Err(windows::core::Error::new(
                HRESULT(0x8000_4005_u32 as i32),
                format!("Shell_NotifyIconW returned FALSE: {what}"),
            ))
        }
    }
}

fn base_nid(hwnd: HWND) -> Result<NOTIFYICONDATAW> {
    Ok(NOTIFYICONDATAW {
        cbSize: u32::try_from(core::mem::size_of::<NOTIFYICONDATAW>())?,
        hWnd: hwnd,
        uID: TRAY_UID,
        ..Default::default()
    })
}

/// Adds the icon, or refreshes it if the shell already has one for this window.
pub fn ensure_icon(hwnd: HWND, tooltip: &str) -> Result<()> {
    let mut nid = base_nid(hwnd)?;
    nid.uCallbackMessage = WM_APP_TRAY;
    nid.uFlags = NIF_MESSAGE | NIF_ICON | NIF_TIP | NIF_SHOWTIP;
    nid.hIcon = unsafe { LoadIconW(None, IDI_APPLICATION) }?;
    fill_wide(&mut nid.szTip, tooltip);

    if !unsafe { Shell_NotifyIconW(NIM_ADD, &raw const nid) }.as_bool() {
        shell_notify(NIM_MODIFY, &nid, "ensure_icon: NIM_MODIFY after NIM_ADD failure")?;
    }

    nid.Anonymous.uVersion = NOTIFYICON_VERSION_4;
    shell_notify(NIM_SETVERSION, &nid, "ensure_icon: NIM_SETVERSION")
}

pub fn remove_icon(hwnd: HWND) {
    if let Ok(nid) = base_nid(hwnd) {
        let _ = unsafe { Shell_NotifyIconW(NIM_DELETE, &raw const nid) };
    }
}

#[derive(Default)]
struct BalloonGuard {
    last_fp: u64,
    last_at: Option<Instant>,
}

impl BalloonGuard {
    /// Same fingerprint again within the repeat window is a repeat.
    fn is_repeat(&mut self, fp: u64, now: Instant) -> bool {
        let too_soon = self
            .last_at
            .is_some_and(|t| now.duration_since(t) < BALLOON_REPEAT_WINDOW);

        if too_soon && self.last_fp == fp {
            return true;
        }

        self.last_fp = fp;
        self.last_at = Some(now);
        false
    }
}

fn fingerprint(title: &str, text: &str, flags: u32) -> u64 {
    let mut h = DefaultHasher::new();
    title.hash(&mut h);
    text.hash(&mut h);
    flags.hash(&mut h);
    h.finish()
}

fn is_repeat(title: &str, text: &str, flags: u32) -> bool {
    static GUARD: OnceLock<Mutex<BalloonGuard>> = OnceLock::new();

    let Ok(mut g) = GUARD.get_or_init(|| Mutex::new(BalloonGuard::default())).lock() else {
        tracing::warn!(msg = "tray_balloon_guard_lock_poisoned");
        return false;
    };

    g.is_repeat(fingerprint(title, text, flags), Instant::now())
}

fn balloon_common(hwnd: HWND, title: &str, text: &str, flags: u32, what: &str) -> Result<()> {
    if is_repeat(title, text, flags) {
        tracing::debug!(msg = "tray_balloon_suppressed", title = title);
        return Ok(());
    }

    let mut nid = base_nid(hwnd)?;
    nid.uCallbackMessage = WM_APP_TRAY;
    nid.uFlags = NIF_INFO | NIF_MESSAGE;
    nid.dwInfoFlags = NOTIFY_ICON_INFOTIP_FLAGS(flags);
    nid.Anonymous.uTimeout = 10_000;

    fill_wide(&mut nid.szInfoTitle, title);
    fill_wide(&mut nid.szInfo, text);

    shell_notify(NIM_MODIFY, &nid, what)
}

pub fn balloon_error(hwnd: HWND, title: &str, text: &str) -> Result<()> {
    balloon_common(hwnd, title, text, NIIF_ERROR.0, "balloon_error: NIM_MODIFY")
}

pub fn balloon_info(hwnd: HWND, title: &str, text: &str) -> Result<()> {
    balloon_common(hwnd, title, text, NIIF_INFO.0, "balloon_info: NIM_MODIFY")
}

/// Shows the context menu at the cursor and returns the chosen command.
///
/// `muted` puts a check mark on the matching item when the state is known.
pub fn show_context_menu(hwnd: HWND, muted: Option<bool>) -> Result<TrayCommand> {
    let hmenu = build_menu(muted)?;
    let cmd = unsafe { show_popup_menu_at_cursor(hwnd, hmenu) };
    let _ = unsafe { DestroyMenu(hmenu) };
    Ok(TrayCommand::from_id(cmd))
}

fn build_menu(muted: Option<bool>) -> Result<HMENU> {
    let check = |on: bool| if on { MF_CHECKED } else { MF_UNCHECKED };

    unsafe {
        let hmenu = CreatePopupMenu()?;
        AppendMenuW(
            hmenu,
            MF_STRING | check(muted == Some(true)),
            ID_MUTE as usize,
            w!("Mute"),
        )?;
        AppendMenuW(
            hmenu,
            MF_STRING | check(muted == Some(false)),
            ID_UNMUTE as usize,
            w!("Unmute"),
        )?;
        AppendMenuW(hmenu, MF_SEPARATOR, 0, PCWSTR::null())?;
        AppendMenuW(hmenu, MF_STRING, ID_ABOUT as usize, w!("About"))?;
        AppendMenuW(hmenu, MF_SEPARATOR, 0, PCWSTR::null())?;
        AppendMenuW(hmenu, MF_STRING, ID_EXIT as usize, w!("Exit"))?;
        Ok(hmenu)
    }
}

unsafe fn show_popup_menu_at_cursor(hwnd: HWND, hmenu: HMENU) -> u32 {
    let mut pt = POINT { x: 0, y: 0 };
    let _ = unsafe { GetCursorPos(&raw mut pt) };

    // Without this the menu does not close when the user clicks elsewhere.
    let _ = unsafe { SetForegroundWindow(hwnd) };

    let result = unsafe {
        TrackPopupMenu(
            hmenu,
            TPM_RETURNCMD | TPM_BOTTOMALIGN | TPM_RIGHTALIGN | TPM_NOANIMATION | TPM_RIGHTBUTTON,
            pt.x,
            pt.y,
            Some(0),
            hwnd,
            None,
        )
    };

    let _ = unsafe { PostMessageW(Some(hwnd), WM_NULL, WPARAM(0), LPARAM(0)) };

    u32::try_from(result.0).unwrap_or(0)
}
