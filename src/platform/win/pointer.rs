use std::cell::Cell;

use sysmute_core::{EnvError, PointerEnvironment, Position};
use tracing::warn;
use windows::Win32::{Foundation::POINT, UI::WindowsAndMessaging::GetCursorPos};

/// Cursor position via `GetCursorPos`.
///
/// `GetCursorPos` fails while the workstation is locked. The last good
/// sample is reported instead, which reads as "not moving".
#[derive(Debug, Default)]
pub struct CursorPointer {
    last_known: Cell<Option<Position>>,
}

impl CursorPointer {
    fn resolve(&self, sample: windows::core::Result<POINT>) -> Result<Position, EnvError> {
        match sample {
            Ok(pt) => {
                let position = Position::new(pt.x, pt.y);
                self.last_known.set(Some(position));
                Ok(position)
            }
            Err(e) => match self.last_known.get() {
                Some(position) => {
                    warn!(msg = "cursor_read_failed_using_last_known", error = ?e);
                    Ok(position)
                }
                None => Err(EnvError::ReadPointer(Box::new(e))),
            },
        }
    }
}

impl PointerEnvironment for CursorPointer {
    fn position(&self) -> Result<Position, EnvError> {
        let mut pt = POINT { x: 0, y: 0 };
        let sample = unsafe { GetCursorPos(&raw mut pt) }.map(|()| pt);
        self.resolve(sample)
    }
}
