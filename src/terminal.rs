//! Raw-mode process terminal.
//!
//! Owns the alternate screen and termios state for one interactive session:
//! raw input with a poll timeout (so callers get repaint ticks), SIGWINCH
//! resize detection through a shared flag, and whole-frame line drawing.
//! `stop` (or drop) always restores the terminal, including on panic paths
//! that unwind through the owning scope.

use std::io::{self, Write};
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::input::{Key, KeyDecoder};

const STDIN_FD: RawFd = 0;
const ENTER_ALT_SCREEN: &str = "\x1b[?1049h\x1b[2J\x1b[H\x1b[?25l";
const LEAVE_ALT_SCREEN: &str = "\x1b[?25h\x1b[?1049l";
const FALLBACK_COLUMNS: u16 = 80;
const FALLBACK_ROWS: u16 = 24;

/// An input-loop event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(Key),
    Resize,
}

pub struct ProcessTerminal {
    original_termios: Option<libc::termios>,
    resize_flag: Arc<AtomicBool>,
    decoder: KeyDecoder,
    stdin_closed: bool,
}

impl ProcessTerminal {
    pub fn new() -> io::Result<Self> {
        let resize_flag = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(signal_hook::consts::SIGWINCH, Arc::clone(&resize_flag))?;

        Ok(Self {
            original_termios: None,
            resize_flag,
            decoder: KeyDecoder::new(),
            stdin_closed: false,
        })
    }

    /// Enters raw mode and the alternate screen.
    pub fn start(&mut self) -> io::Result<()> {
        if self.original_termios.is_none() {
            let original = get_termios(STDIN_FD)?;
            let mut raw = original;
            unsafe { libc::cfmakeraw(&mut raw) };
            set_termios(STDIN_FD, &raw)?;
            self.original_termios = Some(original);
        }

        let mut stdout = io::stdout().lock();
        stdout.write_all(ENTER_ALT_SCREEN.as_bytes())?;
        stdout.flush()
    }

    /// Leaves the alternate screen and restores the original termios.
    pub fn stop(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(LEAVE_ALT_SCREEN.as_bytes())?;
        stdout.flush()?;

        if let Some(original) = self.original_termios.take() {
            set_termios(STDIN_FD, &original)?;
        }

        Ok(())
    }

    /// Current terminal size as `(columns, rows)`.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        let mut size = libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };

        let result = unsafe { libc::ioctl(STDIN_FD, libc::TIOCGWINSZ, &mut size) };
        if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
            (size.ws_col, size.ws_row)
        } else {
            (FALLBACK_COLUMNS, FALLBACK_ROWS)
        }
    }

    /// Waits up to `timeout_ms` for the next event.
    ///
    /// `None` means the timeout elapsed; callers use that as a repaint tick.
    /// A closed stdin surfaces as `Key::CtrlD` once so the caller can exit.
    pub fn poll_event(&mut self, timeout_ms: i32) -> io::Result<Option<Event>> {
        if let Some(key) = self.decoder.next_key() {
            return Ok(Some(Event::Key(key)));
        }

        if self.resize_flag.swap(false, Ordering::SeqCst) {
            return Ok(Some(Event::Resize));
        }

        if self.stdin_closed || !poll_readable(STDIN_FD, timeout_ms)? {
            return Ok(None);
        }

        let mut chunk = [0u8; 1024];
        let read = unsafe { libc::read(STDIN_FD, chunk.as_mut_ptr().cast(), chunk.len()) };
        match read {
            read if read > 0 => {
                self.decoder.feed(&chunk[..read as usize]);
                Ok(self.decoder.next_key().map(Event::Key))
            }
            0 => {
                self.stdin_closed = true;
                Ok(Some(Event::Key(Key::CtrlD)))
            }
            _ => {
                let error = io::Error::last_os_error();
                if error.kind() == io::ErrorKind::Interrupted {
                    Ok(None)
                } else {
                    Err(error)
                }
            }
        }
    }

    /// Repaints the whole frame from the given pre-styled rows.
    pub fn draw(&mut self, rows: &[String]) -> io::Result<()> {
        let mut frame = String::with_capacity(rows.iter().map(String::len).sum::<usize>() + 64);
        frame.push_str("\x1b[H");
        for (index, row) in rows.iter().enumerate() {
            frame.push_str("\x1b[2K");
            frame.push_str(row);
            if index + 1 < rows.len() {
                frame.push_str("\r\n");
            }
        }
        frame.push_str("\x1b[0J");

        let mut stdout = io::stdout().lock();
        stdout.write_all(frame.as_bytes())?;
        stdout.flush()
    }
}

impl Drop for ProcessTerminal {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

fn get_termios(fd: RawFd) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

fn set_termios(fd: RawFd, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn poll_readable(fd: RawFd, timeout_ms: i32) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };

    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    if result < 0 {
        let error = io::Error::last_os_error();
        if error.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(error);
    }

    Ok(result > 0 && fds.revents & libc::POLLIN != 0)
}
