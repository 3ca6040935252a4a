//! Terminal greeting
//!
//! Asks for a name on the alternate screen and greets back. The terminal
//! is owned by a [`TerminalSession`], which restores it when dropped, so
//! every exit path (including errors and panics) leaves the shell usable.

use crossterm::{
    cursor::{MoveTo, Show},
    event::{self, Event},
    execute, queue,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Row of the question; the answer and greeting follow on the next rows
pub const PROMPT_ROW: u16 = 2;
/// Column all prompt text starts at
pub const PROMPT_COL: u16 = 3;
/// Longest name kept from the input line
pub const MAX_NAME_LEN: usize = 20;

/// Alternate-screen session, restored on drop
pub struct TerminalSession<W: Write> {
    out: W,
    raw: bool,
}

impl<W: Write> TerminalSession<W> {
    /// Switch to the alternate screen and clear it
    pub fn enter(mut out: W) -> io::Result<Self> {
        execute!(out, EnterAlternateScreen, Clear(ClearType::All))?;
        Ok(Self { out, raw: false })
    }

    /// Print text at a screen position
    pub fn write_at(&mut self, row: u16, col: u16, text: &str) -> io::Result<()> {
        queue!(self.out, MoveTo(col, row), Print(text))?;
        self.out.flush()
    }

    /// Read one line with echo, the cursor parked at a screen position
    pub fn read_line_at<R: BufRead>(
        &mut self,
        input: &mut R,
        row: u16,
        col: u16,
        max_len: usize,
    ) -> io::Result<String> {
        execute!(self.out, MoveTo(col, row), Show)?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).chars().take(max_len).collect())
    }

    /// Block until any key is pressed
    pub fn wait_key(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.raw = true;
        loop {
            if let Event::Key(_) = event::read()? {
                break;
            }
        }
        disable_raw_mode()?;
        self.raw = false;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        if self.raw {
            let _ = disable_raw_mode();
        }
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
        debug!("Terminal restored");
    }
}

/// Ask for a name and print the greeting, returning the name read
pub fn greet<R: BufRead, W: Write>(
    session: &mut TerminalSession<W>,
    input: &mut R,
) -> io::Result<String> {
    let mut row = PROMPT_ROW;
    session.write_at(row, PROMPT_COL, "Enter your name")?;
    row += 1;
    let name = session.read_line_at(input, row, PROMPT_COL, MAX_NAME_LEN)?;
    row += 1;
    session.write_at(row, PROMPT_COL, &format!("Hello {}", name))?;
    Ok(name)
}

/// Run the greeting on the process terminal
pub fn run() -> io::Result<()> {
    let stdin = io::stdin();
    let mut session = TerminalSession::enter(io::stdout())?;
    greet(&mut session, &mut stdin.lock())?;
    session.wait_key()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::panic::{self, AssertUnwindSafe};

    const ENTER_ALT: &str = "\x1b[?1049h";
    const LEAVE_ALT: &str = "\x1b[?1049l";

    #[test]
    fn test_greet() {
        let mut screen = Vec::new();
        let name = {
            let mut session = TerminalSession::enter(&mut screen).unwrap();
            greet(&mut session, &mut Cursor::new("Ada\n")).unwrap()
        };

        assert_eq!(name, "Ada");
        let text = String::from_utf8_lossy(&screen);
        assert!(text.starts_with(ENTER_ALT));
        assert!(text.contains("Enter your name"));
        assert!(text.contains("Hello Ada"));
        assert!(text.ends_with(LEAVE_ALT));
    }

    #[test]
    fn test_name_truncated() {
        let mut screen = Vec::new();
        let mut session = TerminalSession::enter(&mut screen).unwrap();
        let name = greet(&mut session, &mut Cursor::new("abcdefghijklmnopqrstuvwxyz\r\n")).unwrap();
        assert_eq!(name, "abcdefghijklmnopqrst");
    }

    #[test]
    fn test_restored_on_error() {
        struct FailingInput;

        impl io::Read for FailingInput {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("stdin closed"))
            }
        }

        fn attempt(screen: &mut Vec<u8>) -> io::Result<String> {
            let mut session = TerminalSession::enter(screen)?;
            greet(&mut session, &mut io::BufReader::new(FailingInput))
        }

        let mut screen = Vec::new();
        assert!(attempt(&mut screen).is_err());
        assert!(String::from_utf8_lossy(&screen).ends_with(LEAVE_ALT));
    }

    #[test]
    fn test_restored_on_panic() {
        let mut screen = Vec::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _session = TerminalSession::enter(&mut screen).unwrap();
            panic!("boom");
        }));

        assert!(result.is_err());
        assert!(String::from_utf8_lossy(&screen).ends_with(LEAVE_ALT));
    }
}
