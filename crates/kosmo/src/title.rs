//! Terminal window title that calls the user back while unfocused.

use std::fmt;
use std::io::{self, Write};

use crossterm::{Command, ExecutableCommand, terminal::SetTitle};

/// Title shown while the terminal has focus.
const TITLE: &str = "kosmo";

/// Title shown after the terminal loses focus.
const AWAY_TITLE: &str = "Come back!";

/// Save the terminal's own title on the xterm title stack.
struct PushTitle;

impl Command for PushTitle {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[22;0t")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Restore the title saved by [`PushTitle`].
struct PopTitle;

impl Command for PopTitle {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[23;0t")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Tracks terminal focus and the matching window title.
#[derive(Debug, Default)]
pub struct WindowTitle {
    away: bool,
}

impl WindowTitle {
    pub fn set_focused(&mut self, focused: bool) {
        self.away = !focused;
    }

    /// The title for the current focus state.
    pub fn current(&self) -> &'static str {
        if self.away { AWAY_TITLE } else { TITLE }
    }

    /// Save the terminal's title, then show ours.
    ///
    /// Terminals cannot report their title, so it is pushed onto the xterm
    /// title stack. Terminals without one ignore the sequence.
    pub fn install<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.execute(PushTitle)?;
        self.apply(out)
    }

    /// Write the current title to the terminal.
    pub fn apply<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.execute(SetTitle(self.current()))?;
        Ok(())
    }

    /// Put back the title saved by [`WindowTitle::install`].
    pub fn restore<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.away = false;
        out.execute(PopTitle)?;
        Ok(())
    }
}
