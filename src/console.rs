//! Terminal output channels
//!
//! Build reporting goes through a `Console` capability instead of printing
//! directly, so the screen-clear side effect and the severity channels stay
//! testable without a real terminal.

use colored::Colorize;
use console::Term;

/// Severity channels the build reporter writes to
pub trait Console: Send + Sync {
    /// Clear the screen before the next burst of output
    fn clear(&self);

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Success channel, used when a build pass completes cleanly
    fn done(&self, message: &str);
}

/// Console writing to the real terminal on stderr
pub struct TerminalConsole {
    term: Term,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn clear(&self) {
        let _ = self.term.clear_screen();
    }

    fn info(&self, message: &str) {
        eprintln!("{} {}", "info".cyan().bold(), message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "warn".yellow().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "error".red().bold(), message);
    }

    fn done(&self, message: &str) {
        eprintln!("{} {}", "done".green().bold(), message);
    }
}

#[cfg(test)]
pub mod testing {
    //! Recording console for tests

    use parking_lot::Mutex;

    use super::Console;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Channel {
        Clear,
        Info,
        Warn,
        Error,
        Done,
    }

    /// Console that records every call instead of printing
    #[derive(Default)]
    pub struct MemoryConsole {
        calls: Mutex<Vec<(Channel, String)>>,
    }

    impl MemoryConsole {
        pub fn channels(&self) -> Vec<Channel> {
            self.calls.lock().iter().map(|(channel, _)| *channel).collect()
        }

        pub fn messages(&self) -> Vec<String> {
            self.calls.lock().iter().map(|(_, msg)| msg.clone()).collect()
        }
    }

    impl Console for MemoryConsole {
        fn clear(&self) {
            self.calls.lock().push((Channel::Clear, String::new()));
        }

        fn info(&self, message: &str) {
            self.calls.lock().push((Channel::Info, message.to_string()));
        }

        fn warn(&self, message: &str) {
            self.calls.lock().push((Channel::Warn, message.to_string()));
        }

        fn error(&self, message: &str) {
            self.calls.lock().push((Channel::Error, message.to_string()));
        }

        fn done(&self, message: &str) {
            self.calls.lock().push((Channel::Done, message.to_string()));
        }
    }
}
