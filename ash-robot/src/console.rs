//! Typed input from a terminal
//!
//! Lines are read on a helper thread and handed over a channel, so a
//! blocked read never keeps the robot from seeing the interrupt flag.

use std::io::{self, BufRead, BufReader, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ash_core::traits::ConsoleInput;
use tracing::{debug, warn};

/// How often a waiting read checks the interrupt flag
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Line reader over any buffered source; prompts go to `out`
pub struct LineConsole<W> {
    lines: Receiver<io::Result<String>>,
    out: W,
    interrupt: Arc<AtomicBool>,
}

/// Console on the process's stdin and stdout
pub type StdinConsole = LineConsole<io::Stdout>;

impl StdinConsole {
    pub fn stdin(interrupt: Arc<AtomicBool>) -> Self {
        LineConsole::spawn(BufReader::new(io::stdin()), io::stdout(), interrupt)
    }
}

impl<W: Write> LineConsole<W> {
    /// Start reading `input` in the background
    pub fn spawn<R>(input: R, out: W, interrupt: Arc<AtomicBool>) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || read_lines(input, tx));
        Self {
            lines: rx,
            out,
            interrupt,
        }
    }
}

/// Forward lines until end of input, a read error or a dropped receiver
fn read_lines<R: BufRead>(mut input: R, tx: mpsc::Sender<io::Result<String>>) {
    loop {
        let mut line = String::new();
        let result = match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => Ok(line),
            Err(e) => Err(e),
        };
        let failed = result.is_err();
        if tx.send(result).is_err() || failed {
            break;
        }
    }
    debug!("Console reader finished");
}

impl<W: Write> ConsoleInput for LineConsole<W> {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        // Prompt write errors are ignored
        let _ = write!(self.out, "{}", prompt).and_then(|_| self.out.flush());

        loop {
            if self.interrupt.load(Ordering::SeqCst) {
                return None;
            }
            match self.lines.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(line)) => return Some(line.trim_end_matches(['\r', '\n']).to_string()),
                Ok(Err(e)) => {
                    warn!("Console read failed: {}", e);
                    return None;
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    /// Never yields data until its sender is dropped
    struct Silent(Receiver<()>);

    impl Read for Silent {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    fn flag() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    #[test]
    fn test_reads_lines_then_eof() {
        let mut out = Vec::new();
        let mut console = LineConsole::spawn("hello\r\n\nbye".as_bytes(), &mut out, flag());
        assert_eq!(console.read_line("You: ").as_deref(), Some("hello"));
        assert_eq!(console.read_line("You: ").as_deref(), Some(""));
        assert_eq!(console.read_line("You: ").as_deref(), Some("bye"));
        assert_eq!(console.read_line("You: "), None);
        drop(console);
        assert_eq!(out, b"You: You: You: You: ");
    }

    #[test]
    fn test_interrupt_unblocks_waiting_read() {
        let (_hold, rx) = mpsc::channel();
        let interrupt = flag();
        let mut console =
            LineConsole::spawn(BufReader::new(Silent(rx)), Vec::new(), Arc::clone(&interrupt));

        let setter = Arc::clone(&interrupt);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            setter.store(true, Ordering::SeqCst);
        });

        assert_eq!(console.read_line("You: "), None);
        handle.join().unwrap();
    }

    #[test]
    fn test_interrupt_already_set() {
        let interrupt = flag();
        interrupt.store(true, Ordering::SeqCst);
        let mut console = LineConsole::spawn("hello\n".as_bytes(), Vec::new(), interrupt);
        assert_eq!(console.read_line("You: "), None);
    }
}
