use crate::history::History;
use crate::scan::{self, ScanSequence};

pub const PROMPT: &str = "user@dtempire:~$";

const WELCOME: &str = "Type \"help\" for available commands";
const FLAG_PATH: &str = "/home/dtempire/flag";
const FLAG_BLOCK: &str = r#"<div class="flag-message"><h3>🎉 FLAG FOUND!</h3><div class="flag-code">flag{you_f0uNd_Fl@g_Dm_D@rG0_To_Cl@am}</div></div>"#;
const PRIZE_BLOCK: &str = r#"<div class="prize-message">🎁 Congratulations! You found the hidden flag!<br>You won a free always online server (game or code hosting server).<br>DM hyperdargo on Discord to claim your prize!</div>"#;

/// Wall-clock collaborator for the `date` command.
pub trait Clock {
    fn now(&self) -> String;
}

/// What the view layer must do after a submitted line, beyond re-rendering
/// the output log.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// The terminal view should close.
    pub close: bool,
    /// A scan started; drive it with `advance_scan` on a fixed cadence.
    pub scan: Option<u32>,
}

/// One terminal session: output log, command history, and the anomaly
/// gate that unlocks the hidden flag.
///
/// The log holds rendered HTML lines, append-only except for `clear`,
/// which empties it and bumps the generation counter so a renderer can
/// tell a wipe from plain growth.
pub struct Session {
    log: Vec<String>,
    generation: u32,
    history: History,
    anomaly_found: bool,
    scans: Vec<(u32, ScanSequence)>,
    next_scan_id: u32,
    clock: Box<dyn Clock>,
}

impl Session {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        let mut session = Session {
            log: Vec::new(),
            generation: 0,
            history: History::new(),
            anomaly_found: false,
            scans: Vec::new(),
            next_scan_id: 1,
            clock,
        };
        session.push_line(WELCOME);
        session
    }

    /// Rendered output lines since the last clear.
    pub fn lines(&self) -> &[String] {
        &self.log
    }

    /// Bumped every time `clear` wipes the log.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn anomaly_found(&self) -> bool {
        self.anomaly_found
    }

    pub fn running_scans(&self) -> usize {
        self.scans.len()
    }

    /// Recall the previous history entry, if the cursor can still move
    /// backward. `None` leaves the input untouched.
    pub fn recall_previous(&mut self) -> Option<String> {
        self.history.previous().map(|s| s.to_string())
    }

    /// Recall the next history entry. `None` means the cursor returned to
    /// the live sentinel and the input should be cleared.
    pub fn recall_next(&mut self) -> Option<String> {
        self.history.next().map(|s| s.to_string())
    }

    /// Commit one line of input: record it, echo it, dispatch it.
    pub fn submit(&mut self, raw: &str) -> Outcome {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            self.history.push(trimmed);
        }
        self.push_line(format!(
            "<span class=\"prompt\">{}</span> {}",
            PROMPT, trimmed
        ));

        let (first, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim_start()),
            None => (trimmed, ""),
        };
        let cmd = first.to_lowercase();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let mut outcome = Outcome::default();
        match cmd.as_str() {
            "help" => self.cmd_help(),
            "clear" => {
                self.log.clear();
                self.generation += 1;
                self.push_line("Terminal cleared");
            }
            "ls" => {
                self.push_line("Desktop  Documents  Downloads  Music  Pictures  Videos");
                self.push_line("Projects  Services  Documentation  home");
            }
            "cd" => self.cmd_cd(&args),
            "whoami" => self.push_line("user"),
            "date" => {
                let now = self.clock.now();
                self.push_line(now);
            }
            "echo" => self.push_line(rest),
            "scan" => {
                self.push_line("Starting system scan...");
                let id = self.next_scan_id;
                self.next_scan_id += 1;
                self.scans.push((id, ScanSequence::new()));
                outcome.scan = Some(id);
            }
            "exit" => outcome.close = true,
            "" => {}
            _ => self.push_line(format!("Command not found: {}", trimmed)),
        }
        outcome
    }

    /// Reveal the next line of a running scan. Returns `false` once the
    /// scan has finished (or was never running) and its driver should
    /// stop ticking.
    pub fn advance_scan(&mut self, id: u32) -> bool {
        let idx = match self.scans.iter().position(|(sid, _)| *sid == id) {
            Some(idx) => idx,
            None => return false,
        };
        match self.scans[idx].1.advance() {
            Some(step) => {
                self.push_line(step.line);
                if step.anomaly {
                    self.anomaly_found = true;
                    self.push_line(scan::ANOMALY_ALERT);
                }
            }
            None => {
                self.scans.remove(idx);
                return false;
            }
        }
        if self.scans[idx].1.is_finished() {
            self.scans.remove(idx);
            return false;
        }
        true
    }

    fn cmd_help(&mut self) {
        self.push_line("Available commands:");
        self.push_line("  clear - Clear terminal screen");
        self.push_line("  ls - List directory contents");
        self.push_line("  cd [dir] - Change directory");
        self.push_line("  whoami - Show current user");
        self.push_line("  date - Show current date and time");
        self.push_line("  echo [text] - Print text to terminal");
        self.push_line("  scan - Scan system for anomalies");
        self.push_line("  exit - Close terminal");
    }

    fn cmd_cd(&mut self, args: &[&str]) {
        match args.first() {
            None => self.push_line("Usage: cd [directory]"),
            Some(&FLAG_PATH) => {
                if self.anomaly_found {
                    self.push_line(FLAG_BLOCK);
                    self.push_line(PRIZE_BLOCK);
                } else {
                    self.push_line("Access denied. Directory requires special access.");
                    self.push_line("Hint: Try scanning the system first with \"scan\" command");
                }
            }
            Some(&"home") => self.push_line("Changed directory to /home"),
            Some(other) => self.push_line(format!("Directory '{}' not found", other)),
        }
    }

    fn push_line<S: Into<String>>(&mut self, line: S) {
        self.log.push(line.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock;
    impl Clock for FixedClock {
        fn now(&self) -> String {
            "Thu Jan 01 1970 00:00:00 GMT+0000".to_string()
        }
    }

    fn session() -> Session {
        Session::new(Box::new(FixedClock))
    }

    #[test]
    fn test_starts_with_welcome_line() {
        let s = session();
        assert_eq!(s.lines().len(), 1);
        assert!(s.lines()[0].contains("help"));
    }

    #[test]
    fn test_help_appends_nine_lines_after_echo() {
        let mut s = session();
        let before = s.lines().len();
        s.submit("help");
        // echo + header + 8 command descriptions
        assert_eq!(s.lines().len(), before + 1 + 9);
        assert_eq!(s.lines()[before + 1], "Available commands:");
    }

    #[test]
    fn test_echo_preserves_text_verbatim() {
        let mut s = session();
        s.submit("echo hello   world");
        assert_eq!(s.lines().last().unwrap(), "hello   world");
        s.submit("echo <b>bold</b>");
        assert_eq!(s.lines().last().unwrap(), "<b>bold</b>");
        s.submit("echo");
        assert_eq!(s.lines().last().unwrap(), "");
    }

    #[test]
    fn test_case_insensitive_dispatch() {
        let mut s = session();
        s.submit("WHOAMI");
        assert_eq!(s.lines().last().unwrap(), "user");
    }

    #[test]
    fn test_date_uses_injected_clock() {
        let mut s = session();
        s.submit("date");
        assert_eq!(
            s.lines().last().unwrap(),
            "Thu Jan 01 1970 00:00:00 GMT+0000"
        );
    }

    #[test]
    fn test_ls_lists_two_lines() {
        let mut s = session();
        let before = s.lines().len();
        s.submit("ls");
        assert_eq!(s.lines().len(), before + 3);
        assert!(s.lines().last().unwrap().contains("Documentation"));
    }

    #[test]
    fn test_empty_input_echoes_only() {
        let mut s = session();
        let before = s.lines().len();
        s.submit("   ");
        assert_eq!(s.lines().len(), before + 1);
        assert!(s.lines().last().unwrap().starts_with("<span"));
        assert_eq!(s.recall_previous(), None);
    }

    #[test]
    fn test_unknown_command_reports_not_found() {
        let mut s = session();
        s.submit("frobnicate now");
        assert_eq!(
            s.lines().last().unwrap(),
            "Command not found: frobnicate now"
        );
    }

    #[test]
    fn test_clear_leaves_only_notice() {
        let mut s = session();
        s.submit("help");
        let generation = s.generation();
        s.submit("clear");
        assert_eq!(s.lines().len(), 1);
        assert_eq!(s.lines()[0], "Terminal cleared");
        assert_eq!(s.generation(), generation + 1);
    }

    #[test]
    fn test_exit_requests_close() {
        let mut s = session();
        let outcome = s.submit("exit");
        assert!(outcome.close);
        assert_eq!(outcome.scan, None);
    }

    #[test]
    fn test_cd_without_args_prints_usage() {
        let mut s = session();
        s.submit("cd");
        assert_eq!(s.lines().last().unwrap(), "Usage: cd [directory]");
    }

    #[test]
    fn test_cd_home_and_unknown_directory() {
        let mut s = session();
        s.submit("cd home");
        assert_eq!(s.lines().last().unwrap(), "Changed directory to /home");
        s.submit("cd /tmp");
        assert_eq!(s.lines().last().unwrap(), "Directory '/tmp' not found");
    }

    #[test]
    fn test_flag_directory_denied_before_scan() {
        let mut s = session();
        let before = s.lines().len();
        s.submit("cd /home/dtempire/flag");
        assert!(!s.anomaly_found());
        assert_eq!(s.lines().len(), before + 3);
        assert!(s.lines()[before + 1].starts_with("Access denied"));
        assert!(s.lines()[before + 2].contains("scan"));
    }

    #[test]
    fn test_scan_unlocks_flag_reveal() {
        let mut s = session();
        let outcome = s.submit("scan");
        let id = outcome.scan.expect("scan should start");
        assert_eq!(s.lines().last().unwrap(), "Starting system scan...");
        let before = s.lines().len();

        for _ in 0..5 {
            assert!(s.advance_scan(id));
        }
        assert!(!s.anomaly_found());
        assert!(s.advance_scan(id));
        assert!(s.anomaly_found());
        assert!(!s.advance_scan(id));
        assert_eq!(s.running_scans(), 0);

        // 7 progress lines plus the alert block
        assert_eq!(s.lines().len(), before + 8);
        assert!(s.lines()[before + 5].contains("ANOMALY DETECTED"));
        assert!(s.lines()[before + 6].contains("Security Alert"));

        s.submit("cd /home/dtempire/flag");
        let tail = &s.lines()[s.lines().len() - 2..];
        assert!(tail[0].contains("flag{you_f0uNd_Fl@g_Dm_D@rG0_To_Cl@am}"));
        assert!(tail[1].contains("prize"));
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut s = session();
        let id = s.submit("scan").scan.unwrap();
        while s.advance_scan(id) {}
        s.submit("cd /home/dtempire/flag");
        let first: Vec<String> = s.lines()[s.lines().len() - 2..].to_vec();
        s.submit("cd /home/dtempire/flag");
        let second: Vec<String> = s.lines()[s.lines().len() - 2..].to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_scans_run_independently() {
        let mut s = session();
        let first = s.submit("scan").scan.unwrap();
        let second = s.submit("scan").scan.unwrap();
        assert_ne!(first, second);
        assert_eq!(s.running_scans(), 2);

        let before = s.lines().len();
        let mut first_live = true;
        let mut second_live = true;
        while first_live || second_live {
            if first_live {
                first_live = s.advance_scan(first);
            }
            if second_live {
                second_live = s.advance_scan(second);
            }
        }
        // two full sequences, each with its own alert block
        assert_eq!(s.lines().len(), before + 16);
        assert!(s.anomaly_found());
    }

    #[test]
    fn test_commands_interleave_with_running_scan() {
        let mut s = session();
        let id = s.submit("scan").scan.unwrap();
        assert!(s.advance_scan(id));
        s.submit("whoami");
        assert_eq!(s.lines().last().unwrap(), "user");
        assert!(s.advance_scan(id));
        assert_eq!(s.running_scans(), 1);
    }

    #[test]
    fn test_advance_unknown_scan_is_a_noop() {
        let mut s = session();
        let before = s.lines().len();
        assert!(!s.advance_scan(42));
        assert_eq!(s.lines().len(), before);
    }

    #[test]
    fn test_history_recall_through_session() {
        let mut s = session();
        s.submit("a");
        s.submit("b");
        s.submit("c");
        assert_eq!(s.recall_previous().as_deref(), Some("c"));
        assert_eq!(s.recall_previous().as_deref(), Some("b"));
        assert_eq!(s.recall_next().as_deref(), Some("c"));
        assert_eq!(s.recall_next(), None);
    }
}
