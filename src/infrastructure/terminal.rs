//! Hidden terminal input for passwords and one-time codes.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::debug;

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Prompts on stderr and reads one line without echoing it.
///
/// Returns `Ok(None)` when the user cancels with Esc or Ctrl+C. When stdin is
/// not a terminal the line is read as-is, so piped input keeps working.
///
/// # Errors
/// Returns error if the terminal cannot be switched to raw mode or reading fails.
pub fn read_secret(label: &str) -> io::Result<Option<String>> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}: ")?;
    stderr.flush()?;

    if !io::stdin().is_terminal() {
        debug!("stdin is not a terminal, reading secret from pipe");
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        return Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()));
    }

    let secret = {
        let _raw = RawModeGuard::enable()?;
        collect_secret(std::iter::from_fn(|| Some(event::read())))
    };
    writeln!(stderr)?;
    secret
}

/// Builds the secret from terminal events until Enter.
///
/// Only key presses count. Esc, Ctrl+C and running out of events cancel.
fn collect_secret<I>(events: I) -> io::Result<Option<String>>
where
    I: IntoIterator<Item = io::Result<Event>>,
{
    let mut secret = String::new();

    for event in events {
        match event? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Enter => return Ok(Some(secret)),
                KeyCode::Esc => return Ok(None),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(None);
                }
                KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => {}
                KeyCode::Char(c) => secret.push(c),
                KeyCode::Backspace => {
                    secret.pop();
                }
                _ => {}
            },
            Event::Paste(text) => secret.push_str(text.trim_end_matches(['\r', '\n'])),
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn typed(text: &str) -> Vec<io::Result<Event>> {
        text.chars().map(|c| key(KeyCode::Char(c))).collect()
    }

    #[test]
    fn test_enter_finishes_secret() {
        let mut events = typed("hunter2");
        events.push(key(KeyCode::Enter));

        assert_eq!(collect_secret(events).unwrap(), Some("hunter2".to_string()));
    }

    #[test]
    fn test_backspace_removes_last_char() {
        let mut events = typed("1234");
        events.push(key(KeyCode::Backspace));
        events.push(key(KeyCode::Backspace));
        events.extend(typed("99"));
        events.push(key(KeyCode::Enter));

        assert_eq!(collect_secret(events).unwrap(), Some("1299".to_string()));
    }

    #[test]
    fn test_backspace_on_empty_is_ignored() {
        let events = vec![key(KeyCode::Backspace), key(KeyCode::Char('a')), key(KeyCode::Enter)];

        assert_eq!(collect_secret(events).unwrap(), Some("a".to_string()));
    }

    #[test]
    fn test_escape_and_ctrl_c_cancel() {
        let mut events = typed("secret");
        events.push(key(KeyCode::Esc));
        assert_eq!(collect_secret(events).unwrap(), None);

        let mut events = typed("secret");
        events.push(Ok(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        ))));
        events.push(key(KeyCode::Enter));
        assert_eq!(collect_secret(events).unwrap(), None);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        let events = vec![
            key(KeyCode::Char('a')),
            Ok(Event::Key(release)),
            Ok(Event::FocusLost),
            key(KeyCode::Enter),
        ];

        assert_eq!(collect_secret(events).unwrap(), Some("a".to_string()));
    }

    #[test]
    fn test_paste_is_appended() {
        let events = vec![
            Ok(Event::Paste("pass word\n".to_string())),
            key(KeyCode::Char('!')),
            key(KeyCode::Enter),
        ];

        assert_eq!(collect_secret(events).unwrap(), Some("pass word!".to_string()));
    }

    #[test]
    fn test_end_of_events_cancels() {
        assert_eq!(collect_secret(typed("half")).unwrap(), None);
    }

    #[test]
    fn test_read_error_propagates() {
        let events = vec![
            key(KeyCode::Char('a')),
            Err(io::Error::new(io::ErrorKind::Interrupted, "gone")),
        ];

        assert!(collect_secret(events).is_err());
    }
}
