use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use tracing::{debug, warn};

/// How long the loop waits for input before checking the countdown again
pub const IDLE_WAKEUP: Duration = Duration::from_millis(100);

/// What the player asked for, already stripped of terminal details
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// left click at a terminal position
    Click { x: u16, y: u16 },
    /// start/stop button via keyboard
    Toggle,
    Replay,
    Quit,
    Resize,
    /// nothing happened within the wakeup interval
    Idle,
}

/// Maps a raw terminal event to a game event. Key releases, mouse moves,
/// drags and other buttons are dropped.
pub fn translate(ev: CtEvent) -> Option<GameEvent> {
    match ev {
        CtEvent::Key(key) => translate_key(key),
        CtEvent::Mouse(mouse) => translate_mouse(mouse),
        CtEvent::Resize(_, _) => Some(GameEvent::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<GameEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(GameEvent::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(GameEvent::Quit)
        }
        KeyCode::Char(' ') | KeyCode::Enter => Some(GameEvent::Toggle),
        KeyCode::Char('r') => Some(GameEvent::Replay),
        _ => None,
    }
}

fn translate_mouse(mouse: MouseEvent) -> Option<GameEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(GameEvent::Click {
            x: mouse.column,
            y: mouse.row,
        }),
        _ => None,
    }
}

/// Hands the event loop one [`GameEvent`] at a time, or [`GameEvent::Idle`]
/// when nothing arrives within the wakeup interval.
pub struct EventPump {
    rx: Receiver<GameEvent>,
    wakeup: Duration,
}

impl EventPump {
    /// Pump fed by whoever holds the sending half; headless runs use this
    pub fn new(rx: Receiver<GameEvent>, wakeup: Duration) -> Self {
        Self { rx, wakeup }
    }

    /// Pump fed by a background thread reading the terminal
    pub fn crossterm(wakeup: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                Ok(ev) => ev,
                Err(err) => {
                    warn!(%err, "terminal input closed");
                    break;
                }
            };
            let Some(ev) = translate(ev) else {
                continue;
            };
            if tx.send(ev).is_err() {
                debug!("event loop gone, input reader exiting");
                break;
            }
        });

        Self::new(rx, wakeup)
    }

    pub fn next(&self) -> GameEvent {
        match self.rx.recv_timeout(self.wakeup) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                GameEvent::Idle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> CtEvent {
        CtEvent::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn press(code: KeyCode) -> CtEvent {
        key(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn mouse(kind: MouseEventKind) -> CtEvent {
        CtEvent::Mouse(MouseEvent {
            kind,
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_translate_keys() {
        assert_eq!(translate(press(KeyCode::Esc)), Some(GameEvent::Quit));
        assert_eq!(translate(press(KeyCode::Char('q'))), Some(GameEvent::Quit));
        assert_eq!(
            translate(key(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyEventKind::Press
            )),
            Some(GameEvent::Quit)
        );
        assert_eq!(translate(press(KeyCode::Char(' '))), Some(GameEvent::Toggle));
        assert_eq!(translate(press(KeyCode::Enter)), Some(GameEvent::Toggle));
        assert_eq!(translate(press(KeyCode::Char('r'))), Some(GameEvent::Replay));
        assert_eq!(translate(press(KeyCode::Char('c'))), None);
        assert_eq!(translate(press(KeyCode::Tab)), None);
    }

    #[test]
    fn test_key_release_is_dropped() {
        let release = key(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(translate(release), None);
    }

    #[test]
    fn test_only_left_button_down_clicks() {
        assert_eq!(
            translate(mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(GameEvent::Click { x: 7, y: 3 })
        );
        assert_eq!(translate(mouse(MouseEventKind::Down(MouseButton::Right))), None);
        assert_eq!(translate(mouse(MouseEventKind::Up(MouseButton::Left))), None);
        assert_eq!(translate(mouse(MouseEventKind::Drag(MouseButton::Left))), None);
        assert_eq!(translate(mouse(MouseEventKind::Moved)), None);
    }

    #[test]
    fn test_resize_and_focus() {
        assert_eq!(translate(CtEvent::Resize(80, 24)), Some(GameEvent::Resize));
        assert_eq!(translate(CtEvent::FocusGained), None);
    }

    #[test]
    fn test_pump_is_idle_without_input() {
        let (_tx, rx) = mpsc::channel();
        let pump = EventPump::new(rx, Duration::from_millis(1));
        assert_eq!(pump.next(), GameEvent::Idle);
    }

    #[test]
    fn test_pump_is_idle_once_sender_is_gone() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Toggle).unwrap();
        drop(tx);
        let pump = EventPump::new(rx, Duration::from_millis(1));

        assert_eq!(pump.next(), GameEvent::Toggle);
        assert_eq!(pump.next(), GameEvent::Idle);
    }

    #[test]
    fn test_pump_keeps_order() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize).unwrap();
        tx.send(GameEvent::Click { x: 3, y: 4 }).unwrap();
        let pump = EventPump::new(rx, Duration::from_millis(10));

        assert_eq!(pump.next(), GameEvent::Resize);
        assert_eq!(pump.next(), GameEvent::Click { x: 3, y: 4 });
    }
}
