//! Replayable input source
//!
//! Feeds pre-recorded frames of events to the editor. Used by headless
//! sessions and tests; a script is a RON list of frames, each a list of
//! [`InputEvent`]s.

use super::{InputEvent, InputSource};
use ron::error::SpannedError;
use std::collections::VecDeque;

/// Input source that replays a fixed list of frames
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
    quit_when_exhausted: bool,
}

impl ScriptedInput {
    /// Create a source from frames of events
    pub fn new(frames: Vec<Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into(),
            quit_when_exhausted: false,
        }
    }

    /// Parse a RON script: `[[KeyDown(Left)], [], [MouseDown(button: Left, x: 10.0, y: 20.0)]]`
    ///
    /// # Errors
    /// The RON error, with its position, when the script is malformed.
    pub fn from_ron_str(text: &str) -> Result<Self, SpannedError> {
        let frames: Vec<Vec<InputEvent>> = ron::from_str(text)?;
        Ok(Self::new(frames))
    }

    /// Emit a single `Quit` once every scripted frame has been replayed
    #[must_use]
    pub fn quit_when_exhausted(mut self) -> Self {
        self.quit_when_exhausted = true;
        self
    }

    /// Append a frame to the end of the script
    pub fn push_frame(&mut self, events: Vec<InputEvent>) {
        self.frames.push_back(events);
    }

    /// Frames not yet replayed
    pub fn remaining_frames(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        match self.frames.pop_front() {
            Some(events) => events,
            None if self.quit_when_exhausted => {
                self.quit_when_exhausted = false;
                vec![InputEvent::Quit]
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, MouseButton};

    #[test]
    fn test_replays_frames_in_order() {
        let mut input = ScriptedInput::new(vec![
            vec![InputEvent::KeyDown(KeyCode::Left)],
            vec![],
        ]);
        assert_eq!(input.poll_events(), vec![InputEvent::KeyDown(KeyCode::Left)]);
        assert!(input.poll_events().is_empty());
        assert!(input.poll_events().is_empty());
    }

    #[test]
    fn test_quit_after_script() {
        let mut input = ScriptedInput::new(vec![vec![]]).quit_when_exhausted();
        assert!(input.poll_events().is_empty());
        assert_eq!(input.poll_events(), vec![InputEvent::Quit]);
        assert!(input.poll_events().is_empty());
    }

    #[test]
    fn test_parse_ron_script() {
        let input = ScriptedInput::from_ron_str(
            "[[KeyDown(PageUp), MouseDown(button: Right, x: 640.0, y: 360.0)], [Quit]]",
        )
        .unwrap();
        assert_eq!(input.remaining_frames(), 2);

        let mut input = input;
        let first = input.poll_events();
        assert_eq!(
            first[1],
            InputEvent::MouseDown { button: MouseButton::Right, x: 640.0, y: 360.0 }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = ScriptedInput::from_ron_str("[[KeyDown(Left)],\n [Jump]]").unwrap_err();
        assert_eq!(err.position.line, 2);
    }
}
