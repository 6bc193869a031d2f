//! End-to-end editor sessions
//!
//! These drive a whole [`Editor`](crate::Editor) through scripted input and
//! check the observable results: scene contents, files on disk, and the
//! state of physics and renderer afterwards.
