//! gm1tosn: rewrite General MIDI (GM1) files to target the Roland
//! Integra-7's SuperNATURAL tone banks, with GM2 fallbacks.

pub mod channels;
pub mod dtype;
pub mod fileutils;
pub mod rewrite;
pub mod sysex;
pub mod tones;
