//! The message-rewriting engine: initialization sequencing and per-track
//! program/bank remapping over `midly` event streams.
//!
//! Bank selection in the output is owned entirely by this engine. Source
//! bank select controllers are stripped, source program changes are replaced
//! by full re-tonement sequences, and a pending-time accumulator folds the
//! delta-time of every dropped event into the next emitted one so no musical
//! event shifts.

use midly::num::{u28, u4, u7};
use midly::{Format, MetaMessage, MidiMessage, Smf, Track, TrackEvent, TrackEventKind};

use crate::channels::ChannelStates;
use crate::dtype::SnError;
use crate::sysex::SysexBank;
use crate::tones::{self, ToneSelection, DRUM_CHANNEL};

const CC_BANK_SELECT_MSB: u8 = 0;
const CC_BANK_SELECT_LSB: u8 = 32;
const CC_RESET_ALL_CONTROLLERS: u8 = 121;
const CC_ALL_NOTES_OFF: u8 = 123;

/// Delta ticks on the zero-velocity placeholder notes that give the device
/// time to apply a bank type change before further messages arrive.
const SYNC_DELAY_TICKS: u32 = 10;

fn delta_ticks(ticks: u32) -> u28 {
    u28::try_from(ticks).unwrap_or(u28::max_value())
}

fn controller<'a>(delta: u32, channel: u8, controller: u8, value: u8) -> TrackEvent<'a> {
    TrackEvent {
        delta: delta_ticks(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(channel),
            message: MidiMessage::Controller {
                controller: u7::new(controller),
                value: u7::new(value),
            },
        },
    }
}

fn program_change<'a>(delta: u32, channel: u8, program: u8) -> TrackEvent<'a> {
    TrackEvent {
        delta: delta_ticks(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(channel),
            message: MidiMessage::ProgramChange {
                program: u7::new(program),
            },
        },
    }
}

/// Zero-velocity note used as a timing carrier.
fn sync_placeholder<'a>(delta: u32) -> TrackEvent<'a> {
    TrackEvent {
        delta: delta_ticks(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOn {
                key: u7::new(0),
                vel: u7::new(0),
            },
        },
    }
}

fn sysex_event(delta: u32, data: &[u8]) -> TrackEvent<'_> {
    TrackEvent {
        delta: delta_ticks(delta),
        kind: TrackEventKind::SysEx(data),
    }
}

/// Emit the fixed 8-step re-tonement sequence selecting `selection` on
/// `channel`: controller resets, the bank type SysEx with a settling
/// placeholder, bank select MSB/LSB, program change, trailing placeholder.
pub fn select_bank_and_program<'a>(
    out: &mut Track<'a>,
    sysex: &'a SysexBank,
    channel: u8,
    selection: ToneSelection,
) -> Result<(), SnError> {
    out.push(controller(0, channel, CC_RESET_ALL_CONTROLLERS, 0));
    out.push(controller(0, channel, CC_ALL_NOTES_OFF, 0));
    out.push(sysex_event(0, sysex.bank_type_message(channel, selection.msb)?));
    out.push(sync_placeholder(SYNC_DELAY_TICKS));
    out.push(controller(0, channel, CC_BANK_SELECT_MSB, selection.msb));
    out.push(controller(0, channel, CC_BANK_SELECT_LSB, selection.lsb));
    out.push(program_change(0, channel, selection.program));
    out.push(sync_placeholder(SYNC_DELAY_TICKS));
    log::debug!(
        "channel {}: selected {} (MSB={}, LSB={}, program={})",
        channel,
        selection.label(),
        selection.msb,
        selection.lsb,
        selection.program
    );
    Ok(())
}

/// Reset a channel to a known controller state without selecting a tone.
pub fn initialize_channel(out: &mut Track<'_>, channel: u8) {
    out.push(controller(0, channel, CC_RESET_ALL_CONTROLLERS, 0));
    out.push(controller(0, channel, CC_ALL_NOTES_OFF, 0));
    if channel != DRUM_CHANNEL {
        out.push(sync_placeholder(SYNC_DELAY_TICKS));
    }
}

/// Build the one-time initialization track. The drum channel is set up
/// first, forced to the PCM/GM2 bank type and the GM2 Standard Kit so every
/// file starts from a deterministic drum state, then the remaining channels
/// get the plain reset sequence in ascending order.
pub fn build_init_track<'a>(
    sysex: &'a SysexBank,
    states: &mut ChannelStates,
) -> Result<Track<'a>, SnError> {
    let mut track = Track::new();

    log::debug!("initializing drum channel {DRUM_CHANNEL}");
    initialize_channel(&mut track, DRUM_CHANNEL);

    let drum = tones::default_drum_selection();
    track.push(sysex_event(0, sysex.bank_type_message(DRUM_CHANNEL, drum.msb)?));
    track.push(sync_placeholder(SYNC_DELAY_TICKS));
    select_bank_and_program(&mut track, sysex, DRUM_CHANNEL, drum)?;
    states.set(DRUM_CHANNEL, drum.triple());

    for channel in 0..16 {
        if channel != DRUM_CHANNEL {
            initialize_channel(&mut track, channel);
        }
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    Ok(track)
}

fn resolve_for_channel(channel: u8, program: u8) -> Result<ToneSelection, SnError> {
    if channel == DRUM_CHANNEL {
        Ok(tones::resolve_drum(program))
    } else {
        tones::resolve_melodic(program)
    }
}

/// Scan ahead for the track's channel and intended initial program.
///
/// The first channel-bearing event fixes the channel, even when it occurs
/// late in the track; the first program change on that channel fixes the
/// program. Nothing is emitted and no time is consumed here.
fn scan_initial_program(events: &[TrackEvent<'_>]) -> (Option<u8>, Option<u8>) {
    let mut track_channel: Option<u8> = None;
    for event in events {
        if let TrackEventKind::Midi { channel, message } = event.kind {
            let channel = channel.as_int();
            if *track_channel.get_or_insert(channel) == channel {
                if let MidiMessage::ProgramChange { program } = message {
                    return (track_channel, Some(program.as_int()));
                }
            }
        }
    }
    (track_channel, None)
}

/// Rewrite one track: emit the initial re-tonement if the scan found one,
/// then replay events, intercepting program changes and stripping bank
/// select controllers while folding their delta-time forward.
pub fn rewrite_track<'a>(
    events: &[TrackEvent<'a>],
    sysex: &'a SysexBank,
    states: &mut ChannelStates,
) -> Result<Track<'a>, SnError> {
    let mut out = Track::with_capacity(events.len() + 16);

    let (track_channel, initial_program) = scan_initial_program(events);
    if let (Some(channel), Some(program)) = (track_channel, initial_program) {
        let selection = resolve_for_channel(channel, program)?;
        if states.needs_change(channel, selection.triple()) {
            log::info!(
                "channel {}: initial program {} -> {} (program {})",
                channel,
                program,
                selection.label(),
                selection.program
            );
            select_bank_and_program(&mut out, sysex, channel, selection)?;
            states.set(channel, selection.triple());
        }
    }

    // Delta-time of dropped events, folded into the next emitted event.
    let mut pending: u32 = 0;
    for event in events {
        let delta = event.delta.as_int();
        if let TrackEventKind::Midi { channel, message } = event.kind {
            let channel = channel.as_int();
            match message {
                MidiMessage::Controller { controller, .. }
                    if matches!(
                        controller.as_int(),
                        CC_BANK_SELECT_MSB | CC_BANK_SELECT_LSB
                    ) =>
                {
                    // Bank selection is owned by this engine.
                    pending += delta;
                    continue;
                }
                MidiMessage::ProgramChange { program } => {
                    pending += delta;
                    let selection = resolve_for_channel(channel, program.as_int())?;
                    if states.needs_change(channel, selection.triple()) {
                        if pending > 0 {
                            out.push(sync_placeholder(pending));
                            pending = 0;
                        }
                        log::info!(
                            "channel {}: program {} -> {} (program {})",
                            channel,
                            program,
                            selection.label(),
                            selection.program
                        );
                        select_bank_and_program(&mut out, sysex, channel, selection)?;
                        states.set(channel, selection.triple());
                    } else {
                        log::debug!(
                            "channel {}: program {} already selected, skipping",
                            channel,
                            program
                        );
                    }
                    continue;
                }
                _ => {}
            }
        }
        let mut event = *event;
        event.delta = delta_ticks(pending + delta);
        pending = 0;
        out.push(event);
    }
    Ok(out)
}

/// Convert a whole file: one initialization track followed by every source
/// track rewritten in order. Channel state is scoped to this call.
pub fn convert_smf<'a>(smf: &Smf<'a>, sysex: &'a SysexBank) -> Result<Smf<'a>, SnError> {
    let mut states = ChannelStates::new();
    let mut output = Smf::new(smf.header);

    output.tracks.push(build_init_track(sysex, &mut states)?);
    for (i, track) in smf.tracks.iter().enumerate() {
        log::debug!("rewriting track {}/{}", i + 1, smf.tracks.len());
        output
            .tracks
            .push(rewrite_track(track, sysex, &mut states)?);
    }

    // The injected initialization track turns a format 0 file into format 1.
    if smf.header.format == Format::SingleTrack && output.tracks.len() > 1 {
        output.header.format = Format::Parallel;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_on<'a>(delta: u32, channel: u8, key: u8, vel: u8) -> TrackEvent<'a> {
        TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(channel),
                message: MidiMessage::NoteOn {
                    key: u7::new(key),
                    vel: u7::new(vel),
                },
            },
        }
    }

    fn tempo<'a>(delta: u32) -> TrackEvent<'a> {
        TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(midly::num::u24::new(500_000))),
        }
    }

    fn end_of_track<'a>() -> TrackEvent<'a> {
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        }
    }

    fn count_controller(track: &Track<'_>, channel: u8, number: u8) -> usize {
        track
            .iter()
            .filter(|event| {
                matches!(event.kind, TrackEventKind::Midi { channel: c, message: MidiMessage::Controller { controller, .. } }
                    if c.as_int() == channel && controller.as_int() == number)
            })
            .count()
    }

    fn count_program_changes(track: &Track<'_>, channel: u8) -> usize {
        track
            .iter()
            .filter(|event| {
                matches!(event.kind, TrackEventKind::Midi { channel: c, message: MidiMessage::ProgramChange { .. } }
                    if c.as_int() == channel)
            })
            .count()
    }

    fn delta_sum(track: &Track<'_>) -> u64 {
        track.iter().map(|event| event.delta.as_int() as u64).sum()
    }

    #[test]
    fn init_track_sets_up_drums_first() {
        let sysex = SysexBank::new();
        let mut states = ChannelStates::new();
        let track = build_init_track(&sysex, &mut states).unwrap();

        // Drum channel reset comes before everything else.
        assert_eq!(track[0], controller(0, DRUM_CHANNEL, 121, 0));
        assert_eq!(track[1], controller(0, DRUM_CHANNEL, 123, 0));

        // One re-tonement total, selecting the GM2 Standard Kit.
        assert_eq!(count_program_changes(&track, DRUM_CHANNEL), 1);
        assert_eq!(count_controller(&track, DRUM_CHANNEL, 0), 1);
        assert!(track.contains(&controller(0, DRUM_CHANNEL, 0, 120)));
        assert!(track.contains(&controller(0, DRUM_CHANNEL, 32, 0)));
        assert!(track.contains(&program_change(0, DRUM_CHANNEL, 0)));
        assert_eq!(states.get(DRUM_CHANNEL), Some((120, 0, 0)));

        // Every channel got a controller reset; drums twice (reset + select).
        for channel in 0..16 {
            let expected = if channel == DRUM_CHANNEL { 2 } else { 1 };
            assert_eq!(count_controller(&track, channel, 121), expected);
        }
        assert_eq!(track.last(), Some(&end_of_track()));
    }

    #[test]
    fn initialize_channel_emits_no_tone_selection() {
        let mut track = Track::new();
        for channel in 0..16 {
            initialize_channel(&mut track, channel);
        }
        for channel in 0..16 {
            assert_eq!(count_program_changes(&track, channel), 0);
            assert_eq!(count_controller(&track, channel, 0), 0);
            assert_eq!(count_controller(&track, channel, 32), 0);
        }
    }

    #[test]
    fn retonement_sequence_is_deterministic() {
        let sysex = SysexBank::new();
        let selection = tones::resolve_melodic(0).unwrap();
        let mut first = Track::new();
        let mut second = Track::new();
        select_bank_and_program(&mut first, &sysex, 3, selection).unwrap();
        select_bank_and_program(&mut second, &sysex, 3, selection).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn melodic_program_change_is_replaced_by_retonement() {
        let sysex = SysexBank::new();
        let mut states = ChannelStates::new();
        let events = vec![
            program_change(0, 0, 0), // Acoustic Grand Piano
            note_on(100, 0, 60, 90),
            end_of_track(),
        ];
        let track = rewrite_track(&events, &sysex, &mut states).unwrap();

        // The scan emits the re-tonement up front; the replayed program
        // change then matches tracked state and is dropped.
        assert_eq!(count_controller(&track, 0, 0), 1);
        assert!(track.contains(&controller(0, 0, 0, 89)));
        assert!(track.contains(&controller(0, 0, 32, 64)));
        assert!(track.contains(&program_change(0, 0, 1)));
        assert_eq!(count_program_changes(&track, 0), 1);
        assert_eq!(states.get(0), Some((89, 64, 1)));

        // The bank type SysEx selects SN-A (type 1) for part 1.
        let sn_a = sysex.bank_type_message(0, 89).unwrap();
        assert!(track
            .iter()
            .any(|event| event.kind == TrackEventKind::SysEx(sn_a)));
    }

    #[test]
    fn repeated_program_changes_dedupe() {
        let sysex = SysexBank::new();
        let mut states = ChannelStates::new();
        let events = vec![
            program_change(0, 2, 40), // Violin
            note_on(50, 2, 64, 80),
            program_change(10, 2, 40), // same program again
            note_on(30, 2, 65, 80),
            end_of_track(),
        ];
        let track = rewrite_track(&events, &sysex, &mut states).unwrap();
        assert_eq!(count_controller(&track, 2, 0), 1);
        assert_eq!(count_program_changes(&track, 2), 1);
    }

    #[test]
    fn bank_selects_are_stripped_and_their_time_folds_forward() {
        let sysex = SysexBank::new();
        let mut states = ChannelStates::new();
        let events = vec![
            controller(5, 4, 0, 121),  // source bank select MSB
            controller(5, 4, 32, 0),   // source bank select LSB
            note_on(10, 4, 60, 100),
            end_of_track(),
        ];
        let track = rewrite_track(&events, &sysex, &mut states).unwrap();

        assert_eq!(count_controller(&track, 4, 0), 0);
        assert_eq!(count_controller(&track, 4, 32), 0);
        // 5 + 5 ticks of dropped events land on the note.
        assert_eq!(track[0], note_on(20, 4, 60, 100));
    }

    #[test]
    fn rewrite_preserves_input_attributable_time() {
        let sysex = SysexBank::new();
        let mut states = ChannelStates::new();
        let events = vec![
            tempo(0),
            program_change(7, 1, 4), // GM2 fallback
            note_on(120, 1, 60, 90),
            note_on(240, 1, 60, 0),
            program_change(33, 1, 40), // mid-track change to Violin
            note_on(15, 1, 64, 90),
            end_of_track(),
        ];
        let input_sum: u64 = events.iter().map(|e| e.delta.as_int() as u64).sum();
        let track = rewrite_track(&events, &sysex, &mut states).unwrap();

        // Each re-tonement sequence contributes exactly two settling
        // placeholders; everything else is input-attributable time.
        let retonements = count_controller(&track, 1, 0) as u64;
        assert_eq!(retonements, 2);
        assert_eq!(
            delta_sum(&track),
            input_sum + retonements * 2 * SYNC_DELAY_TICKS as u64
        );
    }

    #[test]
    fn drum_changes_mapping_to_default_kit_are_noops() {
        let sysex = SysexBank::new();
        let mut states = ChannelStates::new();
        states.set(DRUM_CHANNEL, (120, 0, 0)); // initialization default

        // Kits 2 and 3 both collapse to the GM2 Standard Kit.
        let events = vec![
            program_change(0, DRUM_CHANNEL, 2),
            note_on(10, DRUM_CHANNEL, 36, 100),
            program_change(0, DRUM_CHANNEL, 3),
            note_on(10, DRUM_CHANNEL, 38, 100),
            end_of_track(),
        ];
        let track = rewrite_track(&events, &sysex, &mut states).unwrap();
        assert_eq!(count_controller(&track, DRUM_CHANNEL, 0), 0);
        assert_eq!(count_program_changes(&track, DRUM_CHANNEL), 0);
        assert_eq!(states.get(DRUM_CHANNEL), Some((120, 0, 0)));
    }

    #[test]
    fn native_drum_kit_switches_from_default() {
        let sysex = SysexBank::new();
        let mut states = ChannelStates::new();
        states.set(DRUM_CHANNEL, (120, 0, 0));

        let events = vec![
            program_change(0, DRUM_CHANNEL, 8), // Room Kit, native
            note_on(10, DRUM_CHANNEL, 36, 100),
            end_of_track(),
        ];
        let track = rewrite_track(&events, &sysex, &mut states).unwrap();
        assert!(track.contains(&controller(0, DRUM_CHANNEL, 0, 88)));
        assert!(track.contains(&controller(0, DRUM_CHANNEL, 32, 64)));
        assert!(track.contains(&program_change(0, DRUM_CHANNEL, 8)));
        assert_eq!(states.get(DRUM_CHANNEL), Some((88, 64, 8)));
    }

    #[test]
    fn scan_picks_up_late_channel_and_program() {
        // The first event carries no channel; the scan keeps going until a
        // channel-bearing event appears, then waits for a program change on
        // that channel. Preserved source behavior, see the design notes.
        let sysex = SysexBank::new();
        let mut states = ChannelStates::new();
        let events = vec![
            tempo(0),
            note_on(30, 5, 60, 90),
            program_change(60, 5, 56), // Trumpet, late in the track
            note_on(10, 5, 62, 90),
            end_of_track(),
        ];
        let track = rewrite_track(&events, &sysex, &mut states).unwrap();

        // The re-tonement for channel 5 lands at the head of the track,
        // before the replayed meta event.
        assert_eq!(track[0], controller(0, 5, 121, 0));
        assert!(track.contains(&program_change(0, 5, 1)));
        assert_eq!(count_program_changes(&track, 5), 1);
    }

    #[test]
    fn program_change_on_other_channel_does_not_bind_scan() {
        let events = vec![
            note_on(0, 5, 60, 90),
            program_change(0, 6, 40),
            program_change(0, 5, 56),
            end_of_track(),
        ];
        let (channel, program) = scan_initial_program(&events);
        assert_eq!(channel, Some(5));
        assert_eq!(program, Some(56));
    }

    #[test]
    fn format_zero_input_is_promoted_to_parallel() {
        let sysex = SysexBank::new();
        let smf = Smf {
            header: midly::Header::new(
                Format::SingleTrack,
                midly::Timing::Metrical(midly::num::u15::new(480)),
            ),
            tracks: vec![vec![
                program_change(0, 0, 0),
                note_on(10, 0, 60, 90),
                end_of_track(),
            ]],
        };
        let output = convert_smf(&smf, &sysex).unwrap();
        assert_eq!(output.tracks.len(), 2);
        assert_eq!(output.header.format, Format::Parallel);
        assert_eq!(output.header.timing, smf.header.timing);
    }
}
