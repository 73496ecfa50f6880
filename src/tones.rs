//! Static GM1 -> Integra-7 SuperNATURAL / GM2 tone mapping tables.
//!
//! Every GM1 program 0-127 resolves to either a SuperNATURAL tone (selected
//! through its category's bank select values) or a GM2 fallback. The tables
//! are validated once at startup by [`validate_tables`] so a broken entry
//! fails the process instead of silently mis-selecting a tone mid-file.

use phf::phf_map;

use crate::dtype::SnError;

// Bank constants
pub const GM2_MSB: u8 = 121; // GM2 Bank MSB for melodic instruments
pub const GM2_DRUM_MSB: u8 = 120; // GM2 Bank MSB for drums
pub const GM2_LSB: u8 = 0; // GM2 Bank LSB
pub const SN_DRUM_MSB: u8 = 88; // MSB for SuperNATURAL Drum Kits
pub const SN_DRUM_LSB: u8 = 64; // LSB for SuperNATURAL Drum Kits

/// MIDI channel 10 (0-based).
pub const DRUM_CHANNEL: u8 = 9;

/// GM1 program -> (target program, SuperNATURAL tone id or "GM2").
///
/// GM2 entries keep a program column for reference but the resolver always
/// reuses the source program number for GM2 fallbacks.
static SUPERNATURAL_MAP: phf::Map<u8, (u8, &'static str)> = phf_map! {
    // Piano (0-7)
    0u8 => (1, "SN-A.Piano"),      // Acoustic Grand Piano -> Concert Piano (Program 1)
    1u8 => (2, "SN-A.Piano"),      // Bright Acoustic Piano -> Grand Piano 1 (Program 2)
    2u8 => (2, "GM2"),             // Electric Grand Piano (no good SN equivalent)
    3u8 => (4, "SN-A.Piano"),      // Honky-tonk Piano -> Grand Piano 3 (Program 4)
    4u8 => (4, "GM2"),             // Electric Piano 1 (no good SN equivalent)
    5u8 => (5, "GM2"),             // Electric Piano 2 (no good SN equivalent)
    6u8 => (6, "GM2"),             // Harpsichord (no good SN equivalent)
    7u8 => (7, "GM2"),             // Clavi (no good SN equivalent)

    // Chromatic Percussion (8-15)
    8u8 => (8, "GM2"),             // Celesta
    9u8 => (9, "GM2"),             // Glockenspiel
    10u8 => (10, "GM2"),           // Music Box
    11u8 => (11, "GM2"),           // Vibraphone
    12u8 => (12, "GM2"),           // Marimba
    13u8 => (13, "GM2"),           // Xylophone
    14u8 => (14, "GM2"),           // Tubular Bells
    15u8 => (15, "GM2"),           // Dulcimer

    // Organ (16-23)
    16u8 => (16, "GM2"),           // Drawbar Organ
    17u8 => (17, "GM2"),           // Percussive Organ
    18u8 => (18, "GM2"),           // Rock Organ
    19u8 => (19, "GM2"),           // Church Organ
    20u8 => (20, "GM2"),           // Reed Organ
    21u8 => (21, "GM2"),           // Accordion
    22u8 => (22, "GM2"),           // Harmonica
    23u8 => (23, "GM2"),           // Tango Accordion

    // Guitar (24-31)
    24u8 => (1, "SN-NylonGtr"),    // Nylon String Guitar -> Classical Guitar (Program 1)
    25u8 => (2, "SN-SteelGtr"),    // Steel String Guitar -> Folk Guitar (Program 2)
    26u8 => (26, "GM2"),           // Electric Jazz Guitar
    27u8 => (27, "GM2"),           // Electric Clean Guitar
    28u8 => (28, "GM2"),           // Electric Muted Guitar
    29u8 => (29, "GM2"),           // Overdriven Guitar
    30u8 => (30, "GM2"),           // Distortion Guitar
    31u8 => (31, "GM2"),           // Guitar Harmonics

    // Bass (32-39)
    32u8 => (1, "SN-A.Bass"),      // Acoustic Bass -> Acoustic Bass (Program 1)
    33u8 => (33, "GM2"),           // Electric Finger Bass
    34u8 => (34, "GM2"),           // Electric Pick Bass
    35u8 => (35, "GM2"),           // Fretless Bass
    36u8 => (36, "GM2"),           // Slap Bass 1
    37u8 => (37, "GM2"),           // Slap Bass 2
    38u8 => (38, "GM2"),           // Synth Bass 1
    39u8 => (39, "GM2"),           // Synth Bass 2

    // Strings (40-47)
    40u8 => (1, "SN-Violin"),      // Violin (Program 1)
    41u8 => (2, "SN-Viola"),       // Viola (Program 2)
    42u8 => (3, "SN-Cello"),       // Cello (Program 3)
    43u8 => (4, "SN-Contrabass"),  // Contrabass (Program 4)
    44u8 => (44, "GM2"),           // Tremolo Strings
    45u8 => (45, "GM2"),           // Pizzicato Strings
    46u8 => (46, "GM2"),           // Orchestral Harp
    47u8 => (47, "GM2"),           // Timpani

    // Ensemble (48-55)
    48u8 => (48, "GM2"),           // String Ensemble 1
    49u8 => (49, "GM2"),           // String Ensemble 2
    50u8 => (50, "GM2"),           // Synth Strings 1
    51u8 => (51, "GM2"),           // Synth Strings 2
    52u8 => (52, "GM2"),           // Choir Aahs
    53u8 => (53, "GM2"),           // Voice Oohs
    54u8 => (54, "GM2"),           // Synth Voice
    55u8 => (55, "GM2"),           // Orchestra Hit

    // Brass (56-63)
    56u8 => (1, "SN-Trumpet"),     // Trumpet (Program 1)
    57u8 => (2, "SN-Trombone"),    // Trombone (Program 2)
    58u8 => (3, "SN-Tuba"),        // Tuba (Program 3)
    59u8 => (4, "SN-MutedTrumpet"), // Muted Trumpet (Program 4)
    60u8 => (5, "SN-FrenchHorn"),  // French Horn (Program 5)
    61u8 => (61, "GM2"),           // Brass Section
    62u8 => (62, "GM2"),           // Synth Brass 1
    63u8 => (63, "GM2"),           // Synth Brass 2

    // Reed (64-71)
    64u8 => (1, "SN-SopranoSax"),  // Soprano Sax (Program 1)
    65u8 => (2, "SN-AltoSax"),     // Alto Sax (Program 2)
    66u8 => (3, "SN-TenorSax"),    // Tenor Sax (Program 3)
    67u8 => (4, "SN-BaritoneSax"), // Baritone Sax (Program 4)
    68u8 => (1, "SN-Oboe"),        // Oboe (Program 1)
    69u8 => (2, "SN-EnglishHorn"), // English Horn (Program 2)
    70u8 => (3, "SN-Bassoon"),     // Bassoon (Program 3)
    71u8 => (4, "SN-Clarinet"),    // Clarinet (Program 4)

    // Pipe (72-79)
    72u8 => (1, "SN-Piccolo"),     // Piccolo (Program 1)
    73u8 => (2, "SN-Flute"),       // Flute (Program 2)
    74u8 => (74, "GM2"),           // Recorder
    75u8 => (75, "GM2"),           // Pan Flute
    76u8 => (76, "GM2"),           // Blown Bottle
    77u8 => (77, "GM2"),           // Shakuhachi
    78u8 => (78, "GM2"),           // Whistle
    79u8 => (79, "GM2"),           // Ocarina

    // Synth Lead (80-87)
    80u8 => (80, "GM2"),           // Square Lead
    81u8 => (81, "GM2"),           // Sawtooth Lead
    82u8 => (82, "GM2"),           // Calliope Lead
    83u8 => (83, "GM2"),           // Chiff Lead
    84u8 => (84, "GM2"),           // Charang Lead
    85u8 => (85, "GM2"),           // Voice Lead
    86u8 => (86, "GM2"),           // Fifths Lead
    87u8 => (87, "GM2"),           // Bass + Lead

    // Synth Pad (88-95)
    88u8 => (88, "GM2"),           // New Age Pad
    89u8 => (89, "GM2"),           // Warm Pad
    90u8 => (90, "GM2"),           // Polysynth Pad
    91u8 => (91, "GM2"),           // Choir Pad
    92u8 => (92, "GM2"),           // Bowed Pad
    93u8 => (93, "GM2"),           // Metallic Pad
    94u8 => (94, "GM2"),           // Halo Pad
    95u8 => (95, "GM2"),           // Sweep Pad

    // Synth Effects (96-103)
    96u8 => (96, "GM2"),           // Rain
    97u8 => (97, "GM2"),           // Soundtrack
    98u8 => (98, "GM2"),           // Crystal
    99u8 => (99, "GM2"),           // Atmosphere
    100u8 => (100, "GM2"),         // Brightness
    101u8 => (101, "GM2"),         // Goblins
    102u8 => (102, "GM2"),         // Echoes
    103u8 => (103, "GM2"),         // Sci-Fi

    // Ethnic (104-111)
    104u8 => (104, "GM2"),         // Sitar
    105u8 => (105, "GM2"),         // Banjo
    106u8 => (106, "GM2"),         // Shamisen
    107u8 => (107, "GM2"),         // Koto
    108u8 => (108, "GM2"),         // Kalimba
    109u8 => (109, "GM2"),         // Bagpipe
    110u8 => (110, "GM2"),         // Fiddle
    111u8 => (111, "GM2"),         // Shanai

    // Percussive (112-119)
    112u8 => (112, "GM2"),         // Tinkle Bell
    113u8 => (113, "GM2"),         // Agogo
    114u8 => (114, "GM2"),         // Steel Drums
    115u8 => (115, "GM2"),         // Woodblock
    116u8 => (116, "GM2"),         // Taiko Drum
    117u8 => (117, "GM2"),         // Melodic Tom
    118u8 => (118, "GM2"),         // Synth Drum
    119u8 => (119, "GM2"),         // Reverse Cymbal

    // Sound Effects (120-127)
    120u8 => (120, "GM2"),         // Guitar Fret Noise
    121u8 => (121, "GM2"),         // Breath Noise
    122u8 => (122, "GM2"),         // Seashore
    123u8 => (123, "GM2"),         // Bird Tweet
    124u8 => (124, "GM2"),         // Telephone Ring
    125u8 => (125, "GM2"),         // Helicopter
    126u8 => (126, "GM2"),         // Applause
    127u8 => (127, "GM2"),         // Gunshot
};

/// SuperNATURAL tone id -> bank category.
static TONE_CATEGORY: phf::Map<&'static str, &'static str> = phf_map! {
    // Piano and Keys
    "SN-A.Piano" => "PIANO",
    "SN-A.Piano2" => "PIANO",
    "SN-E.Grand" => "PIANO",
    "SN-Honky-tonk" => "PIANO",
    "SN-E.Piano" => "E.PIANO",
    "SN-E.Piano2" => "E.PIANO",
    "SN-Harpsichord" => "KEYBOARD",
    "SN-Clav" => "KEYBOARD",
    "SN-Celesta" => "KEYBOARD",
    "SN-Music Box" => "KEYBOARD",
    "SN-Vibraphone" => "KEYBOARD",
    "SN-Marimba" => "KEYBOARD",
    "SN-Xylophone" => "KEYBOARD",
    "SN-TubularBells" => "KEYBOARD",
    "SN-Dulcimer" => "KEYBOARD",

    // Organ
    "SN-DrawbarOrg" => "ORGAN",
    "SN-DrawbarOrg2" => "ORGAN",
    "SN-DrawbarOrg3" => "ORGAN",
    "SN-ChurchOrg1" => "ORGAN",
    "SN-ChurchOrg2" => "ORGAN",
    "SN-Accordion" => "ACCORDION",
    "SN-Harmonica" => "ACCORDION",
    "SN-Bandoneon" => "ACCORDION",

    // Guitar and Bass
    "SN-NylonGtr" => "GUITAR",
    "SN-SteelGtr" => "GUITAR",
    "SN-Jazz Gtr" => "GUITAR",
    "SN-Clean Gtr" => "GUITAR",
    "SN-MutedGtr" => "GUITAR",
    "SN-OverdriveGtr" => "GUITAR",
    "SN-DistGtr" => "GUITAR",
    "SN-Gt.Harmonics" => "GUITAR",
    "SN-A.Bass" => "BASS",
    "SN-FingeredBs" => "BASS",
    "SN-PickedBs" => "BASS",
    "SN-FretlessBs" => "BASS",
    "SN-SlapBass" => "BASS",
    "SN-SlapBass2" => "BASS",
    "SN-SynthBass" => "BASS",
    "SN-SynthBass2" => "BASS",

    // Strings and Orchestra
    "SN-Violin" => "STRINGS",
    "SN-Viola" => "STRINGS",
    "SN-Cello" => "STRINGS",
    "SN-Contrabass" => "STRINGS",
    "SN-Strings" => "STRINGS",
    "SN-Pizzicato" => "STRINGS",
    "SN-Harp" => "STRINGS",
    "SN-Timpani" => "STRINGS",
    "SN-Strings1" => "ORCHESTRA",
    "SN-Strings2" => "ORCHESTRA",
    "SN-SynthStrings" => "ORCHESTRA",
    "SN-SynthStrings2" => "ORCHESTRA",

    // Choir and Brass
    "SN-ChoirAahs" => "CHOIR",
    "SN-VoiceOohs" => "CHOIR",
    "SN-SynthVox" => "CHOIR",
    "SN-OrchestraHit" => "CHOIR",
    "SN-Trumpet" => "BRASS",
    "SN-Trombone" => "BRASS",
    "SN-Tuba" => "BRASS",
    "SN-MutedTrumpet" => "BRASS",
    "SN-FrenchHorn" => "BRASS",
    "SN-BrassSection" => "BRASS",
    "SN-SynthBrass" => "BRASS",
    "SN-SynthBrass2" => "BRASS",

    // Wind and Reed
    "SN-SopranoSax" => "WIND",
    "SN-AltoSax" => "WIND",
    "SN-TenorSax" => "WIND",
    "SN-BaritoneSax" => "WIND",
    "SN-Oboe" => "WIND",
    "SN-EnglishHorn" => "WIND",
    "SN-Bassoon" => "WIND",
    "SN-Clarinet" => "WIND",
    "SN-Piccolo" => "WIND",
    "SN-Flute" => "WIND",
    "SN-Recorder" => "WIND",
    "SN-PanFlute" => "WIND",
    "SN-Shakuhachi" => "WIND",
    "SN-Whistle" => "WIND",
    "SN-Ocarina" => "WIND",

    // Ethnic and Percussion
    "SN-Sitar" => "ETHNIC",
    "SN-Banjo" => "ETHNIC",
    "SN-Shamisen" => "ETHNIC",
    "SN-Koto" => "ETHNIC",
    "SN-Kalimba" => "ETHNIC",
    "SN-Bagpipe" => "ETHNIC",
    "SN-Agogo" => "PERCUSSION",
    "SN-SteelDrums" => "PERCUSSION",
    "SN-Woodblock" => "PERCUSSION",
    "SN-TaikoDrum" => "PERCUSSION",
    "SN-MelodicTom" => "PERCUSSION",
    "SN-SynthDrum" => "PERCUSSION",
    "SN-ReverseCymbal" => "PERCUSSION",

    // Sound Effects
    "SN-FretNoise" => "SFX",
    "SN-BreathNoise" => "SFX",
    "SN-Seashore" => "SFX",
    "SN-BirdTweet" => "SFX",
    "SN-Telephone" => "SFX",
    "SN-Helicopter" => "SFX",
    "SN-Applause" => "SFX",
    "SN-Gunshot" => "SFX",

    // Synth Lead and Pad
    "SN-SynthLead" => "SYNTH_LEAD",
    "SN-SynthPad" => "SYNTH_PAD",
    "SN-SynthFX" => "SYNTH_FX",
};

/// Category -> (Bank Select MSB, Bank Select LSB).
///
/// MSB 89 = SN-A (acoustic), 95 = SN-S (synth), 88 = SN-D (drums); LSB 64
/// selects the preset SuperNATURAL set in each bank.
static BANK_SELECT: phf::Map<&'static str, (u8, u8)> = phf_map! {
    // SN-A (Acoustic) Banks - MSB 89 (0x59)
    "PIANO" => (89, 64),
    "E.PIANO" => (89, 64),
    "KEYBOARD" => (89, 64),
    "ORGAN" => (89, 64),
    "ACCORDION" => (89, 64),
    "GUITAR" => (89, 64),
    "BASS" => (89, 64),
    "STRINGS" => (89, 64),
    "ORCHESTRA" => (89, 64),
    "CHOIR" => (89, 64),
    "BRASS" => (89, 64),
    "WIND" => (89, 64),
    "ETHNIC" => (89, 64),

    // SN-S (Synth) Banks - MSB 95 (0x5F)
    "SYNTH_LEAD" => (95, 64),
    "SYNTH_PAD" => (95, 64),
    "SYNTH_BRASS" => (95, 64),
    "SYNTH_STRINGS" => (95, 64),
    "SYNTH_BELL" => (95, 64),
    "SYNTH_FX" => (95, 64),

    // SN-D (Drums) Banks - MSB 88 (0x58)
    "DRUMS" => (88, 64),
    "PERCUSSION" => (88, 64),
    "SFX" => (88, 64),
};

/// Drum kit programs with a good SuperNATURAL drum kit mapping.
static SN_DRUM_KITS: phf::Map<u8, &'static str> = phf_map! {
    0u8 => "Standard Kit",
    8u8 => "Room Kit",
    16u8 => "Power Kit",
    24u8 => "Electronic Kit",
    25u8 => "TR-808 Kit",
    32u8 => "Jazz Kit",
    40u8 => "Brush Kit",
};

/// GM2 drum kit program fallbacks. Unlisted programs collapse to the
/// Standard Kit (0).
static GM2_DRUM_MAP: phf::Map<u8, u8> = phf_map! {
    0u8 => 0,    // Standard Kit
    1u8 => 1,    // Standard Kit 2
    8u8 => 8,    // Room Kit
    16u8 => 16,  // Power Kit
    24u8 => 24,  // Electronic Kit
    25u8 => 25,  // TR-808 Kit
    32u8 => 32,  // Jazz Kit
    40u8 => 40,  // Brush Kit
    // Variant kits mapped down to their base kit
    2u8 => 0,    // Standard Kit 3
    3u8 => 0,    // Standard Kit 4
    4u8 => 0,    // Standard Kit 5
    5u8 => 0,    // Standard Kit 6
    6u8 => 0,    // Standard Kit 7
    7u8 => 0,    // Standard Kit 8
    9u8 => 8,    // Room Kit 2
    10u8 => 8,   // Room Kit 3
    11u8 => 16,  // Room Kit 4 -> Power Kit
    17u8 => 16,  // Power Kit 2
    18u8 => 16,  // Power Kit 3
    19u8 => 16,  // Power Kit 4
    26u8 => 25,  // TR-808 Kit 2
    27u8 => 25,  // TR-808 Kit 3
    28u8 => 25,  // TR-808 Kit 4
    33u8 => 32,  // Jazz Kit 2
    34u8 => 32,  // Jazz Kit 3
    35u8 => 32,  // Jazz Kit 4
    41u8 => 40,  // Brush Kit 2
    42u8 => 40,  // Brush Kit 3
    43u8 => 40,  // Brush Kit 4
};

/// A resolved bank+program target for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSelection {
    pub msb: u8,
    pub lsb: u8,
    pub program: u8,
    pub kind: ToneKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneKind {
    /// A native SuperNATURAL acoustic/synth tone.
    Supernatural(&'static str),
    /// GM2 melodic fallback, keeping the source program number.
    Gm2,
    /// A native SuperNATURAL drum kit.
    SupernaturalDrumKit(&'static str),
    /// GM2 drum kit fallback.
    Gm2DrumKit,
}

impl ToneSelection {
    /// The (MSB, LSB, program) triple compared against tracked channel state.
    pub const fn triple(&self) -> (u8, u8, u8) {
        (self.msb, self.lsb, self.program)
    }

    pub const fn is_gm2(&self) -> bool {
        matches!(self.kind, ToneKind::Gm2 | ToneKind::Gm2DrumKit)
    }

    /// Display label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self.kind {
            ToneKind::Supernatural(name) | ToneKind::SupernaturalDrumKit(name) => name,
            ToneKind::Gm2 | ToneKind::Gm2DrumKit => "GM2",
        }
    }
}

/// Resolve a melodic (non-drum-channel) GM1 program.
pub fn resolve_melodic(program: u8) -> Result<ToneSelection, SnError> {
    let &(target_program, tone) = SUPERNATURAL_MAP
        .get(&program)
        .ok_or(SnError::MissingToneMapping(program))?;
    if tone == "GM2" {
        // GM2 fallback always reuses the original program number.
        return Ok(ToneSelection {
            msb: GM2_MSB,
            lsb: GM2_LSB,
            program,
            kind: ToneKind::Gm2,
        });
    }
    let category = *TONE_CATEGORY
        .get(tone)
        .ok_or(SnError::MissingToneCategory(tone))?;
    let &(msb, lsb) = BANK_SELECT
        .get(category)
        .ok_or(SnError::MissingBankSelect(category))?;
    Ok(ToneSelection {
        msb,
        lsb,
        program: target_program,
        kind: ToneKind::Supernatural(tone),
    })
}

/// Resolve a drum-channel program change to a drum kit selection.
///
/// Programs with a native SuperNATURAL kit keep their program number in the
/// SN-D bank; everything else falls back to the closest GM2 kit, defaulting
/// to the Standard Kit.
pub fn resolve_drum(program: u8) -> ToneSelection {
    if let Some(name) = SN_DRUM_KITS.get(&program) {
        ToneSelection {
            msb: SN_DRUM_MSB,
            lsb: SN_DRUM_LSB,
            program,
            kind: ToneKind::SupernaturalDrumKit(name),
        }
    } else {
        let gm2_program = GM2_DRUM_MAP.get(&program).copied().unwrap_or(0);
        ToneSelection {
            msb: GM2_DRUM_MSB,
            lsb: GM2_LSB,
            program: gm2_program,
            kind: ToneKind::Gm2DrumKit,
        }
    }
}

/// The tone selected for the drum channel by the initialization sequence.
pub const fn default_drum_selection() -> ToneSelection {
    ToneSelection {
        msb: GM2_DRUM_MSB,
        lsb: GM2_LSB,
        program: 0,
        kind: ToneKind::Gm2DrumKit,
    }
}

/// Startup fail-fast check of all static tables. Every GM1 program must have
/// a mapping and every referenced tone must resolve to a bank select entry.
pub fn validate_tables() -> Result<(), SnError> {
    for program in 0u8..=127 {
        resolve_melodic(program)?;
    }
    Ok(())
}
