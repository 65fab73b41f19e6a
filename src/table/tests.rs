use super::*;
use crate::base::{BasePitchRecord, BaseTable};
use crate::error::PitchError;
use crate::notation::{label_value, Alteration, PentagramPosition, PitchClass};
use crate::signature::{KeySignature, SignatureKind};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bound(label: &str) -> PitchBound {
    PitchBound::from_label(label).unwrap()
}

fn canonical() -> PitchTableBuilder {
    PitchTableBuilder::new(BaseTable::canonical())
}

fn labels(table: &PitchTable) -> Vec<&str> {
    table.labels().collect()
}

#[test]
fn test_no_signature_one_octave_range() {
    let table = canonical()
        .build(None, Some(bound("C4")), Some(bound("C5")))
        .unwrap();

    assert_eq!(
        labels(&table),
        vec!["C4", "C#4", "D4", "D#4", "E4", "F4", "F#4", "G4", "G#4", "A4", "A#4", "B4", "C5"]
    );

    let values: Vec<i32> = table.iter().map(|p| p.absolute_value).collect();
    assert_eq!(values, (60..=72).collect::<Vec<_>>());

    let c4 = table.get("C4").unwrap();
    let c5 = table.get("C5").unwrap();
    assert_eq!(c5.absolute_value - c4.absolute_value, 12);
    assert_eq!(c4.octave, 4);
    assert_eq!(c5.octave, 5);
}

#[test]
fn test_one_sharp_raises_f_position() {
    let g_major = KeySignature::from_fifths(1).unwrap();
    let table = canonical()
        .build(Some(&g_major), Some(bound("C4")), Some(bound("C5")))
        .unwrap();
    let plain = canonical().build(None, None, None).unwrap();

    let f4 = table.get("F4").unwrap();
    assert_eq!(f4.pitch_class, PitchClass::FSharp);
    assert_eq!(f4.alteration, Alteration::Sharp);
    assert_eq!(f4.position, PentagramPosition::F);
    assert_eq!(f4.absolute_value, plain.get("F#4").unwrap().absolute_value);
    assert!(f4.is_altered());

    let e4 = table.get("E4").unwrap();
    assert_eq!(e4.pitch_class, PitchClass::E);
    assert!(!e4.is_altered());
    assert_eq!(table.len(), 13);
}

#[test]
fn test_sharp_on_b_rolls_into_next_octave() {
    let signature = KeySignature::new(SignatureKind::Sharps, vec![PentagramPosition::B]);
    let table = canonical()
        .build(Some(&signature), Some(bound("C4")), Some(bound("C5")))
        .unwrap();

    let b4 = table.get("B4").unwrap();
    assert_eq!(b4.pitch_class, PitchClass::C);
    assert_eq!(b4.octave, 4);
    assert_eq!(b4.absolute_value, 72);
    assert_eq!(table.get("C5").unwrap().absolute_value, 72);

    // B3 sounds as C4, so it falls inside the range too
    assert_eq!(table.get("B3").unwrap().absolute_value, 60);
    assert_eq!(
        labels(&table),
        vec![
            "B3", "C4", "C#4", "D4", "D#4", "E4", "F4", "F#4", "G4", "G#4", "A4", "A#4", "B4",
            "C5"
        ]
    );
}

#[test]
fn test_flat_on_c_rolls_into_previous_octave() {
    let c_flat_major = KeySignature::from_fifths(-7).unwrap();
    let table = canonical()
        .build(Some(&c_flat_major), Some(bound("C4")), Some(bound("C5")))
        .unwrap();

    // C4 sounds as B3 (59), below the range
    assert!(!table.contains("C4"));
    assert_eq!(table.get("C#4").unwrap().absolute_value, 60);
    assert_eq!(table.get("C5").unwrap().absolute_value, 71);
    assert_eq!(table.get("C5").unwrap().pitch_class, PitchClass::B);
    // Written on the C position, sounding B: Cb
    assert_eq!(table.get("C5").unwrap().alteration, Alteration::Flat);
    assert_eq!(table.get("C#5").unwrap().absolute_value, 72);
    assert_eq!(table.len(), 13);
}

#[test]
fn test_flat_signature_spells_altered_notes_with_flats() {
    let f_major = KeySignature::from_fifths(-1).unwrap();
    let table = canonical().build(Some(&f_major), None, None).unwrap();

    let b4 = table.get("B4").unwrap();
    assert_eq!(b4.pitch_class, PitchClass::ASharp);
    assert_eq!(b4.alteration, Alteration::Flat);
    assert_eq!(b4.absolute_value, 70);

    // A#4 is not on an altered position and keeps its written spelling
    let a_sharp = table.get("A#4").unwrap();
    assert_eq!(a_sharp.alteration, Alteration::Sharp);
    assert!(!a_sharp.is_altered());
}

#[test]
fn test_enharmonic_consistency_for_every_signature() {
    let plain = canonical().build(None, None, None).unwrap();

    for fifths in -7..=7 {
        let signature = KeySignature::from_fifths(fifths).unwrap();
        let table = canonical().build(Some(&signature), None, None).unwrap();
        let delta = signature.kind.direction().sign() as i32;

        for pitch in table.iter() {
            assert_eq!(
                pitch.pitch_class.ordinal() as i32,
                pitch.absolute_value.rem_euclid(12),
                "{} in {} fifths",
                pitch.label,
                fifths
            );
            if !signature.affects(pitch.position) {
                continue;
            }
            if let Some(unaltered) = plain.get(&pitch.label) {
                assert_eq!(pitch.absolute_value, unaltered.absolute_value + delta);
            }
        }
    }
}

#[test]
fn test_position_and_alteration_spell_the_sounding_key() {
    for fifths in -7..=7 {
        let signature = KeySignature::from_fifths(fifths).unwrap();
        let table = canonical().build(Some(&signature), None, None).unwrap();

        for pitch in table.iter() {
            let spelled = pitch.position.natural_semitone() + pitch.alteration.offset();
            assert_eq!(
                PitchClass::from_semitone(spelled as i32),
                pitch.pitch_class,
                "{} in {} fifths",
                pitch.label,
                fifths
            );
        }
    }
}

#[test]
fn test_altered_sharps_spell_as_double_sharps() {
    let g_major = KeySignature::from_fifths(1).unwrap();
    let table = canonical().build(Some(&g_major), None, None).unwrap();

    let f_sharp = table.get("F#4").unwrap();
    assert_eq!(f_sharp.pitch_class, PitchClass::G);
    assert_eq!(f_sharp.alteration, Alteration::DoubleSharp);
    assert_eq!(f_sharp.position, PentagramPosition::F);

    let seven_flats = KeySignature::from_fifths(-7).unwrap();
    let table = canonical().build(Some(&seven_flats), None, None).unwrap();
    let c_sharp = table.get("C#4").unwrap();
    assert_eq!(c_sharp.pitch_class, PitchClass::C);
    assert_eq!(c_sharp.alteration, Alteration::Natural);
}

#[test]
fn test_sharped_f_matches_unmodified_f_sharp_in_every_octave() {
    let g_major = KeySignature::from_fifths(1).unwrap();
    let table = canonical().build(Some(&g_major), None, None).unwrap();
    let plain = canonical().build(None, None, None).unwrap();

    for octave in -1..=9 {
        let f = format!("F{}", octave);
        let f_sharp = format!("F#{}", octave);
        assert_eq!(
            table.get(&f).unwrap().absolute_value,
            plain.get(&f_sharp).unwrap().absolute_value
        );
    }
}

#[test]
fn test_octave_monotonicity() {
    for fifths in [-7, -2, 0, 3, 7] {
        let signature = KeySignature::from_fifths(fifths).unwrap();
        let table = canonical().build(Some(&signature), None, None).unwrap();

        for record in BaseTable::canonical().iter() {
            for octave in -1..9 {
                let (Some(lower), Some(upper)) = (
                    table.get(&record.label(octave)),
                    table.get(&record.label(octave + 1)),
                ) else {
                    continue;
                };
                assert_eq!(upper.absolute_value, lower.absolute_value + 12);
            }
        }
    }
}

#[test]
fn test_range_inclusivity() {
    let ranges = [("C4", "C5"), ("A0", "C8"), ("F#3", "Bb3"), ("E2", "E2"), ("C#-1", "G9")];

    for fifths in [-7, -3, 0, 2, 7] {
        let signature = KeySignature::from_fifths(fifths).unwrap();
        let full = canonical().build(Some(&signature), None, None).unwrap();

        for (low, high) in ranges {
            let (start, end) = (bound(low), bound(high));
            let ranged = canonical()
                .build(Some(&signature), Some(start), Some(end))
                .unwrap();

            let expected: Vec<&str> = full
                .iter()
                .filter(|p| (start.absolute_value..=end.absolute_value).contains(&p.absolute_value))
                .map(|p| p.label.as_str())
                .collect();
            assert_eq!(labels(&ranged), expected, "{}..{} in {} fifths", low, high, fifths);
        }
    }
}

#[test]
fn test_range_keeps_every_pitch_sharing_the_upper_value() {
    let g_major = KeySignature::from_fifths(1).unwrap();
    let start = bound("F#4");
    let end = PitchBound::new(67);
    let table = canonical().build(Some(&g_major), Some(start), Some(end)).unwrap();

    // F (sharped) = 66, F# (sharped) = 67, G = 67
    assert_eq!(labels(&table), vec!["F4", "F#4", "G4"]);
}

#[test]
fn test_single_value_range() {
    let table = canonical()
        .build(None, Some(PitchBound::new(66)), Some(PitchBound::new(66)))
        .unwrap();
    assert_eq!(labels(&table), vec!["F#4"]);
}

#[test]
fn test_reversed_range_is_rejected() {
    let result = canonical().build(None, Some(bound("C5")), Some(bound("C4")));
    assert_eq!(result, Err(PitchError::InvalidRange { start: 72, end: 60 }));
}

#[test]
fn test_one_sided_ranges() {
    let from_c8 = canonical().build(None, Some(bound("C8")), None).unwrap();
    assert_eq!(from_c8.len(), 20);
    assert_eq!(from_c8.lowest().unwrap().label, "C8");
    assert_eq!(from_c8.highest().unwrap().label, "G9");

    let up_to_b_minus_1 = canonical().build(None, None, Some(bound("B-1"))).unwrap();
    assert_eq!(up_to_b_minus_1.len(), 11);
    assert_eq!(up_to_b_minus_1.lowest().unwrap().label, "C#-1");
}

#[test]
fn test_full_table_without_range() {
    let table = canonical().build(None, None, None).unwrap();

    // 11 octaves, minus the floor entry, minus G#9..B9
    assert_eq!(table.len(), 127);
    assert_eq!(table.lowest().unwrap().absolute_value, 1);
    assert_eq!(table.highest().unwrap().label, "G9");
    assert_eq!(table.highest().unwrap().absolute_value, 127);
}

#[test]
fn test_floor_entry_is_skipped() {
    let table = canonical().build(None, None, None).unwrap();
    assert!(!table.contains("C-1"));
    assert!(table.contains("C#-1"));
    assert!(table.contains("C0"));

    // Under Cb major, C-1 would sound below zero
    let c_flat_major = KeySignature::from_fifths(-7).unwrap();
    let flats = canonical().build(Some(&c_flat_major), None, None).unwrap();
    assert!(!flats.contains("C-1"));
    assert_eq!(flats.lowest().unwrap().absolute_value, 0);
}

#[test]
fn test_floor_entry_follows_the_lowest_configured_octave() {
    let table = canonical()
        .with_octaves(OctaveSpan::new(2, 3).unwrap())
        .build(None, None, None)
        .unwrap();
    assert!(!table.contains("C2"));
    assert!(table.contains("C#2"));
    assert!(table.contains("C3"));
    assert_eq!(table.len(), 23);
}

#[test]
fn test_floor_entry_can_be_kept() {
    let policy = ExpansionPolicy {
        skip_floor_entry: false,
        ..ExpansionPolicy::default()
    };
    let table = canonical().with_policy(policy).build(None, None, None).unwrap();
    assert_eq!(table.get("C-1").unwrap().absolute_value, 0);
    assert_eq!(table.len(), 128);
}

#[test]
fn test_ceiling_stops_mid_octave() {
    let table = canonical().build(None, Some(bound("C9")), None).unwrap();
    assert_eq!(
        labels(&table),
        vec!["C9", "C#9", "D9", "D#9", "E9", "F9", "F#9", "G9"]
    );
}

#[test]
fn test_ceiling_with_sharps_is_emitted_once() {
    let c_sharp_major = KeySignature::from_fifths(7).unwrap();
    let table = canonical().build(Some(&c_sharp_major), None, None).unwrap();
    assert_eq!(table.labels().filter(|l| *l == "G9").count(), 1);
    assert!(!table.contains("G#9"));
    assert_eq!(table.get("G9").unwrap().absolute_value, 128);
}

#[test]
fn test_custom_ceiling_and_unbounded_policy() {
    let policy = ExpansionPolicy {
        ceiling: Some("C5".to_string()),
        ..ExpansionPolicy::default()
    };
    let table = canonical()
        .with_octaves(OctaveSpan::new(4, 6).unwrap())
        .with_policy(policy)
        .build(None, None, None)
        .unwrap();
    assert_eq!(table.highest().unwrap().label, "C5");
    assert_eq!(table.len(), 12);

    let all = canonical()
        .with_policy(ExpansionPolicy::unbounded())
        .build(None, None, None)
        .unwrap();
    assert_eq!(all.len(), 132);
    assert_eq!(all.highest().unwrap().label, "B9");
}

#[test]
fn test_ceiling_spelling_is_normalized() {
    let raw = ExpansionPolicy {
        ceiling: Some("g9".to_string()),
        ..ExpansionPolicy::default()
    };
    let table = canonical().with_policy(raw).build(None, None, None).unwrap();
    assert_eq!(table.len(), 127);
    assert_eq!(table.highest().unwrap().label, "G9");

    let policy = ExpansionPolicy::unbounded().with_ceiling(" c_1 ").unwrap();
    assert_eq!(policy.ceiling.as_deref(), Some("C-1"));
    assert!(matches!(
        ExpansionPolicy::default().with_ceiling("X9"),
        Err(PitchError::InvalidLabel { .. })
    ));
}

#[test]
fn test_ceiling_on_floor_entry_stops_expansion() {
    let policy = ExpansionPolicy::default().with_ceiling("C4").unwrap();
    let table = canonical()
        .with_octaves(OctaveSpan::new(4, 6).unwrap())
        .with_policy(policy)
        .build(None, None, None)
        .unwrap();
    assert!(table.is_empty());
}

#[test]
fn test_generates_label() {
    let builder = canonical().with_octaves(OctaveSpan::new(2, 5).unwrap());
    assert!(builder.generates_label("C2"));
    assert!(builder.generates_label("a#5"));
    assert!(!builder.generates_label("Ab4"));
    assert!(!builder.generates_label("G9"));
    assert!(!builder.generates_label("nonsense"));

    // An unreachable ceiling never stops the expansion
    let policy = ExpansionPolicy::default().with_ceiling("Ab9").unwrap();
    let table = canonical().with_policy(policy).build(None, None, None).unwrap();
    assert_eq!(table.len(), 131);
}

#[test]
fn test_invalid_octave_spans() {
    assert!(matches!(
        OctaveSpan::new(5, 3),
        Err(PitchError::InvalidOctaveSpan { lowest: 5, highest: 3, .. })
    ));
    assert!(OctaveSpan::new(-2, 3).is_err());
    assert!(OctaveSpan::new(0, 10).is_err());
    assert_eq!(OctaveSpan::default(), OctaveSpan::full());
}

#[test]
fn test_build_is_deterministic() {
    let signature = KeySignature::from_fifths(-4).unwrap();
    let builder = canonical();
    let first = builder.build(Some(&signature), Some(bound("A2")), Some(bound("E6"))).unwrap();
    let second = builder.build(Some(&signature), Some(bound("A2")), Some(bound("E6"))).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_signature_does_not_leak_between_builds() {
    let builder = canonical();
    let _ = builder
        .build(Some(&KeySignature::from_fifths(6).unwrap()), None, None)
        .unwrap();
    let plain = builder.build(None, None, None).unwrap();
    assert_eq!(plain.get("F4").unwrap().pitch_class, PitchClass::F);
    assert_eq!(builder.base(), &BaseTable::canonical());
}

#[test]
fn test_labels_are_unique() {
    for fifths in -7..=7 {
        let signature = KeySignature::from_fifths(fifths).unwrap();
        let table = canonical().build(Some(&signature), None, None).unwrap();
        let mut seen: Vec<&str> = table.labels().collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), table.len());
    }
}

#[test]
fn test_naturals_only_base_table() {
    let naturals = BaseTable::from_records(
        PentagramPosition::ALL
            .iter()
            .map(|p| BasePitchRecord::new(*p, Alteration::Natural))
            .collect(),
    )
    .unwrap();
    let builder = PitchTableBuilder::new(naturals);

    let table = builder.build(None, Some(bound("C4")), Some(bound("C5"))).unwrap();
    assert_eq!(labels(&table), vec!["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"]);

    let d_major = KeySignature::from_fifths(2).unwrap();
    let table = builder.build(Some(&d_major), Some(bound("C4")), Some(bound("C5"))).unwrap();
    // C4 sounds as C#4 and C5 as C#5 (out of range)
    assert_eq!(table.get("C4").unwrap().absolute_value, 61);
    assert!(!table.contains("C5"));
    assert!(!table.contains("B3"));
    assert_eq!(table.get("F4").unwrap().pitch_class, PitchClass::FSharp);

    let empty = builder
        .build(None, Some(PitchBound::new(61)), Some(PitchBound::new(61)))
        .unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_random_pitch_draws_from_table() {
    let table = canonical()
        .build(None, Some(bound("E4")), Some(bound("F5")))
        .unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let pitch = table.random_pitch(&mut rng).unwrap();
        assert!(table.contains(&pitch.label));
        assert!(pitch.absolute_value >= label_value("E4").unwrap());
        assert!(pitch.absolute_value <= label_value("F5").unwrap());
    }

    assert!(PitchTable::default().random_pitch(&mut rng).is_none());
}

#[test]
fn test_bound_from_resolved_pitch() {
    let table = canonical().build(None, None, None).unwrap();
    let a4 = table.get("A4").unwrap();
    assert_eq!(PitchBound::from(a4), PitchBound::new(69));
}
