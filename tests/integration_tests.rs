//! Integration tests for the fretboard finders
//!
//! Drives the public API end to end, from the built-in library to sorted
//! result sets and diagrams.

use fretboard::chord_finder::accepts;
use fretboard::marks::{compare_chords, compare_scales, validate_chord, MUTED};
use fretboard::{
    find_chords, find_chords_with_cancel, find_scales, find_scales_with_cancel, identify_chords,
    CancellationToken, ChordFinderOptions, ChordQuality, DiagramStyle, FretError, Instrument, InternalNote,
    Library, ReverseChordFinderOptions, Scale, ScaleFinderOptions, Tuning,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

fn library() -> Library {
    Library::builtin().expect("built-in library should load")
}

fn ukulele_c_major(library: &Library) -> ChordFinderOptions {
    let ukulele = library.instrument("Ukulele").unwrap();
    ChordFinderOptions::new(
        ukulele,
        ukulele.tuning("Standard").unwrap(),
        InternalNote::C,
        library.chord_quality("Major").unwrap(),
    )
    .unwrap()
    .with_max_fret(5)
}

/// Delays tried in turn until a cancellation lands while results are still coming in.
const CANCEL_DELAYS_MS: [u64; 10] = [0, 1, 2, 5, 10, 20, 50, 100, 200, 500];

/// Raises `token` from another thread after `delay`.
fn cancel_after(token: &CancellationToken, delay: Duration) -> thread::JoinHandle<()> {
    let token = token.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        token.cancel();
    })
}

fn frettings(options: &ChordFinderOptions) -> Vec<Vec<i32>> {
    find_chords(options)
        .unwrap()
        .iter()
        .map(|r| r.frets().to_vec())
        .collect()
}

/// Pitch classes a fretting sounds.
fn sounded(tuning: &Tuning, frets: &[i32]) -> BTreeSet<InternalNote> {
    frets
        .iter()
        .enumerate()
        .filter(|&(_, &fret)| fret != MUTED)
        .map(|(string, &fret)| tuning.note_at(string, fret))
        .collect()
}

fn has_notes(options: &ChordFinderOptions, frets: &[i32]) -> (Vec<bool>, Option<usize>) {
    let targets = options.quality().pitch_classes(options.root());
    let notes = sounded(options.tuning(), frets);
    let has = targets.iter().map(|t| notes.contains(t)).collect();
    let root_index = targets.iter().position(|&t| t == options.root());
    (has, root_index)
}

/// Every fretting of every string value, checked directly against the rules.
fn brute_force(options: &ChordFinderOptions) -> BTreeSet<Vec<i32>> {
    let targets: BTreeSet<InternalNote> = options
        .quality()
        .pitch_classes(options.root())
        .into_iter()
        .collect();
    let mut values: Vec<i32> = (options.starting_fret()..=options.max_fret()).collect();
    if options.allow_muted_strings() {
        values.insert(0, MUTED);
    }

    let mut found = BTreeSet::new();
    let mut frets = vec![values[0]; options.num_strings()];
    let mut counters = vec![0usize; options.num_strings()];
    loop {
        for (string, &counter) in counters.iter().enumerate() {
            frets[string] = values[counter];
        }
        let all_chord_tones = sounded(options.tuning(), &frets).is_subset(&targets);
        let (has, root_index) = has_notes(options, &frets);
        if all_chord_tones
            && accepts(
                &has,
                root_index,
                options.allow_rootless_chords(),
                options.allow_partial_chords(),
            )
            && validate_chord(&frets, options)
        {
            found.insert(frets.clone());
        }

        // Odometer increment
        let mut string = 0;
        loop {
            if string == counters.len() {
                return found;
            }
            counters[string] += 1;
            if counters[string] < values.len() {
                break;
            }
            counters[string] = 0;
            string += 1;
        }
    }
}

#[test]
fn test_open_c_major_on_ukulele() {
    let library = library();
    let options = ukulele_c_major(&library);
    let shapes = frettings(&options);

    assert_eq!(shapes[0], vec![0, 0, 0, 3]);
    for shape in &shapes {
        let notes = sounded(options.tuning(), shape);
        assert_eq!(notes.len(), 3, "{:?} should sound C, E and G", shape);
    }
}

#[test]
fn test_partial_chords_keep_the_root() {
    let library = library();
    let full = frettings(&ukulele_c_major(&library));
    let options = ukulele_c_major(&library).with_partial_chords(true);
    let partial = frettings(&options);

    // C C E C: no fifth, still rooted
    assert!(partial.contains(&vec![5, 0, 0, 3]));
    assert!(!full.contains(&vec![5, 0, 0, 3]));
    assert!(partial.len() > full.len());
    for shape in &partial {
        assert!(
            sounded(options.tuning(), shape).contains(&InternalNote::C),
            "{:?} lacks the root",
            shape
        );
    }
}

#[test]
fn test_identify_open_c() {
    let library = library();
    let ukulele = library.instrument("Ukulele").unwrap();
    let qualities = vec![
        library.chord_quality("Major").unwrap().clone(),
        library.chord_quality("7").unwrap().clone(),
    ];
    let options =
        ReverseChordFinderOptions::new(ukulele, ukulele.tuning("Standard").unwrap(), vec![0, 0, 0, 3], qualities)
            .unwrap();

    let results = identify_chords(&options).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].root(), InternalNote::C);
    assert_eq!(results[0].quality().name(), "Major");
}

#[test]
fn test_major_scale_on_one_string() {
    let tuning = Tuning::parse("Single", "C3").unwrap();
    let mut monochord = Instrument::new("Monochord", 1).unwrap();
    monochord.add_tuning(tuning.clone()).unwrap();
    let major = library().scale("Major").unwrap().clone();

    for strict in [false, true] {
        let options = ScaleFinderOptions::new(&monochord, &tuning, InternalNote::C, &major)
            .unwrap()
            .with_max_reach(12)
            .with_max_fret(12)
            .with_strict_intervals(strict);
        let results = find_scales(&options).unwrap();

        assert_eq!(results.len(), 1);
        let marks = results[0].marks();
        assert_eq!(marks.len(), 7);
        assert!(marks.iter().all(|m| m.string == 1));
        let frets: Vec<i32> = marks.iter().map(|m| m.fret).collect();
        assert_eq!(frets, major.intervals());
    }
}

#[test]
fn test_cancelled_searches_are_empty() {
    let library = library();
    let token = CancellationToken::new();
    token.cancel();

    let chords = find_chords_with_cancel(&ukulele_c_major(&library), &token).unwrap();
    assert_eq!(chords.len(), 0);

    let ukulele = library.instrument("Ukulele").unwrap();
    let options = ScaleFinderOptions::new(
        ukulele,
        ukulele.tuning("Standard").unwrap(),
        InternalNote::C,
        library.scale("Major").unwrap(),
    )
    .unwrap();
    let scales = find_scales_with_cancel(&options, &token).unwrap();
    assert_eq!(scales.len(), 0);
}

#[test]
fn test_chord_search_cancelled_midway_keeps_ordered_results() {
    let library = library();
    let guitar = library.instrument("Guitar").unwrap();
    let options = ChordFinderOptions::new(
        guitar,
        guitar.tuning("Standard").unwrap(),
        InternalNote::G,
        library.chord_quality("Major").unwrap(),
    )
    .unwrap()
    .with_max_fret(24)
    .with_max_reach(5)
    .with_muted_strings(true)
    .with_rootless_chords(true)
    .with_partial_chords(true);
    let full: BTreeSet<Vec<i32>> = frettings(&options).into_iter().collect();

    let mut cut_short = false;
    for delay in CANCEL_DELAYS_MS {
        let token = CancellationToken::new();
        let canceller = cancel_after(&token, Duration::from_millis(delay));
        let results = find_chords_with_cancel(&options, &token).unwrap();
        canceller.join().unwrap();

        let shapes: Vec<Vec<i32>> = results.iter().map(|r| r.frets().to_vec()).collect();
        for pair in shapes.windows(2) {
            assert_eq!(compare_chords(&pair[0], &pair[1]), Ordering::Less);
        }
        assert!(shapes.iter().all(|shape| full.contains(shape)));
        if !shapes.is_empty() && shapes.len() < full.len() {
            cut_short = true;
            break;
        }
    }
    assert!(cut_short, "no cancellation landed mid-search ({} shapes)", full.len());
}

#[test]
fn test_scale_search_cancelled_midway_keeps_ordered_results() {
    let library = library();
    let guitar = library.instrument("Guitar").unwrap();
    let options = ScaleFinderOptions::new(
        guitar,
        guitar.tuning("Standard").unwrap(),
        InternalNote::G,
        library.scale("Major").unwrap(),
    )
    .unwrap()
    .with_max_fret(24)
    .with_max_reach(5);
    let marks = |r: &fretboard::ScaleFinderResult| -> Vec<(usize, i32)> {
        r.marks().iter().map(|m| (m.string, m.fret)).collect()
    };
    let full: BTreeSet<Vec<(usize, i32)>> = find_scales(&options).unwrap().iter().map(marks).collect();

    let mut cut_short = false;
    for delay in CANCEL_DELAYS_MS {
        let token = CancellationToken::new();
        let canceller = cancel_after(&token, Duration::from_millis(delay));
        let results = find_scales_with_cancel(&options, &token).unwrap();
        canceller.join().unwrap();

        for pair in results.as_slice().windows(2) {
            assert_eq!(compare_scales(pair[0].marks(), pair[1].marks()), Ordering::Less);
        }
        assert!(results.iter().all(|r| full.contains(&marks(r))));
        if !results.is_empty() && results.len() < full.len() {
            cut_short = true;
            break;
        }
    }
    assert!(cut_short, "no cancellation landed mid-search ({} shapes)", full.len());
}

#[test]
fn test_chord_results_match_brute_force() {
    let library = library();
    let flags = [(false, false), (true, false), (false, true), (true, true)];
    for quality in ["Major", "m7", "dim"] {
        for &(muted, rootless) in &flags {
            for partial in [false, true] {
                let ukulele = library.instrument("Ukulele").unwrap();
                let options = ChordFinderOptions::new(
                    ukulele,
                    ukulele.tuning("Standard").unwrap(),
                    InternalNote::D,
                    library.chord_quality(quality).unwrap(),
                )
                .unwrap()
                .with_max_fret(9)
                .with_muted_strings(muted)
                .with_rootless_chords(rootless)
                .with_partial_chords(partial);

                let found = frettings(&options);
                let unique: BTreeSet<Vec<i32>> = found.iter().cloned().collect();
                assert_eq!(unique.len(), found.len(), "duplicate shapes for {}", quality);
                assert_eq!(
                    unique,
                    brute_force(&options),
                    "{} muted={} rootless={} partial={}",
                    quality,
                    muted,
                    rootless,
                    partial
                );
            }
        }
    }
}

#[test]
fn test_chord_results_are_sound() {
    let library = library();
    let options = ukulele_c_major(&library)
        .with_max_fret(12)
        .with_muted_strings(true)
        .with_rootless_chords(true);

    for shape in frettings(&options) {
        let (has, root_index) = has_notes(&options, &shape);
        assert!(accepts(&has, root_index, true, false), "{:?}", shape);
        assert!(validate_chord(&shape, &options));
    }
}

#[test]
fn test_results_are_strictly_ordered() {
    let library = library();
    let guitar = library.instrument("Guitar").unwrap();
    let options = ChordFinderOptions::new(
        guitar,
        guitar.tuning("Standard").unwrap(),
        InternalNote::G,
        library.chord_quality("Major").unwrap(),
    )
    .unwrap()
    .with_max_fret(7)
    .with_muted_strings(true);

    let shapes = frettings(&options);
    assert!(!shapes.is_empty());
    for i in 0..shapes.len() {
        for j in i + 1..shapes.len() {
            assert_eq!(compare_chords(&shapes[i], &shapes[j]), Ordering::Less);
            assert_eq!(compare_chords(&shapes[j], &shapes[i]), Ordering::Greater);
        }
    }

    let ukulele = library.instrument("Ukulele").unwrap();
    let options = ScaleFinderOptions::new(
        ukulele,
        ukulele.tuning("Standard").unwrap(),
        InternalNote::A,
        library.scale("Minor Pentatonic").unwrap(),
    )
    .unwrap();
    let scales = find_scales(&options).unwrap();
    assert!(!scales.is_empty());
    for pair in scales.as_slice().windows(2) {
        assert_eq!(compare_scales(pair[0].marks(), pair[1].marks()), Ordering::Less);
    }
}

#[test]
fn test_reach_is_bounded() {
    let library = library();
    for max_reach in 1..=5 {
        let options = ukulele_c_major(&library)
            .with_max_fret(12)
            .with_partial_chords(true)
            .with_max_reach(max_reach);
        for result in &find_chords(&options).unwrap() {
            let fretted: Vec<i32> = result.frets().iter().copied().filter(|&f| f > 0).collect();
            if let (Some(min), Some(max)) = (fretted.iter().min(), fretted.iter().max()) {
                assert!(max - min < max_reach, "{:?} exceeds reach {}", result.frets(), max_reach);
            }
            assert!(result.reach() <= max_reach);
        }
    }
}

#[test]
fn test_strict_scales_climb_by_scale_steps() {
    let library = library();
    let guitar = library.instrument("Guitar").unwrap();
    let scale = library.scale("Major").unwrap();
    let options = ScaleFinderOptions::new(guitar, guitar.tuning("Standard").unwrap(), InternalNote::G, scale)
        .unwrap()
        .with_max_reach(5)
        .with_strict_intervals(true);

    let results = find_scales(&options).unwrap();
    assert!(!results.is_empty());
    for result in &results {
        let notes = result.notes(options.tuning());
        for (degree, pair) in notes.windows(2).enumerate() {
            assert_eq!(
                pair[0].distance_to(pair[1]),
                scale.step(degree + 1),
                "{:?} breaks the scale at degree {}",
                result.marks(),
                degree + 1
            );
        }
    }
}

#[test]
fn test_loose_scales_may_change_octave() {
    // Reentrant G4 string: without strict intervals a run may drop an octave
    let library = library();
    let ukulele = library.instrument("Ukulele").unwrap();
    let scale = library.scale("Major").unwrap();
    let loose = ScaleFinderOptions::new(ukulele, ukulele.tuning("Standard").unwrap(), InternalNote::C, scale)
        .unwrap()
        .with_max_reach(5);
    let strict = loose.clone().with_strict_intervals(true);

    let loose_results = find_scales(&loose).unwrap();
    let strict_results = find_scales(&strict).unwrap();
    assert!(loose_results.len() > strict_results.len());
    for result in &strict_results {
        assert!(loose_results.iter().any(|r| r == result));
    }
}

#[test]
fn test_searches_are_repeatable() {
    let library = library();
    let options = ukulele_c_major(&library)
        .with_max_fret(12)
        .with_muted_strings(true)
        .with_partial_chords(true);
    assert_eq!(frettings(&options), frettings(&options));

    let ukulele = library.instrument("Ukulele").unwrap();
    let options = ScaleFinderOptions::new(
        ukulele,
        ukulele.tuning("Standard").unwrap(),
        InternalNote::F,
        library.scale("Major Pentatonic").unwrap(),
    )
    .unwrap();
    let first: Vec<_> = find_scales(&options).unwrap().iter().cloned().collect();
    let second: Vec<_> = find_scales(&options).unwrap().iter().cloned().collect();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_options_fail_fast() {
    let library = library();
    let options = ukulele_c_major(&library).with_open_strings(false).with_max_fret(0);
    assert!(matches!(
        find_chords(&options),
        Err(FretError::InvalidArgument { arg: "max_fret", .. })
    ));

    let ukulele = library.instrument("Ukulele").unwrap();
    let guitar_tuning = library.tuning("Guitar", "Standard").unwrap();
    let err = ChordFinderOptions::new(
        ukulele,
        guitar_tuning,
        InternalNote::C,
        library.chord_quality("Major").unwrap(),
    )
    .unwrap_err();
    assert!(matches!(err, FretError::TuningMismatch { expected: 4, got: 6, .. }));
}

#[test]
fn test_user_library_extends_builtin() {
    let mut library = library();
    library.merge(
        Library::from_yaml(
            r#"
instruments:
  - name: Tenor Guitar
    strings: 4
    tunings:
      - name: Standard
        notes: C3 G3 D4 A4
chord-qualities:
  - name: Suspended 2nd Add 6
    abbreviation: 6sus2
    intervals: [0, 2, 7, 9]
"#,
        )
        .unwrap(),
    )
    .unwrap();

    let tenor = library.instrument("tenor guitar").unwrap();
    let quality: &ChordQuality = library.chord_quality("6sus2").unwrap();
    let options = ChordFinderOptions::new(
        tenor,
        tenor.tuning("Standard").unwrap(),
        InternalNote::C,
        quality,
    )
    .unwrap();

    // C G D A is exactly C6sus2
    let results = find_chords(&options).unwrap();
    assert_eq!(results[0].frets(), &[0, 0, 0, 0]);
    let diagram = results.diagrams(&DiagramStyle::default()).remove(0);
    assert_eq!(diagram.title.as_deref(), Some("C6sus2"));
    assert_eq!(diagram.num_strings, 4);

    // Built-in content is still there
    assert!(library.instrument("Ukulele").is_ok());
    assert!(library.scale("Blues").is_ok());
}

#[test]
fn test_custom_scale_without_library() {
    let tuning = Tuning::parse("Fifths", "C3 G3").unwrap();
    let mut instrument = Instrument::new("Duo", 2).unwrap();
    instrument.add_tuning(tuning.clone()).unwrap();
    let scale = Scale::new("Fifth", vec![0, 7]).unwrap();
    let options = ScaleFinderOptions::new(&instrument, &tuning, InternalNote::C, &scale)
        .unwrap()
        .with_max_fret(7)
        .with_max_reach(8)
        .with_strict_intervals(true);

    let shapes: Vec<Vec<(usize, i32)>> = find_scales(&options)
        .unwrap()
        .iter()
        .map(|r| r.marks().iter().map(|m| (m.string, m.fret)).collect())
        .collect();
    // Open C to open G across strings sorts before the fretted G on string 1
    assert_eq!(shapes, vec![vec![(1, 0), (2, 0)], vec![(1, 0), (1, 7)]]);
}
