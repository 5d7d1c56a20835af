// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! "Lost Woods" (Zelda 64), arranged for soprano, alto, tenor and bass.
//!
//! Pitches are written relative to each part's home key; `c1` and friends
//! are one octave above it.

use crate::error::ScoreError;
use crate::music::{pitch_with_octave, A, B, C, D, E, F, G, GS, R};
use crate::sequencer::{Ensemble, Note};
use crate::timing::Meter;

/// Part names this score writes to
pub const PARTS: [&str; 4] = ["soprano", "alto", "tenor", "bass"];

fn repeat(bar: &[Note], times: usize) -> Vec<Note> {
    bar.iter().cycle().take(bar.len() * times).cloned().collect()
}

/// Write the whole piece into the ensemble's four parts.
#[rustfmt::skip]
pub fn arrange(m: &Meter, ensemble: &mut Ensemble) -> Result<(), ScoreError> {
    let c1 = pitch_with_octave(C, 1);
    let d1 = pitch_with_octave(D, 1);
    let e1 = pitch_with_octave(E, 1);
    let f1 = pitch_with_octave(F, 1);
    let g1 = pitch_with_octave(G, 1);
    let b1 = pitch_with_octave(B, 1);

    let two_bars_rest = vec![m.w(R), m.w(R)];
    let offbeat_c = repeat(&[m.e(R), m.e(C), m.e(C), m.e(C)], 4);

    let alto_theme = vec![
        m.e(F), m.e(A), m.q(B),
        m.e(F), m.e(A), m.q(B),
        m.e(F), m.e(A), m.e(B), m.e(E), m.q(D),
        m.e(B), m.e(C),
    ];
    let bass_f = repeat(&[m.e(F), m.e(A), m.e(A), m.e(A)], 4);
    let bass_e = vec![
        m.e(E), m.e(G), m.e(G), m.e(G), m.e(E), m.e(G), m.e(G), m.e(C),
        m.e(E), m.e(G), m.e(G), m.e(G), m.e(E), m.e(G), m.e(G),
    ];

    let alto_bridge = vec![
        m.e(D), m.e(E), m.q(F),
        m.e(G), m.e(A), m.q(B),
        m.e(C), m.e(B), m.h(E),
        m.q(R),
    ];
    let tenor_bridge = vec![
        m.e(R), m.e(A), m.e(R), m.e(A), m.e(R), m.e(G), m.e(R), m.e(G),
        m.e(R), m.e(C), m.e(R), m.e(C), m.e(R), m.e(A), m.e(R), m.e(A),
    ];
    let bass_bridge = vec![
        m.e(D), m.e(F), m.e(D), m.e(F), m.e(G), m.e(D), m.e(G), m.e(D),
        m.e(C), m.e(E), m.e(C), m.e(E), m.e(A), m.e(E), m.e(A), m.e(E),
    ];

    // Measures 1-8: the theme twice, each time with a different answer
    let answers = [
        (
            vec![
                m.e(B), m.e(G), m.h(E),
                m.e(R), m.e(D), m.e(E), m.e(G), m.h(E),
                m.q(R),
            ],
            C,
        ),
        (
            vec![
                m.e(E), m.e(B), m.h(G),
                m.e(R), m.e(B), m.e(G), m.e(D), m.h(E),
                m.q(R),
            ],
            E,
        ),
    ];

    for (alto_answer, bass_turn) in answers {
        ensemble.part("soprano")?.add(two_bars_rest.clone())?;
        ensemble.part("alto")?.add(alto_theme.clone())?;
        ensemble.part("tenor")?.add(offbeat_c.clone())?;
        ensemble.part("bass")?.add(bass_f.clone())?;

        let mut bass_answer = bass_e.clone();
        bass_answer.push(m.e(bass_turn));

        ensemble.part("soprano")?.add(two_bars_rest.clone())?;
        ensemble.part("alto")?.add(alto_answer)?;
        ensemble.part("tenor")?.add(offbeat_c.clone())?;
        ensemble.part("bass")?.add(bass_answer)?;
    }

    // Measure 9
    ensemble.part("soprano")?.add(two_bars_rest.clone())?;
    ensemble.part("alto")?.add(alto_bridge.clone())?;
    ensemble.part("tenor")?.add(tenor_bridge.clone())?;
    ensemble.part("bass")?.add(bass_bridge.clone())?;

    ensemble.part("soprano")?.add(vec![
        m.e(F), m.e(G), m.q(A),
        m.e(B), m.e(c1), m.q(d1),
        m.e(e1), m.e(f1), m.h(g1),
        m.q(R),
    ])?;
    ensemble.part("alto")?.add(vec![
        m.e(D), m.e(E), m.q(F),
        m.e(G), m.e(A), m.q(B),
        m.e(c1), m.e(d1), m.h(e1),
        m.q(R),
    ])?;
    ensemble.part("tenor")?.add(tenor_bridge.clone())?;
    ensemble.part("bass")?.add(bass_bridge.clone())?;

    // Measure 13
    ensemble.part("soprano")?.add(two_bars_rest)?;
    ensemble.part("alto")?.add(alto_bridge)?;
    ensemble.part("tenor")?.add(tenor_bridge)?;
    ensemble.part("bass")?.add(bass_bridge)?;

    ensemble.part("soprano")?.add(vec![
        m.e(F), m.e(E), m.e(A), m.e(G), m.e(B), m.e(A), m.e(c1), m.e(B),
        m.e(d1), m.e(c1), m.e(e1), m.e(d1), m.e(f1), m.e(e1), m.s(e1), m.e(f1), m.s(d1),
    ])?;
    ensemble.part("alto")?.add(vec![
        m.e(D), m.e(C), m.e(F), m.e(E), m.e(G), m.e(F), m.e(A), m.e(G),
        m.e(B), m.e(A), m.e(c1), m.e(B), m.e(d1), m.e(c1), m.s(B), m.e(c1), m.s(A),
    ])?;
    ensemble.part("tenor")?.add(vec![
        m.e(R), m.e(A), m.e(A), m.e(R), m.e(R), m.e(A), m.e(A), m.e(R),
        m.e(R), m.e(B), m.e(B), m.e(R), m.e(R), m.e(B), m.e(B), m.e(R),
    ])?;
    ensemble.part("bass")?.add(vec![
        m.e(D), m.e(F), m.e(F), m.e(R), m.e(D), m.e(F), m.e(F), m.e(R),
        m.e(C), m.e(G), m.e(G), m.e(R), m.e(C), m.e(G), m.e(G), m.e(R),
    ])?;

    // Measure 17
    ensemble.part("soprano")?.add(vec![m.w(E), m.h(R), m.q(R), m.e(b1), m.e(R)])?;
    ensemble.part("alto")?.add(vec![m.w(B), m.h(R), m.q(R), m.e(e1), m.e(R)])?;
    ensemble.part("tenor")?.add(vec![
        m.e(R), m.e(B), m.e(R), m.e(B), m.e(R), m.e(B), m.e(R), m.e(B),
        m.e(R), m.e(B), m.e(B), m.e(B), m.e(B), m.e(R), m.e(e1), m.e(R),
    ])?;
    ensemble.part("bass")?.add(vec![
        m.e(E), m.e(A), m.e(R), m.e(A), m.e(E), m.e(A), m.e(R), m.e(A),
        m.e(E), m.e(GS), m.e(GS), m.e(GS), m.e(GS), m.e(R), m.e(E), m.e(R),
    ])?;

    Ok(())
}
