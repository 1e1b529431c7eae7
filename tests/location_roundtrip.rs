//! Property tests for the location notation: canonical text survives a
//! parse/render round trip and shifting is reversible.

use gbfeatures::location::Location;
use gbfeatures::parse_location;
use proptest::prelude::*;

/// One canonical simple location, without any complement.
fn arb_simple() -> impl Strategy<Value = String> {
    let range = (1i64..100_000, 1i64..5_000, any::<bool>(), any::<bool>()).prop_map(
        |(start, len, p5, p3)| {
            format!(
                "{}{}..{}{}",
                if p5 { "<" } else { "" },
                start,
                if p3 { ">" } else { "" },
                start + len
            )
        },
    );
    let remote = ("[A-Z]{1,2}[0-9]{5}\\.[1-9]", 1i64..100_000, 1i64..5_000)
        .prop_map(|(acc, start, len)| format!("{}:{}..{}", acc, start, start + len));
    prop_oneof![
        4 => range,
        1 => (1i64..100_000).prop_map(|p| p.to_string()),
        1 => (1i64..100_000).prop_map(|p| format!("{}^{}", p, p + 1)),
        1 => (1i64..100_000, 2i64..100).prop_map(|(s, len)| format!("{}.{}", s, s + len)),
        1 => remote,
    ]
}

/// Canonical locations with a single strand for all segments.
fn arb_location() -> impl Strategy<Value = String> {
    let compound = (
        prop_oneof![Just("join"), Just("order")],
        prop::collection::vec(arb_simple(), 2..6),
    )
        .prop_map(|(op, parts)| format!("{}({})", op, parts.join(",")));
    let body = prop_oneof![arb_simple(), compound];
    (body, any::<bool>()).prop_map(|(body, reverse)| {
        if reverse {
            format!("complement({})", body)
        } else {
            body
        }
    })
}

/// Compound locations whose segments are complemented one by one.
fn arb_mixed_location() -> impl Strategy<Value = String> {
    prop::collection::vec((arb_simple(), any::<bool>()), 2..6).prop_map(|parts| {
        let parts: Vec<String> = parts
            .into_iter()
            .map(|(p, reverse)| {
                if reverse {
                    format!("complement({})", p)
                } else {
                    p
                }
            })
            .collect();
        format!("join({})", parts.join(","))
    })
}

proptest! {
    #[test]
    fn canonical_text_round_trips(text in arb_location()) {
        let loc = parse_location(&text).unwrap();
        prop_assert_eq!(loc.to_string(), text);
    }

    #[test]
    fn rendering_is_a_fixed_point(text in arb_mixed_location()) {
        let once = parse_location(&text).unwrap();
        let rendered = once.to_string();
        let twice: Location = rendered.parse().unwrap();
        prop_assert_eq!(&twice, &once);
        prop_assert_eq!(twice.to_string(), rendered);
    }

    #[test]
    fn shift_is_reversible(text in arb_location(), delta in -1_000i64..1_000) {
        let loc = parse_location(&text).unwrap();
        let shifted = loc.shifted(delta).unwrap();
        prop_assert_eq!(shifted.len(), loc.len());
        prop_assert_eq!(shifted.strand(), loc.strand());
        prop_assert_eq!(shifted.shifted(-delta).unwrap(), loc);
    }

    #[test]
    fn whitespace_is_ignored(text in arb_location()) {
        let spaced = text.replace(',', " ,\n ").replace('(', "( ");
        prop_assert_eq!(parse_location(&spaced).unwrap(), parse_location(&text).unwrap());
    }
}
