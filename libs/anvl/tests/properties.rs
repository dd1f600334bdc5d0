//! Property tests for value encoding and record round trips.

use ark_anvl::{decode_element_value, encode_element_value, AnvlRecord, ErcRecord};
use proptest::prelude::*;

const RESERVED: &str = " !\"#$&'()*+,./:;<=>?@[\\]|";

/// Space separated words of printable ASCII.
fn sentence() -> impl Strategy<Value = String> {
    "[!-~]{1,12}( [!-~]{1,12}){0,8}"
}

fn label() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,8}"
}

proptest! {
    #[test]
    fn decode_inverts_encode(value in any::<String>()) {
        prop_assert_eq!(decode_element_value(&encode_element_value(&value)), value);
    }

    #[test]
    fn decode_inverts_encode_of_codes(value in "(%|%pe|%sp|pe|sp|[ ,/])*") {
        prop_assert_eq!(decode_element_value(&encode_element_value(&value)), value);
    }

    #[test]
    fn encoded_values_have_no_reserved_chars(value in any::<String>()) {
        let encoded = encode_element_value(&value);
        prop_assert!(!encoded.chars().any(|c| RESERVED.contains(c)));
    }

    #[test]
    fn anvl_records_survive_wrapping(
        elements in proptest::collection::btree_map(label(), sentence(), 1..6),
        wrap_width in 0usize..80,
    ) {
        let mut record = AnvlRecord::with_wrap_width(wrap_width);
        for (label, value) in &elements {
            record.add(label.as_str(), value).unwrap();
        }

        let parsed = AnvlRecord::parse(&record.serialize(true)).unwrap();
        prop_assert_eq!(
            parsed.iter().collect::<Vec<_>>(),
            record.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn erc_stories_survive_serialization(
        values in proptest::collection::vec(sentence(), 0..=4),
        wrap_width in 0usize..80,
    ) {
        let mut record = ErcRecord::with_wrap_width(wrap_width);
        record.add_story(&values, None, true).unwrap();

        let text = record.record(true, false);
        prop_assert!(ErcRecord::is_valid_record(&text, None));

        let parsed = ErcRecord::parse(&text, None).unwrap();
        prop_assert_eq!(
            parsed.as_anvl().iter().collect::<Vec<_>>(),
            record.as_anvl().iter().collect::<Vec<_>>()
        );
    }
}
