//! Property tests for name handling and vendor extension normalization

use proptest::prelude::*;
use xsd2jsonschema::jsonschema::XTotvsRecord;
use xsd2jsonschema::names;

proptest! {
    #[test]
    fn required_is_true_only_for_sim(token in "[A-Za-z ]{0,8}") {
        let mut record = XTotvsRecord::new("RM");
        record.set_required(&token);
        prop_assert_eq!(record.required(), token.eq_ignore_ascii_case("sim"));
    }

    #[test]
    fn required_ignores_case(sim in "[sS][iI][mM]") {
        let mut record = XTotvsRecord::new("RM");
        record.set_required(&sim);
        prop_assert!(record.required());
    }

    #[test]
    fn message_name_splits_versioned_stems(
        title in "[A-Z][A-Za-z]{0,12}",
        major in 0u32..100,
        minor in "[0-9]{3}",
    ) {
        let filename = format!("{}_{}_{}.xsd", title, major, minor);
        let (parsed, version) = names::parse_message_name(&filename);
        prop_assert_eq!(parsed, title);
        prop_assert_eq!(version, Some(format!("{}.{}", major, minor)));
    }

    #[test]
    fn lower_case_first_letter_keeps_the_tail(name in "[A-Z][A-Za-z0-9]{0,10}") {
        let lowered = names::lower_case_first_letter(&name);
        prop_assert_eq!(&lowered[1..], &name[1..]);
        prop_assert!(lowered.starts_with(|c: char| c.is_lowercase()));
    }

    #[test]
    fn list_of_names(child in "[A-Z][A-Za-z]{0,10}") {
        let wrapper = format!("{}{}s", names::LIST_OF_PREFIX, child);
        prop_assert!(names::is_list_of(&wrapper));
        let parcel = format!("Parcel{}", child);
        prop_assert!(!names::is_list_of(&parcel));
    }
}
