//! Property tests: for any record list and metadata, save-then-reopen gives
//! back the same list (modulo the whitespace trimming the read path applies).

use aimlstore_core::{DocumentMeta, Record, RuleStore, SetMode};
use proptest::prelude::*;

/// Printable ASCII plus the Latin-1 letter block — covers XML-escaped
/// characters, the single-byte encoding range, and surrounding whitespace.
fn field() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ -~\u{c0}-\u{ff}]{0,24}").unwrap()
}

fn record_list() -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::vec(
        (field(), field()).prop_map(|(pattern, response)| Record { pattern, response }),
        0..12,
    )
}

fn trimmed(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|r| Record::new(r.pattern.trim(), r.response.trim()))
        .collect()
}

proptest! {
    #[test]
    fn save_reopen_round_trip(records in record_list()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.aiml");

        let store = RuleStore::from_records(&records, DocumentMeta::default());
        store.save(Some(path.as_path())).unwrap();

        let reopened = RuleStore::open(&path).unwrap();
        prop_assert_eq!(reopened.as_record_list().unwrap(), trimmed(&records));
    }

    #[test]
    fn fragment_reparse_round_trip(records in record_list()) {
        let store = RuleStore::from_records(&records, DocumentMeta::default());
        let fragment = store.to_text().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fragment.aiml");
        std::fs::write(&path, fragment).unwrap();

        let reopened = RuleStore::open(&path).unwrap();
        prop_assert_eq!(reopened.as_record_list().unwrap(), trimmed(&records));
    }

    #[test]
    fn overwrite_is_idempotent(initial in record_list(), replacement in record_list()) {
        let mut store = RuleStore::from_records(&initial, DocumentMeta::default());

        store.set_records(&replacement, SetMode::Overwrite).unwrap();
        let once = store.as_record_list().unwrap();
        store.set_records(&replacement, SetMode::Overwrite).unwrap();
        let twice = store.as_record_list().unwrap();

        prop_assert_eq!(&once, &trimmed(&replacement));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merge_never_deletes_and_never_reorders(initial in record_list(), incoming in record_list()) {
        let mut store = RuleStore::from_records(&initial, DocumentMeta::default());
        let before = store.as_record_list().unwrap();

        store.set_records(&incoming, SetMode::MergeByPattern).unwrap();
        let after = store.as_record_list().unwrap();

        // Merge can rewrite responses and append, never drop or reorder.
        prop_assert!(after.len() >= before.len());
        for (index, record) in before.iter().enumerate() {
            prop_assert_eq!(&after[index].pattern, &record.pattern);
        }
    }
}
