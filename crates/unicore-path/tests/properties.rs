use proptest::prelude::*;
use unicore_path::{get, has, set, try_get};
use unicore_value::{Key, Value};

fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        "[a-d]{1,3}".prop_map(Key::from),
        (0i64..4).prop_map(Key::Int),
    ]
}

fn arb_doc() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,4}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::list),
            prop::collection::vec((arb_key(), inner), 0..4)
                .prop_map(|pairs| Value::map(pairs.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn has_agrees_with_get(doc in arb_doc(), path in prop::collection::vec(arb_key(), 1..4)) {
        let found = try_get(&doc, path.clone()).unwrap();
        prop_assert_eq!(has(&doc, path), found.is_some());
    }

    #[test]
    fn set_then_get_round_trips(
        path in prop::collection::vec("[a-d]{1,3}".prop_map(Key::from), 1..4),
        n in any::<i64>(),
    ) {
        let doc = Value::empty_map();
        set(&doc, path.clone(), Value::from(n)).unwrap();
        prop_assert_eq!(get(&doc, path, Value::Null).unwrap(), Value::from(n));
    }

    #[test]
    fn set_into_lists_then_get(idx in 0i64..6, n in any::<i64>()) {
        let doc = Value::empty_map();
        let path = vec![Key::from("xs"), Key::Int(idx), Key::from("v")];
        set(&doc, path.clone(), Value::from(n)).unwrap();
        prop_assert_eq!(get(&doc, path, Value::Null).unwrap(), Value::from(n));
    }
}
