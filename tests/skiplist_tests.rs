// Skip map: insert, lookup, erase.
//
// Note: files in tests/ are integration tests; they see the crate as an
// external consumer.

use skipmap::SkipMap;

// =============================================================================
// Test 1: Insert out of order, iterate in order
// =============================================================================
// Insert 5, 1, 3; forward iteration must come out sorted.
#[test]
fn insert_out_of_order_iterates_sorted() {
    let mut sl = SkipMap::new();
    sl.insert(5, "e");
    sl.insert(1, "a");
    sl.insert(3, "c");

    let collected: Vec<_> = sl.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(collected, [(1, "a"), (3, "c"), (5, "e")]);
    sl.verify().unwrap();
}

// =============================================================================
// Test 2: Duplicate insert keeps the first value
// =============================================================================
#[test]
fn insert_duplicate_key_keeps_first_value() {
    let mut sl = SkipMap::new();
    let (first, inserted) = sl.insert(10, "first");
    assert!(inserted);

    let (second, inserted) = sl.insert(10, "second");
    assert!(!inserted);
    assert_eq!(first, second);

    assert_eq!(sl.get(&10), Some(&"first"));
    assert_eq!(sl.len(), 1);
}

// =============================================================================
// Test 3: Erase from the middle
// =============================================================================
#[test]
fn erase_middle_key() {
    let mut sl: SkipMap<i32, ()> = (1..=5).map(|k| (k, ())).collect();

    assert_eq!(sl.remove(&3), Some(()));

    let keys: Vec<_> = sl.keys().copied().collect();
    assert_eq!(keys, [1, 2, 4, 5]);
    assert_eq!(sl.key_at(sl.lower_bound(&3)).unwrap(), &4);
    sl.verify().unwrap();
}

// =============================================================================
// Test 4: Empty map behavior
// =============================================================================
#[test]
fn empty_skiplist_behavior() {
    let sl: SkipMap<i32, i32> = SkipMap::new();
    assert_eq!(sl.begin(), sl.end());
    assert_eq!(sl.len(), 0);
    assert!(sl.is_empty());
    assert_eq!(sl.find(&42), sl.end());
    assert_eq!(sl.get(&42), None);
    assert_eq!(sl.first_key_value(), None);
    assert_eq!(sl.last_key_value(), None);
}

// =============================================================================
// Test 5: Find after insert
// =============================================================================
#[test]
fn find_after_insert_returns_entry() {
    let mut sl = SkipMap::new();
    for i in (0..100u32).rev() {
        sl.insert(format!("key_{:03}", i), i);
    }

    let at = sl.find("key_042");
    assert_eq!(sl.entry_at(at).unwrap(), (&"key_042".to_string(), &42));
    assert!(sl.find("key_100").is_end());
    assert!(sl.contains_key("key_000"));
}

// =============================================================================
// Test 6: Erase absent key is a no-op
// =============================================================================
#[test]
fn erase_absent_key_is_noop() {
    let mut sl: SkipMap<i32, i32> = (0..10).map(|k| (k * 2, k)).collect();

    assert_eq!(sl.remove(&7), None);
    assert_eq!(sl.remove(&100), None);
    assert_eq!(sl.remove(&-1), None);
    assert_eq!(sl.len(), 10);
    sl.verify().unwrap();
}

// =============================================================================
// Test 7: Erase then find
// =============================================================================
#[test]
fn erase_then_find_returns_end() {
    let mut sl = SkipMap::new();
    sl.insert("a", 1);
    sl.insert("b", 2);

    assert_eq!(sl.remove_entry("a"), Some(("a", 1)));
    assert!(sl.find("a").is_end());
    assert_eq!(sl.len(), 1);

    // Erasing it again changes nothing.
    assert_eq!(sl.remove("a"), None);
    assert_eq!(sl.len(), 1);
}

// =============================================================================
// Test 8: Upsert on read
// =============================================================================
// get_or_insert_default creates the entry when it is missing.
#[test]
fn get_or_insert_default_creates_entry() {
    let mut sl: SkipMap<&str, u32> = SkipMap::new();

    *sl.get_or_insert_default("hits") += 1;
    *sl.get_or_insert_default("hits") += 1;
    assert_eq!(*sl.get_or_insert_default("misses"), 0);

    assert_eq!(sl.get("hits"), Some(&2));
    assert_eq!(sl.len(), 2);
    sl.verify().unwrap();
}

// =============================================================================
// Test 9: Emplace
// =============================================================================
#[test]
fn emplace_builds_then_inserts() {
    let mut sl = SkipMap::new();

    let (at, inserted) = sl.emplace(|| (7, String::from("seven")));
    assert!(inserted);
    assert_eq!(sl.value_at(at).unwrap().as_str(), "seven");

    let mut built = false;
    let (again, inserted) = sl.emplace(|| {
        built = true;
        (7, String::from("siete"))
    });
    assert!(built);
    assert!(!inserted);
    assert_eq!(again, at);
    assert_eq!(sl.get(&7).map(String::as_str), Some("seven"));
    assert_eq!(sl.len(), 1);
}

// =============================================================================
// Test 10: Fallible variants behave like the plain ones
// =============================================================================
#[test]
fn try_insert_and_try_emplace() {
    let mut sl = SkipMap::new();

    let (_, inserted) = sl.try_insert(1, 'a').unwrap();
    assert!(inserted);
    let (_, inserted) = sl.try_insert(1, 'b').unwrap();
    assert!(!inserted);

    let (at, inserted) = sl.try_emplace(|| (2, 'c')).unwrap();
    assert!(inserted);
    assert_eq!(sl.entry_at(at).unwrap(), (&2, &'c'));

    assert_eq!(sl.get(&1), Some(&'a'));
    sl.verify().unwrap();
}

// =============================================================================
// Test 11: Mutate values in place
// =============================================================================
#[test]
fn get_mut_updates_value() {
    let mut sl = SkipMap::new();
    sl.insert(1, vec![1]);

    sl.get_mut(&1).unwrap().push(2);
    assert_eq!(sl.get(&1), Some(&vec![1, 2]));
    assert!(sl.get_mut(&2).is_none());
}

// =============================================================================
// Test 12: Pop from both ends
// =============================================================================
#[test]
fn pop_first_and_last() {
    let mut sl: SkipMap<u8, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();

    assert_eq!(sl.first_key_value(), Some((&1, &'a')));
    assert_eq!(sl.last_key_value(), Some((&3, &'c')));

    assert_eq!(sl.pop_last(), Some((3, 'c')));
    assert_eq!(sl.pop_first(), Some((1, 'a')));
    assert_eq!(sl.pop_first(), Some((2, 'b')));
    assert_eq!(sl.pop_first(), None);
    assert_eq!(sl.pop_last(), None);
    assert!(sl.is_empty());
    sl.verify().unwrap();
}

// =============================================================================
// Test 13: Insert 1000 keys, get all back
// =============================================================================
#[test]
fn insert_1000_keys_get_all_back() {
    let mut sl = SkipMap::new();
    let mut entries = Vec::new();
    for i in 0..1000u32 {
        let key = format!("key_{:05}", (i * 7919) % 1000).into_bytes();
        let val = format!("val_{}", i).into_bytes();
        entries.push((key.clone(), val.clone()));
        sl.insert(key, val);
    }

    for (k, v) in &entries {
        assert_eq!(sl.get(k.as_slice()), Some(v));
    }
    assert_eq!(sl.len(), 1000);
    sl.verify().unwrap();
}

// =============================================================================
// Test 14: Debug formatting
// =============================================================================
#[test]
fn debug_prints_as_map() {
    let sl: SkipMap<i32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
    assert_eq!(format!("{sl:?}"), r#"{1: "a", 2: "b"}"#);
}
