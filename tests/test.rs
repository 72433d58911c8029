// Integration tests. The scenario tests pin down the behaviour of equal keys,
// empty lists and positional access; random_edits runs the list against a
// plain Vec.

#[cfg(test)]
mod test {
    use indexed_skiplist::*;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use testdrop::TestDrop;

    use std::fmt::Debug;

    type Tagged = (u32, char);

    fn tag_key(item: &Tagged) -> u32 {
        item.0
    }

    fn drop_key(item: &(u32, testdrop::Item<'_>)) -> u32 {
        item.0
    }

    type TaggedList = SkipList<Tagged, u32, fn(&Tagged) -> u32>;

    fn tagged(indexed: bool, seed: u64) -> TaggedList {
        let options = Options { indexed, seed: Some(seed), ..Options::default() };
        SkipList::with_options(tag_key as fn(&Tagged) -> u32, options).unwrap()
    }

    fn check<T, K, F, R>(list: &SkipList<T, K, F, R>, expected: &[T])
    where T: PartialEq + Debug, K: Ord, F: Fn(&T) -> K, R: Rng {
        list.check();
        let contents: Vec<&T> = list.iter().collect();
        let expected: Vec<&T> = expected.iter().collect();
        assert_eq!(contents, expected);
        assert_eq!(list.len(), expected.len());
        assert_eq!(list.is_empty(), expected.is_empty());

        let backwards: Vec<&T> = list.iter().rev().collect();
        let mut reversed = expected.clone();
        reversed.reverse();
        assert_eq!(backwards, reversed);

        if list.is_indexed() {
            for (i, item) in expected.iter().enumerate() {
                assert_eq!(list.get(i as isize).unwrap(), *item);
                let node = list.node_at(i as isize).unwrap();
                assert_eq!(list.index_of(node), Ok(i));
            }
        }
    }

    #[test]
    fn sanity() {
        let list = tagged(true, 1);
        check(&list, &[]);
        assert_eq!(list.height(), 0);

        let list = SkipList::from_sorted(|x: &i32| *x, Options::default(), vec![1, 2, 3, 4]).unwrap();
        check(&list, &[1, 2, 3, 4]);
    }

    #[test]
    fn mixed_inserts_sort_stably() {
        for &indexed in &[true, false] {
            let mut list = tagged(indexed, 2);
            for &item in &[(5, 'a'), (3, 'b'), (8, 'c'), (3, 'd'), (1, 'e')] {
                list.insert(item);
            }
            check(&list, &[(1, 'e'), (3, 'b'), (3, 'd'), (5, 'a'), (8, 'c')]);
        }
    }

    #[test]
    fn equal_key_placement() {
        let mut list = tagged(true, 3);
        list.insert((7, 'a'));
        list.insert((7, 'b'));
        check(&list, &[(7, 'a'), (7, 'b')]);

        let mut list = tagged(true, 3);
        list.insert((7, 'a'));
        list.insert_with((7, 'b'), Placement::BeforeEqual);
        check(&list, &[(7, 'b'), (7, 'a')]);
    }

    #[test]
    fn empty_list_errors() {
        let mut list = tagged(true, 4);
        assert_eq!(list.pop_first(), Err(SkipListError::EmptyCollection));
        assert_eq!(list.pop_last(), Err(SkipListError::EmptyCollection));
        assert_eq!(list.first(), Err(SkipListError::EmptyCollection));
        assert_eq!(list.last(), Err(SkipListError::EmptyCollection));
        assert_eq!(list.get(0), Err(SkipListError::IndexOutOfRange { index: 0, len: 0 }));
        assert_eq!(list.remove_first(&1), Err(SkipListError::KeyNotFound));
        assert_eq!(list.find_last(&1), Err(SkipListError::KeyNotFound));
        assert!(list.range(&0, &100).is_empty());
        assert!(list.pop_range(&0, &100).is_empty());
        check(&list, &[]);
    }

    #[test]
    fn single_element_indexing() {
        let mut list = tagged(true, 5);
        let node = list.insert((42, 'x'));
        assert_eq!(list.node_at(0), Ok(node));
        assert_eq!(list.node_at(-1), Ok(node));
        assert_eq!(list.node_at(1), Err(SkipListError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(list.node_at(-2), Err(SkipListError::IndexOutOfRange { index: -2, len: 1 }));
        assert_eq!(list.index_of(node), Ok(0));
    }

    #[test]
    fn height_stays_under_ceiling() {
        let options = Options { probability: 0.25, seed: Some(6), ..Options::default() };
        let mut list = SkipList::with_options(|x: &u32| *x, options).unwrap();
        let bound = ((10_002f64 * 4.0).ln() / 4f64.ln()).ceil() as usize;
        let mut rng = SmallRng::seed_from_u64(6);
        for _ in 0..10_000 {
            list.insert(rng.gen::<u32>());
            assert!(list.height() <= bound, "height {} above {}", list.height(), bound);
        }
        assert_eq!(list.len(), 10_000);
        list.check();
    }

    #[test]
    fn invalid_configuration() {
        for &p in &[0.0, 1.0, 2.0, -1.0] {
            let options = Options { probability: p, ..Options::default() };
            match SkipList::with_options(|x: &i32| *x, options) {
                Err(SkipListError::InvalidConfiguration(_)) => {}
                Err(e) => panic!("wrong error {}", e),
                Ok(_) => panic!("probability {} accepted", p),
            }
        }
    }

    #[test]
    fn index_and_handle_agree_after_edits() {
        let mut list = tagged(true, 7);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut handles = Vec::new();
        for i in 0..300 {
            handles.push(list.insert((rng.gen_range(0, 50), (b'a' + (i % 26) as u8) as char)));
        }
        for _ in 0..100 {
            let i = rng.gen_range(0, list.len()) as isize;
            list.pop_at(i).unwrap();
        }
        list.check();

        let mut live = 0;
        for &node in &handles {
            match list.index_of(node) {
                Ok(i) => {
                    live += 1;
                    assert_eq!(list.node_at(i as isize), Ok(node));
                    assert_eq!(list.get(i as isize), list.element(node));
                }
                Err(e) => assert_eq!(e, SkipListError::StaleHandle),
            }
        }
        assert_eq!(live, 200);
    }

    #[test]
    fn remove_by_key_and_handle() {
        let mut list = tagged(false, 8);
        let b = list.insert((2, 'b'));
        list.insert((2, 'c'));
        list.insert((1, 'a'));
        list.insert((2, 'd'));
        assert_eq!(list.count_key(&2), 3);
        assert_eq!(list.find_first(&2), Ok(&(2, 'b')));
        assert_eq!(list.find_last(&2), Ok(&(2, 'd')));
        assert_eq!(list.find_first_node(&2), Ok(b));

        assert_eq!(list.remove_last(&2), Ok((2, 'd')));
        assert_eq!(list.remove(b), Ok((2, 'b')));
        assert_eq!(list.remove_first(&3), Err(SkipListError::KeyNotFound));
        check(&list, &[(1, 'a'), (2, 'c')]);
        assert!(list.contains_key(&2));
        assert!(!list.contains_key(&3));
    }

    #[test]
    fn describe_visits_every_node() {
        let mut list = tagged(true, 9);
        list.extend(vec![(1, 'a'), (2, 'b'), (3, 'c')]);
        let mut seen = Vec::new();
        list.describe(|node| {
            if let Some(widths) = node.widths {
                assert_eq!(widths.len(), node.height);
                if node.element.is_some() {
                    assert_eq!(widths[0], 1);
                }
            }
            seen.push(node.key.as_key().copied());
        });
        assert_eq!(seen, vec![None, Some(1), Some(2), Some(3), None]);
    }

    #[test]
    fn pop_range_complement() {
        for &indexed in &[true, false] {
            let mut list = tagged(indexed, 10);
            let items: Vec<Tagged> = (0..60).map(|i| (i % 20, (b'a' + (i / 20) as u8) as char)).collect();
            list.extend(items.iter().copied());

            let popped = list.pop_range(&5, &9);
            let mut expected: Vec<Tagged> = items.clone();
            expected.sort_by_key(|e| e.0);
            let (inside, outside): (Vec<Tagged>, Vec<Tagged>) =
                expected.into_iter().partition(|e| e.0 >= 5 && e.0 <= 9);
            assert_eq!(popped, inside);
            check(&list, &outside);
        }
    }

    #[test]
    fn random_edits() {
        for &indexed in &[true, false] {
            let mut list = tagged(indexed, 11);
            let mut oracle: Vec<Tagged> = Vec::new();
            let mut rng = SmallRng::seed_from_u64(11);

            for i in 0..2000 {
                if i % 100 == 0 {
                    check(&list, &oracle);
                }

                let len = oracle.len();
                let key = rng.gen_range(0, 40);
                let item = (key, (b'a' + rng.gen_range(0, 26)) as char);
                match rng.gen_range(0, 6) {
                    0 | 1 | 2 if len < 300 => {
                        if rng.gen::<bool>() {
                            let pos = oracle.partition_point(|e| e.0 <= key);
                            oracle.insert(pos, item);
                            list.insert(item);
                        } else {
                            let pos = oracle.partition_point(|e| e.0 < key);
                            oracle.insert(pos, item);
                            list.insert_with(item, Placement::BeforeEqual);
                        }
                    }
                    3 => {
                        let expected = oracle.iter().position(|e| e.0 == key).map(|p| oracle.remove(p));
                        assert_eq!(list.remove_first(&key).ok(), expected);
                    }
                    4 => {
                        let expected = oracle.iter().rposition(|e| e.0 == key).map(|p| oracle.remove(p));
                        assert_eq!(list.remove_last(&key).ok(), expected);
                    }
                    _ if indexed && len > 0 => {
                        let index = rng.gen_range(0, len);
                        assert_eq!(list.pop_at(index as isize), Ok(oracle.remove(index)));
                    }
                    _ => {
                        assert_eq!(list.pop_first().ok(), if len > 0 { Some(oracle.remove(0)) } else { None });
                    }
                }
            }
            check(&list, &oracle);
        }
    }

    #[test]
    fn elements_drop_exactly_once() {
        let td = TestDrop::new();
        let mut ids = Vec::new();
        {
            let mut list = SkipList::with_options(
                drop_key,
                Options { seed: Some(12), ..Options::default() },
            ).unwrap();
            for key in 0..20 {
                let (id, item) = td.new_item();
                ids.push(id);
                list.insert((key, item));
            }

            let (_, first) = list.pop_first().unwrap();
            td.assert_no_drop(first.id());
            drop(first);
            td.assert_drop(ids[0]);

            let removed = list.remove_first(&5).unwrap();
            td.assert_no_drop(ids[5]);
            drop(removed);
            td.assert_drop(ids[5]);

            let popped = list.pop_range(&10, &14);
            assert_eq!(popped.len(), 5);
            drop(popped);
            for &id in &ids[10..15] {
                td.assert_drop(id);
            }

            // Slot reuse must not drop anything that is still in the list.
            let (id, item) = td.new_item();
            ids.push(id);
            list.insert((100, item));
            assert_eq!(td.num_dropped_items(), 7);
            list.check();
        }
        for &id in &ids {
            td.assert_drop(id);
        }
        assert_eq!(td.num_dropped_items(), td.num_tracked_items());
    }

    #[test]
    fn clear_and_into_iter_drop_everything() {
        let td = TestDrop::new();
        let mut list = SkipList::with_options(
            drop_key,
            Options { seed: Some(13), indexed: false, ..Options::default() },
        ).unwrap();
        for key in 0..10 {
            let (_, item) = td.new_item();
            list.insert((key, item));
        }
        list.clear();
        assert_eq!(td.num_dropped_items(), 10);

        for key in 0..10 {
            let (_, item) = td.new_item();
            list.insert((key, item));
        }
        let keys: Vec<u32> = list.into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());
        assert_eq!(td.num_dropped_items(), 20);
    }
}
