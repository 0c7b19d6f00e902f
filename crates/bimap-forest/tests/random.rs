use std::collections::BTreeMap;

use bimap_forest::Bimap;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

#[test]
fn permuted_insertion_orders_build_equal_maps() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(0xB1AA);
    let pairs: Vec<(i64, i64)> = (0..512).map(|i| (i, 100_000 - i)).collect();

    let mut reference: Bimap<i64, i64> = Bimap::new();
    for &(l, r) in &pairs {
        assert!(!reference.insert(l, r).is_end());
    }
    reference.assert_valid().unwrap();

    for _ in 0..8 {
        let mut shuffled = pairs.clone();
        shuffled.shuffle(&mut rng);
        let mut map: Bimap<i64, i64> = Bimap::new();
        for &(l, r) in &shuffled {
            assert!(!map.insert(l, r).is_end());
        }
        map.assert_valid().unwrap();
        assert_eq!(map, reference);
    }
}

/// Drive a map and a pair of `BTreeMap` views through the same random
/// operation stream and demand they never disagree.
#[test]
fn random_ops_match_a_pair_of_btreemaps() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(0xD0_0D1E);
    let mut map: Bimap<i64, i64> = Bimap::new();
    let mut left_view: BTreeMap<i64, i64> = BTreeMap::new();
    let mut right_view: BTreeMap<i64, i64> = BTreeMap::new();

    const STEPS: usize = 20_000;
    const KEY_SPACE: i64 = 512;

    for step in 0..STEPS {
        match rng.gen_range(0..10) {
            0..=4 => {
                let l = rng.gen_range(0..KEY_SPACE);
                let r = rng.gen_range(0..KEY_SPACE);
                let it = map.insert(l, r);
                let expect_ok = !left_view.contains_key(&l) && !right_view.contains_key(&r);
                assert_eq!(!it.is_end(), expect_ok, "insert ({l}, {r}) at step {step}");
                if expect_ok {
                    left_view.insert(l, r);
                    right_view.insert(r, l);
                }
            }
            5..=6 => {
                let l = rng.gen_range(0..KEY_SPACE);
                let removed = map.del_left(&l);
                assert_eq!(removed, left_view.contains_key(&l));
                if let Some(r) = left_view.remove(&l) {
                    right_view.remove(&r);
                }
            }
            7 => {
                let r = rng.gen_range(0..KEY_SPACE);
                let removed = map.del_right(&r);
                assert_eq!(removed, right_view.contains_key(&r));
                if let Some(l) = right_view.remove(&r) {
                    left_view.remove(&l);
                }
            }
            8 => {
                // Erase through a cursor found by lower bound, like an
                // iterator-driven caller would.
                let l = rng.gen_range(0..KEY_SPACE);
                let it = map.lower_bound_left(&l);
                if !it.is_end() {
                    let key = *map.left_key(it);
                    let succ = map.erase_left(it);
                    let r = left_view.remove(&key).unwrap();
                    right_view.remove(&r);
                    let expect_succ = left_view.range(key..).next().map(|(&k, _)| k);
                    let got_succ = (!succ.is_end()).then(|| *map.left_key(succ));
                    assert_eq!(got_succ, expect_succ);
                }
            }
            _ => {
                let l = rng.gen_range(0..KEY_SPACE);
                assert_eq!(map.at_left(&l).ok().copied(), left_view.get(&l).copied());
                let r = rng.gen_range(0..KEY_SPACE);
                assert_eq!(map.at_right(&r).ok().copied(), right_view.get(&r).copied());
            }
        }

        assert_eq!(map.size(), left_view.len());
        if step % 256 == 0 {
            map.assert_valid().unwrap();
            let lefts: Vec<(i64, i64)> = map
                .iter_left()
                .map(|l| (*l, *map.at_left(l).unwrap()))
                .collect();
            let expect: Vec<(i64, i64)> = left_view.iter().map(|(&l, &r)| (l, r)).collect();
            assert_eq!(lefts, expect);
            let rights: Vec<i64> = map.iter_right().copied().collect();
            let expect: Vec<i64> = right_view.keys().copied().collect();
            assert_eq!(rights, expect);
        }
    }
    map.assert_valid().unwrap();
}

#[test]
fn random_flips_land_on_the_same_record() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(7);
    let mut map: Bimap<i64, i64> = Bimap::new();
    for _ in 0..1_000 {
        let l = rng.gen_range(0..10_000);
        let r = rng.gen_range(0..10_000);
        map.insert(l, r);
    }
    map.assert_valid().unwrap();
    let mut it = map.begin_left();
    while !it.is_end() {
        let l = *map.left_key(it);
        let r = *map.right_key(it.flip());
        assert_eq!(map.at_left(&l), Ok(&r));
        assert_eq!(map.find_right(&r).flip(), it);
        it = map.next_left(it);
    }
}

#[test]
fn random_at_or_default_churn_stays_valid() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(0xDEFA);
    let mut map: Bimap<i64, i64> = Bimap::new();
    for step in 0..2_000 {
        let l = rng.gen_range(0..256);
        let before = map.at_left(&l).ok().copied();
        let got = *map.at_left_or_default(l);
        match before {
            Some(r) => assert_eq!(got, r),
            None => assert_eq!(got, 0),
        }
        if before.is_none() {
            // The default value always migrates to the most recent asker.
            assert_eq!(map.at_right(&0), Ok(&l));
        }
        if rng.gen_bool(0.3) {
            map.del_left(&rng.gen_range(0..256));
        }
        if step % 128 == 0 {
            map.assert_valid().unwrap();
        }
    }
    map.assert_valid().unwrap();
}
