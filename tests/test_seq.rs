use std::collections::HashSet;

use evostream::{
    error::GeneticError,
    seq::{ISeq, MSeq, Seq},
};

#[test]
fn test_sealed_view_keeps_written_values() {
    let length = 6;
    let mut values = MSeq::filled(length, || 0);
    for i in 0..length {
        values.set(i, i * 10).unwrap();
    }

    let sealed = values.seal();
    for i in 0..length {
        assert_eq!(*sealed.get(i).unwrap(), i * 10);
    }
    assert_eq!(
        sealed.get(length),
        Err(GeneticError::IndexOutOfRange {
            index: length,
            length
        })
    );
}

#[test]
fn test_sub_view_length_and_write_through() {
    let mut values: MSeq<i32> = (0..10).collect();

    {
        let mut view = values.sub_seq_mut(3, 7).unwrap();
        assert_eq!(view.length(), 4);
        view.set(0, -3).unwrap();
        view.set(3, -6).unwrap();
        assert!(view.set(4, 0).is_err());
    }

    assert_eq!(*values.get(3).unwrap(), -3);
    assert_eq!(*values.get(6).unwrap(), -6);
    assert_eq!(*values.get(7).unwrap(), 7);
}

#[test]
fn test_empty_sub_views() {
    let values: ISeq<u8> = ISeq::from_vec(vec![1, 2, 3]);
    for i in 0..=3 {
        let view = values.sub_seq(i, i).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.length(), 0);
    }
    assert!(matches!(
        values.sub_seq(2, 1),
        Err(GeneticError::InvalidRange { .. })
    ));
    assert!(values.sub_seq(0, 4).is_err());
}

#[test]
fn test_copy_never_aliases() {
    let sealed: ISeq<String> = vec!["a".to_string(), "b".to_string()].into();
    let mut copy = sealed.copy();
    copy.set(0, "z".to_string()).unwrap();

    assert_eq!(sealed.get(0).unwrap(), "a");
    assert_eq!(copy.get(0).unwrap(), "z");
}

#[test]
fn test_structural_equality_and_hash() {
    let backing: ISeq<i32> = ISeq::from_vec(vec![9, 1, 2, 3, 9]);
    let view = backing.sub_seq(1, 4).unwrap();
    let other: ISeq<i32> = ISeq::from_vec(vec![1, 2, 3]);
    let mutable: MSeq<i32> = MSeq::from_vec(vec![1, 2, 3]);

    assert_eq!(view, other);
    assert!(mutable == other);
    assert!(!view.shares_storage(&other));

    let set: HashSet<ISeq<i32>> = [view, other].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn test_seal_is_idempotent() {
    let sealed = MSeq::from_vec(vec![1, 2, 3]).seal();
    let again = sealed.clone().seal();
    assert!(again.shares_storage(&sealed));
    assert_eq!(again, sealed);
}
