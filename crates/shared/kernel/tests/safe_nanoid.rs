use wf_kernel::SAFE_ALPHABET;
use wf_kernel::safe_nanoid;

#[test]
fn generates_expected_length_and_charset() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);
    assert!(id.chars().all(|ch| SAFE_ALPHABET.contains(&ch)), "unexpected character in {id}");
}

#[test]
fn custom_length_ids_are_distinct() {
    let a = safe_nanoid!(20);
    let b = safe_nanoid!(20);
    assert_eq!(a.len(), 20);
    assert_ne!(a, b);
}
