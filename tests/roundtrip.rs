use std::thread;

use quickcheck::quickcheck;
use zstd_session::{frame_content_size, size, Error, Session, Tunable};

const MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

fn words() -> Vec<u32> {
    (1..=10u32).map(u32::to_le).collect()
}

// Ten little-endian words, stored as a single raw block.
fn plain_frame() -> Vec<u8> {
    let mut frame = vec![0x28, 0xB5, 0x2F, 0xFD, 0x20, 0x28, 0x41, 0x01, 0x00];
    for word in 1..=10u32 {
        frame.extend_from_slice(&word.to_le_bytes());
    }
    assert_eq!(frame.len(), 49);
    frame
}

#[test]
fn ten_words_at_baseline_level() {
    let mut session = Session::new();
    let compressed = session.compress(&words()).unwrap();

    assert_eq!(&compressed[..4], &MAGIC[..]);
    assert_eq!(compressed, plain_frame());
    assert_eq!(frame_content_size(&compressed).unwrap(), 40);

    let decompressed: Vec<u32> = session.decompress(&compressed).unwrap();
    assert_eq!(decompressed, words());
    assert_eq!(
        decompressed.len() * 4,
        frame_content_size(&compressed).unwrap()
    );

    let streamed: Vec<u32> = session.decompress_stream(&compressed).unwrap();
    assert_eq!(streamed, words());
}

#[test]
fn signed_and_unsigned_frames_match() {
    let mut session = Session::new();
    let unsigned: Vec<u8> = session.compress_as(&words()).unwrap();
    let signed: Vec<i8> = session.compress_as(&words()).unwrap();
    assert_eq!(unsigned.len(), signed.len());
    assert_eq!(signed[1], -75);
    assert_eq!(unsigned[1], 181);

    let from_signed: Vec<u32> = session.decompress(&signed).unwrap();
    assert_eq!(from_signed, words());
}

#[test]
fn empty_input() {
    let mut session = Session::new();
    let compressed = session.compress::<u8>(&[]).unwrap();
    assert!(!compressed.is_empty());
    assert_eq!(frame_content_size(&compressed).unwrap(), 0);

    let bytes: Vec<u8> = session.decompress(&compressed).unwrap();
    let words: Vec<u32> = session.decompress(&compressed).unwrap();
    let quads: Vec<u64> = session.decompress_stream(&compressed).unwrap();
    assert!(bytes.is_empty());
    assert!(words.is_empty());
    assert!(quads.is_empty());
}

#[test]
fn levels_differ_but_content_matches() {
    let text: Vec<u8> = b"The quick brown fox jumps over the lazy dog. "
        .iter()
        .cycle()
        .take(64 * 1024)
        .cloned()
        .collect();

    let outputs: Vec<Vec<u8>> = [-5, 1, 3, 12, 19]
        .iter()
        .map(|&level| {
            let mut session = Session::with_level(level).unwrap();
            assert_eq!(session.compression_level(), level);
            session.compress(&text).unwrap()
        })
        .collect();

    let mut reader = Session::new();
    for compressed in &outputs {
        let decompressed: Vec<u8> = reader.decompress(compressed).unwrap();
        assert_eq!(decompressed, text);
    }
}

#[test]
fn undersized_destinations() {
    let mut session = Session::new();
    let data = vec![7u8; 1000];

    let mut small = vec![0u8; size::compress_bound(data.len()) - 1];
    match session.compress_to_buffer(&data, &mut small) {
        Err(Error::BufferTooSmall { .. }) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(small.iter().all(|&b| b == 0));

    let compressed = session.compress(&data).unwrap();
    let mut small = vec![0u8; data.len() - 1];
    match session.decompress_to_buffer(&compressed, &mut small) {
        Err(Error::BufferTooSmall {
            required: 1000,
            provided: 999,
        }) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(small.iter().all(|&b| b == 0));
}

#[test]
fn checksummed_frames_detect_corruption() {
    let data: Vec<u8> = (0..4096u32).map(|i| (i % 13) as u8).collect();
    let mut session = Session::new();
    session.set_parameter(Tunable::ChecksumFlag, 1).unwrap();

    let mut compressed = session.compress(&data).unwrap();
    let last = compressed.len() - 1;
    compressed[last] ^= 0xFF;

    match session.decompress::<u8, u8>(&compressed) {
        Err(Error::Engine { .. }) => (),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn sessions_on_separate_threads() {
    let handles: Vec<_> = (1..=4)
        .map(|level| {
            thread::spawn(move || {
                let data: Vec<u64> = (0..10_000u64).map(|i| i * level).collect();
                let mut session = Session::with_level(level as i32).unwrap();
                let compressed = session.compress(&data).unwrap();
                let decompressed: Vec<u64> =
                    session.decompress(&compressed).unwrap();
                decompressed == data
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

quickcheck! {
    fn roundtrip(data: Vec<u8>, level: i8) -> bool {
        let mut session = Session::with_level(i32::from(level % 20)).unwrap();
        let compressed = session.compress(&data).unwrap();
        let decompressed: Vec<u8> = session.decompress(&compressed).unwrap();
        decompressed == data
    }

    fn deterministic(data: Vec<u16>) -> bool {
        let mut session = Session::new();
        session.compress(&data).unwrap() == session.compress(&data).unwrap()
    }

    fn written_within_bound(data: Vec<u32>) -> bool {
        let mut session = Session::new();
        let bound = size::compress_bound_elements::<u32, u8>(data.len()).unwrap();
        let mut destination = vec![0u8; bound];
        let written = session.compress_slice(&data, &mut destination).unwrap();
        written <= bound && written == session.compress(&data).unwrap().len()
    }
}
