use proptest::prelude::*;
use triplesec::{Cipher, Error, KdfParams, OVERHEAD};

// Envelope produced by an independent TripleSec implementation.
const FOREIGN_ENVELOPE: &str = "1c94d7de0000000359a5e5d60f09ebb6bc3fdab6642725e03bc3d51e167fa60327df567476d467f8b6ce65a909b4f582443f230ff10a36f60315ebce1cf1395d7b763c768764207f4f4cc5207a21272f3a5542f35db73c94fbc7bd551d4d6b0733e0b27fdf9606b8a26d45c4b79818791b6ae1ad34c23e58de482d454895618a1528ec722c5218650f8a2f55f63a6066ccf875f46c9b68ed31bc1ddce8881d704be597e1b5006d16ebe091a02e24d569f3d09b0578d12f955543e1a1f1dd75784b8b4cba7ca0bb7044389eb6354cea628a21538d";

fn fast(passphrase: &[u8]) -> Cipher {
    Cipher::with_kdf_params(passphrase, KdfParams::new(4, 8, 1).unwrap()).unwrap()
}

#[test]
fn standard_work_factor_scenario() {
    let plaintext = b"1234567890-".to_vec();
    let password = b"42".to_vec();

    let cipher = Cipher::new(&password).unwrap();
    let envelope = cipher.encrypt(&plaintext).unwrap();

    assert_eq!(envelope.len(), 219);
    assert_eq!(hex::encode(&envelope[..8]), "1c94d7de00000003");

    let orig_envelope = envelope.clone();
    assert_eq!(cipher.decrypt(&envelope).unwrap().as_slice(), b"1234567890-");

    assert_eq!(plaintext, b"1234567890-");
    assert_eq!(password, b"42");
    assert_eq!(envelope, orig_envelope);

    let wrong = Cipher::new(b"43").unwrap();
    assert_eq!(
        wrong.decrypt(&envelope).unwrap_err(),
        Error::AuthenticationFailure
    );
}

#[test]
fn foreign_envelope_decrypts_with_its_passphrase() {
    let envelope = hex::decode(FOREIGN_ENVELOPE).unwrap();
    assert_eq!(envelope.len(), 4 + OVERHEAD);

    let plaintext = Cipher::new(b"42").unwrap().decrypt(&envelope).unwrap();
    assert_eq!(plaintext.as_slice(), b"ciao");
}

#[test]
fn foreign_envelope_rejects_near_miss_passphrases() {
    let envelope = hex::decode(FOREIGN_ENVELOPE).unwrap();

    for passphrase in [&b"4"[..], b"42 ", b"1234567890-"] {
        let cipher = Cipher::new(passphrase).unwrap();
        assert_eq!(
            cipher.decrypt(&envelope).unwrap_err(),
            Error::AuthenticationFailure
        );
    }
}

#[test]
fn foreign_envelope_with_bad_passphrase() {
    let envelope = hex::decode(FOREIGN_ENVELOPE).unwrap();
    let cipher = Cipher::new(b"423").unwrap();

    assert_eq!(
        cipher.decrypt(&envelope).unwrap_err(),
        Error::AuthenticationFailure
    );
}

#[test]
fn short_envelope_is_malformed() {
    let cipher = fast(b"pw");

    for len in [0, 1, 8, 207, 208] {
        assert!(
            matches!(
                cipher.decrypt(&vec![0u8; len]),
                Err(Error::MalformedEnvelope(_))
            ),
            "len {len}"
        );
    }
}

#[test]
fn altered_magic_is_malformed() {
    let cipher = fast(b"pw");
    let mut envelope = cipher.encrypt(b"hello").unwrap();
    envelope[0] = 0x1d;

    assert!(matches!(
        cipher.decrypt(&envelope),
        Err(Error::MalformedEnvelope(_))
    ));
}

#[test]
fn other_versions_are_unsupported() {
    let cipher = fast(b"pw");
    let envelope = cipher.encrypt(b"hello").unwrap();

    for version in [0u32, 1, 2, 4, u32::MAX] {
        let mut altered = envelope.clone();
        altered[4..8].copy_from_slice(&version.to_be_bytes());
        assert_eq!(
            cipher.decrypt(&altered).unwrap_err(),
            Error::UnsupportedVersion(version)
        );
    }
}

#[test]
fn cipher_is_shared_across_threads() {
    let cipher = fast(b"shared");

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                let cipher = &cipher;
                s.spawn(move || {
                    let plaintext = vec![i; 100 + i as usize];
                    let envelope = cipher.encrypt(&plaintext).unwrap();
                    assert_eq!(cipher.decrypt(&envelope).unwrap().as_slice(), plaintext);
                    envelope
                })
            })
            .collect();

        let envelopes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for (i, envelope) in envelopes.iter().enumerate() {
            assert_eq!(envelope.len(), 100 + i + OVERHEAD);
        }
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn roundtrip_any_plaintext(
        plaintext in proptest::collection::vec(any::<u8>(), 1..2048),
        passphrase in proptest::collection::vec(any::<u8>(), 1..64),
    ) {
        let cipher = fast(&passphrase);
        let envelope = cipher.encrypt(&plaintext).unwrap();

        prop_assert_eq!(envelope.len(), plaintext.len() + OVERHEAD);
        let recovered = cipher.decrypt(&envelope).unwrap();
        prop_assert_eq!(recovered.as_slice(), plaintext.as_slice());
    }

    #[test]
    fn any_bit_flip_is_rejected(
        plaintext in proptest::collection::vec(any::<u8>(), 1..64),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let cipher = fast(b"pw");
        let mut envelope = cipher.encrypt(&plaintext).unwrap();
        let offset = position.index(envelope.len());
        envelope[offset] ^= 1 << bit;

        let err = cipher.decrypt(&envelope).unwrap_err();
        match offset {
            0..4 => prop_assert!(matches!(err, Error::MalformedEnvelope(_))),
            4..8 => prop_assert!(matches!(err, Error::UnsupportedVersion(_))),
            _ => prop_assert_eq!(err, Error::AuthenticationFailure),
        }
    }
}
