//! End-to-end checks of minting and verifying identity tokens.

use identity::{
    IdentityConfig, ImageOptions, RejectReason, TokenIssuer, TokenVerifier, VerificationResult,
};
use models::CustomerId;

fn pair(config: &IdentityConfig) -> (TokenIssuer, TokenVerifier) {
    (
        TokenIssuer::new(config).unwrap(),
        TokenVerifier::new(config).unwrap(),
    )
}

fn id(n: i64) -> CustomerId {
    CustomerId::new(n).unwrap()
}

#[test]
fn mint_42_round_trips_as_padded_id() {
    let (issuer, verifier) = pair(&IdentityConfig::new("round-trip"));
    let minted = issuer.mint(id(42)).unwrap();

    assert_eq!(
        verifier.verify(&minted.token),
        VerificationResult::Valid {
            customer_id: "000042".into()
        }
    );
}

#[test]
fn round_trip_across_id_magnitudes() {
    let (issuer, verifier) = pair(&IdentityConfig::new("magnitudes"));

    for n in [1, 9, 10, 4_321, 999_999, 1_000_000, 73_000_001] {
        let token = issuer.mint(id(n)).unwrap().token;
        let result = verifier.verify(&token);
        assert_eq!(result.customer_id(), Some(id(n).padded().as_str()), "customer {n}");
        assert_eq!(result.customer_id().unwrap().parse::<CustomerId>().unwrap(), id(n));
    }
}

#[test]
fn repeated_mints_differ_but_identify_the_same_customer() {
    let (issuer, verifier) = pair(&IdentityConfig::new("non-deterministic"));
    let first = issuer.mint(id(42)).unwrap();
    let second = issuer.mint(id(42)).unwrap();

    assert_ne!(first.token, second.token);
    assert_eq!(verifier.verify(&first.token), verifier.verify(&second.token));
    assert!(verifier.verify(&first.token).is_valid());
}

#[test]
fn every_single_character_flip_is_rejected() {
    let (issuer, verifier) = pair(&IdentityConfig::new("tamper"));
    let token = issuer.mint(id(42)).unwrap().token;

    for (pos, original) in token.char_indices() {
        let replacement = if original == 'A' { 'B' } else { 'A' };
        let mut tampered = token.clone();
        tampered.replace_range(pos..pos + 1, &replacement.to_string());

        assert_eq!(
            verifier.verify(&tampered),
            VerificationResult::Invalid {
                reason: RejectReason::MalformedOrBadSignature
            },
            "flip at {pos}"
        );
    }
}

#[test]
fn corrupted_signature_suffix_is_rejected() {
    let (issuer, verifier) = pair(&IdentityConfig::new("suffix"));
    let token = issuer.mint(id(42)).unwrap().token;
    assert!(verifier.verify(&token).is_valid());

    let cut = token.rfind('.').unwrap() + 1;
    let corrupted = format!("{}{}", &token[..cut], "x".repeat(token.len() - cut));

    assert_eq!(
        verifier.verify(&corrupted),
        VerificationResult::Invalid {
            reason: RejectReason::MalformedOrBadSignature
        }
    );
}

#[test]
fn rotated_secret_invalidates_old_tokens() {
    let (issuer, _) = pair(&IdentityConfig::new("old-secret"));
    let (_, verifier) = pair(&IdentityConfig::new("new-secret"));
    let token = issuer.mint(id(42)).unwrap().token;

    assert_eq!(
        verifier.verify(&token),
        VerificationResult::Invalid {
            reason: RejectReason::MalformedOrBadSignature
        }
    );
}

#[test]
fn tokens_from_another_issuer_are_rejected() {
    let secret = "shared-between-deployments";
    let (foreign_issuer, _) = pair(&IdentityConfig::new(secret).with_issuer("other-chain"));
    let (_, verifier) = pair(&IdentityConfig::new(secret));
    let token = foreign_issuer.mint(id(42)).unwrap().token;

    assert_eq!(
        verifier.verify(&token),
        VerificationResult::Invalid {
            reason: RejectReason::WrongIssuer
        }
    );
}

fn scan(png: &[u8]) -> String {
    let pixels = image::load_from_memory(png).unwrap().to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        pixels.width() as usize,
        pixels.height() as usize,
        |x, y| pixels.get_pixel(x as u32, y as u32)[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code");
    grids[0].decode().unwrap().1
}

#[test]
fn minted_image_encodes_the_token_that_verifies() {
    let (issuer, verifier) = pair(&IdentityConfig::new("scan-back"));
    let minted = issuer.mint(id(42)).unwrap();

    let scanned = scan(minted.image.png());
    assert_eq!(scanned, minted.token);
    assert_eq!(verifier.verify(&scanned).customer_id(), Some("000042"));
}

#[test]
fn minted_image_uses_configured_size() {
    let config = IdentityConfig::new("image").with_image(ImageOptions {
        size: 512,
        margin: 2,
    });
    let (issuer, _) = pair(&config);
    let minted = issuer.mint(id(42)).unwrap();

    assert_eq!((minted.image.width(), minted.image.height()), (512, 512));
    assert!(minted.image.png().starts_with(b"\x89PNG"));
}

#[test]
fn issuer_and_verifier_work_across_threads() {
    let (issuer, verifier) = pair(&IdentityConfig::new("threads"));

    let handles: Vec<_> = (1..=8)
        .map(|n| {
            let issuer = issuer.clone();
            let verifier = verifier.clone();
            std::thread::spawn(move || {
                let token = issuer.mint(id(n)).unwrap().token;
                verifier.verify(&token)
            })
        })
        .collect();

    for (n, handle) in (1..=8).zip(handles) {
        assert_eq!(handle.join().unwrap().customer_id(), Some(id(n).padded().as_str()));
    }
}
